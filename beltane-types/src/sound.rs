//! Synthesis-voice parameters shared between the settings layer and the
//! audio engine. The actual node graph lives behind the backend trait.

use serde::{Deserialize, Serialize};

/// Oscillator waveform for all voices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    #[default]
    Sawtooth,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Sawtooth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "sawtooth",
        }
    }

    pub fn from_name(name: &str) -> Option<Waveform> {
        Waveform::ALL.into_iter().find(|w| w.name() == name)
    }
}

/// Envelope and effect parameters applied to every voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    pub waveform: Waveform,
    /// Peak amplitude reached by the attack ramp.
    pub max_amp: f32,
    pub attack_secs: f32,
    pub release_secs: f32,
    /// Dry/wet mix for the shared delay, forwarded opaquely to the backend.
    pub delay_wet: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sawtooth,
            max_amp: 0.5,
            attack_secs: 0.05,
            release_secs: 0.3,
            delay_wet: 0.2,
        }
    }
}

/// MIDI interpretation settings. Device binding itself is external; the
/// core only needs the octave that maps to scale step 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiSettings {
    pub base_octave: i32,
}

impl Default for MidiSettings {
    fn default() -> Self {
        Self { base_octave: 3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waveform_names_round_trip() {
        for w in Waveform::ALL {
            assert_eq!(Waveform::from_name(w.name()), Some(w));
        }
        assert_eq!(Waveform::from_name("noise"), None);
    }
}
