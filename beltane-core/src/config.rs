//! TOML configuration: embedded defaults plus an optional user override.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use beltane_types::{LayoutConfig, MidiSettings, ScaleConfig, SoundConfig, Waveform};

use crate::settings::{parse_period, parse_ratio_chord};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    base_frequency: Option<f64>,
    snap_range_cents: Option<f64>,
    force_snap: Option<bool>,
    equal_divisions: Option<u32>,
    scale: Option<String>,
    mode: Option<i32>,
    period: Option<String>,
    column_offset_cents: Option<f64>,
    cents_to_pixels: Option<f64>,
    column_width: Option<f64>,
    steps_visibility: Option<f64>,
    waveform: Option<String>,
    max_amp: Option<f32>,
    attack_secs: Option<f32>,
    release_secs: Option<f32>,
    delay_wet: Option<f32>,
    midi_base_octave: Option<i32>,
}

/// Startup defaults for every tunable of the instrument.
#[derive(Debug, Clone, Default)]
pub struct InstrumentDefaults {
    pub scale: ScaleConfig,
    pub layout: LayoutConfig,
    pub sound: SoundConfig,
    pub midi: MidiSettings,
}

pub struct Config {
    defaults: DefaultsConfig,
}

impl Config {
    /// Embedded defaults overlaid with the user config file, if one exists.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::embedded(),
        }
    }

    /// Same as [`Config::load`] with an explicit override path.
    pub fn load_from(path: &Path) -> Self {
        let mut base = Self::embedded();
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                    Ok(user) => merge_defaults(&mut base.defaults, user.defaults),
                    Err(e) => {
                        log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                    }
                },
                Err(e) => {
                    log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                }
            }
        }
        base
    }

    fn embedded() -> Self {
        let base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("failed to parse embedded config.toml");
        Config {
            defaults: base.defaults,
        }
    }

    /// Resolve the configured values, falling back field-by-field to the
    /// hardcoded defaults when a value is absent or invalid.
    pub fn defaults(&self) -> InstrumentDefaults {
        let d = &self.defaults;
        let mut scale = ScaleConfig::default();
        if let Some(hz) = d.base_frequency.filter(|&hz| hz > 0.0) {
            scale.base_frequency = hz;
        }
        if let Some(cents) = d.snap_range_cents.filter(|&c| c >= 0.0) {
            scale.max_snap_cents = cents;
        }
        if let Some(force) = d.force_snap {
            scale.force_snap = force;
        }
        if let Some(divisions) = d.equal_divisions.filter(|&n| n > 0) {
            scale.equal_divisions = divisions;
        }
        if let Some(text) = &d.scale {
            if text == "all" {
                scale.scale_ratios = Vec::new();
            } else if let Some(ratios) = parse_ratio_chord(text) {
                scale.scale_ratios = ratios;
            } else {
                log::warn!(target: "config", "ignoring invalid scale {:?}", text);
            }
        }
        if let Some(mode) = d.mode {
            scale.mode = mode;
        }
        if let Some(text) = &d.period {
            match parse_period(text) {
                Some(period) => scale.period_ratio = period,
                None => log::warn!(target: "config", "ignoring invalid period {:?}", text),
            }
        }

        let mut layout = LayoutConfig::default();
        if let Some(cents) = d.column_offset_cents {
            layout.next_column_offset_cents = cents;
        }
        if let Some(scale_px) = d.cents_to_pixels {
            if scale_px == 0.0 {
                layout.cents_to_pixels = 1.0;
                layout.spiral_mode = true;
            } else if scale_px > 0.0 {
                layout.cents_to_pixels = scale_px;
            }
        }
        if let Some(width) = d.column_width.filter(|&w| w > 10.0) {
            layout.column_width = width;
        }
        if let Some(alpha) = d.steps_visibility.filter(|v| (0.0..=1.0).contains(v)) {
            layout.steps_visibility = alpha;
        }

        let mut sound = SoundConfig::default();
        if let Some(name) = &d.waveform {
            match Waveform::from_name(name) {
                Some(waveform) => sound.waveform = waveform,
                None => log::warn!(target: "config", "ignoring invalid waveform {:?}", name),
            }
        }
        if let Some(amp) = d.max_amp.filter(|&a| a > 0.0) {
            sound.max_amp = amp;
        }
        if let Some(secs) = d.attack_secs.filter(|&s| s >= 0.0) {
            sound.attack_secs = secs;
        }
        if let Some(secs) = d.release_secs.filter(|&s| s >= 0.0) {
            sound.release_secs = secs;
        }
        if let Some(wet) = d.delay_wet.filter(|&w| w > 0.0) {
            sound.delay_wet = wet;
        }

        let mut midi = MidiSettings::default();
        if let Some(octave) = d.midi_base_octave {
            midi.base_octave = octave;
        }

        InstrumentDefaults {
            scale,
            layout,
            sound,
            midi,
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("beltane").join("config.toml"))
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    macro_rules! merge {
        ($($field:ident),* $(,)?) => {
            $(if user.$field.is_some() {
                base.$field = user.$field;
            })*
        };
    }
    merge!(
        base_frequency,
        snap_range_cents,
        force_snap,
        equal_divisions,
        scale,
        mode,
        period,
        column_offset_cents,
        cents_to_pixels,
        column_width,
        steps_visibility,
        waveform,
        max_amp,
        attack_secs,
        release_secs,
        delay_wet,
        midi_base_octave,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use beltane_types::Fraction;

    #[test]
    fn embedded_defaults_parse() {
        let defaults = Config::embedded().defaults();
        assert_eq!(defaults.scale.base_frequency, 110.0);
        assert_eq!(defaults.scale.scale_ratios.len(), 8);
        assert_eq!(defaults.scale.period_ratio, Fraction::new(2, 1));
        assert_eq!(defaults.sound.waveform, Waveform::Sawtooth);
        assert_eq!(defaults.midi.base_octave, 3);
    }

    #[test]
    fn user_file_overrides_individual_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(
            file,
            "[defaults]\nscale = \"all\"\nequal_divisions = 31\nwaveform = \"triangle\""
        )
        .expect("write");

        let defaults = Config::load_from(&path).defaults();
        assert!(defaults.scale.scale_ratios.is_empty());
        assert_eq!(defaults.scale.equal_divisions, 31);
        assert_eq!(defaults.sound.waveform, Waveform::Triangle);
        // untouched keys keep the embedded values
        assert_eq!(defaults.scale.base_frequency, 110.0);
    }

    #[test]
    fn malformed_user_file_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not toml [[").expect("write");

        let defaults = Config::load_from(&path).defaults();
        assert_eq!(defaults.scale.equal_divisions, 12);
    }

    #[test]
    fn missing_user_file_is_fine() {
        let defaults = Config::load_from(Path::new("/nonexistent/beltane.toml")).defaults();
        assert_eq!(defaults.scale.base_frequency, 110.0);
    }

    #[test]
    fn invalid_values_fall_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\nbase_frequency = -5.0\nperiod = \"1/2\"\nwaveform = \"noise\"",
        )
        .expect("write");

        let defaults = Config::load_from(&path).defaults();
        assert_eq!(defaults.scale.base_frequency, 110.0);
        assert_eq!(defaults.scale.period_ratio, Fraction::new(2, 1));
        assert_eq!(defaults.sound.waveform, Waveform::Sawtooth);
    }
}
