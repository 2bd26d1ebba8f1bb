//! The audio engine: voice pool management in front of a synth backend.
//!
//! All entry points run synchronously on the caller's thread; the only
//! time-dependent piece is the deferred stop at the end of a fade-out,
//! modeled as a cancellable scheduled task checked by [`AudioEngine::tick`].

pub mod backend;
pub mod channel_bank;
pub mod voices;

use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};

use beltane_types::tuning::{frequency, snap, wrap};
use beltane_types::{PlayingStep, PointerId, SoundConfig, TuningSnapshot};

pub use backend::{BackendError, BackendOp, BackendResult, NullBackend, RecordingBackend, SynthBackend};
pub use channel_bank::{ChannelBank, CHANNEL_COUNT};
pub use voices::{ChannelSource, SourceKind, VoiceChannel};

/// Messages the engine sends back to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFeedback {
    /// A note was requested while the output context is suspended; the
    /// host should resume it (and the note is dropped).
    ResumeRequested,
}

/// A stop scheduled at the end of a fade-out. Only fires if the channel's
/// generation still matches the one captured at release time, so
/// re-releasing or reallocating a slot cancels the stale timer.
#[derive(Debug, Clone, Copy)]
struct PendingStop {
    slot: usize,
    generation: u64,
    due: Instant,
}

pub struct AudioEngine {
    bank: ChannelBank,
    backend: Box<dyn SynthBackend>,
    sound: SoundConfig,
    tuning: TuningSnapshot,
    pending_stops: Vec<PendingStop>,
    feedback_tx: Sender<EngineFeedback>,
}

impl AudioEngine {
    pub fn new(
        backend: Box<dyn SynthBackend>,
        sound: SoundConfig,
        tuning: TuningSnapshot,
    ) -> (Self, Receiver<EngineFeedback>) {
        let (feedback_tx, feedback_rx) = unbounded();
        (
            Self {
                bank: ChannelBank::new(),
                backend,
                sound,
                tuning,
                pending_stops: Vec::new(),
                feedback_tx,
            },
            feedback_rx,
        )
    }

    pub fn bank(&self) -> &ChannelBank {
        &self.bank
    }

    pub fn tuning(&self) -> &TuningSnapshot {
        &self.tuning
    }

    pub fn sound(&self) -> &SoundConfig {
        &self.sound
    }

    // ── input entry points ──────────────────────────────────────────────

    pub fn pointer_down(&mut self, id: PointerId, raw_cents: f64) -> BackendResult {
        self.gesture_down(ChannelSource::Pointer { id }, raw_cents)
    }

    pub fn pointer_move(&mut self, id: PointerId, raw_cents: f64) -> BackendResult {
        match self.bank.find_exact(ChannelSource::Pointer { id }) {
            Some(slot) => self.apply_raw_cents(slot, raw_cents),
            None => Ok(()),
        }
    }

    pub fn pointer_up(&mut self, id: PointerId) -> BackendResult {
        match self.bank.find_exact(ChannelSource::Pointer { id }) {
            Some(slot) => self.release_slot(slot),
            None => Ok(()),
        }
    }

    /// The surface lost the gesture stream; fade everything out.
    pub fn pointer_cancel(&mut self) -> BackendResult {
        self.release_all(None)
    }

    /// Single-pointer fallback for hosts without pointer identity.
    pub fn mouse_down(&mut self, raw_cents: f64) -> BackendResult {
        self.gesture_down(ChannelSource::Mouse, raw_cents)
    }

    pub fn mouse_move(&mut self, raw_cents: f64) -> BackendResult {
        match self.bank.find_exact(ChannelSource::Mouse) {
            Some(slot) => self.apply_raw_cents(slot, raw_cents),
            None => Ok(()),
        }
    }

    pub fn mouse_up(&mut self) -> BackendResult {
        match self.bank.find_exact(ChannelSource::Mouse) {
            Some(slot) => self.release_slot(slot),
            None => Ok(()),
        }
    }

    /// A key of the ten-key scale-degree row went down. The key index is
    /// the scale-step offset; no snapping applies.
    pub fn key_down(&mut self, key: u8) -> BackendResult {
        if !self.ensure_running() {
            return Ok(());
        }
        if self.bank.find_exact(ChannelSource::Kbd { key }).is_some() {
            return Ok(());
        }
        let Some(cents) = self.tuning.table.step_offset_to_cents(key as i64) else {
            return Ok(());
        };
        self.start_step_voice(ChannelSource::Kbd { key }, cents)
    }

    pub fn key_up(&mut self, key: u8) -> BackendResult {
        match self.bank.find_exact(ChannelSource::Kbd { key }) {
            Some(slot) => self.release_slot(slot),
            None => Ok(()),
        }
    }

    pub fn midi_note_on(&mut self, offset: i32) -> BackendResult {
        if !self.ensure_running() {
            return Ok(());
        }
        if self.bank.find_exact(ChannelSource::Midi { offset }).is_some() {
            return Ok(());
        }
        let Some(cents) = self.tuning.table.step_offset_to_cents(offset as i64) else {
            return Ok(());
        };
        self.start_step_voice(ChannelSource::Midi { offset }, cents)
    }

    /// MIDI note-off stops the voice immediately, without the fade the
    /// other sources get.
    pub fn midi_note_off(&mut self, offset: i32) -> BackendResult {
        match self.bank.find_exact(ChannelSource::Midi { offset }) {
            Some(slot) => {
                self.bank.kill(slot);
                self.backend.stop_voice(slot)
            }
            None => Ok(()),
        }
    }

    // ── lifecycle ───────────────────────────────────────────────────────

    /// Fade out every channel matching the filter (or all of them).
    pub fn release_all(&mut self, filter: Option<SourceKind>) -> BackendResult {
        for slot in self.bank.release_candidates(filter) {
            self.release_slot(slot)?;
        }
        Ok(())
    }

    /// Immediate hard stop of the whole pool, bypassing fades. Used when
    /// the output context itself goes away.
    pub fn kill_all(&mut self) -> BackendResult {
        self.pending_stops.clear();
        for slot in 0..CHANNEL_COUNT {
            self.bank.kill(slot);
            self.backend.stop_voice(slot)?;
        }
        Ok(())
    }

    /// Fire due deferred stops. Stale timers (generation mismatch after a
    /// re-release or reallocation) are dropped without effect.
    pub fn tick(&mut self, now: Instant) -> BackendResult {
        let mut i = 0;
        while i < self.pending_stops.len() {
            if self.pending_stops[i].due <= now {
                let stop = self.pending_stops.remove(i);
                if self.bank.channel(stop.slot).generation() == stop.generation {
                    self.bank.finish_release(stop.slot);
                    self.backend.stop_voice(stop.slot)?;
                }
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    // ── settings sync ───────────────────────────────────────────────────

    pub fn set_tuning(&mut self, tuning: TuningSnapshot) {
        self.tuning = tuning;
    }

    pub fn set_sound(&mut self, sound: SoundConfig) -> BackendResult {
        if sound.waveform != self.sound.waveform {
            self.backend.set_waveform(sound.waveform)?;
        }
        if sound.delay_wet != self.sound.delay_wet {
            self.backend.set_delay_wet(sound.delay_wet)?;
        }
        self.sound = sound;
        Ok(())
    }

    // ── display support ─────────────────────────────────────────────────

    /// Current playing set as scale steps: exact steps for kbd and MIDI
    /// channels, the closest step plus its distance for surface channels.
    pub fn playing_steps(&self) -> Vec<PlayingStep> {
        let table = &self.tuning.table;
        let mut steps = Vec::new();
        for (_, channel) in self.bank.playing() {
            match channel.source {
                ChannelSource::Midi { offset } => steps.push(PlayingStep {
                    offset: offset as i64,
                    dist: 0.0,
                }),
                ChannelSource::Kbd { key } => steps.push(PlayingStep {
                    offset: key as i64,
                    dist: 0.0,
                }),
                _ => {
                    let Some(cents) = channel.cents else { continue };
                    if table.is_empty() {
                        continue;
                    }
                    let octave = (cents / table.period_cents).floor() as i64;
                    let in_octave = wrap(cents, 0.0, table.period_cents);
                    let mut closest = 0usize;
                    let mut best = f64::INFINITY;
                    for (i, pitch) in table
                        .cents
                        .iter()
                        .copied()
                        .chain(std::iter::once(table.period_cents))
                        .enumerate()
                    {
                        let distance = (pitch - in_octave).abs();
                        if distance < best {
                            best = distance;
                            closest = i;
                        }
                    }
                    let offset = closest as i64 + octave * table.len() as i64;
                    let dist = table
                        .step_offset_to_cents(offset)
                        .map(|c| (cents - c).abs())
                        .unwrap_or(0.0);
                    steps.push(PlayingStep { offset, dist });
                }
            }
        }
        steps
    }

    // ── internals ───────────────────────────────────────────────────────

    /// Gate every note start on a running output context: when suspended,
    /// silence the pool and ask the host to resume instead.
    fn ensure_running(&mut self) -> bool {
        if self.backend.is_running() {
            return true;
        }
        if let Err(e) = self.kill_all() {
            log::error!(target: "engine", "kill_all on suspended context failed: {}", e);
        }
        self.backend.request_resume();
        let _ = self.feedback_tx.send(EngineFeedback::ResumeRequested);
        false
    }

    fn gesture_down(&mut self, source: ChannelSource, raw_cents: f64) -> BackendResult {
        if !self.ensure_running() {
            return Ok(());
        }
        if self.bank.find_exact(source).is_some() {
            return Ok(());
        }
        let Some(slot) = self.bank.allocate(source) else {
            log::debug!(target: "voices", "pool exhausted, dropping {:?}", source);
            return Ok(());
        };
        self.apply_raw_cents(slot, raw_cents)?;
        self.start_attack(slot)
    }

    fn start_step_voice(&mut self, source: ChannelSource, cents: f64) -> BackendResult {
        let Some(slot) = self.bank.allocate(source) else {
            log::debug!(target: "voices", "pool exhausted, dropping {:?}", source);
            return Ok(());
        };
        self.bank.channel_mut(slot).cents = Some(cents);
        let hz = frequency(self.tuning.base_frequency, cents);
        self.backend.set_freq(slot, hz)?;
        self.start_attack(slot)
    }

    /// Update a surface channel from a raw cents sample: advance the snap
    /// state machine, blend, retune.
    fn apply_raw_cents(&mut self, slot: usize, raw_cents: f64) -> BackendResult {
        let tuning = &self.tuning;
        let channel = self.bank.channel_mut(slot);
        let previous = channel.cents;
        channel.last_cents = previous;

        let mut cents = raw_cents;
        if !tuning.table.is_empty() && tuning.max_snap_cents != 0.0 {
            snap::update_snapping(
                &mut channel.snap,
                previous,
                raw_cents,
                &tuning.table,
                tuning.max_snap_cents,
                tuning.force_snap,
            );
            cents = channel.snap.blended(raw_cents);
        }
        channel.cents = Some(cents);

        let hz = frequency(tuning.base_frequency, cents);
        self.backend.set_freq(slot, hz)
    }

    fn start_attack(&mut self, slot: usize) -> BackendResult {
        self.backend.start_voice(slot)?;
        self.backend.set_amp(slot, 0.0)?;
        self.backend
            .ramp_amp(slot, self.sound.max_amp, self.sound.attack_secs)
    }

    fn release_slot(&mut self, slot: usize) -> BackendResult {
        let generation = self.bank.begin_release(slot);
        let secs = self.sound.release_secs;
        self.backend.ramp_amp(slot, 0.0, secs)?;
        // a bit past the fade so the ramp actually reaches zero
        let due = Instant::now() + Duration::from_secs_f32(secs * 1.1);
        self.pending_stops.push(PendingStop {
            slot,
            generation,
            due,
        });
        Ok(())
    }
}
