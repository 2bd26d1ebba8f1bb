//! Audio side effects produced by the dispatcher.
//!
//! Dispatch functions push these instead of calling the engine directly,
//! which decouples state mutation from audio I/O and keeps dispatch
//! testable without a backend. Variants map 1:1 to [`AudioEngine`]
//! methods; the caller applies them after dispatch returns.

use beltane_audio::{AudioEngine, BackendResult, SourceKind};
use beltane_types::{PointerId, SoundConfig, TuningSnapshot};

/// A deferred audio operation produced during action dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSideEffect {
    PointerDown { id: PointerId, cents: f64 },
    PointerMove { id: PointerId, cents: f64 },
    PointerUp { id: PointerId },
    PointerCancel,
    KeyDown { key: u8 },
    KeyUp { key: u8 },
    MidiNoteOn { offset: i32 },
    MidiNoteOff { offset: i32 },
    /// Fade out every channel of one source kind, or all of them.
    ReleaseAll(Option<SourceKind>),
    /// Hard stop of the whole pool, for a suspended output context.
    KillAll,
    SetTuning(TuningSnapshot),
    SetSound(SoundConfig),
}

/// Apply collected effects to the engine, in order.
pub fn apply_side_effects(
    engine: &mut AudioEngine,
    effects: &[AudioSideEffect],
) -> BackendResult {
    for effect in effects {
        match effect {
            AudioSideEffect::PointerDown { id, cents } => engine.pointer_down(*id, *cents)?,
            AudioSideEffect::PointerMove { id, cents } => engine.pointer_move(*id, *cents)?,
            AudioSideEffect::PointerUp { id } => engine.pointer_up(*id)?,
            AudioSideEffect::PointerCancel => engine.pointer_cancel()?,
            AudioSideEffect::KeyDown { key } => engine.key_down(*key)?,
            AudioSideEffect::KeyUp { key } => engine.key_up(*key)?,
            AudioSideEffect::MidiNoteOn { offset } => engine.midi_note_on(*offset)?,
            AudioSideEffect::MidiNoteOff { offset } => engine.midi_note_off(*offset)?,
            AudioSideEffect::ReleaseAll(filter) => engine.release_all(*filter)?,
            AudioSideEffect::KillAll => engine.kill_all()?,
            AudioSideEffect::SetTuning(snapshot) => engine.set_tuning(snapshot.clone()),
            AudioSideEffect::SetSound(sound) => engine.set_sound(sound.clone())?,
        }
    }
    Ok(())
}
