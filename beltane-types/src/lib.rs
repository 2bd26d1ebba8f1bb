//! # beltane-types
//!
//! Shared type definitions and pure math for the Beltane microtonal
//! instrument: tuning tables, coordinate mapping, snap state, input events
//! and display payloads. No I/O and no audio dependencies live here.

pub mod action;
pub mod display;
pub mod layout;
pub mod sound;
pub mod tuning;

pub use action::{
    Action, KeyEvent, KeyPhase, MidiControlEvent, MidiNoteEvent, NotePhase, PointerEvent,
    PointerPhase, SettingsAction,
};
pub use display::{PlayingStep, StepLabel};
pub use layout::LayoutConfig;
pub use sound::{MidiSettings, SoundConfig, Waveform};
pub use tuning::{Fraction, ScaleConfig, ScaleTable, SnapState};
pub use tuning::scale::TuningSnapshot;

/// Identity of a pointer/touch contact, as reported by the input surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PointerId(i64);

impl PointerId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PointerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
