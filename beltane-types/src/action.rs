//! Input events and settings actions.
//!
//! Events arrive from the external collaborators (pointer/touch surface,
//! computer keyboard, MIDI input) already decoded; settings actions carry
//! typed, parsed values. Range validation against live state happens in
//! the dispatcher.

use serde::{Deserialize, Serialize};

use crate::sound::Waveform;
use crate::tuning::Fraction;
use crate::PointerId;

/// A pointer or touch contact on the playing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub id: PointerId,
    pub x: f64,
    pub y: f64,
    pub phase: PointerPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// One key of the fixed ten-key scale-degree row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// 0..10, left to right.
    pub key_index: u8,
    pub phase: KeyPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyPhase {
    Down,
    Up,
}

/// A MIDI note expressed as a white-key-relative scale-step offset
/// (see `beltane_core::midi` for the name/octave mapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiNoteEvent {
    pub offset: i32,
    pub phase: NotePhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotePhase {
    On,
    Off,
}

/// A MIDI control-change message, value normalized to 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MidiControlEvent {
    pub controller: u8,
    pub value: f64,
}

/// A parsed settings edit. Produced by `beltane_core::settings` from the
/// raw name/value pairs of the settings surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingsAction {
    EqualDivisions(u32),
    /// Empty means "fall back to EDO".
    ScaleRatios(Vec<u32>),
    Mode(i32),
    BaseFrequency(f64),
    PeriodRatio(Fraction),
    SnapRange(f64),
    ForceSnap(bool),
    ColumnOffsetCents(f64),
    /// Pixels per cent; `0.0` selects spiral mode.
    ColumnHeight(f64),
    ColumnWidth(f64),
    StepsVisibility(f64),
    Waveform(Waveform),
    DelayWet(f64),
    MidiBaseOctave(i32),
}

/// Everything the dispatcher accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Pointer(PointerEvent),
    Key(KeyEvent),
    MidiNote(MidiNoteEvent),
    MidiControl(MidiControlEvent),
    Setting(SettingsAction),
    Resize { width: f64, height: f64 },
}
