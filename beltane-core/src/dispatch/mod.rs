//! Action dispatch: the single entry point for state mutation.
//!
//! Input events become audio side effects; settings actions mutate
//! [`AppState`], re-derive the scale table where needed, and push tuning or
//! sound snapshots for the engine. Invalid values are dropped with a
//! warning and the previous state is kept.

pub mod side_effects;

pub use side_effects::{apply_side_effects, AudioSideEffect};

use beltane_audio::SourceKind;
use beltane_types::{
    Action, KeyEvent, KeyPhase, MidiControlEvent, MidiNoteEvent, NotePhase, PointerEvent,
    PointerPhase, SettingsAction,
};

use crate::midi;
use crate::state::AppState;

/// Number of keys in the scale-degree key row.
pub const KEY_ROW_LEN: u8 = 10;

/// What the caller should do after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    pub needs_redraw: bool,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw() -> Self {
        Self { needs_redraw: true }
    }
}

/// Dispatch an action. State is mutated in place; audio operations are
/// collected into `effects` for the caller to apply to the engine.
pub fn dispatch_action(
    action: &Action,
    state: &mut AppState,
    effects: &mut Vec<AudioSideEffect>,
) -> DispatchResult {
    match action {
        Action::Pointer(event) => dispatch_pointer(event, state, effects),
        Action::Key(event) => dispatch_key(event, effects),
        Action::MidiNote(event) => dispatch_midi_note(event, effects),
        Action::MidiControl(event) => dispatch_midi_control(event, state, effects),
        Action::Setting(setting) => dispatch_setting(setting, state, effects),
        Action::Resize { width, height } => {
            state.viewport.width = *width;
            state.viewport.height = *height;
            state.layout.place_base(*width, *height);
            DispatchResult::redraw()
        }
    }
}

fn dispatch_pointer(
    event: &PointerEvent,
    state: &AppState,
    effects: &mut Vec<AudioSideEffect>,
) -> DispatchResult {
    match event.phase {
        PointerPhase::Down => effects.push(AudioSideEffect::PointerDown {
            id: event.id,
            cents: state.layout.cents_from_position(event.x, event.y),
        }),
        PointerPhase::Move => effects.push(AudioSideEffect::PointerMove {
            id: event.id,
            cents: state.layout.cents_from_position(event.x, event.y),
        }),
        PointerPhase::Up => effects.push(AudioSideEffect::PointerUp { id: event.id }),
        PointerPhase::Cancel => effects.push(AudioSideEffect::PointerCancel),
    }
    DispatchResult::redraw()
}

fn dispatch_key(event: &KeyEvent, effects: &mut Vec<AudioSideEffect>) -> DispatchResult {
    if event.key_index >= KEY_ROW_LEN {
        return DispatchResult::none();
    }
    match event.phase {
        KeyPhase::Down => effects.push(AudioSideEffect::KeyDown {
            key: event.key_index,
        }),
        KeyPhase::Up => effects.push(AudioSideEffect::KeyUp {
            key: event.key_index,
        }),
    }
    DispatchResult::redraw()
}

fn dispatch_midi_note(event: &MidiNoteEvent, effects: &mut Vec<AudioSideEffect>) -> DispatchResult {
    match event.phase {
        NotePhase::On => effects.push(AudioSideEffect::MidiNoteOn {
            offset: event.offset,
        }),
        NotePhase::Off => effects.push(AudioSideEffect::MidiNoteOff {
            offset: event.offset,
        }),
    }
    DispatchResult::redraw()
}

/// A CC message live-edits one member of the ratio chord: controllers 31,
/// 41, ... address scale degrees 0, 1, ... and the 0..=1 value scales to a
/// 1..=127 chord member.
fn dispatch_midi_control(
    event: &MidiControlEvent,
    state: &mut AppState,
    effects: &mut Vec<AudioSideEffect>,
) -> DispatchResult {
    let Some(degree) = midi::cc_target_degree(event.controller) else {
        return DispatchResult::none();
    };
    if degree >= state.scale.scale_ratios.len() {
        return DispatchResult::none();
    }
    let member = (event.value.clamp(0.0, 1.0) * 127.0).floor() as u32;
    if member == 0 {
        // chord members are positive; the bottom of the CC range is noise
        return DispatchResult::none();
    }
    state.scale.scale_ratios[degree] = member;
    state.recompute_scale();
    effects.push(AudioSideEffect::SetTuning(state.tuning_snapshot()));
    DispatchResult::redraw()
}

/// Which parts of the system a settings edit touches.
enum SettingOutcome {
    Tuning,
    Sound,
    Stored,
    Rejected,
}

fn dispatch_setting(
    setting: &SettingsAction,
    state: &mut AppState,
    effects: &mut Vec<AudioSideEffect>,
) -> DispatchResult {
    // any settings edit may redefine the step mapping; silence the voices
    // whose pitch came from a step offset before touching it
    effects.push(AudioSideEffect::ReleaseAll(Some(SourceKind::Kbd)));
    effects.push(AudioSideEffect::ReleaseAll(Some(SourceKind::Midi)));

    let outcome = apply_setting(setting, state);
    match outcome {
        SettingOutcome::Tuning => {
            state.recompute_scale();
            effects.push(AudioSideEffect::SetTuning(state.tuning_snapshot()));
        }
        SettingOutcome::Sound => {
            effects.push(AudioSideEffect::SetSound(state.sound.clone()));
        }
        SettingOutcome::Stored | SettingOutcome::Rejected => {}
    }
    DispatchResult::redraw()
}

fn apply_setting(setting: &SettingsAction, state: &mut AppState) -> SettingOutcome {
    match setting {
        SettingsAction::EqualDivisions(divisions) => {
            state.scale.equal_divisions = *divisions;
            if state.scale.scale_ratios.is_empty() {
                SettingOutcome::Tuning
            } else {
                // stored for later; a ratio chord currently defines the scale
                SettingOutcome::Stored
            }
        }
        SettingsAction::ScaleRatios(ratios) => {
            state.scale.scale_ratios = ratios.clone();
            SettingOutcome::Tuning
        }
        SettingsAction::Mode(mode) => {
            state.scale.mode = *mode;
            SettingOutcome::Tuning
        }
        SettingsAction::BaseFrequency(hz) => {
            state.scale.base_frequency = *hz;
            SettingOutcome::Tuning
        }
        SettingsAction::PeriodRatio(period) => {
            state.scale.period_ratio = *period;
            SettingOutcome::Tuning
        }
        SettingsAction::SnapRange(cents) => {
            state.scale.max_snap_cents = *cents;
            SettingOutcome::Tuning
        }
        SettingsAction::ForceSnap(force) => {
            state.scale.force_snap = *force;
            SettingOutcome::Tuning
        }
        SettingsAction::ColumnOffsetCents(cents) => {
            state.layout.next_column_offset_cents = *cents;
            SettingOutcome::Stored
        }
        SettingsAction::ColumnHeight(pixels_per_cent) => {
            if *pixels_per_cent == 0.0 {
                state.layout.cents_to_pixels = 1.0;
                state.layout.spiral_mode = true;
            } else {
                state.layout.cents_to_pixels = *pixels_per_cent;
                state.layout.spiral_mode = false;
            }
            state
                .layout
                .place_base(state.viewport.width, state.viewport.height);
            SettingOutcome::Stored
        }
        SettingsAction::ColumnWidth(width) => {
            if *width > 10.0 && *width < state.viewport.width {
                state.layout.column_width = *width;
                SettingOutcome::Stored
            } else {
                log::warn!(target: "settings", "column width {} outside (10, {})", width, state.viewport.width);
                SettingOutcome::Rejected
            }
        }
        SettingsAction::StepsVisibility(alpha) => {
            state.layout.steps_visibility = *alpha;
            SettingOutcome::Stored
        }
        SettingsAction::Waveform(waveform) => {
            state.sound.waveform = *waveform;
            SettingOutcome::Sound
        }
        SettingsAction::DelayWet(wet) => {
            state.sound.delay_wet = *wet as f32;
            SettingOutcome::Sound
        }
        SettingsAction::MidiBaseOctave(octave) => {
            state.midi.base_octave = *octave;
            SettingOutcome::Stored
        }
    }
}
