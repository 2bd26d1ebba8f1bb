//! # beltane-core
//!
//! Backend library for the Beltane microtonal instrument: state
//! management, settings parsing, action dispatch and display projection —
//! independent of any rendering or input framework.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use beltane_audio::{AudioEngine, NullBackend};
//! use beltane_core::config::Config;
//! use beltane_core::dispatch::{apply_side_effects, dispatch_action};
//! use beltane_core::state::AppState;
//!
//! // 1. Create state with defaults from config
//! let config = Config::load();
//! let mut state = AppState::new_with_defaults(config.defaults());
//!
//! // 2. Create the engine against a synth backend
//! let (mut engine, feedback_rx) =
//!     AudioEngine::new(Box::new(NullBackend), state.sound.clone(), state.tuning_snapshot());
//!
//! // 3. Dispatch input and settings events as they arrive
//! let mut effects = Vec::new();
//! let result = dispatch_action(&action, &mut state, &mut effects);
//! apply_side_effects(&mut engine, &effects)?;
//!
//! // 4. Tick the engine from the event loop so fade-outs finish,
//! //    redraw when `result.needs_redraw`, and drain `feedback_rx`
//! //    for resume requests from a suspended output context.
//! ```
//!
//! ## Module Overview
//!
//! - [`state`] — `AppState`: scale, layout, sound and MIDI settings plus
//!   the derived scale table
//! - [`dispatch`] — `dispatch_action()`, the single entry point for state
//!   mutation, and the audio side-effect list it produces
//! - [`settings`] — raw name/value parsing with per-field validation
//! - [`midi`] — white-key note naming and the CC scale-edit map
//! - [`display`] — label/color projection for the render layer
//! - [`config`] — TOML configuration (embedded defaults + user override)

pub mod config;
pub mod display;
pub mod dispatch;
pub mod midi;
pub mod settings;
pub mod state;
