//! Application state: every tunable plus the derived scale table.

use beltane_types::{
    LayoutConfig, MidiSettings, ScaleConfig, ScaleTable, SoundConfig, TuningSnapshot,
};

use crate::config::InstrumentDefaults;

/// Size of the input surface, needed for base placement and column-width
/// validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// The single mutable state of the instrument. Mutated only through the
/// dispatcher; the scale table is derived and refreshed by
/// [`AppState::recompute_scale`] whenever a tuning field changes.
#[derive(Debug, Clone)]
pub struct AppState {
    pub scale: ScaleConfig,
    pub layout: LayoutConfig,
    pub sound: SoundConfig,
    pub midi: MidiSettings,
    pub viewport: Viewport,
    table: ScaleTable,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new_with_defaults(InstrumentDefaults::default())
    }
}

impl AppState {
    pub fn new_with_defaults(defaults: InstrumentDefaults) -> Self {
        let InstrumentDefaults {
            scale,
            layout,
            sound,
            midi,
        } = defaults;
        let viewport = Viewport::default();
        let table = scale.table();
        let mut state = Self {
            scale,
            layout,
            sound,
            midi,
            viewport,
            table,
        };
        state.layout.place_base(viewport.width, viewport.height);
        state
    }

    pub fn table(&self) -> &ScaleTable {
        &self.table
    }

    /// Re-derive the scale table from the current parameters.
    pub fn recompute_scale(&mut self) {
        self.table = self.scale.table();
    }

    /// The tuning copy pushed to the audio engine after a settings change.
    pub fn tuning_snapshot(&self) -> TuningSnapshot {
        TuningSnapshot {
            table: self.table.clone(),
            base_frequency: self.scale.base_frequency,
            max_snap_cents: self.scale.max_snap_cents,
            force_snap: self.scale.force_snap,
        }
    }
}
