//! Display projection: what the render layer shows for the current state.

use beltane_audio::AudioEngine;
use beltane_types::{display, StepLabel};

use crate::state::AppState;

/// Labels for the playing channels, or the whole scale when nothing plays.
/// Ratio strings for a ratio-chord scale, cents otherwise.
pub fn project_labels(engine: &AudioEngine, state: &AppState) -> Vec<StepLabel> {
    display::labels(
        state.table(),
        state.scale.max_snap_cents,
        &engine.playing_steps(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use beltane_audio::{AudioEngine, NullBackend};
    use beltane_types::SoundConfig;

    #[test]
    fn silent_instrument_projects_the_full_scale() {
        let state = AppState::default();
        let (engine, _rx) = AudioEngine::new(
            Box::new(NullBackend),
            SoundConfig::default(),
            state.tuning_snapshot(),
        );
        let labels = project_labels(&engine, &state);
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0].text, "1/1");
    }

    #[test]
    fn playing_key_projects_its_step() {
        let state = AppState::default();
        let (mut engine, _rx) = AudioEngine::new(
            Box::new(NullBackend),
            SoundConfig::default(),
            state.tuning_snapshot(),
        );
        engine.key_down(4).unwrap();
        let labels = project_labels(&engine, &state);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "3/2");
        assert_eq!(labels[0].opacity, 1.0);
    }
}
