//! Hysteretic pitch snapping.
//!
//! Not a hard quantizer: a continuously played pitch gets a "magnetic" pull
//! toward the nearest in-scale pitch, with a capture radius and a strength
//! that glides between 0 and 100 as the finger moves. Micro-bends around a
//! target stay expressive instead of being clamped.

use serde::{Deserialize, Serialize};

use super::{lerp, remap, wrap, ScaleTable};

/// Per-channel snap state. Owned by the voice channel, reset on release.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapState {
    /// Scale pitch currently pulled toward, in absolute cents.
    pub target_cents: Option<f64>,
    /// Raw cents at the moment the target was acquired.
    pub start_cents: Option<f64>,
    /// 0 = no pull, 100 = fully on the target.
    pub strength: f64,
}

impl SnapState {
    /// Blend `raw_cents` toward the target by the current strength.
    pub fn blended(&self, raw_cents: f64) -> f64 {
        match self.target_cents {
            Some(target) => lerp(raw_cents, target, self.strength / 100.0),
            None => raw_cents,
        }
    }
}

/// The fully-snapped value for `cents`: the input shifted onto the nearest
/// scale pitch, preserving its period. `None` when the nearest pitch is
/// outside the capture radius and snapping is not forced.
pub fn snapped_cents(table: &ScaleTable, max_snap_cents: f64, force_snap: bool, cents: f64) -> Option<f64> {
    if table.is_empty() {
        return None;
    }
    let wrapped = wrap(cents, 0.0, table.period_cents);

    // walk the ascending pitches (plus the period itself) for the bracketing
    // pair around the wrapped value, then take the closer bound
    let mut previous = table.cents[0];
    let mut nearest = previous;
    for pitch in table
        .cents
        .iter()
        .copied()
        .skip(1)
        .chain(std::iter::once(table.period_cents))
    {
        if wrapped <= pitch {
            nearest = if (wrapped - previous).abs() < (wrapped - pitch).abs() {
                previous
            } else {
                pitch
            };
            break;
        }
        previous = pitch;
    }

    let distance = (wrapped - nearest).round();
    if distance.abs() < max_snap_cents || force_snap {
        Some(cents - distance)
    } else {
        None
    }
}

/// Advance the hysteresis state machine for one raw-cents sample.
///
/// `last_cents` is the channel's previous raw value; a move larger than the
/// capture radius counts as a jump and re-acquires (or drops) the target,
/// while continuous motion decays the strength linearly until the played
/// position is `max_snap_cents` away. Landing within one cent of the target
/// clears it on every path, so a finished glide stops easing.
pub fn update_snapping(
    snap: &mut SnapState,
    last_cents: Option<f64>,
    cents: f64,
    table: &ScaleTable,
    max_snap_cents: f64,
    force_snap: bool,
) {
    let snapped = snapped_cents(table, max_snap_cents, force_snap, cents);

    if force_snap {
        snap.target_cents = snapped;
        snap.strength = 100.0;
    } else if last_cents.map_or(true, |last| (last - cents).abs() > max_snap_cents) {
        // jumped: lock onto whatever is in range, or nothing
        if let Some(target) = snapped {
            snap.target_cents = Some(target);
            snap.start_cents = Some(cents);
            snap.strength = 100.0;
        } else {
            *snap = SnapState::default();
        }
    } else if snap.start_cents.is_some() && snapped.is_some() {
        // smooth motion with a candidate still in range
        match (snap.target_cents, snap.start_cents) {
            (Some(target), Some(start)) => {
                let current_distance = (target - cents).abs();
                let start_distance = (target - start).abs();
                snap.strength = remap(current_distance, start_distance, max_snap_cents, 100.0, 0.0);
            }
            _ => {
                snap.start_cents = None;
                snap.strength = 0.0;
            }
        }
        if snap.strength <= 0.0 {
            *snap = SnapState::default();
        } else if snap.strength >= 100.0 {
            snap.strength = 100.0;
        }
    } else {
        // moved out of range of anything
        snap.target_cents = None;
        snap.strength = 0.0;
    }

    // hit the target: no further easing, avoids oscillating around it
    if let Some(snapped) = snapped {
        if (cents - snapped).abs() < 1.0 {
            *snap = SnapState::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::ScaleConfig;

    fn edo_table() -> ScaleTable {
        ScaleConfig {
            scale_ratios: Vec::new(),
            ..ScaleConfig::default()
        }
        .table()
    }

    const SNAP: f64 = 40.0;

    #[test]
    fn snaps_to_nearest_pitch_preserving_period() {
        let table = edo_table();
        assert_eq!(snapped_cents(&table, SNAP, false, 315.0), Some(300.0));
        assert_eq!(snapped_cents(&table, SNAP, false, 285.0), Some(300.0));
        // a period up: 1515 -> 1500
        assert_eq!(snapped_cents(&table, SNAP, false, 1515.0), Some(1500.0));
        // negative period: -885 is 15 above -900
        assert_eq!(snapped_cents(&table, SNAP, false, -885.0), Some(-900.0));
    }

    #[test]
    fn exact_pitch_snaps_with_zero_distance() {
        let table = edo_table();
        assert_eq!(snapped_cents(&table, SNAP, false, 300.0), Some(300.0));
        assert_eq!(snapped_cents(&table, SNAP, false, 0.0), Some(0.0));
    }

    #[test]
    fn out_of_range_is_none_unless_forced() {
        let table = edo_table();
        assert_eq!(snapped_cents(&table, SNAP, false, 350.0), None);
        assert_eq!(snapped_cents(&table, SNAP, true, 350.0), Some(300.0));
    }

    #[test]
    fn wraps_top_of_period_to_next_root() {
        let table = edo_table();
        // 1190 wraps near the period boundary; nearest bound is 1200
        assert_eq!(snapped_cents(&table, SNAP, false, 1190.0), Some(1200.0));
    }

    #[test]
    fn empty_table_never_snaps() {
        let table = ScaleTable {
            fractions: Vec::new(),
            cents: Vec::new(),
            period_ratio: crate::tuning::Fraction::new(2, 1),
            period_cents: 1200.0,
        };
        assert_eq!(snapped_cents(&table, SNAP, true, 123.0), None);
    }

    #[test]
    fn jump_in_range_locks_target_at_full_strength() {
        let table = edo_table();
        let mut snap = SnapState::default();
        update_snapping(&mut snap, None, 320.0, &table, SNAP, false);
        assert_eq!(snap.target_cents, Some(300.0));
        assert_eq!(snap.start_cents, Some(320.0));
        assert_eq!(snap.strength, 100.0);
        assert_eq!(snap.blended(320.0), 300.0);
    }

    #[test]
    fn jump_out_of_range_clears_state() {
        let table = edo_table();
        let mut snap = SnapState {
            target_cents: Some(300.0),
            start_cents: Some(320.0),
            strength: 100.0,
        };
        update_snapping(&mut snap, None, 350.0, &table, SNAP, false);
        assert_eq!(snap, SnapState::default());
    }

    #[test]
    fn strength_decays_as_motion_leaves_the_target() {
        let table = edo_table();
        let mut snap = SnapState::default();
        // acquire at 310 (distance 10 from 300)
        update_snapping(&mut snap, None, 310.0, &table, SNAP, false);
        assert_eq!(snap.strength, 100.0);

        // drift away smoothly; strength interpolates between 100 at the
        // acquisition distance and 0 at the capture radius
        update_snapping(&mut snap, Some(310.0), 325.0, &table, SNAP, false);
        assert!(
            snap.strength > 0.0 && snap.strength < 100.0,
            "expected partial strength, got {}",
            snap.strength
        );
        let halfway = snap.strength;

        update_snapping(&mut snap, Some(325.0), 335.0, &table, SNAP, false);
        assert!(
            snap.strength < halfway,
            "strength should keep decaying: {} then {}",
            halfway,
            snap.strength
        );
    }

    #[test]
    fn leaving_capture_radius_clears_target() {
        let table = edo_table();
        let mut snap = SnapState::default();
        update_snapping(&mut snap, None, 310.0, &table, SNAP, false);
        // continuous drift to just past the capture radius
        update_snapping(&mut snap, Some(310.0), 339.5, &table, SNAP, false);
        assert_eq!(snap.target_cents, None);
        assert_eq!(snap.strength, 0.0);
    }

    #[test]
    fn within_one_cent_clears_even_when_forced() {
        let table = edo_table();
        let mut snap = SnapState::default();
        update_snapping(&mut snap, Some(300.8), 300.4, &table, SNAP, true);
        assert_eq!(snap, SnapState::default());
    }

    #[test]
    fn force_snap_is_unconditional() {
        let table = edo_table();
        let mut snap = SnapState::default();
        update_snapping(&mut snap, Some(100.0), 160.0, &table, SNAP, true);
        assert_eq!(snap.target_cents, Some(200.0));
        assert_eq!(snap.strength, 100.0);
        assert_eq!(snap.blended(160.0), 200.0);
    }

    #[test]
    fn blend_converges_onto_target_when_held() {
        let table = edo_table();
        let mut snap = SnapState::default();
        let mut raw = 312.0;
        update_snapping(&mut snap, None, raw, &table, SNAP, false);
        // feed the blended output back as micro-motion toward the target
        for _ in 0..20 {
            let blended = snap.blended(raw);
            let next = raw + (blended - raw) * 0.5;
            update_snapping(&mut snap, Some(raw), next, &table, SNAP, false);
            raw = next;
        }
        let settled = snap.blended(raw);
        assert!(
            (settled - 300.0).abs() < 1.5,
            "held pitch should settle onto the scale step, got {}",
            settled
        );
    }
}
