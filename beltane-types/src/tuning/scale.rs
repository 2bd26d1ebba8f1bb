//! Scale generation: equal divisions of a period, or a just-intonation
//! ratio chord with a selectable mode.

use serde::{Deserialize, Serialize};

use super::{ratio_to_cents, Fraction};

/// Tuning parameters. Mutated field-by-field by the settings layer; the
/// derived [`ScaleTable`] is recomputed whenever a scale-shaping field
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Frequency at 0 cents, in Hz.
    pub base_frequency: f64,
    /// Snap capture radius in cents. `0.0` disables snapping.
    pub max_snap_cents: f64,
    /// Snap instantly and unconditionally instead of proximity-gated.
    pub force_snap: bool,
    /// Steps per period, used only while `scale_ratios` is empty.
    pub equal_divisions: u32,
    /// Repetition interval (generalized octave), numerator > denominator.
    pub period_ratio: Fraction,
    /// Ratio chord such as `[4, 5, 6, 7]`; empty means EDO.
    pub scale_ratios: Vec<u32>,
    /// Which chord member is treated as the 1/1 root; wraps modulo the
    /// chord length, negatives allowed.
    pub mode: i32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            base_frequency: 110.0,
            max_snap_cents: 40.0,
            force_snap: false,
            equal_divisions: 12,
            period_ratio: Fraction::new(2, 1),
            // JI major scale over a common fundamental
            scale_ratios: vec![24, 27, 30, 32, 36, 40, 45, 48],
            mode: 0,
        }
    }
}

impl ScaleConfig {
    pub fn period_cents(&self) -> f64 {
        self.period_ratio.cents()
    }

    /// Derive the scale table for the current parameters.
    pub fn table(&self) -> ScaleTable {
        ScaleTable::derive(self)
    }

    /// Everything the audio engine needs to turn cents into frequencies.
    pub fn snapshot(&self) -> TuningSnapshot {
        TuningSnapshot {
            table: self.table(),
            base_frequency: self.base_frequency,
            max_snap_cents: self.max_snap_cents,
            force_snap: self.force_snap,
        }
    }
}

/// The derived scale: pitches within one period, ascending and deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleTable {
    /// Reduced, simplified fractions in ascending order. Empty in EDO mode.
    pub fractions: Vec<Fraction>,
    /// Pitch offsets in cents, ascending, each in `[0, period_cents)`.
    pub cents: Vec<f64>,
    pub period_ratio: Fraction,
    pub period_cents: f64,
}

impl ScaleTable {
    pub fn derive(config: &ScaleConfig) -> Self {
        let period_cents = config.period_cents();
        let fractions =
            sorted_fractions_from_ratio_chord(&config.scale_ratios, config.mode, config.period_ratio);
        let cents = if fractions.is_empty() {
            cents_from_edo(config.equal_divisions, period_cents)
        } else {
            fractions.iter().map(Fraction::cents).collect()
        };
        Self {
            fractions,
            cents,
            period_ratio: config.period_ratio,
            period_cents,
        }
    }

    pub fn len(&self) -> usize {
        self.cents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cents.is_empty()
    }

    /// Cents for a scale-step offset, with floor division so negative
    /// offsets land in lower periods. `None` on an empty table.
    pub fn step_offset_to_cents(&self, offset: i64) -> Option<f64> {
        if self.cents.is_empty() {
            return None;
        }
        let len = self.cents.len() as i64;
        let repetition = offset.div_euclid(len);
        let index = (offset - repetition * len) as usize;
        Some(repetition as f64 * self.period_cents + self.cents[index])
    }
}

/// Turn a ratio chord like `4:5:6:7` into sorted fractions relative to the
/// selected mode's root.
///
/// The chord's first member is the common denominator. The `mode`-th member
/// becomes the new 1/1 by exact cross-multiplication; the members before it
/// are re-appended one period up, then everything is period-reduced,
/// simplified, sorted and deduplicated.
pub fn sorted_fractions_from_ratio_chord(
    ratio_chord: &[u32],
    mode: i32,
    period: Fraction,
) -> Vec<Fraction> {
    if ratio_chord.is_empty() {
        return Vec::new();
    }

    let denominator = ratio_chord[0] as u64;
    let fractions: Vec<Fraction> = ratio_chord
        .iter()
        .map(|&numerator| Fraction::new(numerator as u64, denominator))
        .collect();

    // wrap with the chord length as modulus, so a one-member chord is legal
    let mode = mode.rem_euclid(fractions.len() as i32) as usize;

    // transpose so fractions[mode] becomes the root
    let current_root = fractions[0];
    let new_root = fractions[mode];
    let interval = Fraction::new(
        new_root.num * current_root.den,
        new_root.den * current_root.num,
    );
    let transposed: Vec<Fraction> = fractions
        .iter()
        .map(|f| Fraction::new(f.num * interval.den, f.den * interval.num))
        .collect();

    // members before the mode point wrapped below the root; append them
    // again one period up, preserving order
    let mut chord = transposed.clone();
    chord.extend(
        transposed[..mode]
            .iter()
            .map(|f| Fraction::new(f.num * period.num, f.den * period.den)),
    );

    let mut reduced: Vec<Fraction> = chord
        .iter()
        .map(|f| f.period_reduced(period).simplified())
        .collect();
    reduced.sort_by(Fraction::cross_cmp);
    reduced.dedup();
    reduced
}

/// Ascending equal-division steps filling one period, always starting at 0.
pub fn cents_from_edo(equal_divisions: u32, period_cents: f64) -> Vec<f64> {
    let step_size = 1200.0 / equal_divisions as f64;
    // how many steps fit: period / step, written so that an exact octave
    // with N divisions yields exactly N steps
    let step_count = (period_cents * equal_divisions as f64 / 1200.0).floor() as usize;
    (0..step_count).map(|i| i as f64 * step_size).collect()
}

/// Everything the audio engine needs from the tuning side, captured as a
/// value so the engine can own its copy (the settings layer pushes a fresh
/// snapshot whenever tuning changes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningSnapshot {
    pub table: ScaleTable,
    pub base_frequency: f64,
    pub max_snap_cents: f64,
    pub force_snap: bool,
}

impl Default for TuningSnapshot {
    fn default() -> Self {
        ScaleConfig::default().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ratios: &[u32], mode: i32) -> ScaleConfig {
        ScaleConfig {
            scale_ratios: ratios.to_vec(),
            mode,
            ..ScaleConfig::default()
        }
    }

    fn assert_cents_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(
            actual.len(),
            expected.len(),
            "length mismatch: {:?} vs {:?}",
            actual,
            expected
        );
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 0.1, "{:?} !~ {:?}", actual, expected);
        }
    }

    #[test]
    fn harmonic_seventh_chord_scale() {
        // 4:5:6:7 over 2/1 -> major triad plus the harmonic seventh
        let table = config(&[4, 5, 6, 7], 0).table();
        assert_cents_close(&table.cents, &[0.0, 386.3, 702.0, 968.8]);
        assert_eq!(
            table.fractions,
            vec![
                Fraction::new(1, 1),
                Fraction::new(5, 4),
                Fraction::new(3, 2),
                Fraction::new(7, 4),
            ]
        );
    }

    #[test]
    fn default_ratio_chord_is_seven_step_ji_major() {
        let table = ScaleConfig::default().table();
        assert_eq!(table.len(), 7, "2/1 member must dedup away: {:?}", table.cents);
        assert_eq!(table.fractions[0], Fraction::new(1, 1));
        assert_eq!(table.fractions[4], Fraction::new(3, 2));
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = config(&[12, 17, 24], 1).table();
        let b = config(&[12, 17, 24], 1).table();
        assert_eq!(a, b);
    }

    #[test]
    fn cents_ascending_dedup_in_period() {
        for mode in -3..8 {
            let table = config(&[24, 27, 30, 32, 36, 40, 45, 48], mode).table();
            for pair in table.cents.windows(2) {
                assert!(pair[0] < pair[1], "not strictly ascending: {:?}", table.cents);
            }
            for &c in &table.cents {
                assert!(
                    (0.0..table.period_cents).contains(&c),
                    "cent {} outside period",
                    c
                );
            }
        }
    }

    #[test]
    fn mode_zero_keeps_base_chord() {
        let table = config(&[4, 5, 6, 8], 0).table();
        assert_cents_close(&table.cents, &[0.0, 386.3, 702.0]);
    }

    #[test]
    fn full_mode_wrap_equals_mode_zero() {
        let base = config(&[4, 5, 6, 8], 0).table();
        let wrapped = config(&[4, 5, 6, 8], 4).table();
        assert_eq!(base, wrapped);
    }

    #[test]
    fn negative_mode_wraps() {
        let minus_one = config(&[4, 5, 6, 7], -1).table();
        let three = config(&[4, 5, 6, 7], 3).table();
        assert_eq!(minus_one, three);
    }

    #[test]
    fn one_member_chord_is_degenerate_but_legal() {
        let table = config(&[5], 2).table();
        assert_eq!(table.cents, vec![0.0]);
        assert_eq!(table.fractions, vec![Fraction::new(1, 1)]);
    }

    #[test]
    fn empty_ratios_fall_back_to_edo() {
        let table = config(&[], 0).table();
        assert_eq!(table.len(), 12);
        assert_eq!(table.cents[0], 0.0);
        assert!((table.cents[11] - 1100.0).abs() < 1e-9);
        assert!(table.fractions.is_empty());
    }

    #[test]
    fn edo_with_wide_period_fills_it() {
        // 12 equal steps of 100 cents against a 3/1 period (~1902 cents)
        let cfg = ScaleConfig {
            scale_ratios: Vec::new(),
            period_ratio: Fraction::new(3, 1),
            ..ScaleConfig::default()
        };
        let table = cfg.table();
        assert_eq!(table.len(), 19);
        assert!((table.cents[18] - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn step_offset_wraps_periods_both_ways() {
        let table = config(&[], 0).table(); // 12edo
        assert_eq!(table.step_offset_to_cents(0), Some(0.0));
        assert_eq!(table.step_offset_to_cents(3), Some(300.0));
        assert_eq!(table.step_offset_to_cents(12), Some(1200.0));
        assert_eq!(table.step_offset_to_cents(14), Some(1400.0));
        assert_eq!(table.step_offset_to_cents(-1), Some(-100.0));
        assert_eq!(table.step_offset_to_cents(-12), Some(-1200.0));
    }

    #[test]
    fn step_offset_on_empty_table_is_none() {
        let table = ScaleTable {
            fractions: Vec::new(),
            cents: Vec::new(),
            period_ratio: Fraction::new(2, 1),
            period_cents: 1200.0,
        };
        assert_eq!(table.step_offset_to_cents(0), None);
    }
}
