//! Display payloads: labels, hues and opacities for whatever is playing.
//!
//! Pure projection from the scale table plus a list of playing steps; the
//! render layer turns these into actual pixels.

use serde::{Deserialize, Serialize};

use crate::tuning::{remap_clamped, Fraction, ScaleTable};

/// A currently sounding scale step. Kbd/MIDI channels report their exact
/// step with distance 0; pointer channels report the closest step and how
/// far the played pitch is from it, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayingStep {
    pub offset: i64,
    pub dist: f64,
}

/// One user-facing label: a ratio string or a cents value, with a hue on
/// the period color wheel and an opacity that fades with snap distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepLabel {
    pub step: i64,
    pub text: String,
    /// Degrees, `in_period_cents / period_cents * 360`.
    pub hue: f64,
    /// 1.0 on the step, 0.3 at the snap radius or beyond.
    pub opacity: f64,
}

/// Labels for the current scale and playing set: ratio strings when the
/// scale came from a ratio chord, cents otherwise.
pub fn labels(table: &ScaleTable, max_snap_cents: f64, playing: &[PlayingStep]) -> Vec<StepLabel> {
    if table.is_empty() {
        return Vec::new();
    }
    if table.fractions.is_empty() {
        cents_labels(table, max_snap_cents, playing)
    } else {
        fraction_labels(table, max_snap_cents, playing)
    }
}

fn hue(table: &ScaleTable, cent: f64) -> f64 {
    cent / table.period_cents * 360.0
}

fn opacity(max_snap_cents: f64, dist: f64) -> f64 {
    remap_clamped(dist, 0.0, max_snap_cents, 1.0, 0.3)
}

/// Integer cents print bare; anything else rounds to one decimal.
fn clean_round(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Ratio labels. With nothing playing, the whole scale is shown; a single
/// playing step shows its own fraction; two or more show each step's ratio
/// relative to the lowest one, period-aware and simplified.
pub fn fraction_labels(
    table: &ScaleTable,
    max_snap_cents: f64,
    playing: &[PlayingStep],
) -> Vec<StepLabel> {
    let len = table.cents.len() as i64;
    let mut items = Vec::new();

    if playing.is_empty() {
        for (index, fraction) in table.fractions.iter().enumerate() {
            items.push(StepLabel {
                step: index as i64,
                text: fraction.to_string(),
                hue: hue(table, table.cents[index]),
                opacity: 1.0,
            });
        }
    } else if playing.len() == 1 {
        let step = playing[0].offset;
        let in_octave = step.rem_euclid(len) as usize;
        items.push(StepLabel {
            step,
            text: table.fractions[in_octave].to_string(),
            hue: hue(table, table.cents[in_octave]),
            opacity: opacity(max_snap_cents, playing[0].dist),
        });
    } else {
        let mut playing = playing.to_vec();
        playing.sort_by_key(|s| s.offset);

        let base_octave = playing[0].offset.div_euclid(len);
        let base_step = (playing[0].offset - base_octave * len) as usize;
        let base_ratio = table.fractions[base_step];

        for step_obj in &playing {
            let step = step_obj.offset;
            let step_octave = step.div_euclid(len);
            let step_in_octave = (step - step_octave * len) as usize;
            let step_ratio = table.fractions[step_in_octave];

            // period powers bridge the octave gap down to the base step
            let delta_octaves = step_octave - base_octave;
            let mut octaves_num = table.period_ratio.num.pow(delta_octaves.unsigned_abs() as u32);
            let mut octaves_den = table.period_ratio.den.pow(delta_octaves.unsigned_abs() as u32);
            if delta_octaves < 0 {
                std::mem::swap(&mut octaves_num, &mut octaves_den);
            }

            // divide by the base ratio, multiply by this step's ratio and
            // by the octave gap
            let final_ratio = Fraction::new(
                base_ratio.den * step_ratio.num * octaves_num,
                base_ratio.num * step_ratio.den * octaves_den,
            )
            .simplified();

            items.push(StepLabel {
                step,
                text: final_ratio.to_string(),
                hue: hue(table, table.cents[step_in_octave]),
                opacity: opacity(max_snap_cents, step_obj.dist),
            });
        }
    }
    items
}

/// Cents labels, same selection logic as [`fraction_labels`]: whole scale
/// when silent, absolute cents for one step, cents relative to the lowest
/// step otherwise.
pub fn cents_labels(
    table: &ScaleTable,
    max_snap_cents: f64,
    playing: &[PlayingStep],
) -> Vec<StepLabel> {
    let len = table.cents.len() as i64;
    let mut items = Vec::new();

    if playing.is_empty() {
        for (index, &cent) in table.cents.iter().enumerate() {
            items.push(StepLabel {
                step: index as i64,
                text: clean_round(cent),
                hue: hue(table, cent),
                opacity: 1.0,
            });
        }
    } else if playing.len() == 1 {
        let step = playing[0].offset;
        let cent = table.cents[step.rem_euclid(len) as usize];
        items.push(StepLabel {
            step,
            text: clean_round(cent),
            hue: hue(table, cent),
            opacity: opacity(max_snap_cents, playing[0].dist),
        });
    } else {
        let mut playing = playing.to_vec();
        playing.sort_by_key(|s| s.offset);

        let base_octave = playing[0].offset.div_euclid(len);
        let base_step = (playing[0].offset - base_octave * len) as usize;
        let base_cents = table.cents[base_step];

        for step_obj in &playing {
            let step = step_obj.offset;
            let step_octave = step.div_euclid(len);
            let step_in_octave = (step - step_octave * len) as usize;
            let step_cents = table.cents[step_in_octave];

            let octaves_between = (step_octave - base_octave) as f64;
            let display_cents = step_cents - base_cents + table.period_cents * octaves_between;

            items.push(StepLabel {
                step,
                text: clean_round(display_cents),
                hue: hue(table, step_cents),
                opacity: opacity(max_snap_cents, step_obj.dist),
            });
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::ScaleConfig;

    fn ji_table() -> ScaleTable {
        ScaleConfig::default().table()
    }

    fn edo_table() -> ScaleTable {
        ScaleConfig {
            scale_ratios: Vec::new(),
            ..ScaleConfig::default()
        }
        .table()
    }

    fn step(offset: i64, dist: f64) -> PlayingStep {
        PlayingStep { offset, dist }
    }

    #[test]
    fn silent_scale_shows_every_fraction() {
        let labels = labels(&ji_table(), 40.0, &[]);
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0].text, "1/1");
        assert_eq!(labels[4].text, "3/2");
        assert!(labels.iter().all(|l| l.opacity == 1.0));
    }

    #[test]
    fn silent_edo_shows_cents() {
        let labels = labels(&edo_table(), 40.0, &[]);
        assert_eq!(labels.len(), 12);
        assert_eq!(labels[0].text, "0");
        assert_eq!(labels[2].text, "200");
    }

    #[test]
    fn single_step_shows_own_fraction_wrapped() {
        // step 11 in a 7-step scale is step 4 one period up
        let labels = labels(&ji_table(), 40.0, &[step(11, 0.0)]);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].step, 11);
        assert_eq!(labels[0].text, "3/2");
        assert_eq!(labels[0].opacity, 1.0);
    }

    #[test]
    fn pair_is_labelled_relative_to_the_lowest() {
        // fifth (3/2) and the ninth one period up (9/8 * 2/1): their
        // relation is again a fifth
        let labels = labels(&ji_table(), 40.0, &[step(8, 0.0), step(4, 0.0)]);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].step, 4);
        assert_eq!(labels[0].text, "1/1");
        assert_eq!(labels[1].step, 8);
        assert_eq!(labels[1].text, "3/2");
    }

    #[test]
    fn cents_pair_spans_periods() {
        let labels = labels(&edo_table(), 40.0, &[step(0, 0.0), step(14, 0.0)]);
        assert_eq!(labels[0].text, "0");
        assert_eq!(labels[1].text, "1400");
    }

    #[test]
    fn snap_distance_fades_opacity() {
        let labels = labels(&edo_table(), 40.0, &[step(3, 20.0)]);
        assert!((labels[0].opacity - 0.65).abs() < 1e-12);
        let far = labels_with_dist(60.0);
        assert_eq!(far, 0.3);
    }

    fn labels_with_dist(dist: f64) -> f64 {
        labels(&edo_table(), 40.0, &[step(3, dist)])[0].opacity
    }

    #[test]
    fn hue_walks_the_period_wheel() {
        let labels = labels(&edo_table(), 40.0, &[]);
        assert_eq!(labels[0].hue, 0.0);
        assert!((labels[6].hue - 180.0).abs() < 1e-9);
    }

    #[test]
    fn fractional_cents_round_to_one_decimal() {
        let labels = labels(&ji_table(), 40.0, &[]);
        // cents mode is not used for a ratio scale, so check clean_round
        // directly against a JI interval
        assert_eq!(super::clean_round(386.3137138648348), "386.3");
        assert_eq!(super::clean_round(700.0), "700");
        assert!(labels[0].hue.abs() < 1e-9);
    }

    #[test]
    fn empty_table_yields_no_labels() {
        let table = ScaleTable {
            fractions: Vec::new(),
            cents: Vec::new(),
            period_ratio: Fraction::new(2, 1),
            period_cents: 1200.0,
        };
        assert!(labels(&table, 40.0, &[step(0, 0.0)]).is_empty());
    }
}
