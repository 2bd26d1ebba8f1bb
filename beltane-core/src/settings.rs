//! Settings parsing: raw name/value pairs from the settings surface into
//! typed [`SettingsAction`]s.
//!
//! Values that fail to parse or sit outside their declared range are
//! rejected here with a warning; the caller keeps the previous value and
//! nothing reaches the dispatcher. Checks that need live state (column
//! width against the viewport) happen at dispatch time instead.

use regex::Regex;

use beltane_types::{Fraction, SettingsAction, Waveform};

/// Parse one settings edit. `None` means the value was invalid and the
/// field keeps its previous value.
pub fn parse_setting(name: &str, value: &str) -> Option<SettingsAction> {
    let value = value.trim();
    if value.is_empty() {
        log::warn!(target: "settings", "rejecting empty value for {:?}", name);
        return None;
    }

    let action = match name {
        "edo" => value
            .parse::<u32>()
            .ok()
            .filter(|&n| n > 0)
            .map(SettingsAction::EqualDivisions),
        "scale" => parse_scale_value(value),
        "mode" => value.parse::<i32>().ok().map(SettingsAction::Mode),
        "basefreq" => value
            .parse::<f64>()
            .ok()
            .filter(|&f| f.is_finite() && f > 0.0)
            .map(SettingsAction::BaseFrequency),
        "period" => parse_period(value).map(SettingsAction::PeriodRatio),
        "snaprange" => value
            .parse::<f64>()
            .ok()
            .filter(|&c| c.is_finite() && c >= 0.0)
            .map(SettingsAction::SnapRange),
        "forcesnap" => parse_bool(value).map(SettingsAction::ForceSnap),
        "xoffset" => value
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .map(SettingsAction::ColumnOffsetCents),
        "height" => value
            .parse::<f64>()
            .ok()
            .filter(|&h| h.is_finite() && h >= 0.0)
            .map(SettingsAction::ColumnHeight),
        "columnpx" => value
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite())
            .map(SettingsAction::ColumnWidth),
        "stepsvisibility" => value
            .parse::<f64>()
            .ok()
            .filter(|&v| (0.0..=1.0).contains(&v))
            .map(SettingsAction::StepsVisibility),
        "waveform" => Waveform::from_name(value).map(SettingsAction::Waveform),
        "delay" => value
            .parse::<f64>()
            .ok()
            .filter(|&w| w.is_finite() && w > 0.0)
            .map(SettingsAction::DelayWet),
        "midioctave" => value.parse::<i32>().ok().map(SettingsAction::MidiBaseOctave),
        _ => {
            log::warn!(target: "settings", "unknown setting {:?}", name);
            return None;
        }
    };

    if action.is_none() {
        log::warn!(target: "settings", "rejecting {:?} = {:?}", name, value);
    }
    action
}

/// `"all"` empties the ratio chord (EDO fallback); anything else must be a
/// list of positive integers.
fn parse_scale_value(value: &str) -> Option<SettingsAction> {
    if value == "all" {
        return Some(SettingsAction::ScaleRatios(Vec::new()));
    }
    parse_ratio_chord(value).map(SettingsAction::ScaleRatios)
}

/// A ratio chord like `4:5:6:7` (separators `,`, `.`, `:` or spaces).
/// Every member must be a positive integer.
pub fn parse_ratio_chord(value: &str) -> Option<Vec<u32>> {
    let members: Vec<u32> = value
        .split([',', '.', ':', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u32>().ok().filter(|&n| n > 0))
        .collect::<Option<Vec<u32>>>()?;
    if members.is_empty() {
        None
    } else {
        Some(members)
    }
}

/// A period ratio: `"3/2"` style fractions, or a bare integer meaning
/// `n/1`. The ratio must be greater than one.
pub fn parse_period(value: &str) -> Option<Fraction> {
    let fraction_re = Regex::new(r"(\d+)\s*/\s*(\d+)").expect("period pattern");
    if let Some(caps) = fraction_re.captures(value) {
        let num: u64 = caps[1].parse().ok()?;
        let den: u64 = caps[2].parse().ok()?;
        if den > 0 && num > den {
            return Some(Fraction::new(num, den));
        }
        return None;
    }
    let num: u64 = value.parse().ok()?;
    if num > 1 {
        Some(Fraction::new(num, 1))
    } else {
        None
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "on" => Some(true),
        "false" | "0" | "off" => Some(false),
        _ => None,
    }
}
