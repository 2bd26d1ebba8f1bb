//! MIDI interpretation: white-key note naming and the CC scale-edit map.
//!
//! Device enumeration and binding live in the host; this module only turns
//! already-decoded note names and controller numbers into scale terms.

/// Scale-step offset for a named white key, relative to the configured
/// base octave: seven diatonic steps per octave, `C` in the base octave is
/// step 0. Black keys and unknown names are `None` and get ignored
/// upstream.
pub fn white_key_offset(note_name: &str, octave: i32, base_octave: i32) -> Option<i32> {
    let letter = match note_name {
        "C" => 0,
        "D" => 1,
        "E" => 2,
        "F" => 3,
        "G" => 4,
        "A" => 5,
        "B" => 6,
        _ => return None,
    };
    Some(letter + (octave - base_octave) * 7)
}

/// Which chord degree a controller edits: controllers ending in 1 address
/// degree 0, ending in 2 address degree 1, and so on; a trailing 0 maps
/// below zero and is ignored.
pub fn cc_target_degree(controller: u8) -> Option<usize> {
    let degree = controller as i32 % 10 - 1;
    if degree < 0 {
        None
    } else {
        Some(degree as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_keys_step_diatonically() {
        assert_eq!(white_key_offset("C", 3, 3), Some(0));
        assert_eq!(white_key_offset("D", 3, 3), Some(1));
        assert_eq!(white_key_offset("B", 3, 3), Some(6));
        assert_eq!(white_key_offset("C", 4, 3), Some(7));
        assert_eq!(white_key_offset("G", 2, 3), Some(-3));
    }

    #[test]
    fn black_keys_are_ignored() {
        assert_eq!(white_key_offset("C#", 3, 3), None);
        assert_eq!(white_key_offset("Eb", 4, 3), None);
        assert_eq!(white_key_offset("H", 3, 3), None);
    }

    #[test]
    fn controllers_address_degrees_by_last_digit() {
        assert_eq!(cc_target_degree(31), Some(0));
        assert_eq!(cc_target_degree(32), Some(1));
        assert_eq!(cc_target_degree(49), Some(8));
        assert_eq!(cc_target_degree(30), None);
        assert_eq!(cc_target_degree(40), None);
    }
}
