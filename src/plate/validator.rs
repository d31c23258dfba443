//! Kenyan plate number validation
//!
//! The national format is `K[A-Z]{2} \d{3}[A-Z]{1,2}`: a fixed leading "K",
//! two more letters, an optional space, three digits, and one or two trailing
//! letters. The format is fixed-width per segment, so validation is written
//! as an explicit segment scanner rather than a compiled pattern.
//!
//! Two levels of matching are provided:
//!
//! - [`is_valid_plate_number`] accepts only complete plates
//! - [`is_partially_valid_plate`] accepts prefix-consistent partial input,
//!   i.e. anything that could still extend to a valid plate; used by the
//!   autocomplete path while the plate is being typed

/// Letters on a plate are uppercase ASCII only
fn is_plate_letter(c: char) -> bool {
    c.is_ascii_uppercase()
}

/// Consume up to `max` characters of the given class starting at `*index`,
/// returning how many were consumed.
fn eat(chars: &[char], index: &mut usize, max: usize, class: fn(char) -> bool) -> usize {
    let mut taken = 0;
    while taken < max && *index < chars.len() && class(chars[*index]) {
        *index += 1;
        taken += 1;
    }
    taken
}

/// Shared scanner for full and partial matching
///
/// In full mode every segment must be complete; in partial mode each segment
/// may be any length from zero up to its maximum, but a class violation at an
/// already-reached position still fails. Both modes require the entire input
/// to be consumed.
fn match_plate(plate: &str, full: bool) -> bool {
    let chars: Vec<char> = plate.trim().chars().collect();

    // The whole string must start with the fixed country letter
    if chars.first() != Some(&'K') {
        return false;
    }
    let mut i = 1;

    // Two more prefix letters
    let prefix = eat(&chars, &mut i, 2, is_plate_letter);
    if full && prefix != 2 {
        return false;
    }

    // Optional separator between the letter prefix and the digit group
    if chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }

    // Three digits
    let digits = eat(&chars, &mut i, 3, |c| c.is_ascii_digit());
    if full && digits != 3 {
        return false;
    }

    // One or two suffix letters
    let suffix = eat(&chars, &mut i, 2, is_plate_letter);
    if full && suffix == 0 {
        return false;
    }

    // Anything left over is a class violation at its position
    i == chars.len()
}

/// Returns true iff the trimmed input fully matches the complete plate format
pub fn is_valid_plate_number(plate: &str) -> bool {
    match_plate(plate, true)
}

/// Returns true iff the trimmed, non-empty input is a prefix-consistent
/// partial plate, one that could still extend to a valid plate
pub fn is_partially_valid_plate(plate: &str) -> bool {
    !plate.trim().is_empty() && match_plate(plate, false)
}

/// Normalize arbitrary input into the canonical display/storage form
///
/// Strips every non-alphanumeric character, uppercases, and inserts the
/// canonical space after the three-letter prefix. Input beyond the seven
/// plate characters is dropped. Does not validate; pair with
/// [`is_valid_plate_number`] when a complete plate is required.
pub fn format_plate_number(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() <= 3 {
        return cleaned;
    }
    let tail_len = cleaned.len().min(7);
    format!("{} {}", &cleaned[..3], &cleaned[3..tail_len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::with_space("KDA 456B", true)]
    #[case::without_space("KDA456B", true)]
    #[case::two_letter_suffix("KBZ 123AB", true)]
    #[case::surrounding_whitespace("  KDA 456B  ", true)]
    #[case::empty("", false)]
    #[case::wrong_country_letter("ZDA 456B", false)]
    #[case::lowercase("kda 456b", false)]
    #[case::missing_suffix("KDA 456", false)]
    #[case::short_digits("KDA 45B", false)]
    #[case::long_digits("KDA 4567B", false)]
    #[case::three_letter_suffix("KDA 456ABC", false)]
    #[case::digit_in_prefix("K1A 456B", false)]
    #[case::letter_in_digits("KDA 4X6B", false)]
    #[case::trailing_garbage("KDA 456B!", false)]
    fn test_full_validation(#[case] plate: &str, #[case] expected: bool) {
        assert_eq!(is_valid_plate_number(plate), expected);
    }

    #[rstest]
    #[case::just_k("K", true)]
    #[case::prefix_only("KD", true)]
    #[case::full_prefix("KDA", true)]
    #[case::prefix_and_space("KDA ", true)]
    #[case::one_digit("KDA 4", true)]
    #[case::digits_done("KDA 456", true)]
    #[case::complete("KDA 456B", true)]
    #[case::complete_long("KDA 456BB", true)]
    #[case::empty("", false)]
    #[case::whitespace_only("   ", false)]
    #[case::digits_before_prefix_done("K4", true)]
    #[case::wrong_start("A", false)]
    #[case::double_space("KDA  456", false)]
    #[case::letter_after_digits_started_then_digit("KDA 45B6", false)]
    #[case::too_many_digits("KDA 4567", false)]
    fn test_partial_validation(#[case] plate: &str, #[case] expected: bool) {
        assert_eq!(is_partially_valid_plate(plate), expected);
    }

    /// Every slot-prefix of a valid plate must be partially valid
    #[test]
    fn test_prefixes_of_valid_plate_are_partial() {
        let plate = "KDA 456B";
        for end in 1..=plate.len() {
            let prefix = &plate[..end];
            assert!(
                is_partially_valid_plate(prefix),
                "prefix {:?} should be partially valid",
                prefix
            );
        }
    }

    #[rstest]
    #[case::already_canonical("KDA 456B", "KDA 456B")]
    #[case::lowercase_no_space("kda456b", "KDA 456B")]
    #[case::punctuation("kda-456/b", "KDA 456B")]
    #[case::short_input("kd", "KD")]
    #[case::exactly_three("kda", "KDA")]
    #[case::overlong("KDA456BBX", "KDA 456B")]
    #[case::eight_chars("KDA456BB", "KDA 456B")]
    #[case::empty("", "")]
    fn test_format_plate_number(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_plate_number(input), expected);
    }
}
