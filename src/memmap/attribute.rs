//! Numeric decoding for smaps attribute lines.
//!
//! Attribute lines look like `Size:                 72 kB`. Only the first
//! run of decimal digits matters; the label and unit suffix are ignored.

use once_cell::sync::Lazy;
use regex::Regex;

/// First contiguous run of ASCII digits. `\d` would also match non-ASCII
/// digits, which the kernel never emits.
static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("digit run pattern is valid"));

/// Extracts the first decimal number found anywhere in `line`.
///
/// Returns 0 when the line holds no digits or the run does not fit in a `u64`.
pub fn decode_attribute(line: &str) -> u64 {
    DIGIT_RUN
        .find(line)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_attribute_standard_lines() {
        assert_eq!(decode_attribute("Size:      4 kB"), 4);
        assert_eq!(decode_attribute("Rss:                  40 kB"), 40);
        assert_eq!(decode_attribute("Size:1234kB"), 1234);
        assert_eq!(decode_attribute("Rss: 0 kB"), 0);
    }

    #[test]
    fn test_decode_attribute_takes_first_run() {
        assert_eq!(decode_attribute("Size: 12 kB 99"), 12);
        assert_eq!(decode_attribute("Size: 12abc34 kB"), 12);
    }

    #[test]
    fn test_decode_attribute_degrades_to_zero() {
        assert_eq!(decode_attribute(""), 0);
        assert_eq!(decode_attribute("Size:"), 0);
        assert_eq!(decode_attribute("Rss: kB"), 0);
        // Overflows u64
        assert_eq!(decode_attribute("Size: 99999999999999999999999 kB"), 0);
    }

    #[test]
    fn test_decode_attribute_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not part of the kernel format.
        assert_eq!(decode_attribute("Size: ٤٢ kB"), 0);
    }
}
