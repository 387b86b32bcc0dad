use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::modules::storage::StoreError;
use crate::shared::constants::FOLIO_PREFIX;

/// Why the next folio could not be derived
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The highest stored folio has no successor
    #[error("No folio follows the highest stored folio ({0})")]
    Exhausted(u64),
}

/// Consecutive report identifier rendered as `F-NNNN`
///
/// The number is zero-padded to a minimum of four digits; larger numbers
/// keep all their digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Folio(u64);

impl Folio {
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    /// The folio following this one, `None` once the number space is used up
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Extract the folio number from a stored record name
    ///
    /// Names must start with `F-`; the segment after the first `-` contributes
    /// its leading decimal digits, so `F-0007.json` and `F-0007-20250101-0930.json`
    /// both yield 7. Names whose segment has no leading digit yield `None`.
    pub fn number_from_file_name(name: &str) -> Option<u64> {
        if !name.starts_with(FOLIO_PREFIX) {
            return None;
        }

        let segment = name.split('-').nth(1)?;
        let digits_end = segment
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(segment.len());

        segment[..digits_end].parse::<u64>().ok()
    }
}

impl fmt::Display for Folio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}", FOLIO_PREFIX, self.0)
    }
}

impl Serialize for Folio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_four_digits() {
        assert_eq!(Folio::new(1).to_string(), "F-0001");
        assert_eq!(Folio::new(42).to_string(), "F-0042");
        assert_eq!(Folio::new(9999).to_string(), "F-9999");
    }

    #[test]
    fn test_display_does_not_truncate_large_numbers() {
        assert_eq!(Folio::new(10000).to_string(), "F-10000");
        assert_eq!(Folio::new(1234567).to_string(), "F-1234567");
    }

    #[test]
    fn test_number_from_record_name() {
        assert_eq!(
            Folio::number_from_file_name("F-0001-20250101-0930.json"),
            Some(1)
        );
        assert_eq!(
            Folio::number_from_file_name("F-10234-20250101-0930.json"),
            Some(10234)
        );
    }

    #[test]
    fn test_number_from_name_without_date_segments() {
        assert_eq!(Folio::number_from_file_name("F-0007.json"), Some(7));
        assert_eq!(Folio::number_from_file_name("F-12ab-x.json"), Some(12));
    }

    #[test]
    fn test_non_numeric_segment_is_ignored() {
        assert_eq!(Folio::number_from_file_name("F-abc-20250101.json"), None);
        assert_eq!(Folio::number_from_file_name("F--0001.json"), None);
        assert_eq!(Folio::number_from_file_name("F-"), None);
    }

    #[test]
    fn test_names_without_prefix_are_ignored() {
        assert_eq!(Folio::number_from_file_name("README.md"), None);
        assert_eq!(Folio::number_from_file_name("f-0001-20250101.json"), None);
        assert_eq!(Folio::number_from_file_name("X-0001-20250101.json"), None);
    }

    #[test]
    fn test_overflowing_segment_is_ignored() {
        assert_eq!(
            Folio::number_from_file_name("F-99999999999999999999999-x.json"),
            None
        );
    }

    #[test]
    fn test_next_stops_at_the_largest_number() {
        assert_eq!(Folio::new(0).next(), Some(Folio::new(1)));
        assert_eq!(Folio::new(9999).next(), Some(Folio::new(10000)));
        assert_eq!(Folio::new(u64::MAX).next(), None);
    }

    #[test]
    fn test_serializes_as_formatted_string() {
        let value = serde_json::to_value(Folio::new(5)).unwrap();
        assert_eq!(value, serde_json::json!("F-0005"));
    }
}
