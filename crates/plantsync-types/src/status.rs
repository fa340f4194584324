//! Measurement status scale.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Qualitative range of a measurement as reported by the remote API.
///
/// The API encodes this as an integer 0–5 where 0 means "no data" and
/// 1–5 form an ordered severity scale. Any other code maps to
/// [`MeasurementStatus::Unknown`].
///
/// The text labels are a stable external contract consumed by the host
/// protocol boundary — do not change them.
///
/// # Examples
///
/// ```
/// use plantsync_types::MeasurementStatus;
///
/// assert_eq!(MeasurementStatus::from_code(3), MeasurementStatus::Perfect);
/// assert_eq!(MeasurementStatus::from_code(3).label(), "Perfect");
/// assert_eq!(MeasurementStatus::from_code(42).label(), "Unknown");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementStatus {
    /// The sensor has no data for this measurement (code 0).
    NoData,
    /// Too low (code 1).
    TooLow,
    /// Low (code 2).
    Low,
    /// In the ideal range (code 3).
    Perfect,
    /// High (code 4).
    High,
    /// Too high (code 5).
    TooHigh,
    /// Any code outside 0–5.
    Unknown,
}

impl MeasurementStatus {
    /// Map a raw status code to a status.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::NoData,
            1 => Self::TooLow,
            2 => Self::Low,
            3 => Self::Perfect,
            4 => Self::High,
            5 => Self::TooHigh,
            _ => Self::Unknown,
        }
    }

    /// The stable display label for this status.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoData => "No Data",
            Self::TooLow => "Too Low",
            Self::Low => "Low",
            Self::Perfect => "Perfect",
            Self::High => "High",
            Self::TooHigh => "Too High",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether this status carries actual sensor data.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !matches!(self, Self::NoData)
    }
}

impl fmt::Display for MeasurementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_table_is_exact() {
        assert_eq!(MeasurementStatus::from_code(0).label(), "No Data");
        assert_eq!(MeasurementStatus::from_code(1).label(), "Too Low");
        assert_eq!(MeasurementStatus::from_code(2).label(), "Low");
        assert_eq!(MeasurementStatus::from_code(3).label(), "Perfect");
        assert_eq!(MeasurementStatus::from_code(4).label(), "High");
        assert_eq!(MeasurementStatus::from_code(5).label(), "Too High");
    }

    #[test]
    fn test_codes_outside_scale_are_unknown() {
        for code in [-1, 6, 7, 100, i64::MAX, i64::MIN] {
            assert_eq!(MeasurementStatus::from_code(code).label(), "Unknown");
        }
    }

    #[test]
    fn test_has_data() {
        assert!(!MeasurementStatus::NoData.has_data());
        assert!(MeasurementStatus::TooLow.has_data());
        assert!(MeasurementStatus::Unknown.has_data());
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(MeasurementStatus::Perfect.to_string(), "Perfect");
    }
}
