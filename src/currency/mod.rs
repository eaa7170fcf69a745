//! Amount formatting for dashboards, lists, and alert mails.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY_SUFFIX: &str = "$";

const MILLIONS_THRESHOLD: f64 = 500_000.0;
const THOUSANDS_THRESHOLD: f64 = 500.0;

/// Formats amounts either compactly (`1.50K`, `0.750M`, `42.0$`) or with two
/// fixed decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountFormatter {
    suffix: String,
}

impl Default for AmountFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SUFFIX)
    }
}

impl AmountFormatter {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Magnitude-scaled rendering. Thresholds apply to the absolute value and
    /// the sign is kept.
    pub fn compact(&self, value: f64) -> String {
        let magnitude = value.abs();
        if magnitude >= MILLIONS_THRESHOLD {
            format!("{:.3}M", value / 1_000_000.0)
        } else if magnitude >= THOUSANDS_THRESHOLD {
            format!("{:.2}K", value / 1_000.0)
        } else {
            format!("{:.1}{}", value, self.suffix)
        }
    }

    pub fn fixed(&self, value: f64) -> String {
        format!("{:.2}", value)
    }
}

/// Compact formatting with the default `$` suffix.
pub fn format_compact(value: f64) -> String {
    AmountFormatter::default().compact(value)
}
