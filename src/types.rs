// 1.0: primitives shared by every stage of the pipeline. observations, timestamps,
// source mode. each run creates fresh observations; perturbation supersedes them, never mutates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// 1.1: millisecond epoch timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

/// Values below this are treated as epoch seconds rather than milliseconds.
pub const MILLIS_EPOCH_THRESHOLD: i64 = 1_000_000_000_000;

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Accepts either epoch seconds or epoch milliseconds.
    pub fn from_epoch_guess(raw: i64) -> Self {
        if raw.unsigned_abs() < MILLIS_EPOCH_THRESHOLD.unsigned_abs() {
            Self(raw.saturating_mul(1000))
        } else {
            Self(raw)
        }
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn minus_millis(&self, ms: i64) -> Self {
        Self(self.0.saturating_sub(ms))
    }

    /// Whole seconds from `self` until `now`. Negative if `self` is in the future.
    pub fn age_seconds(&self, now: Timestamp) -> i64 {
        now.0.saturating_sub(self.0).div_euclid(1000)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match chrono::DateTime::from_timestamp_millis(self.0) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.3f UTC")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

// 1.2: one signer's price reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Unique per signer within a run, e.g. `signer_1`.
    pub id: String,
    pub value: Decimal,
    pub timestamp: Timestamp,
}

impl Observation {
    pub fn new(id: impl Into<String>, value: Decimal, timestamp: Timestamp) -> Self {
        Self {
            id: id.into(),
            value,
            timestamp,
        }
    }

    /// Signer ids are 1-based positions.
    pub fn signer_id(position: usize) -> String {
        format!("signer_{}", position + 1)
    }

    pub fn with_value(&self, value: Decimal) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    pub fn with_timestamp(&self, timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            ..self.clone()
        }
    }
}

pub fn values_of(observations: &[Observation]) -> Vec<Decimal> {
    observations.iter().map(|o| o.value).collect()
}

// 1.3: where raw observations come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Mock,
    Live,
}

impl SourceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceMode::Mock => "mock",
            SourceMode::Live => "live",
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn seconds_are_promoted_to_millis() {
        assert_eq!(Timestamp::from_epoch_guess(1_700_000_000).as_millis(), 1_700_000_000_000);
        assert_eq!(Timestamp::from_epoch_guess(1_700_000_000_123).as_millis(), 1_700_000_000_123);
    }

    #[test]
    fn age_is_floored_to_seconds() {
        let ts = Timestamp::from_millis(10_000);
        assert_eq!(ts.age_seconds(Timestamp::from_millis(69_999)), 59);
        assert_eq!(ts.age_seconds(Timestamp::from_millis(70_000)), 60);
    }

    #[test]
    fn extreme_timestamps_saturate() {
        assert_eq!(Timestamp::from_epoch_guess(i64::MIN).as_millis(), i64::MIN);
        assert_eq!(Timestamp::from_epoch_guess(i64::MAX).as_millis(), i64::MAX);
        assert_eq!(
            Timestamp::from_millis(i64::MIN).age_seconds(Timestamp::from_millis(1_700_000_000_000)),
            i64::MAX.div_euclid(1000)
        );
    }

    #[test]
    fn observation_copies_are_independent() {
        let original = Observation::new("signer_1", dec!(100), Timestamp::from_millis(5));
        let shifted = original.with_value(dec!(115));

        assert_eq!(original.value, dec!(100));
        assert_eq!(shifted.value, dec!(115));
        assert_eq!(shifted.id, "signer_1");
        assert_eq!(Observation::signer_id(0), "signer_1");
    }
}
