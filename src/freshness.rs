// 6.0: freshness of a result, judged by its oldest observation.

use crate::types::{Observation, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Freshness {
    VeryFresh,
    Fresh,
    Acceptable,
    Stale,
}

impl Freshness {
    /// Upper bounds (exclusive, seconds) for each grade below `Stale`.
    pub const VERY_FRESH_SECS: i64 = 60;
    pub const FRESH_SECS: i64 = 180;
    pub const ACCEPTABLE_SECS: i64 = 300;

    pub fn from_age_seconds(age: i64) -> Self {
        if age < Self::VERY_FRESH_SECS {
            Freshness::VeryFresh
        } else if age < Self::FRESH_SECS {
            Freshness::Fresh
        } else if age < Self::ACCEPTABLE_SECS {
            Freshness::Acceptable
        } else {
            Freshness::Stale
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Freshness::VeryFresh => "Very Fresh",
            Freshness::Fresh => "Fresh",
            Freshness::Acceptable => "Acceptable",
            Freshness::Stale => "Stale",
        }
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn oldest_timestamp(observations: &[Observation]) -> Option<Timestamp> {
    observations.iter().map(|o| o.timestamp).min()
}

pub fn assess_freshness(observations: &[Observation], now: Timestamp) -> Option<Freshness> {
    oldest_timestamp(observations).map(|oldest| Freshness::from_age_seconds(oldest.age_seconds(now)))
}
