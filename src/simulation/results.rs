// 11.0.2: run states and errors for simulation runs.

use crate::aggregation::AggregationError;
use crate::price_feed::SourceError;
use crate::scenario::ScenarioError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// idle -> running -> {completed | error} -> idle (reset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    Error,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Error)
    }

    /// A new run may start from any state except `Running`.
    pub fn can_start(&self) -> bool {
        !matches!(self, RunState::Running)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("Invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("Aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Run abandoned before it finished")]
    Cancelled,
}
