// 9.0: every run state transition produces an event. used as an audit trail of
// what a session did; the EventPayload enum lists all event types.

use crate::scenario::ScenarioConfig;
use crate::simulation::RunState;
use crate::types::{SourceMode, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

/// Sequence number of a run within its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // Lifecycle events
    RunStarted(RunStartedEvent),
    RunCompleted(RunCompletedEvent),
    RunFailed(RunFailedEvent),
    Reset(ResetEvent),

    // Pipeline events
    ObservationsFetched(ObservationsFetchedEvent),
    ScenarioApplied(ScenarioAppliedEvent),
}

impl EventPayload {
    /// The run state this event leaves the session in, for lifecycle events.
    pub fn resulting_state(&self) -> Option<RunState> {
        match self {
            EventPayload::RunStarted(_) => Some(RunState::Running),
            EventPayload::RunCompleted(_) => Some(RunState::Completed),
            EventPayload::RunFailed(_) => Some(RunState::Error),
            EventPayload::Reset(_) => Some(RunState::Idle),
            EventPayload::ObservationsFetched(_) | EventPayload::ScenarioApplied(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStartedEvent {
    pub run_id: RunId,
    pub feed_id: String,
    pub mode: SourceMode,
    pub scenario: ScenarioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationsFetchedEvent {
    pub run_id: RunId,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAppliedEvent {
    pub run_id: RunId,
    // indices whose value the scenario changed
    pub perturbed: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunCompletedEvent {
    pub run_id: RunId,
    pub median: Decimal,
    pub transaction_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFailedEvent {
    pub run_id: RunId,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetEvent {
    pub previous: RunState,
}
