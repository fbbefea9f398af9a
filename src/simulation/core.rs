// 11.0 simulation/core.rs: the session. holds sources, run state, last outcome, events.

use super::results::RunState;
use crate::assembly::AggregateResult;
use crate::config::SimulatorConfig;
use crate::events::{Event, EventId, EventPayload, ResetEvent};
use crate::price_feed::{HttpPriceSource, MockPriceSource, PriceSource};
use crate::types::{SourceMode, Timestamp};
use tracing::{debug, info};

/** 11.1: one session per user. all run state lives here */
pub struct SimulationSession {
    pub(super) config: SimulatorConfig,
    pub(super) mock_source: Box<dyn PriceSource>,
    pub(super) live_source: Box<dyn PriceSource>,
    pub(super) state: RunState,
    pub(super) last_result: Option<AggregateResult>,
    pub(super) last_error: Option<String>,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
    pub(super) next_run_id: u64,
}

impl SimulationSession {
    pub fn new(config: SimulatorConfig) -> Self {
        let mock = MockPriceSource::new(config.mock_jitter_bps);
        let live = HttpPriceSource::new(&config);
        Self::with_sources(config, Box::new(mock), Box::new(live))
    }

    /// Session with caller-supplied sources, e.g. seeded mocks or replayed gateway data.
    pub fn with_sources(
        config: SimulatorConfig,
        mock_source: Box<dyn PriceSource>,
        live_source: Box<dyn PriceSource>,
    ) -> Self {
        Self {
            config,
            mock_source,
            live_source,
            state: RunState::Idle,
            last_result: None,
            last_error: None,
            events: Vec::new(),
            next_event_id: 1,
            next_run_id: 1,
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn last_result(&self) -> Option<&AggregateResult> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn runs_started(&self) -> u64 {
        self.next_run_id - 1
    }

    pub(super) fn source(&self, mode: SourceMode) -> &dyn PriceSource {
        match mode {
            SourceMode::Mock => self.mock_source.as_ref(),
            SourceMode::Live => self.live_source.as_ref(),
        }
    }

    /// Back to idle, discarding the last result or error. Idle and running
    /// sessions are left alone; a run only leaves `Running` by finishing.
    pub fn reset(&mut self) {
        if matches!(self.state, RunState::Idle | RunState::Running) {
            return;
        }
        let previous = self.state;
        self.state = RunState::Idle;
        self.last_result = None;
        self.last_error = None;
        info!(%previous, "session reset");
        self.emit_event(EventPayload::Reset(ResetEvent { previous }));
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), Timestamp::now(), payload);
        self.next_event_id += 1;

        debug!(event_id = event.id.0, payload = ?event.payload, "session event");

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }
}
