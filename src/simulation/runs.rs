//! Running scenarios through the session.

use super::core::SimulationSession;
use super::pipeline::run_pipeline;
use super::results::{RunState, SimulationError};
use crate::assembly::{AggregateResult, RunContext};
use crate::events::{
    EventPayload, ObservationsFetchedEvent, RunCompletedEvent, RunFailedEvent, RunId, RunStartedEvent,
    ScenarioAppliedEvent,
};
use crate::feeds::find_feed;
use crate::perturbation::changed_indices;
use crate::price_feed::SourceError;
use crate::scenario::{ScenarioConfig, ScenarioPreset};
use crate::types::SourceMode;
use tracing::{debug, info, warn};

impl SimulationSession {
    /// Run one scenario end to end.
    ///
    /// Returns `Ok(None)` without doing anything if a run is already in
    /// progress. Otherwise the session enters `Running` immediately and ends
    /// in `Completed` with the result or `Error` with the failure.
    pub async fn run_scenario(
        &mut self,
        feed_id: &str,
        mode: SourceMode,
        scenario: ScenarioConfig,
    ) -> Result<Option<AggregateResult>, SimulationError> {
        if !self.state.can_start() {
            debug!(feed = feed_id, "run already in progress, ignoring trigger");
            return Ok(None);
        }

        let run_id = self.begin_run(feed_id, mode, &scenario);
        let mut run = ActiveRun {
            session: self,
            run_id,
            settled: false,
        };

        let outcome = run.session.execute(run_id, feed_id, mode, scenario).await;
        run.settle(outcome)
    }

    pub async fn run_preset(
        &mut self,
        feed_id: &str,
        mode: SourceMode,
        preset: ScenarioPreset,
    ) -> Result<Option<AggregateResult>, SimulationError> {
        self.run_scenario(feed_id, mode, preset.config()).await
    }

    fn begin_run(&mut self, feed_id: &str, mode: SourceMode, scenario: &ScenarioConfig) -> RunId {
        let run_id = RunId(self.next_run_id);
        self.next_run_id += 1;

        self.state = RunState::Running;
        self.last_result = None;
        self.last_error = None;

        info!(run = run_id.0, feed = feed_id, %mode, "run started");
        self.emit_event(EventPayload::RunStarted(RunStartedEvent {
            run_id,
            feed_id: feed_id.to_string(),
            mode,
            scenario: *scenario,
        }));
        run_id
    }

    async fn execute(
        &mut self,
        run_id: RunId,
        feed_id: &str,
        mode: SourceMode,
        scenario: ScenarioConfig,
    ) -> Result<AggregateResult, SimulationError> {
        scenario.validate()?;
        let feed = find_feed(feed_id).ok_or_else(|| SourceError::UnknownFeed(feed_id.to_string()))?;

        let signer_count = self.config.signer_count;
        let batch = self.source(mode).fetch_observations(feed.id, signer_count).await?;
        if batch.is_empty() {
            return Err(SourceError::NoUsableObservations(feed.id.to_string()).into());
        }

        self.emit_event(EventPayload::ObservationsFetched(ObservationsFetchedEvent {
            run_id,
            count: batch.len(),
        }));

        let result = run_pipeline(&batch, &scenario)?;

        self.emit_event(EventPayload::ScenarioApplied(ScenarioAppliedEvent {
            run_id,
            perturbed: changed_indices(&batch.observations, &result.observations),
        }));

        Ok(result.with_context(RunContext {
            feed_id: feed.id.to_string(),
            mode,
            scenario,
        }))
    }

    fn complete_run(&mut self, run_id: RunId, result: &AggregateResult) {
        self.state = RunState::Completed;
        self.last_result = Some(result.clone());

        info!(
            run = run_id.0,
            median = %result.median_value,
            signers = result.signer_count(),
            "run completed"
        );
        self.emit_event(EventPayload::RunCompleted(RunCompletedEvent {
            run_id,
            median: result.median_value,
            transaction_hash: result.metadata.transaction_hash.clone(),
        }));
    }

    fn fail_run(&mut self, run_id: RunId, error: &SimulationError) {
        self.state = RunState::Error;
        self.last_error = Some(error.to_string());

        warn!(run = run_id.0, error = %error, "run failed");
        self.emit_event(EventPayload::RunFailed(RunFailedEvent {
            run_id,
            reason: error.to_string(),
        }));
    }
}

/// A run between `begin_run` and its outcome. Dropping it unsettled, e.g. when
/// the caller abandons the future mid-fetch, fails the run.
struct ActiveRun<'a> {
    session: &'a mut SimulationSession,
    run_id: RunId,
    settled: bool,
}

impl ActiveRun<'_> {
    fn settle(
        mut self,
        outcome: Result<AggregateResult, SimulationError>,
    ) -> Result<Option<AggregateResult>, SimulationError> {
        self.settled = true;
        match outcome {
            Ok(result) => {
                self.session.complete_run(self.run_id, &result);
                Ok(Some(result))
            }
            Err(e) => {
                self.session.fail_run(self.run_id, &e);
                Err(e)
            }
        }
    }
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.session.fail_run(self.run_id, &SimulationError::Cancelled);
        }
    }
}
