//! Pure part of a run: perturb, aggregate, assemble.

use super::results::SimulationError;
use crate::aggregation::summarize;
use crate::assembly::{assemble, AggregateResult};
use crate::perturbation::apply_scenario;
use crate::price_feed::ObservationBatch;
use crate::scenario::ScenarioConfig;
use crate::types::values_of;

/// Turn a raw batch into a result. Synchronous and free of I/O, so it can run
/// on any thread.
pub fn run_pipeline(batch: &ObservationBatch, scenario: &ScenarioConfig) -> Result<AggregateResult, SimulationError> {
    scenario.validate()?;

    let perturbed = apply_scenario(&batch.observations, scenario);
    let summary = summarize(&values_of(&perturbed))?;

    Ok(assemble(&perturbed, summary.median)
        .with_signatures(batch.signatures.clone())
        .with_summary(summary))
}
