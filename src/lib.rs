// oracle-sim: price-oracle aggregation playground.
// perturbs signer observations according to a failure scenario and reports
// the median. everything except the live fetch is pure and deterministic.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Observation, Timestamp, SourceMode
//   2.x  feeds.rs: supported feeds and reference prices
//   3.x  scenario.rs: ScenarioConfig knobs and named presets
//   4.x  perturbation.rs: shift, delay, outlier, corruption in fixed order
//   5.x  aggregation.rs: median (and mean, for comparison)
//   6.x  freshness.rs: age grading of a result's oldest observation
//   7.x  price_feed/: mock and live data sources, value decoding
//   8.x  config.rs: gateway, signer count, jitter, env overrides
//   9.x  events.rs: run lifecycle events for audit
//   10.x assembly.rs: AggregateResult + synthetic chain metadata
//   11.x simulation/: session, run state machine, pipeline

pub mod aggregation;
pub mod assembly;
pub mod config;
pub mod events;
pub mod feeds;
pub mod freshness;
pub mod perturbation;
pub mod price_feed;
pub mod scenario;
pub mod simulation;
pub mod types;

// re exports for convenience
pub use aggregation::{compute_mean, compute_median, summarize, AggregateSummary, AggregationError};
pub use assembly::{assemble, AggregateResult, ChainMetadata, RunContext};
pub use config::SimulatorConfig;
pub use events::{Event, EventPayload, RunId};
pub use feeds::{find_feed, Feed, SUPPORTED_FEEDS};
pub use freshness::{assess_freshness, Freshness};
pub use perturbation::apply_scenario;
pub use price_feed::{
    decode_feed_response, HttpPriceSource, MockPriceSource, ObservationBatch, PriceSource, SourceError,
    StaticPriceSource,
};
pub use scenario::{ScenarioConfig, ScenarioError, ScenarioPreset};
pub use simulation::{run_pipeline, RunState, SimulationError, SimulationSession};
pub use types::{Observation, SourceMode, Timestamp};
