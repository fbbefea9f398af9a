// 7.0: data source providers. the run is agnostic to whether raw observations
// come from the mock generator or the live gateway; both implement PriceSource.
// a provider either returns at least one observation or fails. never an empty batch.
//
//   7.1 mock.rs: jittered readings around the feed's reference price
//   7.2 live.rs: HTTP gateway client + response normalization
//   7.3 decode.rs: closed set of value encodings -> canonical decimal

mod decode;
mod live;
mod mock;

pub use decode::{decode_value, RawValue};
pub use live::{decode_feed_response, HttpPriceSource};
pub use mock::{MockPriceSource, MOCK_SIGNATURES, MOCK_SIGNER_COUNT};

use crate::types::{Observation, SourceMode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Every way a provider can fail to produce observations. All of them leave
/// the run without data, so they share one "source unavailable" category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("Source unavailable: unknown feed '{0}'")]
    UnknownFeed(String),

    #[error("Source unavailable: request for {feed} failed: {reason}")]
    Unreachable { feed: String, reason: String },

    #[error("Source unavailable: {feed} gateway answered HTTP {status}")]
    BadStatus { feed: String, status: u16 },

    #[error("Source unavailable: {feed} response is malformed: {reason}")]
    Malformed { feed: String, reason: String },

    #[error("Source unavailable: {0} missing from response")]
    FeedMissing(String),

    #[error("Source unavailable: no usable observations for {0}")]
    NoUsableObservations(String),
}

/// Raw observations of one fetch, with each signer's signature at the same index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObservationBatch {
    pub observations: Vec<Observation>,
    pub signatures: Vec<String>,
}

impl ObservationBatch {
    pub fn new(observations: Vec<Observation>, signatures: Vec<String>) -> Self {
        debug_assert_eq!(observations.len(), signatures.len());
        Self {
            observations,
            signatures,
        }
    }

    /// Observations without signer signatures.
    pub fn unsigned(observations: Vec<Observation>) -> Self {
        let signatures = vec![String::new(); observations.len()];
        Self {
            observations,
            signatures,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// A supplier of raw, unperturbed observations.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn mode(&self) -> SourceMode;

    /// Fetch up to `signer_count` observations for `feed_id`.
    async fn fetch_observations(
        &self,
        feed_id: &str,
        signer_count: usize,
    ) -> Result<ObservationBatch, SourceError>;
}

/// Replays a fixed batch, or a fixed failure. Useful for deterministic runs
/// and for replaying captured gateway data.
#[derive(Debug, Clone)]
pub struct StaticPriceSource {
    mode: SourceMode,
    outcome: Result<ObservationBatch, SourceError>,
}

impl StaticPriceSource {
    pub fn new(mode: SourceMode, batch: ObservationBatch) -> Self {
        Self {
            mode,
            outcome: Ok(batch),
        }
    }

    pub fn failing(mode: SourceMode, error: SourceError) -> Self {
        Self {
            mode,
            outcome: Err(error),
        }
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    fn mode(&self) -> SourceMode {
        self.mode
    }

    async fn fetch_observations(
        &self,
        feed_id: &str,
        signer_count: usize,
    ) -> Result<ObservationBatch, SourceError> {
        let mut batch = self.outcome.clone()?;
        if batch.is_empty() {
            return Err(SourceError::NoUsableObservations(feed_id.to_string()));
        }
        batch.observations.truncate(signer_count.max(1));
        batch.signatures.truncate(signer_count.max(1));
        Ok(batch)
    }
}
