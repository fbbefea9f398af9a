// 10.0: result assembly. packages the perturbed observations and their median
// into the record a run hands back. the chain metadata is a placeholder: it is
// derived from a digest of the content so assembly stays a pure function, but
// it describes no real transaction.

use crate::aggregation::AggregateSummary;
use crate::freshness::{assess_freshness, Freshness};
use crate::scenario::ScenarioConfig;
use crate::types::{Observation, SourceMode, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Address the simulated consumer contract is "deployed" at.
pub const SIMULATED_CONTRACT_ADDRESS: &str = "0x742d35Cc6635C0532925a3b8D40Ec8c2C2c3C7B1";

const BASE_BLOCK_NUMBER: u64 = 18_950_234;
const BLOCK_RANGE: u64 = 1_000_000;
const GAS_FLOOR: u64 = 40_000;
const GAS_RANGE: u64 = 50_000;

/// Synthetic on-chain fields. Well-formed, not meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainMetadata {
    /// `0x` + 64 lowercase hex chars
    pub transaction_hash: String,
    pub block_number: u64,
    pub gas_used: u64,
    pub contract_address: String,
}

impl ChainMetadata {
    fn from_digest(digest: &[u8]) -> Self {
        let word = |range: std::ops::Range<usize>| {
            digest[range]
                .iter()
                .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
        };

        Self {
            transaction_hash: format!("0x{}", hex::encode(digest)),
            block_number: BASE_BLOCK_NUMBER + word(0..4) % BLOCK_RANGE,
            gas_used: GAS_FLOOR + word(4..8) % GAS_RANGE,
            contract_address: SIMULATED_CONTRACT_ADDRESS.to_string(),
        }
    }
}

/// Which feed, source and knobs produced a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    pub feed_id: String,
    pub mode: SourceMode,
    pub scenario: ScenarioConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Perturbed observations, in signer order.
    pub observations: Vec<Observation>,
    /// Signer signatures at the same index as `observations`.
    pub signatures: Vec<String>,
    pub median_value: Decimal,
    pub summary: Option<AggregateSummary>,
    pub context: Option<RunContext>,
    pub metadata: ChainMetadata,
}

/// Copy `perturbed` and `median` into a result and attach synthetic metadata.
pub fn assemble(perturbed: &[Observation], median: Decimal) -> AggregateResult {
    let digest = content_digest(perturbed, median);

    AggregateResult {
        observations: perturbed.to_vec(),
        signatures: vec![String::new(); perturbed.len()],
        median_value: median,
        summary: None,
        context: None,
        metadata: ChainMetadata::from_digest(&digest),
    }
}

fn content_digest(observations: &[Observation], median: Decimal) -> Vec<u8> {
    let mut hasher = Sha256::new();
    for obs in observations {
        hasher.update(obs.id.as_bytes());
        hasher.update(obs.value.normalize().to_string().as_bytes());
        hasher.update(obs.timestamp.as_millis().to_be_bytes());
    }
    hasher.update(median.normalize().to_string().as_bytes());
    hasher.finalize().to_vec()
}

impl AggregateResult {
    /// Signatures shorter than the observation list are padded with empty strings.
    pub fn with_signatures(mut self, signatures: Vec<String>) -> Self {
        let mut signatures = signatures;
        signatures.resize(self.observations.len(), String::new());
        self.signatures = signatures;
        self
    }

    pub fn with_summary(mut self, summary: AggregateSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_context(mut self, context: RunContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn mean_value(&self) -> Option<Decimal> {
        self.summary.map(|s| s.mean)
    }

    pub fn freshness(&self, now: Timestamp) -> Option<Freshness> {
        assess_freshness(&self.observations, now)
    }

    pub fn signer_count(&self) -> usize {
        self.observations.len()
    }
}
