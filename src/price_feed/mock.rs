// 7.1: mock provider. three signers jittered independently around the feed's
// reference price, all stamped with the same instant.

use super::{ObservationBatch, PriceSource, SourceError};
use crate::feeds::find_feed;
use crate::types::{Observation, SourceMode, Timestamp};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::sync::Mutex;
use tracing::debug;

pub const MOCK_SIGNER_COUNT: usize = 3;

pub const MOCK_SIGNATURES: [&str; MOCK_SIGNER_COUNT] = [
    "0x1234567890abcdef1234567890abcdef12345678",
    "0xabcdef1234567890abcdef1234567890abcdef12",
    "0x90abcdef1234567890abcdef1234567890abcdef",
];

// jitter is drawn in hundredths of a basis point
const JITTER_STEPS_PER_BPS: i64 = 100;
const JITTER_SCALE: u32 = 6;
const PRICE_DP: u32 = 8;

pub struct MockPriceSource {
    rng: Mutex<StdRng>,
    jitter_bps: u32,
    fixed_time: Option<Timestamp>,
}

impl MockPriceSource {
    pub fn new(jitter_bps: u32) -> Self {
        Self::with_rng(StdRng::from_entropy(), jitter_bps)
    }

    /// Reproducible jitter for tests and demos.
    pub fn seeded(seed: u64, jitter_bps: u32) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), jitter_bps)
    }

    fn with_rng(rng: StdRng, jitter_bps: u32) -> Self {
        Self {
            rng: Mutex::new(rng),
            jitter_bps,
            fixed_time: None,
        }
    }

    /// Stamp every observation with `ts` instead of the wall clock.
    pub fn at_time(mut self, ts: Timestamp) -> Self {
        self.fixed_time = Some(ts);
        self
    }

    pub fn jitter_bps(&self) -> u32 {
        self.jitter_bps
    }

    /// Fraction in [-jitter_bps, +jitter_bps] basis points.
    fn draw_jitter(&self) -> Decimal {
        let bound = i64::from(self.jitter_bps) * JITTER_STEPS_PER_BPS;
        if bound == 0 {
            return Decimal::ZERO;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Decimal::new(rng.gen_range(-bound..=bound), JITTER_SCALE)
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    fn mode(&self) -> SourceMode {
        SourceMode::Mock
    }

    async fn fetch_observations(
        &self,
        feed_id: &str,
        signer_count: usize,
    ) -> Result<ObservationBatch, SourceError> {
        let feed = find_feed(feed_id).ok_or_else(|| SourceError::UnknownFeed(feed_id.to_string()))?;
        if signer_count != MOCK_SIGNER_COUNT {
            debug!(requested = signer_count, "mock source always produces {} signers", MOCK_SIGNER_COUNT);
        }

        let now = self.fixed_time.unwrap_or_else(Timestamp::now);
        let observations: Vec<Observation> = (0..MOCK_SIGNER_COUNT)
            .map(|i| {
                let value = (feed.reference_price * (Decimal::ONE + self.draw_jitter())).round_dp(PRICE_DP);
                Observation::new(Observation::signer_id(i), value, now)
            })
            .collect();
        let signatures = MOCK_SIGNATURES.iter().map(|s| s.to_string()).collect();

        debug!(feed = feed.id, count = observations.len(), "mock observations generated");
        Ok(ObservationBatch::new(observations, signatures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn produces_three_signers_within_jitter() {
        let source = MockPriceSource::seeded(7, 10);
        let batch = source.fetch_observations("ETH", 5).await.unwrap();

        assert_eq!(batch.len(), MOCK_SIGNER_COUNT);
        let ids: Vec<&str> = batch.observations.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["signer_1", "signer_2", "signer_3"]);

        let reference = dec!(3732.76);
        let tolerance = reference * dec!(0.001);
        for obs in &batch.observations {
            assert!((obs.value - reference).abs() <= tolerance, "{} outside ±0.1%", obs.value);
        }
    }

    #[tokio::test]
    async fn same_seed_same_readings() {
        let ts = Timestamp::from_millis(1_700_000_000_000);
        let a = MockPriceSource::seeded(42, 10).at_time(ts);
        let b = MockPriceSource::seeded(42, 10).at_time(ts);

        assert_eq!(
            a.fetch_observations("BTC", 3).await.unwrap(),
            b.fetch_observations("BTC", 3).await.unwrap()
        );
    }

    #[tokio::test]
    async fn zero_jitter_reports_reference_price() {
        let batch = MockPriceSource::seeded(1, 0).fetch_observations("sol", 3).await.unwrap();
        assert!(batch.observations.iter().all(|o| o.value == dec!(176.98)));
    }

    #[tokio::test]
    async fn unknown_feed_is_unavailable() {
        let err = MockPriceSource::new(10).fetch_observations("DOGE", 3).await.unwrap_err();
        assert_eq!(err, SourceError::UnknownFeed("DOGE".to_string()));
    }
}
