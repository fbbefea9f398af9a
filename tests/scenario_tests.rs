//! Scenario tests
//!
//! Worked examples of each failure scenario, checked end to end through the
//! pure pipeline.

use oracle_sim::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const T0: i64 = 1_700_000_000_000;

fn batch(values: &[Decimal]) -> ObservationBatch {
    let observations = values
        .iter()
        .enumerate()
        .map(|(i, v)| Observation::new(Observation::signer_id(i), *v, Timestamp::from_millis(T0)))
        .collect();
    ObservationBatch::unsigned(observations)
}

fn perturbed_values(result: &AggregateResult) -> Vec<Decimal> {
    result.observations.iter().map(|o| o.value).collect()
}

/// The median resists what the mean cannot.
mod median_tests {
    use super::*;

    #[test]
    fn outlier_example_returns_middle_value() {
        let values = [dec!(100), dec!(105), dec!(1000)];

        let median = compute_median(&values).unwrap();
        let mean = compute_mean(&values).unwrap();

        assert_eq!(median, dec!(105));
        assert_ne!(median, mean);
        assert_eq!(mean.round_dp(2), dec!(401.67));
    }

    #[test]
    fn empty_values_are_rejected() {
        assert_eq!(compute_median(&[]), Err(AggregationError::EmptyInput));
    }
}

/// One test per named preset, on honest readings of 100.
mod preset_tests {
    use super::*;

    #[test]
    fn normal_operation_passes_through() {
        let raw = batch(&[dec!(100), dec!(100.2), dec!(99.9)]);
        let result = run_pipeline(&raw, &ScenarioPreset::Normal.config()).unwrap();

        assert_eq!(result.observations, raw.observations);
        assert_eq!(result.median_value, dec!(100));
    }

    #[test]
    fn price_spike_lifts_every_signer() {
        let result = run_pipeline(&batch(&[dec!(100)]), &ScenarioPreset::PriceSpike.config()).unwrap();

        assert_eq!(result.observations[0].value, dec!(115.0));
        assert_eq!(result.median_value, dec!(115));
    }

    #[test]
    fn delayed_feed_ages_data_but_keeps_prices() {
        let result = run_pipeline(&batch(&[dec!(100), dec!(100), dec!(100)]), &ScenarioPreset::DelayedFeed.config()).unwrap();

        for obs in &result.observations {
            assert_eq!(obs.timestamp.as_millis(), T0 - 30_000);
            assert_eq!(obs.value, dec!(100));
        }
        let now = Timestamp::from_millis(T0);
        assert_eq!(result.freshness(now), Some(Freshness::VeryFresh));
        assert_eq!(result.freshness(Timestamp::from_millis(T0 + 45_000)), Some(Freshness::Fresh));
    }

    #[test]
    fn corrupt_signer_is_filtered_by_median() {
        let result = run_pipeline(&batch(&[dec!(100), dec!(100), dec!(100)]), &ScenarioPreset::CorruptSigner.config()).unwrap();

        assert_eq!(perturbed_values(&result), vec![dec!(50), dec!(100), dec!(100)]);
        assert_eq!(result.median_value, dec!(100));
    }

    #[test]
    fn outlier_injection_moves_mean_not_median() {
        let result = run_pipeline(&batch(&[dec!(100), dec!(101), dec!(102)]), &ScenarioPreset::OutlierInjection.config()).unwrap();

        assert_eq!(perturbed_values(&result), vec![dec!(150), dec!(101), dec!(102)]);
        assert_eq!(result.median_value, dec!(102));
        let summary = result.summary.unwrap();
        assert!(summary.mean > summary.median);
    }
}

/// Median robustness as the corrupt share grows.
mod robustness_tests {
    use super::*;

    #[test]
    fn minority_corruption_gives_honest_median() {
        // honest values differ so we can see which pair the median uses
        let raw = batch(&[dec!(100), dec!(102), dec!(104)]);
        let result = run_pipeline(&raw, &ScenarioConfig::default().with_corrupt_signers(1)).unwrap();

        // signer_1 now reports 50; the honest pair is 102 and 104
        assert_eq!(result.median_value, dec!(102));
        assert_ne!(result.median_value, dec!(50));
    }

    #[test]
    fn even_signer_set_averages_honest_pair() {
        let raw = batch(&[dec!(100), dec!(100), dec!(102), dec!(104)]);
        let result = run_pipeline(&raw, &ScenarioConfig::default().with_corrupt_signers(1)).unwrap();

        // [50, 100, 102, 104] -> (100 + 102) / 2
        assert_eq!(result.median_value, dec!(101));
    }

    #[test]
    fn majority_corruption_breaks_the_median() {
        let raw = batch(&[dec!(100), dec!(100), dec!(100)]);
        let result = run_pipeline(&raw, &ScenarioConfig::default().with_corrupt_signers(2)).unwrap();

        assert_eq!(result.median_value, dec!(50));
    }

    #[test]
    fn outlier_and_corruption_compound_on_first_signer() {
        let raw = batch(&[dec!(100), dec!(100), dec!(100)]);
        let config = ScenarioConfig::default().with_outlier(dec!(100)).with_corrupt_signers(1);
        let result = run_pipeline(&raw, &config).unwrap();

        // 100 * 2 * 0.5
        assert_eq!(perturbed_values(&result), vec![dec!(100), dec!(100), dec!(100)]);
    }

    #[test]
    fn stacked_knobs_apply_in_fixed_order() {
        let raw = batch(&[dec!(200), dec!(200), dec!(200)]);
        let config = ScenarioConfig::default()
            .with_price_shift(dec!(-10))
            .with_delay(dec!(2.5))
            .with_outlier(dec!(50))
            .with_corrupt_signers(2);
        let result = run_pipeline(&raw, &config).unwrap();

        // shift: 180 each; outlier: 270 at index 0; corruption: 135, 90
        assert_eq!(perturbed_values(&result), vec![dec!(135), dec!(90), dec!(180)]);
        assert!(result.observations.iter().all(|o| o.timestamp.as_millis() == T0 - 2_500));
        assert_eq!(result.median_value, dec!(135));
    }
}

/// Results carry what the display layer needs.
mod assembly_tests {
    use super::*;

    #[test]
    fn signatures_follow_their_observations() {
        let raw = ObservationBatch::new(
            vec![
                Observation::new("signer_1", dec!(10), Timestamp::from_millis(T0)),
                Observation::new("signer_2", dec!(20), Timestamp::from_millis(T0)),
            ],
            vec!["0xaa".to_string(), "0xbb".to_string()],
        );
        let result = run_pipeline(&raw, &ScenarioConfig::default()).unwrap();

        assert_eq!(result.signatures, vec!["0xaa", "0xbb"]);
        assert_eq!(result.median_value, dec!(15));
    }

    #[test]
    fn metadata_is_present_and_shaped() {
        let result = run_pipeline(&batch(&[dec!(1), dec!(2), dec!(3)]), &ScenarioConfig::default()).unwrap();
        let meta = &result.metadata;

        assert!(meta.transaction_hash.starts_with("0x"));
        assert_eq!(meta.transaction_hash.len(), 66);
        assert!(meta.block_number > 0);
        assert!(meta.gas_used >= 40_000 && meta.gas_used < 90_000);
    }
}
