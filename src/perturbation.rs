// 4.0: perturbation engine. turns honest observations into a failure scenario.
// pure and deterministic: the data source is the only randomness in a run.
//
// 4.1 fixed transform order, so stacked scenarios reproduce:
//   shift -> delay -> outlier (index 0 only) -> corruption (first k signers)
// outlier and corruption both landing on index 0 compound.
// arithmetic saturates, so out-of-range knobs clamp instead of panicking;
// ScenarioConfig::validate rejects them before a run gets here.

use crate::scenario::ScenarioConfig;
use crate::types::Observation;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Value a corrupt signer reports, as a fraction of what it was given.
pub const CORRUPTION_FACTOR: Decimal = dec!(0.5);

const MILLIS_PER_SECOND: Decimal = dec!(1000);

/// `1 + percent/100`
pub fn percent_multiplier(percent: Decimal) -> Decimal {
    Decimal::ONE.saturating_add(percent / dec!(100))
}

/// Apply every active knob of `config` and return the perturbed copy.
/// The input slice is never modified.
pub fn apply_scenario(observations: &[Observation], config: &ScenarioConfig) -> Vec<Observation> {
    let mut out: Vec<Observation> = observations.to_vec();

    if !config.price_shift_percent.is_zero() {
        let factor = percent_multiplier(config.price_shift_percent);
        for obs in out.iter_mut() {
            obs.value = obs.value.saturating_mul(factor);
        }
    }

    if !config.timestamp_delay_seconds.is_zero() {
        let delay_ms = delay_millis(config.timestamp_delay_seconds);
        for obs in out.iter_mut() {
            obs.timestamp = obs.timestamp.minus_millis(delay_ms);
        }
    }

    if !config.outlier_percent.is_zero() {
        if let Some(first) = out.first_mut() {
            first.value = first.value.saturating_mul(percent_multiplier(config.outlier_percent));
        }
    }

    let corrupt = config.corrupt_signer_count.min(out.len());
    for obs in out.iter_mut().take(corrupt) {
        obs.value = obs.value.saturating_mul(CORRUPTION_FACTOR);
    }

    out
}

// sub-millisecond fractions are truncated
fn delay_millis(seconds: Decimal) -> i64 {
    let ms = seconds.saturating_mul(MILLIS_PER_SECOND).trunc();
    i64::try_from(ms).unwrap_or(if ms.is_sign_negative() { i64::MIN } else { i64::MAX })
}

/// Indices whose value differs between `before` and `after`.
pub fn changed_indices(before: &[Observation], after: &[Observation]) -> Vec<usize> {
    before
        .iter()
        .zip(after.iter())
        .enumerate()
        .filter(|(_, (b, a))| b.value != a.value)
        .map(|(i, _)| i)
        .collect()
}
