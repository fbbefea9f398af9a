// 5.0: aggregation. the median is what the oracle reports; the mean is kept
// alongside so a run can show how far an outlier drags a naive average.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    #[error("Cannot aggregate an empty set of values")]
    EmptyInput,

    #[error("Values exceed the representable range")]
    Overflow,
}

/// Standard statistical median: middle element for odd lengths, mean of the
/// two middle elements for even lengths.
pub fn compute_median(values: &[Decimal]) -> Result<Decimal, AggregationError> {
    if values.is_empty() {
        return Err(AggregationError::EmptyInput);
    }

    let mut sorted = values.to_vec();
    sorted.sort();

    let len = sorted.len();
    if len % 2 == 0 {
        let two = Decimal::new(2, 0);
        let (lo, hi) = (sorted[len / 2 - 1], sorted[len / 2]);
        // an overflowing sum means both share a sign, so hi - lo is safe
        Ok(match lo.checked_add(hi) {
            Some(sum) => sum / two,
            None => lo + (hi - lo) / two,
        })
    } else {
        Ok(sorted[len / 2])
    }
}

pub fn compute_mean(values: &[Decimal]) -> Result<Decimal, AggregationError> {
    if values.is_empty() {
        return Err(AggregationError::EmptyInput);
    }
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or(AggregationError::Overflow)?;
    Ok(sum / Decimal::from(values.len()))
}

/// Median next to mean, and how far apart they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub median: Decimal,
    pub mean: Decimal,
    /// |mean - median|
    pub spread: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

impl AggregateSummary {
    /// Spread as a fraction of the median. Zero when the median is zero.
    pub fn spread_ratio(&self) -> Decimal {
        if self.median.is_zero() {
            Decimal::ZERO
        } else {
            self.spread / self.median.abs()
        }
    }
}

pub fn summarize(values: &[Decimal]) -> Result<AggregateSummary, AggregationError> {
    let median = compute_median(values)?;
    let mean = compute_mean(values)?;
    let min = values.iter().copied().min().ok_or(AggregationError::EmptyInput)?;
    let max = values.iter().copied().max().ok_or(AggregationError::EmptyInput)?;

    Ok(AggregateSummary {
        median,
        mean,
        spread: mean.checked_sub(median).ok_or(AggregationError::Overflow)?.abs(),
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn median_ignores_the_outlier() {
        let values = [dec!(100), dec!(105), dec!(1000)];
        assert_eq!(compute_median(&values).unwrap(), dec!(105));
        // the mean would be dragged up to ~401.67
        assert!(compute_mean(&values).unwrap() > dec!(401));
    }

    #[test]
    fn even_length_averages_middle_pair() {
        let values = [dec!(4), dec!(1), dec!(3), dec!(2)];
        assert_eq!(compute_median(&values).unwrap(), dec!(2.5));
    }

    #[test]
    fn single_value_is_its_own_median() {
        assert_eq!(compute_median(&[dec!(3732.76)]).unwrap(), dec!(3732.76));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(compute_median(&[]), Err(AggregationError::EmptyInput));
        assert_eq!(compute_mean(&[]), Err(AggregationError::EmptyInput));
        assert!(summarize(&[]).is_err());
    }

    #[test]
    fn saturated_values_do_not_panic() {
        let values = [Decimal::MAX, Decimal::MAX];
        assert_eq!(compute_median(&values).unwrap(), Decimal::MAX);
        assert_eq!(compute_mean(&values), Err(AggregationError::Overflow));
        assert_eq!(summarize(&[Decimal::MAX, Decimal::MAX, dec!(1)]), Err(AggregationError::Overflow));
    }

    #[test]
    fn summary_reports_spread() {
        let summary = summarize(&[dec!(100), dec!(105), dec!(1000)]).unwrap();
        assert_eq!(summary.median, dec!(105));
        assert_eq!(summary.min, dec!(100));
        assert_eq!(summary.max, dec!(1000));
        assert_eq!(summary.spread, summary.mean - dec!(105));
        assert!(summary.spread_ratio() > dec!(2.8));
    }
}
