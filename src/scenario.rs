// 3.0: scenario configuration. four knobs, each inert at zero, plus named presets.
// 3.1 presets are sugar: every preset produces the same ScenarioConfig record the
// perturbation engine consumes, so there is one code path regardless of preset.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    #[error("Timestamp delay must be non-negative, got {0}s")]
    NegativeDelay(Decimal),

    #[error("Outlier magnitude must be non-negative, got {0}%")]
    NegativeOutlier(Decimal),

    #[error("{knob} of {value} is outside the supported range")]
    OutOfRange { knob: &'static str, value: Decimal },

    #[error("Unknown scenario preset '{0}'")]
    UnknownPreset(String),
}

/// Largest accepted magnitude for the percent knobs (a 10 000x move).
pub const MAX_PERCENT: Decimal = dec!(1000000);
/// Largest accepted delay, roughly 31 years.
pub const MAX_DELAY_SECONDS: Decimal = dec!(1000000000);

/// Knobs for one simulation run. Zero on any field means that knob is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Applied to every observation: value * (1 + pct/100).
    pub price_shift_percent: Decimal,
    /// Subtracted from every timestamp.
    pub timestamp_delay_seconds: Decimal,
    /// Leading signers that report half the true value. Clamped to signer count.
    pub corrupt_signer_count: usize,
    /// Applied to the first observation only.
    pub outlier_percent: Decimal,
}

impl ScenarioConfig {
    pub fn normal() -> Self {
        Self::default()
    }

    pub fn with_price_shift(mut self, percent: Decimal) -> Self {
        self.price_shift_percent = percent;
        self
    }

    pub fn with_delay(mut self, seconds: Decimal) -> Self {
        self.timestamp_delay_seconds = seconds;
        self
    }

    pub fn with_corrupt_signers(mut self, count: usize) -> Self {
        self.corrupt_signer_count = count;
        self
    }

    pub fn with_outlier(mut self, percent: Decimal) -> Self {
        self.outlier_percent = percent;
        self
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.timestamp_delay_seconds < Decimal::ZERO {
            return Err(ScenarioError::NegativeDelay(self.timestamp_delay_seconds));
        }
        if self.outlier_percent < Decimal::ZERO {
            return Err(ScenarioError::NegativeOutlier(self.outlier_percent));
        }
        if self.price_shift_percent.abs() > MAX_PERCENT {
            return Err(ScenarioError::OutOfRange {
                knob: "price shift",
                value: self.price_shift_percent,
            });
        }
        if self.outlier_percent > MAX_PERCENT {
            return Err(ScenarioError::OutOfRange {
                knob: "outlier",
                value: self.outlier_percent,
            });
        }
        if self.timestamp_delay_seconds > MAX_DELAY_SECONDS {
            return Err(ScenarioError::OutOfRange {
                knob: "timestamp delay",
                value: self.timestamp_delay_seconds,
            });
        }
        Ok(())
    }

    pub fn is_inert(&self) -> bool {
        self.price_shift_percent.is_zero()
            && self.timestamp_delay_seconds.is_zero()
            && self.corrupt_signer_count == 0
            && self.outlier_percent.is_zero()
    }
}

/// Named scenarios offered by the playground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioPreset {
    Normal,
    PriceSpike,
    DelayedFeed,
    CorruptSigner,
    OutlierInjection,
    Custom(ScenarioConfig),
}

impl ScenarioPreset {
    /// Every named preset; `Custom` is excluded since it carries user knobs.
    pub const NAMED: [ScenarioPreset; 5] = [
        ScenarioPreset::Normal,
        ScenarioPreset::PriceSpike,
        ScenarioPreset::DelayedFeed,
        ScenarioPreset::CorruptSigner,
        ScenarioPreset::OutlierInjection,
    ];

    pub fn config(&self) -> ScenarioConfig {
        match self {
            ScenarioPreset::Normal => ScenarioConfig::normal(),
            ScenarioPreset::PriceSpike => ScenarioConfig::default().with_price_shift(dec!(15)),
            ScenarioPreset::DelayedFeed => ScenarioConfig::default().with_delay(dec!(30)),
            ScenarioPreset::CorruptSigner => ScenarioConfig::default().with_corrupt_signers(1),
            ScenarioPreset::OutlierInjection => ScenarioConfig::default().with_outlier(dec!(50)),
            ScenarioPreset::Custom(config) => *config,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            ScenarioPreset::Normal => "normal",
            ScenarioPreset::PriceSpike => "price_spike",
            ScenarioPreset::DelayedFeed => "delayed_feed",
            ScenarioPreset::CorruptSigner => "corrupt_signer",
            ScenarioPreset::OutlierInjection => "outlier_injection",
            ScenarioPreset::Custom(_) => "custom",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ScenarioPreset::Normal => "Normal Operation",
            ScenarioPreset::PriceSpike => "Price Spike",
            ScenarioPreset::DelayedFeed => "Delayed Feed",
            ScenarioPreset::CorruptSigner => "Corrupt Signer",
            ScenarioPreset::OutlierInjection => "Outlier Injection",
            ScenarioPreset::Custom(_) => "Custom Parameters",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScenarioPreset::Normal => "Standard oracle behavior with all nodes providing accurate data",
            ScenarioPreset::PriceSpike => "Sudden 15% price increase across every signer",
            ScenarioPreset::DelayedFeed => "Every reading is 30s old, exercising freshness checks",
            ScenarioPreset::CorruptSigner => "One malicious signer reports half the true price",
            ScenarioPreset::OutlierInjection => "A single signer reports a 50% outlier",
            ScenarioPreset::Custom(_) => "Manually adjusted scenario knobs",
        }
    }

    /// Editing any knob turns the selection into a custom scenario seeded
    /// with the current preset's values.
    pub fn customize(&self, edit: impl FnOnce(ScenarioConfig) -> ScenarioConfig) -> Self {
        ScenarioPreset::Custom(edit(self.config()))
    }
}

impl Default for ScenarioPreset {
    fn default() -> Self {
        ScenarioPreset::Normal
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ScenarioPreset {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "custom" {
            return Ok(ScenarioPreset::Custom(ScenarioConfig::default()));
        }
        ScenarioPreset::NAMED
            .into_iter()
            .find(|preset| preset.id() == wanted)
            .ok_or_else(|| ScenarioError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_populate_one_knob_each() {
        assert!(ScenarioPreset::Normal.config().is_inert());
        assert_eq!(ScenarioPreset::PriceSpike.config().price_shift_percent, dec!(15));
        assert_eq!(ScenarioPreset::DelayedFeed.config().timestamp_delay_seconds, dec!(30));
        assert_eq!(ScenarioPreset::CorruptSigner.config().corrupt_signer_count, 1);
        assert_eq!(ScenarioPreset::OutlierInjection.config().outlier_percent, dec!(50));
    }

    #[test]
    fn preset_ids_round_trip_through_parse() {
        for preset in ScenarioPreset::NAMED {
            assert_eq!(preset.id().parse::<ScenarioPreset>().unwrap(), preset);
        }
        assert!(matches!(
            "custom".parse::<ScenarioPreset>(),
            Ok(ScenarioPreset::Custom(_))
        ));
        assert!(matches!(
            "flash_crash".parse::<ScenarioPreset>(),
            Err(ScenarioError::UnknownPreset(_))
        ));
    }

    #[test]
    fn customize_keeps_preset_values() {
        let custom = ScenarioPreset::PriceSpike.customize(|c| c.with_corrupt_signers(2));
        let config = custom.config();

        assert_eq!(custom.id(), "custom");
        assert_eq!(config.price_shift_percent, dec!(15));
        assert_eq!(config.corrupt_signer_count, 2);
    }

    #[test]
    fn negative_knobs_are_rejected() {
        let delayed = ScenarioConfig::default().with_delay(dec!(-1));
        assert_eq!(delayed.validate(), Err(ScenarioError::NegativeDelay(dec!(-1))));

        let outlier = ScenarioConfig::default().with_outlier(dec!(-5));
        assert_eq!(outlier.validate(), Err(ScenarioError::NegativeOutlier(dec!(-5))));

        // negative shifts model price drops
        assert!(ScenarioConfig::default().with_price_shift(dec!(-20)).validate().is_ok());
    }

    #[test]
    fn absurd_knobs_are_out_of_range() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(27), 0);

        let shift = ScenarioConfig::default().with_price_shift(huge).validate();
        assert!(matches!(shift, Err(ScenarioError::OutOfRange { knob: "price shift", .. })));

        let drop = ScenarioConfig::default().with_price_shift(-huge).validate();
        assert!(matches!(drop, Err(ScenarioError::OutOfRange { knob: "price shift", .. })));

        let delay = ScenarioConfig::default().with_delay(huge).validate();
        assert!(matches!(delay, Err(ScenarioError::OutOfRange { knob: "timestamp delay", .. })));

        let outlier = ScenarioConfig::default().with_outlier(huge).validate();
        assert!(matches!(outlier, Err(ScenarioError::OutOfRange { knob: "outlier", .. })));

        // the bounds themselves are accepted
        let edge = ScenarioConfig::default()
            .with_price_shift(MAX_PERCENT)
            .with_outlier(MAX_PERCENT)
            .with_delay(MAX_DELAY_SECONDS);
        assert!(edge.validate().is_ok());
    }
}
