//! Typed survey configuration.
//!
//! A survey names its strategy through [`StrategyParams`], a tagged union
//! keyed by the strategy name, so only parameters a strategy understands can
//! be expressed. [`SurveyConfig::validate`] runs once at survey setup and
//! turns the configuration into a ready-to-use [`Survey`].
//!
//! ```json
//! {
//!   "params": { "strategy": "l1_vs_leontief_comparison", "num_pairs": 8 },
//!   "dimension": 3,
//!   "total": 100,
//!   "suitability_overrides": { "max_zero_values": 0 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::registry::StrategyRegistry;
use crate::suitability::SuitabilityOverrides;
use crate::survey::Survey;
use crate::vector::DEFAULT_TOTAL;

/// Largest `num_pairs` a survey may request.
pub const MAX_REQUESTED_PAIRS: usize = 50;

/// Default number of categories.
pub const DEFAULT_DIMENSION: usize = 3;

/// Strategy selection plus the parameters that strategy accepts.
///
/// Strategies with a fixed pair count take no parameters; a `num_pairs`
/// supplied for them is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy")]
pub enum StrategyParams {
    #[serde(rename = "l1_vs_leontief_comparison")]
    L1VsLeontief {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        num_pairs: Option<usize>,
    },
    #[serde(rename = "l1_vs_l2_comparison")]
    L1VsL2 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        num_pairs: Option<usize>,
    },
    #[serde(rename = "l2_vs_leontief_comparison")]
    L2VsLeontief {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        num_pairs: Option<usize>,
    },
    #[serde(rename = "weighted_average_vector")]
    WeightedAverage,
    #[serde(rename = "rounded_weighted_average_vector")]
    RoundedWeightedAverage,
    #[serde(rename = "peak_linearity_test")]
    PeakLinearity,
    #[serde(rename = "cyclic_shift")]
    CyclicShift,
    #[serde(rename = "linear_symmetry")]
    LinearSymmetry,
    #[serde(rename = "asymmetric_loss_distribution")]
    AsymmetricLoss,
    #[serde(rename = "preference_ranking_survey")]
    PreferenceRanking,
    #[serde(rename = "biennial_budget_preference")]
    Biennial {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        num_pairs: Option<usize>,
    },
}

impl StrategyParams {
    /// Every strategy name the union can express.
    pub const NAMES: [&'static str; 11] = [
        "l1_vs_leontief_comparison",
        "l1_vs_l2_comparison",
        "l2_vs_leontief_comparison",
        "weighted_average_vector",
        "rounded_weighted_average_vector",
        "peak_linearity_test",
        "cyclic_shift",
        "linear_symmetry",
        "asymmetric_loss_distribution",
        "preference_ranking_survey",
        "biennial_budget_preference",
    ];

    /// Registry key of the selected strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Self::L1VsLeontief { .. } => Self::NAMES[0],
            Self::L1VsL2 { .. } => Self::NAMES[1],
            Self::L2VsLeontief { .. } => Self::NAMES[2],
            Self::WeightedAverage => Self::NAMES[3],
            Self::RoundedWeightedAverage => Self::NAMES[4],
            Self::PeakLinearity => Self::NAMES[5],
            Self::CyclicShift => Self::NAMES[6],
            Self::LinearSymmetry => Self::NAMES[7],
            Self::AsymmetricLoss => Self::NAMES[8],
            Self::PreferenceRanking => Self::NAMES[9],
            Self::Biennial { .. } => Self::NAMES[10],
        }
    }

    /// Requested pair count, if the strategy takes one.
    pub fn num_pairs(&self) -> Option<usize> {
        match self {
            Self::L1VsLeontief { num_pairs }
            | Self::L1VsL2 { num_pairs }
            | Self::L2VsLeontief { num_pairs }
            | Self::Biennial { num_pairs } => *num_pairs,
            _ => None,
        }
    }

    /// Build parameters from a strategy name, e.g. from command-line flags.
    pub fn from_name(name: &str, num_pairs: Option<usize>) -> Result<Self, ConfigError> {
        let params = match name {
            "l1_vs_leontief_comparison" => Self::L1VsLeontief { num_pairs },
            "l1_vs_l2_comparison" => Self::L1VsL2 { num_pairs },
            "l2_vs_leontief_comparison" => Self::L2VsLeontief { num_pairs },
            "weighted_average_vector" => Self::WeightedAverage,
            "rounded_weighted_average_vector" => Self::RoundedWeightedAverage,
            "peak_linearity_test" => Self::PeakLinearity,
            "cyclic_shift" => Self::CyclicShift,
            "linear_symmetry" => Self::LinearSymmetry,
            "asymmetric_loss_distribution" => Self::AsymmetricLoss,
            "preference_ranking_survey" => Self::PreferenceRanking,
            "biennial_budget_preference" => Self::Biennial { num_pairs },
            other => return Err(ConfigError::UnknownStrategy(other.to_string())),
        };
        Ok(params)
    }
}

fn default_dimension() -> usize {
    DEFAULT_DIMENSION
}

fn default_total() -> i32 {
    DEFAULT_TOTAL
}

/// One survey's generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyConfig {
    pub params: StrategyParams,
    /// Number of budget categories.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Budget total every allocation sums to.
    #[serde(default = "default_total")]
    pub total: i32,
    #[serde(default)]
    pub suitability_overrides: SuitabilityOverrides,
}

impl SurveyConfig {
    /// Default dimension and total for `params`.
    pub fn new(params: StrategyParams) -> Self {
        Self {
            params,
            dimension: DEFAULT_DIMENSION,
            total: DEFAULT_TOTAL,
            suitability_overrides: SuitabilityOverrides::default(),
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_total(mut self, total: i32) -> Self {
        self.total = total;
        self
    }

    pub fn with_overrides(mut self, overrides: SuitabilityOverrides) -> Self {
        self.suitability_overrides = overrides;
        self
    }

    /// Parse a JSON configuration. An unrecognised strategy name is reported
    /// as [`ConfigError::UnknownStrategy`] rather than a parse error.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text)?;
        if let Some(name) = value.pointer("/params/strategy").and_then(Value::as_str) {
            if !StrategyParams::NAMES.contains(&name) {
                return Err(ConfigError::UnknownStrategy(name.to_string()));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidParameter {
            name: "config",
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the configuration against `registry` and resolve its strategy.
    pub fn validate<'r>(&self, registry: &'r StrategyRegistry) -> Result<Survey<'r>, ConfigError> {
        let strategy = registry.get(self.params.name())?;
        let info = strategy.info();

        if self.dimension < 2 {
            return Err(ConfigError::InvalidParameter {
                name: "dimension",
                reason: format!("at least 2 categories required, got {}", self.dimension),
            });
        }
        if let Some(expected) = info.requirements.dimension {
            if expected != self.dimension {
                return Err(ConfigError::DimensionMismatch {
                    strategy: info.name.to_string(),
                    expected,
                    found: self.dimension,
                });
            }
        }
        if let Some(minimum) = info.requirements.min_dimension {
            if self.dimension < minimum {
                return Err(ConfigError::DimensionTooSmall {
                    strategy: info.name.to_string(),
                    minimum,
                    found: self.dimension,
                });
            }
        }
        if self.total <= 0 {
            return Err(ConfigError::InvalidParameter {
                name: "total",
                reason: format!("must be positive, got {}", self.total),
            });
        }
        if let Some(unit) = info.rounding_unit {
            if self.total % unit != 0 {
                return Err(ConfigError::InvalidParameter {
                    name: "total",
                    reason: format!("'{}' needs a multiple of {unit}, got {}", info.name, self.total),
                });
            }
        }
        if let Some(n) = self.params.num_pairs() {
            if !(1..=MAX_REQUESTED_PAIRS).contains(&n) {
                return Err(ConfigError::InvalidParameter {
                    name: "num_pairs",
                    reason: format!("must be in 1..={MAX_REQUESTED_PAIRS}, got {n}"),
                });
            }
        }

        let pair_count = strategy.pair_count(self.params.num_pairs(), self.dimension);
        if let Some(max) = strategy.max_pairs(self.dimension, self.total) {
            if pair_count > max {
                return Err(ConfigError::InvalidParameter {
                    name: "num_pairs",
                    reason: format!(
                        "'{}' has only {max} distinct pairs for {} categories and total {}, \
                         {pair_count} requested",
                        info.name, self.dimension, self.total
                    ),
                });
            }
        }

        let requirements = info.requirements.with_overrides(&self.suitability_overrides);
        if let (Some(lo), Some(hi)) = (requirements.min_component, requirements.max_component) {
            if lo > hi {
                return Err(ConfigError::InvalidParameter {
                    name: "suitability_overrides",
                    reason: format!("min_component {lo} exceeds max_component {hi}"),
                });
            }
        }

        log::debug!(
            "survey configured: strategy={} dimension={} total={} pairs={}",
            info.name,
            self.dimension,
            self.total,
            pair_count
        );
        Ok(Survey::new(self.clone(), strategy, requirements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::registry;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn names_match_the_registry() {
        let reg = registry();
        for name in StrategyParams::NAMES {
            let params = StrategyParams::from_name(name, None).unwrap();
            assert_eq!(params.name(), name);
            assert!(reg.contains(name), "{name}");
        }
        assert_eq!(reg.len(), StrategyParams::NAMES.len());
    }

    #[test]
    fn tagged_json_round_trip() {
        let text = r#"{
            "params": { "strategy": "biennial_budget_preference", "num_pairs": 6 },
            "suitability_overrides": { "max_zero_values": 2 }
        }"#;
        let config = SurveyConfig::from_json(text).unwrap();
        assert_eq!(config.params, StrategyParams::Biennial { num_pairs: Some(6) });
        assert_eq!(config.dimension, 3);
        assert_eq!(config.total, 100);
        assert_eq!(config.suitability_overrides.max_zero_values, Some(2));

        let back = SurveyConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn fixed_strategies_ignore_num_pairs() {
        let config =
            SurveyConfig::from_json(r#"{"params": {"strategy": "cyclic_shift", "num_pairs": 3}}"#)
                .unwrap();
        assert_eq!(config.params, StrategyParams::CyclicShift);
        assert_eq!(config.params.num_pairs(), None);
    }

    #[test]
    fn unknown_strategy_is_not_a_parse_error() {
        let err = SurveyConfig::from_json(r#"{"params": {"strategy": "coin_flip"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownStrategy(ref n) if n == "coin_flip"));
        assert!(matches!(
            SurveyConfig::from_json("{not json").unwrap_err(),
            ConfigError::Parse(_)
        ));
        assert!(StrategyParams::from_name("coin_flip", None).is_err());
    }

    #[test]
    fn ranking_needs_three_categories() {
        let config = SurveyConfig::new(StrategyParams::PreferenceRanking).with_dimension(4);
        match config.validate(registry()) {
            Err(ConfigError::DimensionMismatch {
                expected, found, ..
            }) => assert_eq!((expected, found), (3, 4)),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("dimension 4 accepted"),
        }
        assert!(
            SurveyConfig::new(StrategyParams::PreferenceRanking)
                .validate(registry())
                .is_ok()
        );
    }

    #[test]
    fn parameter_bounds() {
        let reg = registry();
        let bad = [
            SurveyConfig::new(StrategyParams::CyclicShift).with_dimension(1),
            SurveyConfig::new(StrategyParams::CyclicShift).with_total(0),
            SurveyConfig::new(StrategyParams::RoundedWeightedAverage).with_total(99),
            SurveyConfig::new(StrategyParams::L1VsL2 { num_pairs: Some(0) }),
            SurveyConfig::new(StrategyParams::Biennial { num_pairs: Some(51) }),
            SurveyConfig::new(StrategyParams::PreferenceRanking).with_overrides(
                SuitabilityOverrides {
                    min_component: Some(60),
                    max_component: Some(40),
                    ..Default::default()
                },
            ),
            SurveyConfig::new(StrategyParams::Biennial { num_pairs: Some(10) })
                .with_dimension(2)
                .with_total(7),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(reg), Err(ConfigError::InvalidParameter { .. })),
                "{config:?}"
            );
        }
        assert!(
            SurveyConfig::new(StrategyParams::Biennial { num_pairs: Some(50) })
                .validate(reg)
                .is_ok()
        );
    }

    #[test]
    fn tradeoff_and_structural_strategies_need_three_categories() {
        let reg = registry();
        let two = [
            StrategyParams::L1VsLeontief { num_pairs: None },
            StrategyParams::L1VsL2 { num_pairs: None },
            StrategyParams::L2VsLeontief { num_pairs: None },
            StrategyParams::CyclicShift,
            StrategyParams::LinearSymmetry,
        ];
        for params in two {
            let config = SurveyConfig::new(params).with_dimension(2);
            match config.validate(reg) {
                Err(ConfigError::DimensionTooSmall { minimum, found, .. }) => {
                    assert_eq!((minimum, found), (3, 2))
                }
                Err(e) => panic!("unexpected error: {e}"),
                Ok(_) => panic!("{config:?} accepted"),
            }
            assert!(config.with_dimension(4).validate(reg).is_ok());
        }
    }

    #[test]
    fn biennial_pairs_fit_the_budget_grid() {
        let reg = registry();
        let two =
            SurveyConfig::new(StrategyParams::Biennial { num_pairs: Some(50) }).with_dimension(2);
        let survey = two.validate(reg).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let output = survey.generate(&[30, 70], &mut rng).unwrap();
        assert_eq!(output.pairs.len(), 50);

        let tight = SurveyConfig::new(StrategyParams::Biennial { num_pairs: Some(7) })
            .with_dimension(2)
            .with_total(7);
        assert!(tight.validate(reg).is_ok());
        let over = SurveyConfig::new(StrategyParams::Biennial { num_pairs: Some(8) })
            .with_dimension(2)
            .with_total(7);
        match over.validate(reg) {
            Err(ConfigError::InvalidParameter { name, .. }) => assert_eq!(name, "num_pairs"),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("8 pairs accepted for 7 alternatives"),
        }
    }

    #[test]
    fn overrides_flow_into_requirements() {
        let config = SurveyConfig::new(StrategyParams::LinearSymmetry).with_overrides(
            SuitabilityOverrides {
                max_zero_values: Some(1),
                ..Default::default()
            },
        );
        let survey = config.validate(registry()).unwrap();
        assert_eq!(survey.requirements().max_zero_values, Some(1));
    }
}
