//! Pre-flight suitability checks of an ideal vector against a strategy's
//! declared requirements.
//!
//! A violation is terminal for the (subject, strategy) combination: the
//! caller is expected to branch into an alternate survey flow.

use serde::{Deserialize, Serialize};

use crate::error::UnsuitableError;
use crate::vector::{count_zeros, largest_equal_pair};

/// Machine-readable identifier of a suitability rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitabilityRule {
    /// At most N components of the ideal vector may be zero.
    MaxZeroValues,
    /// Two categories must share an equal value of at least N.
    MinEqualValuePair,
    /// The ideal vector must have exactly (or at least) N categories.
    Dimension,
    /// Every component must be at least N.
    MinComponent,
    /// Every component must be at most N.
    MaxComponent,
}

impl SuitabilityRule {
    pub fn id(self) -> &'static str {
        match self {
            Self::MaxZeroValues => "max_zero_values",
            Self::MinEqualValuePair => "min_equal_value_pair",
            Self::Dimension => "dimension",
            Self::MinComponent => "min_component",
            Self::MaxComponent => "max_component",
        }
    }
}

impl std::fmt::Display for SuitabilityRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Preconditions a strategy declares on the ideal vector. `None` means the
/// rule does not apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    pub max_zero_values: Option<usize>,
    pub min_equal_value_pair: Option<i32>,
    pub dimension: Option<usize>,
    pub min_dimension: Option<usize>,
    pub min_component: Option<i32>,
    pub max_component: Option<i32>,
}

impl Requirements {
    pub const NONE: Self = Self {
        max_zero_values: None,
        min_equal_value_pair: None,
        dimension: None,
        min_dimension: None,
        min_component: None,
        max_component: None,
    };

    /// Survey overrides replace the strategy default rule by rule.
    pub fn with_overrides(self, overrides: &SuitabilityOverrides) -> Self {
        Self {
            max_zero_values: overrides.max_zero_values.or(self.max_zero_values),
            min_equal_value_pair: overrides.min_equal_value_pair.or(self.min_equal_value_pair),
            dimension: self.dimension,
            min_dimension: self.min_dimension,
            min_component: overrides.min_component.or(self.min_component),
            max_component: overrides.max_component.or(self.max_component),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Per-survey replacements for a strategy's declared requirements.
///
/// The dimension requirements cannot be overridden: they are properties of
/// the algorithm, checked at survey setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuitabilityOverrides {
    pub max_zero_values: Option<usize>,
    pub min_equal_value_pair: Option<i32>,
    pub min_component: Option<i32>,
    pub max_component: Option<i32>,
}

/// One failed rule with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: SuitabilityRule,
    pub detail: String,
}

/// Every rule `ideal` violates, in rule order.
pub fn violations(ideal: &[i32], requirements: &Requirements) -> Vec<Violation> {
    let mut out = Vec::new();

    if let Some(expected) = requirements.dimension {
        if ideal.len() != expected {
            out.push(Violation {
                rule: SuitabilityRule::Dimension,
                detail: format!("{} categories, exactly {expected} required", ideal.len()),
            });
        }
    }

    if let Some(minimum) = requirements.min_dimension {
        if ideal.len() < minimum {
            out.push(Violation {
                rule: SuitabilityRule::Dimension,
                detail: format!("{} categories, at least {minimum} required", ideal.len()),
            });
        }
    }

    if let Some(max) = requirements.max_zero_values {
        let zeros = count_zeros(ideal);
        if zeros > max {
            out.push(Violation {
                rule: SuitabilityRule::MaxZeroValues,
                detail: format!("{zeros} zero component(s), at most {max} allowed"),
            });
        }
    }

    if let Some(min) = requirements.min_equal_value_pair {
        if largest_equal_pair(ideal, min).is_none() {
            out.push(Violation {
                rule: SuitabilityRule::MinEqualValuePair,
                detail: format!("no two categories share an equal value >= {min}"),
            });
        }
    }

    let low = ideal.iter().copied().min();
    let high = ideal.iter().copied().max();

    if let (Some(min), Some(low)) = (requirements.min_component, low) {
        if low < min {
            out.push(Violation {
                rule: SuitabilityRule::MinComponent,
                detail: format!("smallest component is {low}, at least {min} required"),
            });
        }
    }

    if let (Some(max), Some(high)) = (requirements.max_component, high) {
        if high > max {
            out.push(Violation {
                rule: SuitabilityRule::MaxComponent,
                detail: format!("largest component is {high}, at most {max} allowed"),
            });
        }
    }

    out
}

/// Fail with the first violated rule.
pub fn check_suitability(
    strategy: &str,
    ideal: &[i32],
    requirements: &Requirements,
) -> Result<(), UnsuitableError> {
    match violations(ideal, requirements).into_iter().next() {
        None => Ok(()),
        Some(v) => {
            log::info!(
                "ideal {ideal:?} unsuitable for '{strategy}': {} ({})",
                v.rule,
                v.detail
            );
            Err(UnsuitableError::new(strategy, v.rule, v.detail))
        }
    }
}
