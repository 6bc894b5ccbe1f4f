//! Error taxonomy for pair generation.
//!
//! Three kinds of failure are kept apart because callers react to them
//! differently:
//! - [`UnsuitableError`]: the subject's ideal vector cannot be used with the
//!   chosen strategy. Expected and data-dependent; branch the survey flow.
//! - [`GenerationError::Exhausted`]: rejection sampling ran out of attempts.
//!   Points at a strategy/parameter misconfiguration; never retried.
//! - [`ConfigError`]: survey setup is wrong (unknown strategy, dimension
//!   mismatch, bad parameter). Raised at setup time, not per subject.

use thiserror::Error;

use crate::suitability::SuitabilityRule;

/// Failures of the vector rescaling routines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorError {
    #[error("rescaling needs at least two non-zero components, found {non_zero}")]
    Underdetermined { non_zero: usize },

    #[error("cannot rescale to a zero total while components are non-zero")]
    ZeroTarget,

    #[error("component {index} is negative ({value})")]
    NegativeComponent { index: usize, value: i32 },

    #[error("target sum {target} is not reachable in units of {unit}")]
    UnreachableTarget { target: i32, unit: i32 },
}

/// The ideal vector violates a strategy's declared precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ideal vector is unsuitable for '{strategy}' (rule {rule}): {detail}")]
pub struct UnsuitableError {
    pub strategy: String,
    pub rule: SuitabilityRule,
    pub detail: String,
}

impl UnsuitableError {
    pub fn new(strategy: &str, rule: SuitabilityRule, detail: impl Into<String>) -> Self {
        Self {
            strategy: strategy.to_string(),
            rule,
            detail: detail.into(),
        }
    }

    /// Machine-readable rule identifier (e.g. `"max_zero_values"`).
    pub fn rule_id(&self) -> &'static str {
        self.rule.id()
    }
}

/// Failures raised while generating pairs for one ideal vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Unsuitable(#[from] UnsuitableError),

    #[error("rejection sampling exhausted after {attempts} attempts: {context}")]
    Exhausted { context: String, attempts: u32 },

    #[error("invalid ideal vector {ideal:?}: {reason}")]
    InvalidIdeal { ideal: Vec<i32>, reason: String },

    #[error("generated pairs violate a postcondition: {0}")]
    Postcondition(String),

    #[error(transparent)]
    Vector(#[from] VectorError),
}

impl GenerationError {
    pub fn is_unsuitable(&self) -> bool {
        matches!(self, Self::Unsuitable(_))
    }

    /// The violated suitability rule, if this is a suitability failure.
    pub fn rule(&self) -> Option<SuitabilityRule> {
        match self {
            Self::Unsuitable(e) => Some(e.rule),
            _ => None,
        }
    }
}

/// Survey setup failures. Fatal for the survey, never per subject.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("strategy '{0}' is already registered")]
    DuplicateStrategy(String),

    #[error("strategy '{strategy}' requires dimension {expected}, survey has {found}")]
    DimensionMismatch {
        strategy: String,
        expected: usize,
        found: usize,
    },

    #[error("strategy '{strategy}' requires at least {minimum} categories, survey has {found}")]
    DimensionTooSmall {
        strategy: String,
        minimum: usize,
        found: usize,
    },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("cannot parse survey configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can go wrong between a survey configuration and a pair list.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl SurveyError {
    pub fn is_unsuitable(&self) -> bool {
        matches!(self, Self::Generation(e) if e.is_unsuitable())
    }
}
