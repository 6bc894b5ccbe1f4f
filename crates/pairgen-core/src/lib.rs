//! # pairgen-core
//!
//! **Comparison pairs for budget-allocation preference surveys.**
//!
//! A subject states an *ideal* allocation of a fixed budget across a few
//! categories. `pairgen-core` builds ordered lists of pairs of alternative
//! allocations around that ideal, each list designed to test one property
//! of the subject's preferences: which distance metric they act on, whether
//! preferences are single-peaked, symmetric under rotation or negation, or
//! biased towards a category's identity.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pairgen_core::{StrategyParams, SurveyConfig, registry};
//!
//! // Configure once per survey; unknown names and bad parameters fail here.
//! let config = SurveyConfig::new(StrategyParams::CyclicShift);
//! let survey = config.validate(registry()).unwrap();
//!
//! // Generate per subject.
//! let output = survey.generate_with_entropy(&[20, 30, 50]).unwrap();
//! assert_eq!(output.pairs.len(), 12);
//! ```
//!
//! ## Architecture
//!
//! Survey config → Registry lookup → Suitability → Strategy → Verification
//!
//! Every strategy implements the [`PairStrategy`] trait. Strategies draw their
//! randomness through the bounded samplers in [`sampling`], so generation
//! always terminates: either with pairs or with
//! [`GenerationError::Exhausted`]. An ideal vector a strategy cannot work
//! with is reported as [`GenerationError::Unsuitable`] carrying a
//! machine-readable rule id, which callers treat as a signal to branch the
//! survey flow rather than as a failure.

pub mod config;
pub mod error;
pub mod registry;
pub mod sampling;
pub mod strategies;
pub mod strategy;
pub mod suitability;
pub mod survey;
pub mod vector;

pub use config::{MAX_REQUESTED_PAIRS, StrategyParams, SurveyConfig};
pub use error::{ConfigError, GenerationError, SurveyError, UnsuitableError, VectorError};
pub use registry::{StrategyRegistry, registry};
pub use sampling::{
    BoundsMode, BudgetSampler, DEFAULT_MAX_ATTEMPTS, DiffSampler, RelaxationLadder,
    SamplerConfig,
};
pub use strategies::all_strategies;
pub use strategy::{
    ColumnType, ComparisonPair, PairCount, PairOption, PairStrategy, StrategyFamily,
    StrategyInfo, TableColumn,
};
pub use suitability::{
    Requirements, SuitabilityOverrides, SuitabilityRule, Violation, check_suitability, violations,
};
pub use survey::{GenerationOutput, Survey, generate, verify_pairs};
pub use vector::{DEFAULT_ROUNDING_UNIT, DEFAULT_TOTAL, rescale};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
