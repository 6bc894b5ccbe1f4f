//! Pair-generation strategy trait, its static descriptor, and the pair record.
//!
//! Every strategy implements the [`PairStrategy`] trait, which provides
//! metadata via [`StrategyInfo`] and the core `generate_pairs` operation.

use std::collections::BTreeMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GenerationError;
use crate::suitability::Requirements;
use crate::vector::{checked_sum, is_valid_budget_default};

/// Family of generation technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyFamily {
    /// Trade-off between two distance metrics to the ideal.
    MetricComparison,
    /// Blends of the ideal with a random allocation.
    WeightedCombination,
    /// Extreme (single-category) allocations and their blends.
    Extreme,
    /// Cyclic shift, sign symmetry, identity asymmetry.
    Structural,
    /// Ranked questions expanded into pairwise comparisons.
    Ranking,
    /// This year vs next year.
    Temporal,
}

impl std::fmt::Display for StrategyFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MetricComparison => write!(f, "metric"),
            Self::WeightedCombination => write!(f, "weighted"),
            Self::Extreme => write!(f, "extreme"),
            Self::Structural => write!(f, "structural"),
            Self::Ranking => write!(f, "ranking"),
            Self::Temporal => write!(f, "temporal"),
        }
    }
}

/// Value type of a reporting column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Percentage,
    Count,
    Ratio,
    Vector,
    Text,
}

/// A derived metric the analysis layer computes for this strategy's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub name: &'static str,
    pub value_type: ColumnType,
    /// Shown emphasised in reports.
    pub highlight: bool,
}

impl TableColumn {
    pub const fn new(name: &'static str, value_type: ColumnType, highlight: bool) -> Self {
        Self {
            name,
            value_type,
            highlight,
        }
    }
}

/// How many pairs a strategy emits.
#[derive(Debug, Clone, Copy)]
pub enum PairCount {
    /// Honour the requested count, falling back to `default`.
    Requested { default: usize },
    /// Always exactly this many; the requested count is ignored.
    Fixed(usize),
    /// Fixed, but depends on the number of categories.
    ByDimension(fn(usize) -> usize),
}

impl PairCount {
    pub fn resolve(self, requested: Option<usize>, dimension: usize) -> usize {
        match self {
            Self::Requested { default } => requested.unwrap_or(default),
            Self::Fixed(n) => n,
            Self::ByDimension(f) => f(dimension),
        }
    }

    pub fn is_fixed(self) -> bool {
        !matches!(self, Self::Requested { .. })
    }
}

/// Immutable strategy descriptor.
///
/// `name` is persisted in survey configurations and must never change once a
/// survey references it.
#[derive(Debug, Clone)]
pub struct StrategyInfo {
    /// Unique identifier (e.g. `"cyclic_shift"`).
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    pub family: StrategyFamily,
    /// Labels for the "option 1 side" and "option 2 side".
    pub option_labels: (&'static str, &'static str),
    /// Reporting columns.
    pub columns: &'static [TableColumn],
    /// Preconditions on the ideal vector.
    pub requirements: Requirements,
    pub pair_count: PairCount,
    /// If set, every emitted component is a multiple of this unit.
    pub rounding_unit: Option<i32>,
}

// ---------------------------------------------------------------------------
// Pair records
// ---------------------------------------------------------------------------

/// One side of a comparison: an allocation and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairOption {
    pub vector: Vec<i32>,
    /// Provenance tag (e.g. `"sum_optimized"`, `"shift_1"`, `"ideal"`).
    pub tag: String,
}

impl PairOption {
    pub fn new(vector: Vec<i32>, tag: impl Into<String>) -> Self {
        Self {
            vector,
            tag: tag.into(),
        }
    }
}

/// Two allocations shown side by side, plus opaque generation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPair {
    pub option_1: PairOption,
    pub option_2: PairOption,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl ComparisonPair {
    pub fn new(option_1: PairOption, option_2: PairOption) -> Self {
        Self {
            option_1,
            option_2,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Same pair with the display positions exchanged.
    pub fn swapped(self) -> Self {
        Self {
            option_1: self.option_2,
            option_2: self.option_1,
            metadata: self.metadata,
        }
    }

    /// Order-insensitive identity of the two allocations.
    pub fn key(&self) -> (Vec<i32>, Vec<i32>) {
        let a = self.option_1.vector.clone();
        let b = self.option_2.vector.clone();
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn vectors(&self) -> [&[i32]; 2] {
        [self.option_1.vector.as_slice(), self.option_2.vector.as_slice()]
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Trait that every generation strategy must implement.
///
/// Preconditions of [`PairStrategy::generate_pairs`]: `ideal` has `dimension`
/// components and satisfies the budget invariant. Suitability has normally
/// been checked by [`crate::suitability`]; strategies that cannot run at all
/// without a property re-check it and fail with
/// [`GenerationError::Unsuitable`].
pub trait PairStrategy: Send + Sync {
    /// Strategy metadata.
    fn info(&self) -> &StrategyInfo;

    /// Generate the ordered pair list for one subject.
    ///
    /// `pair_count` is ignored by strategies with a fixed count.
    fn generate_pairs(
        &self,
        ideal: &[i32],
        pair_count: usize,
        dimension: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError>;

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }

    fn option_labels(&self) -> (&'static str, &'static str) {
        self.info().option_labels
    }

    fn table_columns(&self) -> &'static [TableColumn] {
        self.info().columns
    }

    /// Most distinct pairs the strategy can produce for a survey shape, when
    /// it is bounded by something other than the sampler.
    fn max_pairs(&self, _dimension: usize, _total: i32) -> Option<usize> {
        None
    }

    /// Number of pairs this strategy will emit for a request.
    fn pair_count(&self, requested: Option<usize>, dimension: usize) -> usize {
        self.info().pair_count.resolve(requested, dimension)
    }
}

/// Shared precondition check for `generate_pairs`. Returns the budget total.
pub(crate) fn check_ideal(ideal: &[i32], dimension: usize) -> Result<i32, GenerationError> {
    if ideal.len() != dimension {
        return Err(GenerationError::InvalidIdeal {
            ideal: ideal.to_vec(),
            reason: format!("expected {dimension} categories, got {}", ideal.len()),
        });
    }
    let Some(total) = checked_sum(ideal) else {
        return Err(GenerationError::InvalidIdeal {
            ideal: ideal.to_vec(),
            reason: "component sum overflows".into(),
        });
    };
    if total <= 0 || !is_valid_budget_default(ideal, total) {
        return Err(GenerationError::InvalidIdeal {
            ideal: ideal.to_vec(),
            reason: "components must be non-negative with a positive total".into(),
        });
    }
    Ok(total)
}
