//! Weighted-combination strategies (single-peakedness test).
//!
//! Each pair shows a random allocation R next to the blend
//! `w * ideal + (1 - w) * R`. Under single-peaked preferences the blend, being
//! on the segment towards the ideal, should always win. `w` walks from 0.1 to
//! 1.0; 0.5 is asked three times with fresh random vectors as a consistency
//! check, and `w = 1.0` shows the ideal itself.

use rand::RngCore;

use crate::error::GenerationError;
use crate::sampling::BudgetSampler;
use crate::strategy::{
    ColumnType, ComparisonPair, PairCount, PairOption, PairStrategy, StrategyFamily,
    StrategyInfo, TableColumn, check_ideal,
};
use crate::suitability::Requirements;
use crate::vector::{DEFAULT_ROUNDING_UNIT, blend, blend_rounded};

/// Ideal weight per pair, in display order.
pub const WEIGHT_SCHEDULE: [f64; 12] = [
    0.1, 0.2, 0.3, 0.4, 0.5, 0.5, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0,
];

static COLUMNS: [TableColumn; 3] = [
    TableColumn::new("weighted_chosen", ColumnType::Percentage, true),
    TableColumn::new("random_chosen", ColumnType::Percentage, false),
    TableColumn::new("consistent_at_half", ColumnType::Text, true),
];

/// Blend the ideal with fresh random vectors along [`WEIGHT_SCHEDULE`].
///
/// With `unit = Some(u)` the random vectors and blends are multiples of `u`.
/// Random candidates are rejected when the blend collapses onto R, or onto
/// the ideal before `w` reaches 1.
fn weighted_pairs(
    ideal: &[i32],
    dimension: usize,
    unit: Option<i32>,
    rng: &mut dyn RngCore,
) -> Result<Vec<ComparisonPair>, GenerationError> {
    let total = check_ideal(ideal, dimension)?;
    let mut sampler = BudgetSampler::new(dimension, total, unit.unwrap_or(1));
    let mut pairs = Vec::with_capacity(WEIGHT_SCHEDULE.len());

    for &weight in &WEIGHT_SCHEDULE {
        let mut blended = Vec::new();
        let random = sampler.sample_where(rng, |candidate| {
            if candidate == ideal {
                return false;
            }
            let b = match unit {
                Some(u) => blend_rounded(ideal, candidate, weight, u),
                None => blend(ideal, candidate, weight),
            };
            if b == candidate || (weight < 1.0 && b == ideal) {
                return false;
            }
            blended = b;
            true
        })?;
        pairs.push(
            ComparisonPair::new(
                PairOption::new(random, "random"),
                PairOption::new(blended, "weighted"),
            )
            .with_meta("ideal_weight", weight),
        );
    }
    Ok(pairs)
}

// ---------------------------------------------------------------------------
// 1. Integer blend
// ---------------------------------------------------------------------------

pub struct WeightedAverageVector;

static WEIGHTED_AVERAGE_INFO: StrategyInfo = StrategyInfo {
    name: "weighted_average_vector",
    description: "Random allocation vs its blend with the ideal, weights 0.1 to 1.0",
    family: StrategyFamily::WeightedCombination,
    option_labels: ("Random vector", "Weighted average"),
    columns: &COLUMNS,
    requirements: Requirements::NONE,
    pair_count: PairCount::Fixed(WEIGHT_SCHEDULE.len()),
    rounding_unit: None,
};

impl PairStrategy for WeightedAverageVector {
    fn info(&self) -> &StrategyInfo {
        &WEIGHTED_AVERAGE_INFO
    }

    fn generate_pairs(
        &self,
        ideal: &[i32],
        _pair_count: usize,
        dimension: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError> {
        weighted_pairs(ideal, dimension, None, rng)
    }
}

// ---------------------------------------------------------------------------
// 2. Blend rounded to multiples of 5
// ---------------------------------------------------------------------------

pub struct RoundedWeightedAverageVector;

static ROUNDED_WEIGHTED_AVERAGE_INFO: StrategyInfo = StrategyInfo {
    name: "rounded_weighted_average_vector",
    description: "Weighted-average pairs with every amount a multiple of 5",
    family: StrategyFamily::WeightedCombination,
    option_labels: ("Random vector", "Weighted average"),
    columns: &COLUMNS,
    requirements: Requirements::NONE,
    pair_count: PairCount::Fixed(WEIGHT_SCHEDULE.len()),
    rounding_unit: Some(DEFAULT_ROUNDING_UNIT),
};

impl PairStrategy for RoundedWeightedAverageVector {
    fn info(&self) -> &StrategyInfo {
        &ROUNDED_WEIGHTED_AVERAGE_INFO
    }

    fn generate_pairs(
        &self,
        ideal: &[i32],
        _pair_count: usize,
        dimension: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError> {
        weighted_pairs(ideal, dimension, Some(DEFAULT_ROUNDING_UNIT), rng)
    }
}
