//! Temporal preference: the ideal against fresh random allocations, framed as
//! "this year vs next year".

use rand::{Rng, RngCore};

use crate::error::GenerationError;
use crate::sampling::BudgetSampler;
use crate::strategy::{
    ColumnType, ComparisonPair, PairCount, PairOption, PairStrategy, StrategyFamily,
    StrategyInfo, TableColumn, check_ideal,
};
use crate::suitability::Requirements;
use crate::vector::{DEFAULT_ROUNDING_UNIT, composition_count};

pub struct BiennialBudgetPreference;

static BIENNIAL_INFO: StrategyInfo = StrategyInfo {
    name: "biennial_budget_preference",
    description: "Ideal allocation against random allocations, this year vs next year",
    family: StrategyFamily::Temporal,
    option_labels: ("This year", "Next year"),
    columns: &[
        TableColumn::new("ideal_chosen", ColumnType::Percentage, true),
        TableColumn::new("ideal_this_year", ColumnType::Count, false),
    ],
    requirements: Requirements::NONE,
    pair_count: PairCount::Requested { default: 10 },
    rounding_unit: None,
};

/// Rounded allocations when the total allows it and the rounded grid still
/// has room for `pair_count` distinct alternatives, unit steps otherwise.
fn budget_unit(dimension: usize, total: i32, pair_count: usize) -> i32 {
    let coarse = DEFAULT_ROUNDING_UNIT;
    if total % coarse == 0 && composition_count(dimension, total / coarse) > pair_count as u64 {
        coarse
    } else {
        1
    }
}

impl PairStrategy for BiennialBudgetPreference {
    fn info(&self) -> &StrategyInfo {
        &BIENNIAL_INFO
    }

    /// Every unit-step budget except the ideal itself.
    fn max_pairs(&self, dimension: usize, total: i32) -> Option<usize> {
        let budgets = composition_count(dimension, total).saturating_sub(1);
        Some(usize::try_from(budgets).unwrap_or(usize::MAX))
    }

    fn generate_pairs(
        &self,
        ideal: &[i32],
        pair_count: usize,
        dimension: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError> {
        let total = check_ideal(ideal, dimension)?;
        let unit = budget_unit(dimension, total, pair_count);
        if unit != DEFAULT_ROUNDING_UNIT && total % DEFAULT_ROUNDING_UNIT == 0 {
            log::debug!("{pair_count} pairs exceed the rounded grid, using unit steps");
        }
        let mut sampler = BudgetSampler::new(dimension, total, unit);

        let mut pairs = Vec::with_capacity(pair_count);
        for _ in 0..pair_count {
            let random = sampler.sample_where(rng, |candidate| candidate != ideal)?;
            let ideal_first = rng.random_bool(0.5);
            let (first, second) = if ideal_first {
                (
                    PairOption::new(ideal.to_vec(), "ideal"),
                    PairOption::new(random, "random"),
                )
            } else {
                (
                    PairOption::new(random, "random"),
                    PairOption::new(ideal.to_vec(), "ideal"),
                )
            };
            pairs.push(
                ComparisonPair::new(first, second)
                    .with_meta("ideal_position", if ideal_first { 1 } else { 2 }),
            );
        }
        Ok(pairs)
    }
}
