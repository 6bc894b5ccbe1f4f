//! Extreme-vector comparisons (peak-linearity test).
//!
//! First every pair of "pure" allocations (the whole budget on one category)
//! is compared, which yields the subject's ranking of the extremes. Then the
//! same pairs are shown pulled towards the ideal at 25/50/75% ideal weight;
//! a subject whose preferences are linear around the peak keeps the same
//! ranking at every blend level.

use rand::RngCore;

use crate::error::GenerationError;
use crate::strategy::{
    ColumnType, ComparisonPair, PairCount, PairOption, PairStrategy, StrategyFamily,
    StrategyInfo, TableColumn, check_ideal,
};
use crate::suitability::Requirements;
use crate::vector::{blend, extreme_vector};

/// Ideal weights of the blended rounds.
pub const BLEND_WEIGHTS: [f64; 3] = [0.25, 0.5, 0.75];

/// Unordered pairs `(j, k)`, `j < k`, in lexicographic order.
fn extreme_pairs(dimension: usize) -> Vec<(usize, usize)> {
    (0..dimension)
        .flat_map(|j| ((j + 1)..dimension).map(move |k| (j, k)))
        .collect()
}

fn pair_count_for(dimension: usize) -> usize {
    dimension * dimension.saturating_sub(1) / 2 * (1 + BLEND_WEIGHTS.len())
}

pub struct PeakLinearityTest;

static PEAK_LINEARITY_INFO: StrategyInfo = StrategyInfo {
    name: "peak_linearity_test",
    description: "Pure single-category allocations, then the same pairs blended with the ideal",
    family: StrategyFamily::Extreme,
    option_labels: ("First extreme", "Second extreme"),
    columns: &[
        TableColumn::new("extreme_ranking", ColumnType::Text, true),
        TableColumn::new("consistent_blends", ColumnType::Count, true),
        TableColumn::new("transitive", ColumnType::Text, false),
    ],
    requirements: Requirements::NONE,
    pair_count: PairCount::ByDimension(pair_count_for),
    rounding_unit: None,
};

impl PairStrategy for PeakLinearityTest {
    fn info(&self) -> &StrategyInfo {
        &PEAK_LINEARITY_INFO
    }

    fn generate_pairs(
        &self,
        ideal: &[i32],
        _pair_count: usize,
        dimension: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError> {
        let total = check_ideal(ideal, dimension)?;
        let extremes: Vec<Vec<i32>> = (0..dimension)
            .map(|i| extreme_vector(dimension, i, total))
            .collect();
        let index_pairs = extreme_pairs(dimension);
        let mut pairs = Vec::with_capacity(pair_count_for(dimension));

        for &(j, k) in &index_pairs {
            pairs.push(
                ComparisonPair::new(
                    PairOption::new(extremes[j].clone(), format!("extreme_{j}")),
                    PairOption::new(extremes[k].clone(), format!("extreme_{k}")),
                )
                .with_meta("extremes", vec![j, k])
                .with_meta("ideal_weight", 0.0),
            );
        }

        for &weight in &BLEND_WEIGHTS {
            for &(j, k) in &index_pairs {
                pairs.push(
                    ComparisonPair::new(
                        PairOption::new(blend(ideal, &extremes[j], weight), format!("blend_{j}")),
                        PairOption::new(blend(ideal, &extremes[k], weight), format!("blend_{k}")),
                    )
                    .with_meta("extremes", vec![j, k])
                    .with_meta("ideal_weight", weight),
                );
            }
        }

        log::debug!(
            "peak linearity: {} extreme pairs x {} rounds",
            index_pairs.len(),
            1 + BLEND_WEIGHTS.len()
        );
        Ok(pairs)
    }
}
