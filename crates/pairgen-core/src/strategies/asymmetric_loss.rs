//! Identity-asymmetry test.
//!
//! Two categories the subject funds equally are pushed apart by the same
//! amount in both directions: `(+m, -m)` against `(-m, +m)`. With magnitude
//! held equal, any systematic preference reveals a bias for one category's
//! identity rather than for an amount.

use rand::RngCore;

use crate::error::{GenerationError, UnsuitableError};
use crate::strategy::{
    ColumnType, ComparisonPair, PairCount, PairOption, PairStrategy, StrategyFamily,
    StrategyInfo, TableColumn, check_ideal,
};
use crate::suitability::{Requirements, SuitabilityRule};
use crate::vector::{largest_equal_pair, round_to_multiple};

/// Number of magnitude steps, one pair each.
pub const STEPS: usize = 10;

/// Smallest shared value the two categories must have.
pub const MIN_EQUAL_VALUE: i32 = 10;

/// The equal-valued category pair the gains and losses move between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualPairSelection {
    pub first: usize,
    pub second: usize,
    pub value: i32,
    /// `value / STEPS`; pair `k` moves `round(k * step_size)`.
    pub step_size: f64,
}

impl EqualPairSelection {
    /// The pair with the largest equal value `>= MIN_EQUAL_VALUE`, lowest
    /// indices on ties.
    pub fn select(ideal: &[i32]) -> Option<Self> {
        largest_equal_pair(ideal, MIN_EQUAL_VALUE).map(|(first, second, value)| Self {
            first,
            second,
            value,
            step_size: f64::from(value) / STEPS as f64,
        })
    }

    /// Amount moved at step `k` (1-based).
    pub fn magnitude(&self, k: usize) -> i32 {
        round_to_multiple(k as f64 * self.step_size, 1)
    }
}

pub struct AsymmetricLossDistribution;

static ASYMMETRIC_LOSS_INFO: StrategyInfo = StrategyInfo {
    name: "asymmetric_loss_distribution",
    description: "Equal gain/loss between two equally funded categories at 10 magnitudes",
    family: StrategyFamily::Structural,
    option_labels: ("Gain to first category", "Gain to second category"),
    columns: &[
        TableColumn::new("first_category_chosen", ColumnType::Percentage, true),
        TableColumn::new("second_category_chosen", ColumnType::Percentage, true),
        TableColumn::new("switch_magnitude", ColumnType::Count, false),
    ],
    requirements: Requirements {
        min_equal_value_pair: Some(MIN_EQUAL_VALUE),
        ..Requirements::NONE
    },
    pair_count: PairCount::Fixed(STEPS),
    rounding_unit: None,
};

impl PairStrategy for AsymmetricLossDistribution {
    fn info(&self) -> &StrategyInfo {
        &ASYMMETRIC_LOSS_INFO
    }

    fn generate_pairs(
        &self,
        ideal: &[i32],
        _pair_count: usize,
        dimension: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError> {
        check_ideal(ideal, dimension)?;
        let selection = EqualPairSelection::select(ideal).ok_or_else(|| {
            UnsuitableError::new(
                self.name(),
                SuitabilityRule::MinEqualValuePair,
                format!("no two categories share an equal value >= {MIN_EQUAL_VALUE}"),
            )
        })?;
        let EqualPairSelection { first, second, .. } = selection;
        log::debug!(
            "asymmetric loss between categories {first} and {second} (value {}, step {})",
            selection.value,
            selection.step_size
        );

        let pairs = (1..=STEPS)
            .map(|k| {
                let m = selection.magnitude(k);
                let mut gain_first = ideal.to_vec();
                gain_first[first] += m;
                gain_first[second] -= m;
                let mut gain_second = ideal.to_vec();
                gain_second[first] -= m;
                gain_second[second] += m;
                ComparisonPair::new(
                    PairOption::new(gain_first, format!("gain_{first}")),
                    PairOption::new(gain_second, format!("gain_{second}")),
                )
                .with_meta("step_size", selection.step_size)
                .with_meta("magnitude", m)
                .with_meta("categories", vec![first, second])
            })
            .collect();
        Ok(pairs)
    }
}
