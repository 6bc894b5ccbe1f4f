//! Sign-symmetry test.
//!
//! Each group draws two difference vectors `v1`, `v2` and asks the same
//! question twice: `ideal + v1` vs `ideal + v2`, then `ideal - v1` vs
//! `ideal - v2`. Linear (symmetric) preferences answer both the same way.

use std::collections::HashSet;

use rand::RngCore;

use crate::error::GenerationError;
use crate::sampling::{BoundsMode, DEFAULT_MIN_MAGNITUDE, DiffSampler, SamplerConfig};
use crate::strategy::{
    ColumnType, ComparisonPair, PairCount, PairOption, PairStrategy, StrategyFamily,
    StrategyInfo, TableColumn, check_ideal,
};
use crate::suitability::{Requirements, check_suitability};
use crate::vector::{add, sub};

/// Number of (v1, v2) groups; each yields a positive and a negative pair.
pub const GROUPS: usize = 6;

const MAX_SHIFT: i32 = 30;

/// Fresh `v1` draws tried before a group gives up.
const GROUP_ATTEMPTS: u32 = 50;

const PARTNER_ATTEMPTS: u32 = 200;

pub struct LinearSymmetry;

static LINEAR_SYMMETRY_INFO: StrategyInfo = StrategyInfo {
    name: "linear_symmetry",
    description: "Each question asked for a direction and for its exact negation",
    family: StrategyFamily::Structural,
    option_labels: ("First direction", "Second direction"),
    columns: &[
        TableColumn::new("symmetric_groups", ColumnType::Count, true),
        TableColumn::new("symmetry_rate", ColumnType::Percentage, true),
    ],
    requirements: Requirements {
        max_zero_values: Some(0),
        min_dimension: Some(3),
        ..Requirements::NONE
    },
    pair_count: PairCount::Fixed(GROUPS * 2),
    rounding_unit: None,
};

impl PairStrategy for LinearSymmetry {
    fn info(&self) -> &StrategyInfo {
        &LINEAR_SYMMETRY_INFO
    }

    fn generate_pairs(
        &self,
        ideal: &[i32],
        _pair_count: usize,
        dimension: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError> {
        let total = check_ideal(ideal, dimension)?;
        check_suitability(self.name(), ideal, &self.info().requirements)?;

        let smallest = ideal.iter().copied().min().unwrap_or(0);
        let config = SamplerConfig::new(total)
            .with_bounds(BoundsMode::Symmetric)
            .with_magnitude(DEFAULT_MIN_MAGNITUDE.min(smallest).max(1), MAX_SHIFT)
            .with_max_attempts(PARTNER_ATTEMPTS)
            .dedupe_canonical();

        let mut used: HashSet<(Vec<i32>, Vec<i32>)> = HashSet::new();
        let mut pairs = Vec::with_capacity(GROUPS * 2);

        for group in 0..GROUPS {
            let (v1, v2) = draw_group(ideal, &config, &used, rng)?;

            let positive = (add(ideal, &v1), add(ideal, &v2));
            let negative = (sub(ideal, &v1), sub(ideal, &v2));
            used.insert(positive.clone());
            used.insert(negative.clone());

            pairs.push(
                ComparisonPair::new(
                    PairOption::new(positive.0, "plus_v1"),
                    PairOption::new(positive.1, "plus_v2"),
                )
                .with_meta("group", group)
                .with_meta("direction", "positive"),
            );
            pairs.push(
                ComparisonPair::new(
                    PairOption::new(negative.0, "minus_v1"),
                    PairOption::new(negative.1, "minus_v2"),
                )
                .with_meta("group", group)
                .with_meta("direction", "negative"),
            );
        }
        Ok(pairs)
    }
}

fn draw_group(
    ideal: &[i32],
    config: &SamplerConfig,
    used: &HashSet<(Vec<i32>, Vec<i32>)>,
    rng: &mut dyn RngCore,
) -> Result<(Vec<i32>, Vec<i32>), GenerationError> {
    for _ in 0..GROUP_ATTEMPTS {
        // Canonical dedupe inside the group also rules out v2 == -v1.
        let mut sampler = DiffSampler::new(ideal, config.clone());
        let Ok(v1) = sampler.sample(&mut *rng) else {
            continue;
        };
        let partner = sampler.sample_where(&mut *rng, |v2| {
            !used.contains(&(add(ideal, &v1), add(ideal, v2)))
                && !used.contains(&(sub(ideal, &v1), sub(ideal, v2)))
        });
        if let Ok(v2) = partner {
            return Ok((v1, v2));
        }
    }
    log::debug!("no fresh sign-symmetry group around {ideal:?}");
    Err(GenerationError::Exhausted {
        context: format!("sign-symmetry group around ideal {ideal:?}"),
        attempts: GROUP_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suitability::SuitabilityRule;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn negative_pair_mirrors_positive_pair() {
        let ideal = [20, 30, 50];
        let mut rng = StdRng::seed_from_u64(10);
        let pairs = LinearSymmetry.generate_pairs(&ideal, 3, 3, &mut rng).unwrap();
        assert_eq!(pairs.len(), 12);
        let twice: Vec<i32> = ideal.iter().map(|x| 2 * x).collect();
        for group in pairs.chunks(2) {
            let (a, b) = (&group[0], &group[1]);
            assert_eq!(a.metadata["direction"], "positive");
            assert_eq!(b.metadata["direction"], "negative");
            assert_eq!(b.option_1.vector, sub(&twice, &a.option_1.vector));
            assert_eq!(b.option_2.vector, sub(&twice, &a.option_2.vector));
        }
    }

    #[test]
    fn every_option_in_range() {
        let ideal = [10, 45, 45];
        let mut rng = StdRng::seed_from_u64(2);
        let pairs = LinearSymmetry.generate_pairs(&ideal, 12, 3, &mut rng).unwrap();
        let keys: HashSet<_> = pairs
            .iter()
            .map(|p| (p.option_1.vector.clone(), p.option_2.vector.clone()))
            .collect();
        assert_eq!(keys.len(), 12);
        for pair in &pairs {
            assert_ne!(pair.option_1.vector, pair.option_2.vector);
            for v in pair.vectors() {
                assert_eq!(v.iter().sum::<i32>(), 100);
                assert!(v.iter().all(|&x| (0..=100).contains(&x)));
            }
        }
    }

    #[test]
    fn tiny_components_fill_every_group() {
        for ideal in [[1, 1, 98], [2, 7, 91], [4, 53, 43], [98, 1, 1]] {
            for seed in 0..5 {
                let mut rng = StdRng::seed_from_u64(seed);
                let pairs = LinearSymmetry.generate_pairs(&ideal, 12, 3, &mut rng).unwrap();
                let keys: HashSet<_> = pairs
                    .iter()
                    .map(|p| (p.option_1.vector.clone(), p.option_2.vector.clone()))
                    .collect();
                assert_eq!(keys.len(), 12, "{ideal:?}");
                for v in pairs.iter().flat_map(|p| p.vectors()) {
                    assert!(v.iter().all(|&x| (0..=100).contains(&x)), "{v:?}");
                }
            }
        }
    }

    #[test]
    fn two_categories_are_unsuitable() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = LinearSymmetry.generate_pairs(&[1, 99], 12, 2, &mut rng).unwrap_err();
        assert_eq!(err.rule(), Some(SuitabilityRule::Dimension));
    }

    #[test]
    fn zero_component_is_unsuitable() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = LinearSymmetry
            .generate_pairs(&[0, 40, 60], 12, 3, &mut rng)
            .unwrap_err();
        assert!(err.is_unsuitable());
        assert_eq!(err.rule(), Some(SuitabilityRule::MaxZeroValues));
    }
}
