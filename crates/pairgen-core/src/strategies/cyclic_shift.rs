//! Component-symmetry test via cyclic shifts.
//!
//! A group draws two independent difference vectors `d1`, `d2` and shows
//! `ideal + shift(d1, s)` against `ideal + shift(d2, s)` for every rotation
//! `s`. A subject who weighs categories symmetrically answers every pair of a
//! group the same way.

use std::collections::HashSet;

use rand::RngCore;

use crate::error::GenerationError;
use crate::sampling::{BoundsMode, DEFAULT_MIN_MAGNITUDE, DiffSampler, SamplerConfig};
use crate::strategy::{
    ColumnType, ComparisonPair, PairCount, PairOption, PairStrategy, StrategyFamily,
    StrategyInfo, TableColumn, check_ideal,
};
use crate::suitability::{Requirements, check_suitability};
use crate::vector::{add, cyclic_shift};

/// Number of independent difference-vector groups.
pub const GROUPS: usize = 4;

/// Largest per-category move away from the ideal.
const MAX_SHIFT: i32 = 30;

/// Fresh `d1` draws tried before a group gives up.
const GROUP_ATTEMPTS: u32 = 50;

/// Draws tried per sampler, shared by `d1` and its partner `d2`.
const PARTNER_ATTEMPTS: u32 = 200;

pub struct CyclicShift;

static CYCLIC_SHIFT_INFO: StrategyInfo = StrategyInfo {
    name: "cyclic_shift",
    description: "Two difference vectors per group, compared under every cyclic rotation",
    family: StrategyFamily::Structural,
    option_labels: ("First difference", "Second difference"),
    columns: &[
        TableColumn::new("consistent_groups", ColumnType::Count, true),
        TableColumn::new("group_consistency", ColumnType::Percentage, true),
    ],
    requirements: Requirements {
        max_zero_values: Some(0),
        min_dimension: Some(3),
        ..Requirements::NONE
    },
    pair_count: PairCount::ByDimension(|d| GROUPS * d),
    rounding_unit: None,
};

impl PairStrategy for CyclicShift {
    fn info(&self) -> &StrategyInfo {
        &CYCLIC_SHIFT_INFO
    }

    fn generate_pairs(
        &self,
        ideal: &[i32],
        _pair_count: usize,
        dimension: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError> {
        let total = check_ideal(ideal, dimension)?;
        // Rotations move every component into every category, so a zero
        // category leaves no room to move down.
        check_suitability(self.name(), ideal, &self.info().requirements)?;

        let smallest = ideal.iter().copied().min().unwrap_or(0);
        let config = SamplerConfig::new(total)
            .with_bounds(BoundsMode::AllRotations)
            .with_magnitude(DEFAULT_MIN_MAGNITUDE.min(smallest).max(1), MAX_SHIFT)
            .with_max_attempts(PARTNER_ATTEMPTS)
            .dedupe_canonical();

        let mut used: HashSet<(Vec<i32>, Vec<i32>)> = HashSet::new();
        let mut pairs = Vec::with_capacity(GROUPS * dimension);

        for group in 0..GROUPS {
            let (d1, d2) = draw_group(ideal, &config, &used, rng)?;

            for s in 0..dimension {
                let a = add(ideal, &cyclic_shift(&d1, s));
                let b = add(ideal, &cyclic_shift(&d2, s));
                used.insert((a.clone(), b.clone()));
                pairs.push(
                    ComparisonPair::new(
                        PairOption::new(a, format!("diff1_shift_{s}")),
                        PairOption::new(b, format!("diff2_shift_{s}")),
                    )
                    .with_meta("group", group)
                    .with_meta("shift", s),
                );
            }
        }
        Ok(pairs)
    }
}

/// Draw `(d1, d2)` whose rotated pairs are all new to the batch. A `d1`
/// without any usable partner is thrown away and redrawn.
fn draw_group(
    ideal: &[i32],
    config: &SamplerConfig,
    used: &HashSet<(Vec<i32>, Vec<i32>)>,
    rng: &mut dyn RngCore,
) -> Result<(Vec<i32>, Vec<i32>), GenerationError> {
    let dimension = ideal.len();
    for _ in 0..GROUP_ATTEMPTS {
        let mut sampler = DiffSampler::new(ideal, config.clone());
        let Ok(d1) = sampler.sample(&mut *rng) else {
            continue;
        };
        let partner = sampler.sample_where(&mut *rng, |d2| {
            (0..dimension).all(|s| {
                let key = (
                    add(ideal, &cyclic_shift(&d1, s)),
                    add(ideal, &cyclic_shift(d2, s)),
                );
                !used.contains(&key)
            })
        });
        if let Ok(d2) = partner {
            return Ok((d1, d2));
        }
    }
    log::debug!("no fresh cyclic-shift group around {ideal:?}");
    Err(GenerationError::Exhausted {
        context: format!("cyclic-shift group around ideal {ideal:?}"),
        attempts: GROUP_ATTEMPTS,
    })
}
