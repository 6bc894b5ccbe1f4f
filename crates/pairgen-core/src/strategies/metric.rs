//! Metric-comparison strategies.
//!
//! Each pair holds two non-ideal allocations A and B such that A is strictly
//! closer to the ideal under one metric while B is strictly closer under the
//! other, so every answer is a genuine trade-off. Candidates come from the
//! difference sampler; acceptance walks a per-strategy relaxation ladder that
//! lowers the required separation and finally the grid step.

use std::collections::HashSet;

use rand::{Rng, RngCore};

use crate::error::GenerationError;
use crate::sampling::{DEFAULT_MIN_MAGNITUDE, DiffSampler, RelaxationLadder, SamplerConfig};
use crate::strategy::{
    ColumnType, ComparisonPair, PairCount, PairOption, PairStrategy, StrategyFamily,
    StrategyInfo, TableColumn, check_ideal,
};
use crate::suitability::{Requirements, check_suitability};
use crate::vector::{add, canonical_form, l1_distance, l2_distance, leontief_ratio};

/// Attempts spent on each ladder level before relaxing.
pub const ATTEMPTS_PER_LEVEL: u32 = 400;

/// Draws per candidate difference vector.
const SAMPLER_ATTEMPTS: u32 = 100;

/// Largest per-category move away from the ideal.
const MAX_SHIFT: i32 = 40;

/// Distance of an allocation to the ideal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Sum of absolute differences.
    L1,
    /// Sum of squared differences.
    L2,
    /// Minimal ratio to the ideal over funded categories.
    Leontief,
}

impl Metric {
    /// Lower is closer to the ideal.
    pub fn cost(self, option: &[i32], ideal: &[i32]) -> f64 {
        match self {
            Self::L1 => l1_distance(option, ideal) as f64,
            Self::L2 => l2_distance(option, ideal) as f64,
            Self::Leontief => -leontief_ratio(option, ideal),
        }
    }

    /// Provenance tag of the option optimised for this metric.
    pub fn tag(self) -> &'static str {
        match self {
            Self::L1 => "sum_optimized",
            Self::L2 => "squares_optimized",
            Self::Leontief => "ratio_optimized",
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::L1 => "l1",
            Self::L2 => "l2",
            Self::Leontief => "leontief",
        }
    }
}

/// One rung of the ladder: grid step and the minimal cost gap per metric.
#[derive(Debug, Clone, Copy)]
pub struct Level {
    pub step: i32,
    pub l1_gap: f64,
    pub l2_gap: f64,
    pub ratio_gap: f64,
}

impl Level {
    const fn new(step: i32, l1_gap: f64, l2_gap: f64, ratio_gap: f64) -> Self {
        Self {
            step,
            l1_gap,
            l2_gap,
            ratio_gap,
        }
    }

    fn gap(&self, metric: Metric) -> f64 {
        match metric {
            Metric::L1 => self.l1_gap,
            Metric::L2 => self.l2_gap,
            Metric::Leontief => self.ratio_gap,
        }
    }
}

/// A metric pairing and its relaxation ladder.
#[derive(Debug, Clone, Copy)]
pub struct Tradeoff {
    pub first: Metric,
    pub second: Metric,
    pub ladder: &'static [Level],
}

/// `a` beats `b` under `metric` strictly and by at least `gap`.
fn beats(metric: Metric, a: &[i32], b: &[i32], ideal: &[i32], gap: f64) -> bool {
    let (ca, cb) = (metric.cost(a, ideal), metric.cost(b, ideal));
    ca < cb && cb - ca >= gap
}

/// `a` wins on the first metric and `b` wins on the second, both by the
/// level's gap.
fn is_tradeoff(tradeoff: &Tradeoff, level: &Level, a: &[i32], b: &[i32], ideal: &[i32]) -> bool {
    beats(tradeoff.first, a, b, ideal, level.gap(tradeoff.first))
        && beats(tradeoff.second, b, a, ideal, level.gap(tradeoff.second))
}

/// Generate `pair_count` trade-off pairs for `tradeoff`.
///
/// Option 1 is optimised for `first`, option 2 for `second`, then display
/// positions are shuffled; the tags keep the provenance.
pub fn tradeoff_pairs(
    strategy: &str,
    tradeoff: &Tradeoff,
    ideal: &[i32],
    pair_count: usize,
    dimension: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<ComparisonPair>, GenerationError> {
    let total = check_ideal(ideal, dimension)?;
    check_suitability(strategy, ideal, &TRADEOFF_DIMENSION)?;
    let ladder = RelaxationLadder::new(tradeoff.ladder.to_vec(), ATTEMPTS_PER_LEVEL);
    let mut used: HashSet<(Vec<i32>, Vec<i32>)> = HashSet::new();
    let mut pairs = Vec::with_capacity(pair_count);

    for index in 0..pair_count {
        let context = format!("{strategy} pair {index}");
        let ((a, b, key), level) = ladder.run(&context, |level| {
            let config = SamplerConfig::new(total)
                .with_step(level.step)
                .with_magnitude(DEFAULT_MIN_MAGNITUDE, MAX_SHIFT)
                .with_max_attempts(SAMPLER_ATTEMPTS);
            let mut sampler = DiffSampler::new(ideal, config);
            // A dry sampler only fails this attempt; the ladder decides when to give up.
            let (Ok(d1), Ok(d2)) = (sampler.sample(&mut *rng), sampler.sample(&mut *rng)) else {
                return Ok(None);
            };
            let (a, b) = (add(ideal, &d1), add(ideal, &d2));
            let (a, b, d1, d2) = if is_tradeoff(tradeoff, level, &a, &b, ideal) {
                (a, b, d1, d2)
            } else if is_tradeoff(tradeoff, level, &b, &a, ideal) {
                (b, a, d2, d1)
            } else {
                return Ok(None);
            };
            let key = (canonical_form(&d1), canonical_form(&d2));
            if used.contains(&key) {
                return Ok(None);
            }
            Ok(Some((a, b, key)))
        })?;
        used.insert(key);

        let mut pair = ComparisonPair::new(
            PairOption::new(a, tradeoff.first.tag()),
            PairOption::new(b, tradeoff.second.tag()),
        )
        .with_meta("relaxation_level", level)
        .with_meta("metrics", vec![tradeoff.first.id(), tradeoff.second.id()]);
        if rng.random_bool(0.5) {
            pair = pair.swapped();
        }
        pairs.push(pair);
    }
    Ok(pairs)
}

// ---------------------------------------------------------------------------
// Ladders
// ---------------------------------------------------------------------------

/// Step-5 grids first; the last rung falls back to unit steps, strict only.
static L1_LEONTIEF_LADDER: [Level; 3] = [
    Level::new(5, 10.0, 0.0, 0.05),
    Level::new(5, 5.0, 0.0, 0.02),
    Level::new(1, 0.0, 0.0, 0.0),
];

static L2_LEONTIEF_LADDER: [Level; 3] = [
    Level::new(5, 0.0, 100.0, 0.05),
    Level::new(5, 0.0, 25.0, 0.02),
    Level::new(1, 0.0, 0.0, 0.0),
];

// With three categories L1 and L2 only disagree when the larger deviation
// is within ~15% of the smaller one, which a step-5 grid rarely reaches.
static L1_L2_LADDER: [Level; 3] = [
    Level::new(1, 4.0, 20.0, 0.0),
    Level::new(1, 2.0, 10.0, 0.0),
    Level::new(1, 0.0, 0.0, 0.0),
];

// Two categories leave a single trade-off direction, which every metric
// ranks the same way.
const TRADEOFF_DIMENSION: Requirements = Requirements {
    min_dimension: Some(3),
    ..Requirements::NONE
};

const METRIC_REQUIREMENTS: Requirements = Requirements {
    max_zero_values: Some(1),
    ..TRADEOFF_DIMENSION
};

// ---------------------------------------------------------------------------
// 1. L1 vs Leontief
// ---------------------------------------------------------------------------

/// Sum-of-absolute-differences against minimal-ratio closeness.
pub struct L1VsLeontiefComparison;

static L1_VS_LEONTIEF_INFO: StrategyInfo = StrategyInfo {
    name: "l1_vs_leontief_comparison",
    description: "Trade-off pairs: smaller total deviation vs better worst-category ratio",
    family: StrategyFamily::MetricComparison,
    option_labels: ("Sum optimized", "Ratio optimized"),
    columns: &[
        TableColumn::new("sum_optimized", ColumnType::Percentage, true),
        TableColumn::new("ratio_optimized", ColumnType::Percentage, true),
        TableColumn::new("relaxed_pairs", ColumnType::Count, false),
    ],
    requirements: METRIC_REQUIREMENTS,
    pair_count: PairCount::Requested { default: 10 },
    rounding_unit: None,
};

static L1_VS_LEONTIEF: Tradeoff = Tradeoff {
    first: Metric::L1,
    second: Metric::Leontief,
    ladder: &L1_LEONTIEF_LADDER,
};

impl PairStrategy for L1VsLeontiefComparison {
    fn info(&self) -> &StrategyInfo {
        &L1_VS_LEONTIEF_INFO
    }

    fn generate_pairs(
        &self,
        ideal: &[i32],
        pair_count: usize,
        dimension: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError> {
        tradeoff_pairs(self.name(), &L1_VS_LEONTIEF, ideal, pair_count, dimension, rng)
    }
}

// ---------------------------------------------------------------------------
// 2. L1 vs L2
// ---------------------------------------------------------------------------

/// Sum of absolute differences against sum of squared differences.
pub struct L1VsL2Comparison;

static L1_VS_L2_INFO: StrategyInfo = StrategyInfo {
    name: "l1_vs_l2_comparison",
    description: "Trade-off pairs: smaller total deviation vs smaller squared deviation",
    family: StrategyFamily::MetricComparison,
    option_labels: ("Sum optimized", "Squares optimized"),
    columns: &[
        TableColumn::new("sum_optimized", ColumnType::Percentage, true),
        TableColumn::new("squares_optimized", ColumnType::Percentage, true),
        TableColumn::new("relaxed_pairs", ColumnType::Count, false),
    ],
    requirements: TRADEOFF_DIMENSION,
    pair_count: PairCount::Requested { default: 10 },
    rounding_unit: None,
};

static L1_VS_L2: Tradeoff = Tradeoff {
    first: Metric::L1,
    second: Metric::L2,
    ladder: &L1_L2_LADDER,
};

impl PairStrategy for L1VsL2Comparison {
    fn info(&self) -> &StrategyInfo {
        &L1_VS_L2_INFO
    }

    fn generate_pairs(
        &self,
        ideal: &[i32],
        pair_count: usize,
        dimension: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError> {
        tradeoff_pairs(self.name(), &L1_VS_L2, ideal, pair_count, dimension, rng)
    }
}

// ---------------------------------------------------------------------------
// 3. L2 vs Leontief
// ---------------------------------------------------------------------------

/// Sum of squared differences against minimal-ratio closeness.
pub struct L2VsLeontiefComparison;

static L2_VS_LEONTIEF_INFO: StrategyInfo = StrategyInfo {
    name: "l2_vs_leontief_comparison",
    description: "Trade-off pairs: smaller squared deviation vs better worst-category ratio",
    family: StrategyFamily::MetricComparison,
    option_labels: ("Squares optimized", "Ratio optimized"),
    columns: &[
        TableColumn::new("squares_optimized", ColumnType::Percentage, true),
        TableColumn::new("ratio_optimized", ColumnType::Percentage, true),
        TableColumn::new("relaxed_pairs", ColumnType::Count, false),
    ],
    requirements: METRIC_REQUIREMENTS,
    pair_count: PairCount::Requested { default: 10 },
    rounding_unit: None,
};

static L2_VS_LEONTIEF: Tradeoff = Tradeoff {
    first: Metric::L2,
    second: Metric::Leontief,
    ladder: &L2_LEONTIEF_LADDER,
};

impl PairStrategy for L2VsLeontiefComparison {
    fn info(&self) -> &StrategyInfo {
        &L2_VS_LEONTIEF_INFO
    }

    fn generate_pairs(
        &self,
        ideal: &[i32],
        pair_count: usize,
        dimension: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError> {
        tradeoff_pairs(self.name(), &L2_VS_LEONTIEF, ideal, pair_count, dimension, rng)
    }
}
