//! Rejection sampling of difference vectors and random budget vectors.
//!
//! Every sampler has an explicit attempt cap. Running out of attempts yields
//! [`GenerationError::Exhausted`], which signals constraints that are too
//! tight for the given ideal vector or dimension. It is never retried with
//! silently relaxed constraints; strategies that want relaxation walk an
//! explicit [`RelaxationLadder`] and record the level they ended on.

use std::collections::HashSet;

use rand::{Rng, RngCore};

use crate::error::GenerationError;
use crate::vector::{add, canonical_form, cyclic_shift, sub};

/// Attempt cap used when a strategy does not override it.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Minimum `|component|` at least one entry of a difference vector must reach.
pub const DEFAULT_MIN_MAGNITUDE: i32 = 5;

/// Maximum `|component|` of any entry of a difference vector.
pub const DEFAULT_MAX_MAGNITUDE: i32 = 50;

/// Which perturbed allocations must stay inside `[floor, ceiling]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsMode {
    /// `ideal + diff`.
    Forward,
    /// `ideal + diff` and `ideal - diff`.
    Symmetric,
    /// `ideal + shift(diff, k)` for every rotation `k`.
    AllRotations,
}

/// Constraints for [`DiffSampler`].
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub max_attempts: u32,
    pub min_magnitude: i32,
    pub max_magnitude: i32,
    /// Components are drawn as multiples of this step.
    pub step: i32,
    pub floor: i32,
    pub ceiling: i32,
    pub bounds: BoundsMode,
    /// Reject candidates whose canonical form matches one already accepted
    /// by this sampler.
    pub reject_canonical_duplicates: bool,
}

impl SamplerConfig {
    /// Defaults for a budget of `total`: allocations stay in `[0, total]`.
    pub fn new(total: i32) -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_magnitude: DEFAULT_MIN_MAGNITUDE,
            max_magnitude: DEFAULT_MAX_MAGNITUDE,
            step: 1,
            floor: 0,
            ceiling: total,
            bounds: BoundsMode::Forward,
            reject_canonical_duplicates: false,
        }
    }

    pub fn with_bounds(mut self, bounds: BoundsMode) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_step(mut self, step: i32) -> Self {
        self.step = step.max(1);
        self
    }

    pub fn with_magnitude(mut self, min: i32, max: i32) -> Self {
        self.min_magnitude = min;
        self.max_magnitude = max;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn dedupe_canonical(mut self) -> Self {
        self.reject_canonical_duplicates = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Difference vectors
// ---------------------------------------------------------------------------

/// Draws sum-zero difference vectors around one ideal vector.
///
/// The sampler remembers the canonical forms it has handed out, so a batch
/// drawn from one sampler never repeats a structural pattern when
/// [`SamplerConfig::reject_canonical_duplicates`] is set.
pub struct DiffSampler<'a> {
    ideal: &'a [i32],
    config: SamplerConfig,
    /// Per-component range of step units a draw may take.
    draw_box: Vec<(i32, i32)>,
    accepted: HashSet<Vec<i32>>,
}

impl<'a> DiffSampler<'a> {
    pub fn new(ideal: &'a [i32], config: SamplerConfig) -> Self {
        let draw_box = draw_box(ideal, &config);
        Self {
            ideal,
            config,
            draw_box,
            accepted: HashSet::new(),
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Draw one admissible difference vector.
    pub fn sample(&mut self, rng: &mut dyn RngCore) -> Result<Vec<i32>, GenerationError> {
        self.sample_where(rng, |_| true)
    }

    /// Draw one admissible difference vector that also satisfies `accept`.
    pub fn sample_where<F>(
        &mut self,
        rng: &mut dyn RngCore,
        mut accept: F,
    ) -> Result<Vec<i32>, GenerationError>
    where
        F: FnMut(&[i32]) -> bool,
    {
        for _ in 0..self.config.max_attempts {
            let candidate = self.draw(rng);
            if !self.is_admissible(&candidate) || !accept(&candidate) {
                continue;
            }
            if self.config.reject_canonical_duplicates
                && !self.accepted.insert(canonical_form(&candidate))
            {
                continue;
            }
            return Ok(candidate);
        }
        log::debug!(
            "difference sampling exhausted: ideal={:?} attempts={}",
            self.ideal,
            self.config.max_attempts
        );
        Err(GenerationError::Exhausted {
            context: format!("difference vector around ideal {:?}", self.ideal),
            attempts: self.config.max_attempts,
        })
    }

    /// D-1 free components drawn from the admissible box (multiples of
    /// `step`), the last one balancing the sum to zero.
    fn draw(&self, rng: &mut dyn RngCore) -> Vec<i32> {
        let d = self.ideal.len();
        let mut diff = Vec::with_capacity(d);
        for &(lo, hi) in self.draw_box.iter().take(d.saturating_sub(1)) {
            let units = if lo <= hi { rng.random_range(lo..=hi) } else { 0 };
            diff.push(units * self.config.step.max(1));
        }
        let balance: i32 = diff.iter().sum();
        diff.push(-balance);
        diff
    }

    /// Magnitude floor, magnitude cap and allocation bounds.
    pub fn is_admissible(&self, diff: &[i32]) -> bool {
        let c = &self.config;
        if diff.len() != self.ideal.len() || diff.iter().sum::<i32>() != 0 {
            return false;
        }
        if diff.iter().any(|v| v.abs() > c.max_magnitude) {
            return false;
        }
        if !diff.iter().any(|v| v.abs() >= c.min_magnitude.max(1)) {
            return false;
        }
        let within = |v: &[i32]| v.iter().all(|&x| x >= c.floor && x <= c.ceiling);
        match c.bounds {
            BoundsMode::Forward => within(&add(self.ideal, diff)),
            BoundsMode::Symmetric => {
                within(&add(self.ideal, diff)) && within(&sub(self.ideal, diff))
            }
            BoundsMode::AllRotations => {
                (0..diff.len()).all(|k| within(&add(self.ideal, &cyclic_shift(diff, k))))
            }
        }
    }
}

/// Range of step units each component can take without breaking the
/// magnitude cap or the allocation bounds on its own. An empty range is
/// returned as `lo > hi`.
fn draw_box(ideal: &[i32], config: &SamplerConfig) -> Vec<(i32, i32)> {
    let cap = config.max_magnitude.max(0);
    let ranges: Vec<(i32, i32)> = match config.bounds {
        BoundsMode::Forward => ideal
            .iter()
            .map(|&x| (config.floor - x, config.ceiling - x))
            .collect(),
        BoundsMode::Symmetric => ideal
            .iter()
            .map(|&x| {
                let lo = (config.floor - x).max(x - config.ceiling);
                let hi = (config.ceiling - x).min(x - config.floor);
                (lo, hi)
            })
            .collect(),
        BoundsMode::AllRotations => {
            // Every component visits every position.
            let low = ideal.iter().copied().min().unwrap_or(0);
            let high = ideal.iter().copied().max().unwrap_or(0);
            vec![(config.floor - low, config.ceiling - high); ideal.len()]
        }
    };
    let step = config.step.max(1);
    let units: Vec<(i32, i32)> = ranges
        .into_iter()
        .map(|(lo, hi)| {
            let lo = lo.max(-cap);
            let hi = hi.min(cap);
            (-((-lo).div_euclid(step)), hi.div_euclid(step))
        })
        .collect();

    // The components sum to zero, so each one is also bounded by what the
    // others can offset.
    let low_sum: i64 = units.iter().map(|&(lo, _)| i64::from(lo)).sum();
    let high_sum: i64 = units.iter().map(|&(_, hi)| i64::from(hi)).sum();
    units
        .into_iter()
        .map(|(lo, hi)| {
            (
                lo.max(saturate(i64::from(hi) - high_sum)),
                hi.min(saturate(i64::from(lo) - low_sum)),
            )
        })
        .collect()
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

// ---------------------------------------------------------------------------
// Random budget vectors
// ---------------------------------------------------------------------------

/// A uniformly random composition of `total` into `dimension` non-negative
/// parts, each a multiple of `unit` (stars and bars).
pub fn random_budget(rng: &mut dyn RngCore, dimension: usize, total: i32, unit: i32) -> Vec<i32> {
    if dimension == 0 {
        return Vec::new();
    }
    let unit = unit.max(1);
    let slots = (total / unit).max(0) as usize;
    let bars = dimension - 1;
    let mut cuts: Vec<usize> = rand::seq::index::sample(rng, slots + bars, bars).into_vec();
    cuts.sort_unstable();

    let mut parts = Vec::with_capacity(dimension);
    let mut prev: Option<usize> = None;
    for &cut in &cuts {
        let start = prev.map_or(0, |p| p + 1);
        parts.push((cut - start) as i32 * unit);
        prev = Some(cut);
    }
    let start = prev.map_or(0, |p| p + 1);
    parts.push((slots + bars - start) as i32 * unit);
    parts
}

/// Rejection sampler over random budget vectors. Never returns the same
/// vector twice.
pub struct BudgetSampler {
    dimension: usize,
    total: i32,
    unit: i32,
    max_attempts: u32,
    seen: HashSet<Vec<i32>>,
}

impl BudgetSampler {
    pub fn new(dimension: usize, total: i32, unit: i32) -> Self {
        Self {
            dimension,
            total,
            unit: unit.max(1),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seen: HashSet::new(),
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn sample_where<F>(
        &mut self,
        rng: &mut dyn RngCore,
        mut accept: F,
    ) -> Result<Vec<i32>, GenerationError>
    where
        F: FnMut(&[i32]) -> bool,
    {
        for _ in 0..self.max_attempts {
            let candidate = random_budget(rng, self.dimension, self.total, self.unit);
            if self.seen.contains(&candidate) || !accept(&candidate) {
                continue;
            }
            self.seen.insert(candidate.clone());
            return Ok(candidate);
        }
        log::debug!(
            "budget sampling exhausted: dimension={} total={} unit={} attempts={}",
            self.dimension,
            self.total,
            self.unit,
            self.max_attempts
        );
        Err(GenerationError::Exhausted {
            context: format!(
                "random budget vector (dimension {}, total {}, unit {})",
                self.dimension, self.total, self.unit
            ),
            attempts: self.max_attempts,
        })
    }
}

// ---------------------------------------------------------------------------
// Relaxation ladder
// ---------------------------------------------------------------------------

/// An ordered list of progressively weaker acceptance levels.
///
/// [`RelaxationLadder::run`] gives each level its own attempt budget and
/// reports the index of the level that produced a result, so the relaxation
/// actually used can be recorded with the generated pair.
#[derive(Debug, Clone)]
pub struct RelaxationLadder<L> {
    levels: Vec<L>,
    attempts_per_level: u32,
}

impl<L> RelaxationLadder<L> {
    pub fn new(levels: Vec<L>, attempts_per_level: u32) -> Self {
        Self {
            levels,
            attempts_per_level,
        }
    }

    pub fn levels(&self) -> &[L] {
        &self.levels
    }

    pub fn run<T, F>(&self, context: &str, mut attempt: F) -> Result<(T, usize), GenerationError>
    where
        F: FnMut(&L) -> Result<Option<T>, GenerationError>,
    {
        for (index, level) in self.levels.iter().enumerate() {
            for _ in 0..self.attempts_per_level {
                if let Some(found) = attempt(level)? {
                    if index > 0 {
                        log::warn!("{context}: accepted at relaxation level {index}");
                    }
                    return Ok((found, index));
                }
            }
            log::debug!("{context}: relaxation level {index} exhausted");
        }
        let attempts = self
            .attempts_per_level
            .saturating_mul(self.levels.len() as u32);
        log::error!("{context}: every relaxation level exhausted ({attempts} attempts)");
        Err(GenerationError::Exhausted {
            context: context.to_string(),
            attempts,
        })
    }
}
