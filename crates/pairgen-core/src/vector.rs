//! Budget-vector arithmetic shared by every strategy.
//!
//! A *budget vector* is an ordered allocation of non-negative integers that
//! sums to a fixed total; a *difference vector* is a signed perturbation that
//! sums to zero. Everything here is a pure function over slices.

use crate::error::VectorError;

/// Default budget total.
pub const DEFAULT_TOTAL: i32 = 100;

/// Default rounding unit for strategies that present rounded allocations.
pub const DEFAULT_ROUNDING_UNIT: i32 = 5;

// ---------------------------------------------------------------------------
// Basic arithmetic
// ---------------------------------------------------------------------------

/// Component sum, saturating at the `i32` range.
pub fn sum(vector: &[i32]) -> i32 {
    vector.iter().fold(0i32, |acc, &x| acc.saturating_add(x))
}

/// Component sum, `None` when it leaves the `i32` range.
pub fn checked_sum(vector: &[i32]) -> Option<i32> {
    vector.iter().try_fold(0i32, |acc, &x| acc.checked_add(x))
}

/// Number of ways to split `units` into `parts` ordered non-negative parts,
/// `C(units + parts - 1, parts - 1)`, saturating at `u64::MAX`.
pub fn composition_count(parts: usize, units: i32) -> u64 {
    if parts == 0 || units < 0 {
        return u64::from(parts == 0 && units == 0);
    }
    let units = units as u64;
    let n = units + parts as u64 - 1;
    let k = (parts as u64 - 1).min(units);
    let mut count: u64 = 1;
    for i in 0..k {
        // C(n, i) * (n - i) is divisible by i + 1.
        count = match count.checked_mul(n - i) {
            Some(c) => c / (i + 1),
            None => return u64::MAX,
        };
    }
    count
}

/// Clamp every component into `[lo, hi]`.
pub fn clamp(vector: &[i32], lo: i32, hi: i32) -> Vec<i32> {
    vector.iter().map(|&x| x.clamp(lo, hi)).collect()
}

/// Component-wise `a + b`.
pub fn add(a: &[i32], b: &[i32]) -> Vec<i32> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

/// Component-wise `a - b`.
pub fn sub(a: &[i32], b: &[i32]) -> Vec<i32> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

pub fn negate(vector: &[i32]) -> Vec<i32> {
    vector.iter().map(|x| -x).collect()
}

pub fn scale(vector: &[i32], factor: i32) -> Vec<i32> {
    vector.iter().map(|x| x * factor).collect()
}

pub fn count_zeros(vector: &[i32]) -> usize {
    vector.iter().filter(|&&x| x == 0).count()
}

/// Round-half-up to the nearest multiple of `unit`.
pub fn round_to_multiple(value: f64, unit: i32) -> i32 {
    let unit = unit.max(1) as f64;
    ((value / unit + 0.5).floor() * unit) as i32
}

/// True if `vector` sums to `total` and every component lies in `[lo, hi]`.
pub fn is_valid_budget(vector: &[i32], total: i32, lo: i32, hi: i32) -> bool {
    checked_sum(vector) == Some(total) && vector.iter().all(|&x| x >= lo && x <= hi)
}

/// [`is_valid_budget`] with the natural range `[0, total]`.
pub fn is_valid_budget_default(vector: &[i32], total: i32) -> bool {
    is_valid_budget(vector, total, 0, total)
}

pub fn all_multiples_of(vector: &[i32], unit: i32) -> bool {
    unit <= 1 || vector.iter().all(|x| x % unit == 0)
}

/// Sorted absolute values.
///
/// Two difference vectors with the same canonical form have the same multiset
/// of magnitudes, i.e. one is a signed permutation of the other.
pub fn canonical_form(vector: &[i32]) -> Vec<i32> {
    let mut form: Vec<i32> = vector.iter().map(|x| x.abs()).collect();
    form.sort_unstable();
    form
}

/// Rotate right by `k` positions. Shifting by `vector.len()` is the identity.
pub fn cyclic_shift(vector: &[i32], k: usize) -> Vec<i32> {
    let mut out = vector.to_vec();
    if !out.is_empty() {
        let k = k % out.len();
        out.rotate_right(k);
    }
    out
}

/// The allocation that puts the whole `total` on category `index`.
pub fn extreme_vector(dimension: usize, index: usize, total: i32) -> Vec<i32> {
    let mut v = vec![0; dimension];
    if index < dimension {
        v[index] = total;
    }
    v
}

/// Index of the largest component, lowest index on ties.
pub fn argmax(vector: &[i32]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &x) in vector.iter().enumerate() {
        match best {
            Some(b) if vector[b] >= x => {}
            _ => best = Some(i),
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Distance metrics against an ideal vector
// ---------------------------------------------------------------------------

/// Sum of absolute differences.
pub fn l1_distance(option: &[i32], ideal: &[i32]) -> i64 {
    option
        .iter()
        .zip(ideal)
        .map(|(a, b)| i64::from((a - b).abs()))
        .sum()
}

/// Sum of squared differences.
pub fn l2_distance(option: &[i32], ideal: &[i32]) -> i64 {
    option
        .iter()
        .zip(ideal)
        .map(|(a, b)| {
            let d = i64::from(a - b);
            d * d
        })
        .sum()
}

/// Leontief score: the minimal ratio `option[i] / ideal[i]` over categories
/// the ideal funds. Higher is closer; `1.0` only for the ideal itself.
pub fn leontief_ratio(option: &[i32], ideal: &[i32]) -> f64 {
    option
        .iter()
        .zip(ideal)
        .filter(|&(_, &i)| i > 0)
        .map(|(&o, &i)| f64::from(o) / f64::from(i))
        .fold(f64::INFINITY, f64::min)
}

// ---------------------------------------------------------------------------
// Equal-value pairs
// ---------------------------------------------------------------------------

/// The pair of categories sharing the largest equal value `>= min_value`.
///
/// Returns `(first, second, value)` with `first < second`. Ties on value go to
/// the lexicographically lowest index pair.
pub fn largest_equal_pair(vector: &[i32], min_value: i32) -> Option<(usize, usize, i32)> {
    let mut best: Option<(usize, usize, i32)> = None;
    for i in 0..vector.len() {
        for j in (i + 1)..vector.len() {
            let v = vector[i];
            if v != vector[j] || v < min_value {
                continue;
            }
            if best.is_none_or(|(_, _, b)| v > b) {
                best = Some((i, j, v));
            }
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Rounding and rescaling
// ---------------------------------------------------------------------------

/// Final corrective step after rounding: push the residual `total - sum` onto
/// the largest component.
pub fn fix_sum(vector: &mut [i32], total: i32) {
    let residual = total - sum(vector);
    if residual == 0 {
        return;
    }
    if let Some(idx) = argmax(vector) {
        vector[idx] += residual;
    }
}

/// Weighted combination `weight_a * a + (1 - weight_a) * b`, rounded to
/// integers. The result keeps the common total of `a` and `b`.
pub fn blend(a: &[i32], b: &[i32], weight_a: f64) -> Vec<i32> {
    blend_rounded(a, b, weight_a, 1)
}

/// [`blend`] with every component forced to a multiple of `unit` and the sum
/// re-normalised to the total of `a`.
pub fn blend_rounded(a: &[i32], b: &[i32], weight_a: f64, unit: i32) -> Vec<i32> {
    let total = sum(a);
    let weight_b = 1.0 - weight_a;
    let rounded: Vec<i32> = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| round_to_multiple(weight_a * f64::from(x) + weight_b * f64::from(y), unit))
        .collect();
    if sum(&rounded) == total {
        return rounded;
    }
    match rescale(&rounded, total, unit) {
        Ok(v) => v,
        Err(_) => {
            let mut v = rounded;
            fix_sum(&mut v, total);
            v
        }
    }
}

/// Proportionally rescale `vector` so it sums to `target_sum`.
///
/// Zeros stay zero. Every originally non-zero component is rounded to a
/// multiple of `unit` with a floor of one unit, then the residual is
/// distributed one unit at a time onto the largest eligible component. A
/// vector that already sums to `target_sum` in whole units is returned
/// unchanged.
pub fn rescale(vector: &[i32], target_sum: i32, unit: i32) -> Result<Vec<i32>, VectorError> {
    let unit = unit.max(1);
    if let Some((index, &value)) = vector.iter().enumerate().find(|&(_, &x)| x < 0) {
        return Err(VectorError::NegativeComponent { index, value });
    }

    let non_zero = vector.iter().filter(|&&x| x != 0).count();
    if target_sum == 0 {
        return if non_zero == 0 {
            Ok(vector.to_vec())
        } else {
            Err(VectorError::ZeroTarget)
        };
    }
    if non_zero < 2 {
        return Err(VectorError::Underdetermined { non_zero });
    }

    let current = sum(vector);
    if current == target_sum && all_multiples_of(vector, unit) {
        return Ok(vector.to_vec());
    }
    if target_sum % unit != 0 || (non_zero as i32) * unit > target_sum {
        return Err(VectorError::UnreachableTarget {
            target: target_sum,
            unit,
        });
    }

    let factor = f64::from(target_sum) / f64::from(current);
    let mut out: Vec<i32> = vector
        .iter()
        .map(|&x| {
            if x == 0 {
                0
            } else {
                round_to_multiple(f64::from(x) * factor, unit).max(unit)
            }
        })
        .collect();

    let mut residual = target_sum - sum(&out);
    while residual != 0 {
        let step = if residual > 0 { unit } else { -unit };
        let mut pick: Option<usize> = None;
        for (i, &x) in out.iter().enumerate() {
            let eligible = x != 0 && (step > 0 || x - unit >= unit);
            if eligible && pick.is_none_or(|p| x > out[p]) {
                pick = Some(i);
            }
        }
        // Eligibility is guaranteed by the reachability check above.
        let Some(idx) = pick else {
            return Err(VectorError::UnreachableTarget {
                target: target_sum,
                unit,
            });
        };
        out[idx] += step;
        residual -= step;
    }
    Ok(out)
}
