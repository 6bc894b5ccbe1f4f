//! Property-based invariant tests for budget vectors and generated pairs.
//!
//! 1. Rescaling hits the target, keeps zeros, respects the unit
//! 2. Blends keep the budget total
//! 3. Cyclic shift by the dimension is the identity
//! 4. Sampled difference vectors sum to zero and stay in bounds
//! 5. Every built-in strategy emits valid budgets for any suitable ideal

use pairgen_core::sampling::{BoundsMode, DiffSampler, SamplerConfig, random_budget};
use pairgen_core::vector::{add, blend, blend_rounded, cyclic_shift, sub};
use pairgen_core::{check_suitability, registry, rescale, verify_pairs};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ── Strategies ──────────────────────────────────────────────────────────

/// A random budget of `total` over 3 categories.
fn budget3(total: i32) -> impl Strategy<Value = Vec<i32>> {
    (0..=total, 0..=total).prop_map(move |(a, b)| {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        vec![lo, hi - lo, total - hi]
    })
}

fn non_negative_vector() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(0i32..500, 2..6)
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Rescale
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rescale_hits_target_and_keeps_zeros(v in non_negative_vector(), unit in prop::sample::select(vec![1, 5])) {
        let non_zero = v.iter().filter(|&&x| x != 0).count() as i32;
        prop_assume!(non_zero >= 2);
        prop_assume!(non_zero * unit <= 100);
        let out = rescale(&v, 100, unit).unwrap();
        prop_assert_eq!(out.iter().sum::<i32>(), 100);
        for (before, after) in v.iter().zip(&out) {
            prop_assert_eq!(*before == 0, *after == 0);
            prop_assert!(*after >= 0);
            prop_assert_eq!(after % unit, 0);
        }
    }

    #[test]
    fn rescale_is_identity_on_valid_vectors(v in budget3(100)) {
        prop_assume!(v.iter().filter(|&&x| x != 0).count() >= 2);
        prop_assert_eq!(rescale(&v, 100, 1).unwrap(), v);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Blends
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn blend_keeps_total(a in budget3(100), b in budget3(100), w in 0.0f64..=1.0) {
        let out = blend(&a, &b, w);
        prop_assert_eq!(out.iter().sum::<i32>(), 100);
        prop_assert!(out.iter().all(|&x| (0..=100).contains(&x)));
    }

    #[test]
    fn rounded_blend_keeps_total_and_unit(a in budget3(100), b in budget3(100), w in 0.0f64..=1.0) {
        let a: Vec<i32> = a.iter().map(|x| x / 5 * 5).collect();
        let residual = 100 - a.iter().sum::<i32>();
        let mut a = a;
        a[0] += residual;
        let out = blend_rounded(&a, &b, w, 5);
        prop_assert_eq!(out.iter().sum::<i32>(), 100);
        prop_assert!(out.iter().all(|&x| x >= 0 && x % 5 == 0), "{:?}", out);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Cyclic shift
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shift_by_dimension_is_identity(v in prop::collection::vec(-50i32..50, 1..8), k in 0usize..20) {
        let d = v.len();
        prop_assert_eq!(cyclic_shift(&v, d), v.clone());
        prop_assert_eq!(cyclic_shift(&cyclic_shift(&v, k), d - k % d), v);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Difference sampling
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sampled_differences_are_admissible(ideal in budget3(100), seed in any::<u64>()) {
        prop_assume!(ideal.iter().all(|&x| x >= 10));
        let mut rng = StdRng::seed_from_u64(seed);
        let config = SamplerConfig::new(100).with_bounds(BoundsMode::Symmetric);
        let mut sampler = DiffSampler::new(&ideal, config);
        let d = sampler.sample(&mut rng).unwrap();
        prop_assert_eq!(d.iter().sum::<i32>(), 0);
        prop_assert!(add(&ideal, &d).iter().all(|&x| (0..=100).contains(&x)));
        prop_assert!(sub(&ideal, &d).iter().all(|&x| (0..=100).contains(&x)));
    }

    #[test]
    fn random_budgets_are_compositions(dim in 1usize..6, unit in prop::sample::select(vec![1, 5, 10]), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let v = random_budget(&mut rng, dim, 100, unit);
        prop_assert_eq!(v.len(), dim);
        prop_assert_eq!(v.iter().sum::<i32>(), 100);
        prop_assert!(v.iter().all(|&x| x >= 0 && x % unit == 0));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Strategies
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn strategies_emit_valid_budgets(ideal in budget3(100), seed in any::<u64>()) {
        // Keep clear of ideals so lopsided that only unit steps remain.
        prop_assume!(ideal.iter().all(|&x| x >= 10));
        for strategy in registry().iter() {
            if check_suitability(strategy.name(), &ideal, &strategy.info().requirements).is_err() {
                continue;
            }
            let mut rng = StdRng::seed_from_u64(seed);
            let expected = strategy.pair_count(None, 3);
            let pairs = strategy.generate_pairs(&ideal, expected, 3, &mut rng).unwrap();
            prop_assert!(
                verify_pairs(&pairs, expected, 100, strategy.info().rounding_unit).is_ok(),
                "{} {:?}", strategy.name(), ideal
            );
        }
    }
}
