//! Integration tests for pairgen-core.
//!
//! These tests drive the full pipeline:
//! survey config → registry lookup → suitability → generation → verification.

use pairgen_core::sampling::{DiffSampler, SamplerConfig};
use pairgen_core::vector::{all_multiples_of, cyclic_shift, sub};
use pairgen_core::{
    ConfigError, GenerationError, StrategyParams, StrategyRegistry, SuitabilityRule, SurveyConfig,
    SurveyError, VectorError, check_suitability, generate, registry, rescale, verify_pairs,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const IDEALS: [[i32; 3]; 6] = [
    [20, 30, 50],
    [30, 30, 40],
    [10, 45, 45],
    [25, 25, 50],
    [40, 35, 25],
    [15, 70, 15],
];

#[test]
fn every_strategy_emits_valid_budgets() {
    let reg = registry();
    for name in reg.names() {
        let config = SurveyConfig::new(StrategyParams::from_name(name, None).unwrap());
        let survey = config.validate(reg).unwrap();
        let strategy = reg.get(name).unwrap();
        for (seed, ideal) in IDEALS.iter().enumerate() {
            if check_suitability(name, ideal, &strategy.info().requirements).is_err() {
                continue;
            }
            let mut rng = StdRng::seed_from_u64(seed as u64);
            let out = survey
                .generate(ideal, &mut rng)
                .unwrap_or_else(|e| panic!("{name} failed for {ideal:?}: {e}"));
            assert_eq!(out.strategy, name);
            assert_eq!(out.pairs.len(), survey.pair_count(), "{name}");
            for pair in &out.pairs {
                for v in pair.vectors() {
                    assert_eq!(v.iter().sum::<i32>(), 100, "{name}: {v:?}");
                    assert!(v.iter().all(|&x| (0..=100).contains(&x)), "{name}: {v:?}");
                }
            }
        }
    }
}

#[test]
fn rounded_strategies_respect_their_unit() {
    let reg = registry();
    for strategy in reg.iter() {
        let Some(unit) = strategy.info().rounding_unit else {
            continue;
        };
        let mut rng = StdRng::seed_from_u64(17);
        let pairs = strategy
            .generate_pairs(&[33, 33, 34], 12, 3, &mut rng)
            .unwrap();
        for pair in &pairs {
            for v in pair.vectors() {
                assert!(all_multiples_of(v, unit), "{}: {v:?}", strategy.name());
            }
        }
    }
}

#[test]
fn fixed_counts_override_requests() {
    let reg = registry();
    let expected = [
        ("weighted_average_vector", 12),
        ("rounded_weighted_average_vector", 12),
        ("peak_linearity_test", 12),
        ("cyclic_shift", 12),
        ("linear_symmetry", 12),
        ("asymmetric_loss_distribution", 10),
        ("preference_ranking_survey", 15),
    ];
    for (name, count) in expected {
        let strategy = reg.get(name).unwrap();
        assert!(strategy.info().pair_count.is_fixed());
        assert_eq!(strategy.pair_count(Some(3), 3), count, "{name}");
        assert_eq!(strategy.pair_count(None, 3), count, "{name}");
    }
    for name in [
        "l1_vs_leontief_comparison",
        "l1_vs_l2_comparison",
        "l2_vs_leontief_comparison",
        "biennial_budget_preference",
    ] {
        let strategy = reg.get(name).unwrap();
        assert_eq!(strategy.pair_count(Some(7), 3), 7);
        assert_eq!(strategy.pair_count(None, 3), 10);
    }
}

#[test]
fn cyclic_shift_round_trip_and_group_distinctness() {
    let ideal = [20, 30, 50];
    let config = SurveyConfig::new(StrategyParams::CyclicShift);
    let mut rng = StdRng::seed_from_u64(3);
    let out = generate(&config, &ideal, &mut rng).unwrap();
    for group in out.pairs.chunks(3) {
        let d1 = sub(&group[0].option_1.vector, &ideal);
        assert_eq!(cyclic_shift(&d1, 3), d1);
        assert_ne!(group[0].key(), group[1].key());
        assert_ne!(group[0].key(), group[2].key());
        assert_ne!(group[1].key(), group[2].key());
    }
}

#[test]
fn sign_symmetry_negates_exactly() {
    let ideal = [25, 25, 50];
    let config = SurveyConfig::new(StrategyParams::LinearSymmetry);
    let mut rng = StdRng::seed_from_u64(8);
    let out = generate(&config, &ideal, &mut rng).unwrap();
    for group in out.pairs.chunks(2) {
        let (a, b) = (&group[0], &group[1]);
        for i in 0..3 {
            assert_eq!(b.option_1.vector[i], 2 * ideal[i] - a.option_1.vector[i]);
            assert_eq!(b.option_2.vector[i], 2 * ideal[i] - a.option_2.vector[i]);
        }
    }
}

#[test]
fn structural_strategies_reject_zero_components() {
    let mut rng = StdRng::seed_from_u64(0);
    for params in [StrategyParams::CyclicShift, StrategyParams::LinearSymmetry] {
        for ideal in [[0, 50, 50], [50, 0, 50], [0, 0, 100]] {
            let err = generate(&SurveyConfig::new(params.clone()), &ideal, &mut rng).unwrap_err();
            assert!(err.is_unsuitable(), "{params:?} {ideal:?}");
        }
    }
    // The strategy itself refuses, even when called directly.
    let strategy = registry().get("cyclic_shift").unwrap();
    let err = strategy
        .generate_pairs(&[60, 40, 0], 12, 3, &mut rng)
        .unwrap_err();
    assert_eq!(err.rule(), Some(SuitabilityRule::MaxZeroValues));
}

#[test]
fn identity_asymmetry_needs_equal_pair() {
    let mut rng = StdRng::seed_from_u64(0);
    let config = SurveyConfig::new(StrategyParams::AsymmetricLoss);
    for ideal in [[20, 30, 50], [5, 5, 90], [9, 9, 82]] {
        match generate(&config, &ideal, &mut rng) {
            Err(pairgen_core::SurveyError::Generation(GenerationError::Unsuitable(e))) => {
                assert_eq!(e.rule_id(), "min_equal_value_pair");
                assert_eq!(e.strategy, "asymmetric_loss_distribution");
            }
            other => panic!("{ideal:?}: expected unsuitable, got {other:?}"),
        }
    }

    let out = generate(&config, &[30, 30, 40], &mut rng).unwrap();
    assert_eq!(out.pairs[0].metadata["step_size"], 3.0);
    assert_eq!(out.pairs[0].metadata["categories"], serde_json::json!([0, 1]));
}

#[test]
fn blend_scenario() {
    let blended = pairgen_core::vector::blend(&[20, 30, 50], &[40, 40, 20], 0.1);
    assert_eq!(blended, vec![38, 39, 23]);
}

#[test]
fn rescale_scenarios() {
    assert_eq!(rescale(&[40, 0, 60], 100, 1).unwrap(), vec![40, 0, 60]);

    let v = rescale(&[7, 0, 13], 100, 1).unwrap();
    assert_eq!(v.iter().sum::<i32>(), 100);
    assert_eq!(v[1], 0);

    assert_eq!(
        rescale(&[0, 0, 10], 100, 1),
        Err(VectorError::Underdetermined { non_zero: 1 })
    );
}

#[test]
fn registry_is_closed_to_unknown_names() {
    let err = SurveyConfig::from_json(r#"{"params": {"strategy": "l3_comparison"}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownStrategy(_)));

    // A registry without the strategy rejects an otherwise valid config.
    let empty = StrategyRegistry::new();
    let config = SurveyConfig::new(StrategyParams::CyclicShift);
    assert!(matches!(
        config.validate(&empty),
        Err(ConfigError::UnknownStrategy(ref n)) if n == "cyclic_shift"
    ));
}

#[test]
fn metric_pairs_record_relaxation() {
    let config = SurveyConfig::from_json(
        r#"{"params": {"strategy": "l2_vs_leontief_comparison", "num_pairs": 6}}"#,
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(21);
    let out = generate(&config, &[30, 30, 40], &mut rng).unwrap();
    assert_eq!(out.pairs.len(), 6);
    for pair in &out.pairs {
        let level = pair.metadata["relaxation_level"].as_u64().unwrap();
        assert!(level <= 2);
        assert_eq!(pair.metadata["metrics"], serde_json::json!(["l2", "leontief"]));
    }
}

#[test]
fn ranking_awareness_contains_ideal() {
    let ideal = [40, 30, 30];
    let config = SurveyConfig::new(StrategyParams::PreferenceRanking);
    let mut rng = StdRng::seed_from_u64(2);
    let out = generate(&config, &ideal, &mut rng).unwrap();
    let awareness: Vec<_> = out
        .pairs
        .iter()
        .filter(|p| p.metadata["awareness_check"] == true)
        .collect();
    assert_eq!(awareness.len(), 3);
    assert!(awareness.iter().any(|p| p.option_1.vector == ideal));
}

#[test]
fn output_serializes_for_the_presentation_layer() {
    let config = SurveyConfig::new(StrategyParams::Biennial { num_pairs: Some(2) });
    let mut rng = StdRng::seed_from_u64(4);
    let out = generate(&config, &[20, 30, 50], &mut rng).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["strategy"], "biennial_budget_preference");
    assert_eq!(json["option_labels"], serde_json::json!(["This year", "Next year"]));
    assert_eq!(json["pairs"].as_array().unwrap().len(), 2);
    assert!(json["pairs"][0]["metadata"]["ideal_position"].is_u64());
}

#[test]
fn two_category_tradeoffs_are_unsuitable() {
    // L1 and L2 both grow with the single deviation, so no trade-off exists.
    let strategy = registry().get("l1_vs_l2_comparison").unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let err = strategy
        .generate_pairs(&[50, 50], 1, 2, &mut rng)
        .unwrap_err();
    assert_eq!(err.rule(), Some(SuitabilityRule::Dimension), "{err:?}");
}

#[test]
fn exhaustion_surfaces_as_error() {
    // Every move must reach 40 while none may exceed 30.
    let ideal = [20, 30, 50];
    let config = SamplerConfig::new(100)
        .with_magnitude(40, 30)
        .with_max_attempts(50);
    let mut sampler = DiffSampler::new(&ideal, config);
    let err = sampler
        .sample(&mut StdRng::seed_from_u64(5))
        .unwrap_err();
    assert!(
        matches!(err, GenerationError::Exhausted { attempts: 50, .. }),
        "{err:?}"
    );
}

#[test]
fn overflowing_ideal_is_invalid() {
    let config = SurveyConfig::new(StrategyParams::L1VsL2 { num_pairs: Some(1) });
    let mut rng = StdRng::seed_from_u64(1);
    let err = generate(&config, &[i32::MAX, 1, 0], &mut rng).unwrap_err();
    assert!(
        matches!(err, SurveyError::Generation(GenerationError::InvalidIdeal { .. })),
        "{err:?}"
    );
}

#[test]
fn structural_strategies_serve_every_suitable_budget() {
    let reg = registry();
    for name in ["cyclic_shift", "linear_symmetry"] {
        let strategy = reg.get(name).unwrap();
        let requirements = &strategy.info().requirements;
        let expected = strategy.pair_count(None, 3);
        let mut served = 0;
        for a in 0..=100 {
            for b in 0..=100 - a {
                let ideal = [a, b, 100 - a - b];
                if check_suitability(name, &ideal, requirements).is_err() {
                    continue;
                }
                let mut rng = StdRng::seed_from_u64((a * 101 + b) as u64);
                let pairs = strategy
                    .generate_pairs(&ideal, expected, 3, &mut rng)
                    .unwrap_or_else(|e| panic!("{name} failed for {ideal:?}: {e}"));
                assert!(
                    verify_pairs(&pairs, expected, 100, None).is_ok(),
                    "{name} {ideal:?}"
                );
                served += 1;
            }
        }
        // Budgets of 100 over three categories with no zero component.
        assert_eq!(served, 4851, "{name}");
    }
}
