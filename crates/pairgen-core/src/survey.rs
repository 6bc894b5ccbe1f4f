//! Generation entry point for one configured survey.
//!
//! [`Survey::generate`] wraps a strategy's `generate_pairs` with the checks
//! every caller needs: the ideal vector is validated, suitability is checked
//! against the survey's effective requirements, and the output is verified
//! before it is handed back.

use std::collections::HashSet;
use std::time::Instant;

use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::SurveyConfig;
use crate::error::{GenerationError, SurveyError};
use crate::registry::registry;
use crate::strategy::{ComparisonPair, PairStrategy, check_ideal};
use crate::suitability::{Requirements, check_suitability};
use crate::vector::{all_multiples_of, is_valid_budget_default};

/// Pairs generated for one subject, ready for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutput {
    pub strategy: &'static str,
    /// Labels for the option 1 and option 2 sides.
    pub option_labels: (&'static str, &'static str),
    pub pairs: Vec<ComparisonPair>,
}

/// A validated survey configuration bound to its strategy.
pub struct Survey<'r> {
    config: SurveyConfig,
    strategy: &'r dyn PairStrategy,
    requirements: Requirements,
}

impl<'r> Survey<'r> {
    pub(crate) fn new(
        config: SurveyConfig,
        strategy: &'r dyn PairStrategy,
        requirements: Requirements,
    ) -> Self {
        Self {
            config,
            strategy,
            requirements,
        }
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    pub fn strategy(&self) -> &'r dyn PairStrategy {
        self.strategy
    }

    /// Strategy requirements with the survey's overrides applied.
    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    /// Number of pairs each subject will see.
    pub fn pair_count(&self) -> usize {
        self.strategy
            .pair_count(self.config.params.num_pairs(), self.config.dimension)
    }

    /// Generate the pair list for one subject's ideal vector.
    pub fn generate(
        &self,
        ideal: &[i32],
        rng: &mut dyn RngCore,
    ) -> Result<GenerationOutput, GenerationError> {
        let name = self.strategy.name();
        let dimension = self.config.dimension;
        let total = check_ideal(ideal, dimension)?;
        if total != self.config.total {
            return Err(GenerationError::InvalidIdeal {
                ideal: ideal.to_vec(),
                reason: format!("sums to {total}, survey total is {}", self.config.total),
            });
        }
        check_suitability(name, ideal, &self.requirements)?;

        let expected = self.pair_count();
        log::debug!("generating {expected} pairs with '{name}' for ideal {ideal:?}");
        let started = Instant::now();
        let pairs = match self.strategy.generate_pairs(ideal, expected, dimension, rng) {
            Ok(pairs) => pairs,
            Err(e) => {
                if matches!(e, GenerationError::Exhausted { .. }) {
                    log::error!("'{name}' exhausted its retry budget for ideal {ideal:?}: {e}");
                }
                return Err(e);
            }
        };

        verify_pairs(
            &pairs,
            expected,
            total,
            self.strategy.info().rounding_unit,
        )?;
        log::debug!(
            "'{name}' produced {} pairs in {:.1} ms",
            pairs.len(),
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(GenerationOutput {
            strategy: name,
            option_labels: self.strategy.option_labels(),
            pairs,
        })
    }

    /// [`Survey::generate`] with a fresh OS-seeded random source.
    pub fn generate_with_entropy(&self, ideal: &[i32]) -> Result<GenerationOutput, GenerationError> {
        let mut rng = StdRng::from_os_rng();
        self.generate(ideal, &mut rng)
    }
}

/// Check a strategy's output: the pair count, the budget invariant on every
/// option, the rounding unit if one is declared, and that no pair repeats
/// another or compares an allocation with itself.
pub fn verify_pairs(
    pairs: &[ComparisonPair],
    expected: usize,
    total: i32,
    rounding_unit: Option<i32>,
) -> Result<(), GenerationError> {
    if pairs.len() != expected {
        return Err(GenerationError::Postcondition(format!(
            "expected {expected} pairs, got {}",
            pairs.len()
        )));
    }
    let mut seen = HashSet::with_capacity(pairs.len());
    for (index, pair) in pairs.iter().enumerate() {
        for vector in pair.vectors() {
            if !is_valid_budget_default(vector, total) {
                return Err(GenerationError::Postcondition(format!(
                    "pair {index}: {vector:?} is not a budget of {total}"
                )));
            }
            if let Some(unit) = rounding_unit {
                if !all_multiples_of(vector, unit) {
                    return Err(GenerationError::Postcondition(format!(
                        "pair {index}: {vector:?} is not in multiples of {unit}"
                    )));
                }
            }
        }
        if pair.option_1.vector == pair.option_2.vector {
            return Err(GenerationError::Postcondition(format!(
                "pair {index} compares {:?} with itself",
                pair.option_1.vector
            )));
        }
        if !seen.insert((&pair.option_1.vector, &pair.option_2.vector)) {
            return Err(GenerationError::Postcondition(format!(
                "pair {index} repeats an earlier pair"
            )));
        }
    }
    Ok(())
}

/// Validate `config` against the shared registry and generate for `ideal`.
pub fn generate(
    config: &SurveyConfig,
    ideal: &[i32],
    rng: &mut dyn RngCore,
) -> Result<GenerationOutput, SurveyError> {
    let survey = config.validate(registry())?;
    Ok(survey.generate(ideal, rng)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyParams;
    use crate::strategy::PairOption;
    use crate::suitability::{SuitabilityOverrides, SuitabilityRule};

    fn pair(a: &[i32], b: &[i32]) -> ComparisonPair {
        ComparisonPair::new(PairOption::new(a.to_vec(), "a"), PairOption::new(b.to_vec(), "b"))
    }

    #[test]
    fn verify_catches_broken_output() {
        let good = vec![pair(&[50, 50], &[40, 60]), pair(&[40, 60], &[50, 50])];
        assert!(verify_pairs(&good, 2, 100, None).is_ok());
        assert!(verify_pairs(&good, 3, 100, None).is_err());
        assert!(verify_pairs(&good, 2, 100, Some(20)).is_err());
        assert!(verify_pairs(&[pair(&[50, 50], &[50, 50])], 1, 100, None).is_err());
        assert!(verify_pairs(&[pair(&[50, 50], &[110, -10])], 1, 100, None).is_err());
        let repeated = vec![pair(&[50, 50], &[40, 60]), pair(&[50, 50], &[40, 60])];
        assert!(verify_pairs(&repeated, 2, 100, None).is_err());
    }

    #[test]
    fn generate_end_to_end() {
        let config = SurveyConfig::new(StrategyParams::WeightedAverage);
        let mut rng = StdRng::seed_from_u64(99);
        let out = generate(&config, &[20, 30, 50], &mut rng).unwrap();
        assert_eq!(out.strategy, "weighted_average_vector");
        assert_eq!(out.option_labels, ("Random vector", "Weighted average"));
        assert_eq!(out.pairs.len(), 12);
    }

    #[test]
    fn same_seed_same_pairs() {
        let config = SurveyConfig::new(StrategyParams::Biennial { num_pairs: Some(5) });
        let survey = config.validate(registry()).unwrap();
        let a = survey
            .generate(&[20, 30, 50], &mut StdRng::seed_from_u64(7))
            .unwrap();
        let b = survey
            .generate(&[20, 30, 50], &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ideal_must_match_survey() {
        let survey = SurveyConfig::new(StrategyParams::PeakLinearity)
            .validate(registry())
            .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        for bad in [&[20, 30][..], &[20, 30, 40], &[-10, 60, 50]] {
            assert!(matches!(
                survey.generate(bad, &mut rng),
                Err(GenerationError::InvalidIdeal { .. })
            ));
        }
    }

    #[test]
    fn suitability_runs_before_generation() {
        let survey = SurveyConfig::new(StrategyParams::AsymmetricLoss)
            .validate(registry())
            .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = survey.generate(&[20, 30, 50], &mut rng).unwrap_err();
        assert_eq!(err.rule(), Some(SuitabilityRule::MinEqualValuePair));

        let strict = SurveyConfig::new(StrategyParams::Biennial { num_pairs: None })
            .with_overrides(SuitabilityOverrides {
                max_zero_values: Some(0),
                ..Default::default()
            });
        let err = generate(&strict, &[0, 50, 50], &mut rng).unwrap_err();
        assert!(err.is_unsuitable());
    }

    #[test]
    fn entropy_seeded_generation() {
        let survey = SurveyConfig::new(StrategyParams::LinearSymmetry)
            .validate(registry())
            .unwrap();
        let out = survey.generate_with_entropy(&[30, 30, 40]).unwrap();
        assert_eq!(out.pairs.len(), 12);
    }
}
