//! Forced-choice ranking questions over three categories.
//!
//! A question offers three allocations built from one base difference
//! `sign * (2X, -X, -X)` and its two cyclic shifts, so every option moves the
//! same total amount and only the favoured category changes. Two magnitudes
//! and both signs give four questions. A fifth, the awareness check, contains
//! the ideal itself and is placed at a random position. Each ranked question
//! is stored as its three pairwise comparisons.
//!
//! Every component of the ideal must leave room for the largest move, `2X`,
//! in both directions. With three categories a floor of `2X` on each
//! component also keeps the raised one under the total, whatever the total.

use rand::{Rng, RngCore};

use crate::error::GenerationError;
use crate::strategy::{
    ColumnType, ComparisonPair, PairCount, PairOption, PairStrategy, StrategyFamily,
    StrategyInfo, TableColumn, check_ideal,
};
use crate::suitability::{Requirements, check_suitability};
use crate::vector::{add, cyclic_shift};

/// Magnitudes `X` of the base difference.
pub const MAGNITUDES: [i32; 2] = [5, 10];

/// Options per question.
const OPTIONS: usize = 3;

/// Pairwise comparisons a ranked question expands into.
const OPTION_PAIRS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

/// `sign * (2X, -X, -X)`.
fn base_difference(magnitude: i32, sign: i32) -> Vec<i32> {
    vec![2 * magnitude * sign, -magnitude * sign, -magnitude * sign]
}

struct Question {
    options: Vec<(Vec<i32>, String)>,
    awareness_check: bool,
    magnitude: i32,
    sign: i32,
}

impl Question {
    fn shifted(ideal: &[i32], magnitude: i32, sign: i32) -> Self {
        let base = base_difference(magnitude, sign);
        let options = (0..OPTIONS)
            .map(|s| (add(ideal, &cyclic_shift(&base, s)), format!("shift_{s}")))
            .collect();
        Self {
            options,
            awareness_check: false,
            magnitude,
            sign,
        }
    }

    /// The ideal among two non-ideal options; any attentive subject ranks
    /// it first.
    fn awareness(ideal: &[i32]) -> Self {
        let magnitude = MAGNITUDES[0];
        let plus = add(ideal, &base_difference(magnitude, 1));
        let minus = add(ideal, &cyclic_shift(&base_difference(magnitude, -1), 1));
        Self {
            options: vec![
                (ideal.to_vec(), "ideal".to_string()),
                (plus, "plus_shift_0".to_string()),
                (minus, "minus_shift_1".to_string()),
            ],
            awareness_check: true,
            magnitude,
            sign: 0,
        }
    }
}

pub struct PreferenceRankingSurvey;

static PREFERENCE_RANKING_INFO: StrategyInfo = StrategyInfo {
    name: "preference_ranking_survey",
    description: "Ranked three-option questions expanded into pairwise comparisons",
    family: StrategyFamily::Ranking,
    option_labels: ("Ranked higher", "Ranked lower"),
    columns: &[
        TableColumn::new("ranking", ColumnType::Vector, true),
        TableColumn::new("awareness_passed", ColumnType::Text, true),
        TableColumn::new("consistent_rankings", ColumnType::Count, false),
    ],
    requirements: Requirements {
        dimension: Some(3),
        min_component: Some(2 * MAGNITUDES[1]),
        ..Requirements::NONE
    },
    pair_count: PairCount::Fixed((MAGNITUDES.len() * 2 + 1) * OPTION_PAIRS.len()),
    rounding_unit: None,
};

impl PairStrategy for PreferenceRankingSurvey {
    fn info(&self) -> &StrategyInfo {
        &PREFERENCE_RANKING_INFO
    }

    fn generate_pairs(
        &self,
        ideal: &[i32],
        _pair_count: usize,
        dimension: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ComparisonPair>, GenerationError> {
        check_ideal(ideal, dimension)?;
        check_suitability(self.name(), ideal, &self.info().requirements)?;

        let mut questions: Vec<Question> = MAGNITUDES
            .iter()
            .flat_map(|&m| [1, -1].map(|sign| Question::shifted(ideal, m, sign)))
            .collect();
        let awareness_at = rng.random_range(0..=questions.len());
        questions.insert(awareness_at, Question::awareness(ideal));

        let mut pairs = Vec::with_capacity(questions.len() * OPTION_PAIRS.len());
        for (index, question) in questions.iter().enumerate() {
            for &(i, j) in &OPTION_PAIRS {
                let (a, a_tag) = &question.options[i];
                let (b, b_tag) = &question.options[j];
                pairs.push(
                    ComparisonPair::new(
                        PairOption::new(a.clone(), a_tag.as_str()),
                        PairOption::new(b.clone(), b_tag.as_str()),
                    )
                    .with_meta("question", index)
                    .with_meta("awareness_check", question.awareness_check)
                    .with_meta("magnitude", question.magnitude)
                    .with_meta("sign", question.sign),
                );
            }
        }
        Ok(pairs)
    }
}
