//! All 11 pair-generation strategies.

pub mod asymmetric_loss;
pub mod biennial;
pub mod cyclic_shift;
pub mod linear_symmetry;
pub mod metric;
pub mod peak_linearity;
pub mod preference_ranking;
pub mod weighted;

use crate::strategy::PairStrategy;

/// All built-in strategies. Each is a boxed unit struct.
pub fn all_strategies() -> Vec<Box<dyn PairStrategy>> {
    vec![
        // Metric comparison
        Box::new(metric::L1VsLeontiefComparison),
        Box::new(metric::L1VsL2Comparison),
        Box::new(metric::L2VsLeontiefComparison),
        // Weighted combination
        Box::new(weighted::WeightedAverageVector),
        Box::new(weighted::RoundedWeightedAverageVector),
        // Extreme vectors
        Box::new(peak_linearity::PeakLinearityTest),
        // Structural
        Box::new(cyclic_shift::CyclicShift),
        Box::new(linear_symmetry::LinearSymmetry),
        Box::new(asymmetric_loss::AsymmetricLossDistribution),
        // Ranking
        Box::new(preference_ranking::PreferenceRankingSurvey),
        // Temporal
        Box::new(biennial::BiennialBudgetPreference),
    ]
}
