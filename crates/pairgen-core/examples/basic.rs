//! Basic pair generation example.
//!
//! Configures a cyclic-shift survey, generates pairs for one ideal vector
//! and prints them.
//!
//! Run: `cargo run --example basic`

use pairgen_core::{StrategyParams, SurveyConfig, registry};

fn main() {
    // Validate once per survey
    let survey = match SurveyConfig::new(StrategyParams::CyclicShift).validate(registry()) {
        Ok(survey) => survey,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };
    println!(
        "Strategy: {} ({} pairs per subject)",
        survey.strategy().info().name,
        survey.pair_count()
    );

    // Generate per subject, seeded from the OS
    let ideal = [20, 30, 50];
    match survey.generate_with_entropy(&ideal) {
        Ok(output) => {
            for pair in &output.pairs {
                println!(
                    "{:?} ({}) vs {:?} ({})",
                    pair.option_1.vector, pair.option_1.tag, pair.option_2.vector, pair.option_2.tag
                );
            }
        }
        Err(e) if e.is_unsuitable() => println!("Ideal {ideal:?} is unsuitable: {e}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}
