use std::path::PathBuf;

use pairgen_core::{
    ConfigError, GenerationOutput, StrategyParams, SurveyConfig, SurveyError, registry,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{EXIT_ERROR, fail, format_vector, ideal_or_exit};

pub struct GenerateArgs {
    pub strategy: Option<String>,
    pub ideal: String,
    pub pairs: Option<usize>,
    pub total: Option<i32>,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

pub fn run(args: GenerateArgs) {
    let ideal = ideal_or_exit(&args.ideal);
    let config = build_config(&args, ideal.len()).unwrap_or_else(|e| fail(e.into()));

    let output = generate(&config, &ideal, args.seed).unwrap_or_else(|e| fail(e));

    if args.json {
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: cannot serialize output: {e}");
                std::process::exit(EXIT_ERROR);
            }
        }
    } else {
        print_table(&output, &ideal);
    }
}

/// Survey configuration from `--config`, or from `--strategy` and friends.
/// `--pairs` and `--total` override the file.
pub fn build_config(args: &GenerateArgs, dimension: usize) -> Result<SurveyConfig, ConfigError> {
    let mut config = match (&args.config, &args.strategy) {
        (Some(path), _) => SurveyConfig::load(path)?,
        (None, Some(name)) => {
            SurveyConfig::new(StrategyParams::from_name(name, None)?).with_dimension(dimension)
        }
        (None, None) => {
            return Err(ConfigError::InvalidParameter {
                name: "strategy",
                reason: "either --strategy or --config is required".to_string(),
            });
        }
    };
    if let Some(n) = args.pairs {
        config.params = StrategyParams::from_name(config.params.name(), Some(n))?;
    }
    if let Some(total) = args.total {
        config.total = total;
    }
    Ok(config)
}

fn generate(
    config: &SurveyConfig,
    ideal: &[i32],
    seed: Option<u64>,
) -> Result<GenerationOutput, SurveyError> {
    let survey = config.validate(registry())?;
    let output = match seed {
        Some(seed) => {
            log::info!("seeding generation with {seed}");
            survey.generate(ideal, &mut StdRng::seed_from_u64(seed))?
        }
        None => survey.generate_with_entropy(ideal)?,
    };
    Ok(output)
}

fn print_table(output: &GenerationOutput, ideal: &[i32]) {
    let (label_1, label_2) = output.option_labels;
    println!("Strategy: {}", output.strategy);
    println!("Ideal:    {}", format_vector(ideal));
    println!("Pairs:    {}\n", output.pairs.len());

    println!(
        "  {:>3}  {:<18} {:<18} {:<18} {:<18}",
        "#", label_1, "tag", label_2, "tag"
    );
    for (i, pair) in output.pairs.iter().enumerate() {
        println!(
            "  {:>3}  {:<18} {:<18} {:<18} {:<18}",
            i + 1,
            format_vector(&pair.option_1.vector),
            pair.option_1.tag,
            format_vector(&pair.option_2.vector),
            pair.option_2.tag
        );
    }
}
