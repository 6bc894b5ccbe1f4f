use pairgen_core::config::DEFAULT_DIMENSION;
use pairgen_core::registry;

use super::describe_count;

pub fn run() {
    let reg = registry();
    println!("{} registered strategies:\n", reg.len());

    for strategy in reg.iter() {
        let info = strategy.info();
        println!("  {:<34} {}", info.name, info.description);
        println!(
            "  {:<34} family: {}  labels: \"{}\" / \"{}\"  pairs: {}",
            "",
            info.family,
            info.option_labels.0,
            info.option_labels.1,
            describe_count(info.pair_count, DEFAULT_DIMENSION)
        );
        if let Some(unit) = info.rounding_unit {
            println!("  {:<34} multiples of {unit}", "");
        }
        println!();
    }
}
