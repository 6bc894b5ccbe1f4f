use pairgen_core::{PairStrategy, registry, violations};

use super::{EXIT_ERROR, EXIT_UNSUITABLE, format_vector, ideal_or_exit};

pub fn run(strategy: Option<&str>, ideal: &str) {
    let ideal = ideal_or_exit(ideal);
    let reg = registry();

    match strategy {
        Some(name) => {
            let strategy = match reg.get(name) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(EXIT_ERROR);
                }
            };
            if !report(strategy, &ideal) {
                std::process::exit(EXIT_UNSUITABLE);
            }
        }
        None => {
            println!("Ideal {}:\n", format_vector(&ideal));
            let mut suitable = 0;
            for strategy in reg.iter() {
                let found = violations(&ideal, &strategy.info().requirements);
                if found.is_empty() {
                    suitable += 1;
                    println!("  ok          {}", strategy.name());
                } else {
                    let rules: Vec<&str> = found.iter().map(|v| v.rule.id()).collect();
                    println!("  unsuitable  {:<34} {}", strategy.name(), rules.join(", "));
                }
            }
            println!("\n{suitable}/{} strategies can use this ideal.", reg.len());
        }
    }
}

/// Print the detailed report for one strategy; true when suitable.
fn report(strategy: &dyn PairStrategy, ideal: &[i32]) -> bool {
    let found = violations(ideal, &strategy.info().requirements);
    println!("Strategy: {}", strategy.name());
    println!("Ideal:    {}", format_vector(ideal));
    if found.is_empty() {
        println!("Result:   suitable");
        return true;
    }
    println!("Result:   unsuitable\n");
    for v in &found {
        println!("  {:<22} {}", v.rule.id(), v.detail);
    }
    false
}
