pub mod check;
pub mod generate;
pub mod list;

use pairgen_core::{PairCount, SurveyError};

/// Generation or configuration failed.
pub const EXIT_ERROR: i32 = 1;
/// The ideal vector does not suit the strategy.
pub const EXIT_UNSUITABLE: i32 = 2;

/// Parse a comma-separated ideal vector such as `20,30,50`.
pub fn parse_ideal(s: &str) -> Result<Vec<i32>, String> {
    let ideal = s
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<i32>()
                .map_err(|_| format!("'{part}' is not an integer"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if ideal.len() < 2 {
        return Err(format!(
            "an ideal needs at least 2 categories, got {}",
            ideal.len()
        ));
    }
    Ok(ideal)
}

/// Process exit code for a failed survey operation.
pub fn exit_code(err: &SurveyError) -> i32 {
    if err.is_unsuitable() {
        EXIT_UNSUITABLE
    } else {
        EXIT_ERROR
    }
}

/// Report `err` on stderr and exit with its code.
pub fn fail(err: SurveyError) -> ! {
    if err.is_unsuitable() {
        eprintln!("Unsuitable: {err}");
    } else {
        eprintln!("Error: {err}");
    }
    std::process::exit(exit_code(&err));
}

/// Parse `--ideal` or exit with a usage error.
pub fn ideal_or_exit(s: &str) -> Vec<i32> {
    match parse_ideal(s) {
        Ok(ideal) => ideal,
        Err(e) => {
            eprintln!("Error: invalid --ideal: {e}");
            std::process::exit(EXIT_ERROR);
        }
    }
}

/// Human-readable pair count for listings.
pub fn describe_count(count: PairCount, dimension: usize) -> String {
    match count {
        PairCount::Requested { default } => format!("{default} (default)"),
        PairCount::Fixed(n) => format!("{n} (fixed)"),
        PairCount::ByDimension(f) => format!("{} (fixed, D={dimension})", f(dimension)),
    }
}

/// `[20, 30, 50]` style rendering.
pub fn format_vector(v: &[i32]) -> String {
    let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
