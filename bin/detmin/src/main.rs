use std::path::PathBuf;

use detmin::prelude::*;

use tracing::{debug, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{value_parser, Arg, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("detmin")
        .about("Turns an epsilon NFA given as table into a minimal DFA table")
        .arg(
            Arg::new("input")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("table file containing the NFA"),
        )
        .arg(
            Arg::new("output")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("file the minimal DFA is written to"),
        )
        .arg(
            Arg::new("alphabet")
                .long("alphabet")
                .value_parser(["start", "full"])
                .default_value("start")
                .help("determinize over the symbols of the start state or over all symbols"),
        )
        .arg(
            Arg::new("refinement")
                .long("refinement")
                .value_parser(["reference", "strict"])
                .default_value("reference")
                .help("reference counts both initial classes even if one is empty, strict only counts non-empty ones"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
}

fn log_level(verbosity: Option<&str>) -> filter::LevelFilter {
    match verbosity {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    }
}

// stdout is reserved for the confirmation and the diagnostic, logs go to stderr.
// Without `-v`, `RUST_LOG` may still select what is shown.
fn setup_logging(matches: &ArgMatches) {
    let verbosity = matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(String::as_str);
    let env_filter = match verbosity {
        Some(_) => filter::EnvFilter::default().add_directive(log_level(verbosity).into()),
        None => filter::EnvFilter::builder()
            .with_default_directive(log_level(None).into())
            .from_env_lossy(),
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .without_time()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(env_filter))
        .init();

    trace!("logging set up with verbosity {verbosity:?}");
}

fn scope(matches: &ArgMatches) -> AlphabetScope {
    match matches.get_one::<String>("alphabet").map(|s| s.as_str()) {
        Some("full") => AlphabetScope::Full,
        _ => AlphabetScope::StartState,
    }
}

fn rule(matches: &ArgMatches) -> RefinementRule {
    match matches.get_one::<String>("refinement").map(|s| s.as_str()) {
        Some("strict") => RefinementRule::Strict,
        _ => RefinementRule::Reference,
    }
}

fn run(
    input: &PathBuf,
    output: &PathBuf,
    scope: AlphabetScope,
    rule: RefinementRule,
) -> Result<(), TableError> {
    debug!("reading NFA from {}", input.display());
    let (nfa, final_state) = Nfa::try_from_path(input)?;
    debug!("input automaton\n{}", nfa.render());

    let start = std::time::Instant::now();
    let dfa = determinize(&nfa, &final_state, scope);
    info!(
        "subset construction produced {} states in {}µs",
        dfa.size(),
        start.elapsed().as_micros()
    );
    debug!("determinized automaton\n{}", dfa.render());

    let start = std::time::Instant::now();
    let minimal = dfa.minimize_with(rule);
    info!(
        "minimization produced {} states in {}µs",
        minimal.size(),
        start.elapsed().as_micros()
    );
    debug!("minimized automaton\n{}", minimal.render());

    minimal.write_table(output)
}

pub fn main() {
    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) if e.use_stderr() => {
            println!("{e}");
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    setup_logging(&matches);

    let input = matches
        .get_one::<PathBuf>("input")
        .expect("input is a required argument");
    let output = matches
        .get_one::<PathBuf>("output")
        .expect("output is a required argument");

    match run(input, output, scope(&matches), rule(&matches)) {
        Ok(()) => println!("Output written to {}", output.display()),
        Err(e) => {
            println!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{cli, log_level, rule, scope};
    use detmin::prelude::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn verbosity_selects_level() {
        assert_eq!(log_level(None), LevelFilter::WARN);
        assert_eq!(log_level(Some("info")), LevelFilter::INFO);
        assert_eq!(log_level(Some("trace")), LevelFilter::TRACE);

        let matches = cli().try_get_matches_from(["detmin", "-v", "in", "out"]).unwrap();
        assert_eq!(
            matches.get_one::<String>("verbosity").map(String::as_str),
            Some("info")
        );
    }

    #[test]
    fn defaults_follow_the_reference_procedure() {
        let matches = cli().try_get_matches_from(["detmin", "in", "out"]).unwrap();
        assert_eq!(scope(&matches), AlphabetScope::StartState);
        assert_eq!(rule(&matches), RefinementRule::Reference);

        let matches = cli()
            .try_get_matches_from(["detmin", "--alphabet=full", "--refinement=strict", "in", "out"])
            .unwrap();
        assert_eq!(scope(&matches), AlphabetScope::Full);
        assert_eq!(rule(&matches), RefinementRule::Strict);
    }
}
