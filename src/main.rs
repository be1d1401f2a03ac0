/*!
 * usps - Main Entry Point
 *
 * usps [-q <msec>] [--summary] [--] [FILE]
 *
 * Reads one command per line from FILE (or stdin) and runs them under a
 * round-robin scheduler with the given quantum.
 */

use miette::IntoDiagnostic;
use tracing::debug;

use usps::config::USAGE;
use usps::{init_tracing, input, session, CliArgs, SchedulerConfig};

fn main() -> miette::Result<()> {
    init_tracing();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        print!("{}", USAGE);
        return Ok(());
    }

    // resolved before anything is launched
    let config = SchedulerConfig::from_env(args.quantum.as_deref())?;
    debug!(quantum_ms = config.quantum().as_millis() as u64, input = ?args.input, "Configuration resolved");

    let commands = input::open(&args.input)?;
    let summary = session::run(config, commands)?;

    if args.summary {
        let json = serde_json::to_string_pretty(&summary).into_diagnostic()?;
        eprintln!("{}", json);
    }
    Ok(())
}
