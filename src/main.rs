use color_eyre::Result;

use marketlens::cli::{handle_version_command, parse_args, run_cli_command, CliCommand};
use marketlens::logging;

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle --version before any initialization
    if command == CliCommand::Version {
        handle_version_command();
    }

    color_eyre::install()?;

    let verbose = match &command {
        CliCommand::Research(args) => args.verbose,
        CliCommand::Health { verbose, .. } => *verbose,
        _ => false,
    };
    logging::init(verbose)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let status = runtime.block_on(run_cli_command(command))?;

    // Drop the runtime first so in-flight tasks are torn down before exit
    drop(runtime);
    std::process::exit(status)
}
