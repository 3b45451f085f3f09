use super::context::AppContext;
use crate::cli::Cli;
use crate::commands;
use crate::error::CliError;
use clap::error::ErrorKind;
use clap::Parser;

pub fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // `--help`/`--version` are not usage errors: clap wants them on
        // stdout with exit code 0, not folded into the usage-error path.
        Err(err)
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
        {
            err.print().map_err(|source| CliError::Usage(source.to_string()))?;
            return Ok(());
        }
        Err(err) => return Err(CliError::Usage(err.to_string())),
    };
    init_logging(cli.quiet);

    let context = AppContext {
        quiet: cli.quiet,
        output_dir: cli.output,
        database_path: cli.database,
    };

    commands::convert::run(&context)
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
