mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, line, parse, sync, verify};
use hostsieve_common::{Config, SieveError};
use terminal::{logging, print};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose, commands.quiet);
    let cfg: Config = commands.to_config();
    print::banner(cfg.quiet);

    match run(&commands.command, &cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<SieveError>() {
                Some(err) => error!("{} error: {err}", err.category()),
                None => error!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: &Commands, cfg: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Sync => sync::sync(cfg).await,
        Commands::Parse { export } => parse::parse(cfg, export).await,
        Commands::Verify { export } => verify::verify(cfg, export).await,
        Commands::Line { text } => {
            line::line(text);
            Ok(())
        }
    }
}
