use anyhow::Result;
use clap::{CommandFactory, Parser};
use file_input::Config;

mod cli;
mod commands;

// Build info module
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

use cli::Cli;
use commands::CommandContext;

fn default_log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn main() -> Result<()> {
    clap_complete::CompleteEnv::with_factory(|| Cli::command().name("file-input"))
        .completer("file-input")
        .complete();

    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(cli.global.verbose)),
    )
    .init();

    if cli.global.build_info {
        cli::show_build_info();
        return Ok(());
    }

    if cli.global.generate_config {
        let path = Config::default().save(cli.global.config.as_deref())?;
        println!("Generated default configuration at: {}", path.display());
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = CommandContext::load(cli.global.config)?;
    commands::dispatch(command, &ctx)
}
