use crate::cli::{Cli, CompletionsArgs};
use crate::commands::{CommandContext, CommandExecutor};
use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use log::debug;
use std::fs;
use std::io::{self, Write};

pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }
}

impl CommandExecutor for CompletionsCommand {
    fn execute(self, _ctx: &CommandContext) -> Result<()> {
        let CompletionsArgs {
            shell,
            output,
            bin_name,
        } = self.args;

        let Some(path) = output else {
            write_script(shell, bin_name, &mut io::stdout());
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_script(shell, bin_name, &mut file);
        println!("Generated {shell} completions at {}", path.display());

        Ok(())
    }
}

fn write_script(shell: Shell, bin_name: String, out: &mut dyn Write) {
    debug!("Writing {shell} completions for {bin_name}");
    clap_complete::generate(shell, &mut Cli::command(), bin_name, out);
}
