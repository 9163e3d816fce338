use crate::cli::ReadArgs;
use crate::commands::{CommandContext, CommandExecutor};
use anyhow::{Context, Result};
use file_input::native::LocalFile;
use file_input::{get_file_data_uri, get_file_text};
use futures::executor::block_on;

pub struct ReadCommand {
    args: ReadArgs,
}

impl ReadCommand {
    pub fn new(args: ReadArgs) -> Self {
        Self { args }
    }

    fn render(&self) -> Result<String> {
        let file = LocalFile::parse(&self.args.file)?;

        let contents = if self.args.data_uri {
            block_on(get_file_data_uri(&file))
        } else {
            block_on(get_file_text(&file))
        };

        contents.with_context(|| format!("Failed to read {}", file.path().display()))
    }
}

impl CommandExecutor for ReadCommand {
    fn execute(self, _ctx: &CommandContext) -> Result<()> {
        let contents = self.render()?;
        if self.args.data_uri {
            println!("{contents}");
        } else {
            print!("{contents}");
        }
        Ok(())
    }
}
