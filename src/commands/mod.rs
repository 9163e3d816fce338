use crate::cli::Command;
use anyhow::Result;

mod accept;
mod check;
mod completions;
mod context;
mod lookup;
mod pick;
mod read;

pub use accept::AcceptCommand;
pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use context::CommandContext;
pub use lookup::LookupCommand;
pub use pick::PickCommand;
pub use read::ReadCommand;

pub trait CommandExecutor {
    fn execute(self, ctx: &CommandContext) -> Result<()>;
}

pub fn dispatch(command: Command, ctx: &CommandContext) -> Result<()> {
    match command {
        Command::Accept(args) => AcceptCommand::new(args).execute(ctx),
        Command::Lookup(args) => LookupCommand::new(args).execute(ctx),
        Command::Check(args) => CheckCommand::new(args).execute(ctx),
        Command::Pick(args) => PickCommand::new(args).execute(ctx),
        Command::Read(args) => ReadCommand::new(args).execute(ctx),
        Command::Completions(args) => CompletionsCommand::new(args).execute(ctx),
    }
}
