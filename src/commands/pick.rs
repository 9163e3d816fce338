use crate::cli::PickArgs;
use crate::commands::{CommandContext, CommandExecutor};
use anyhow::Result;
use file_input::native::CommandPicker;
use file_input::SelectionController;
use futures::executor::block_on;
use log::{debug, info};

pub struct PickCommand {
    args: PickArgs,
}

impl PickCommand {
    pub fn new(args: PickArgs) -> Self {
        Self { args }
    }

    fn picker(&self, ctx: &CommandContext) -> Result<CommandPicker> {
        let picker = match &self.args.picker_command {
            Some(command_line) => {
                CommandPicker::from_command_line(command_line, ctx.config().title.clone())?
            }
            None => CommandPicker::from_config(ctx.config(), self.args.picker.as_deref())?,
        };

        Ok(match &self.args.title {
            Some(title) => picker.with_title(title.clone()),
            None => picker,
        })
    }
}

impl CommandExecutor for PickCommand {
    fn execute(self, ctx: &CommandContext) -> Result<()> {
        let picker = self.picker(ctx)?;
        info!("Using picker `{}`", picker.name());

        let options = ctx.selection_options(&self.args.accept, self.args.multi);
        let mut controller = SelectionController::new(options, ctx.registry(), picker);
        debug!(
            "Opening {} picker for `{}`",
            if controller.is_multi() { "multi-file" } else { "single-file" },
            controller.acceptance().accept_attribute()
        );
        let files = block_on(controller.open(false));
        controller.destroy();

        if files.is_empty() {
            anyhow::bail!("No files selected");
        }

        if self.args.json {
            println!("{}", serde_json::to_string_pretty(&files)?);
        } else {
            for file in &files {
                println!("{}", file.path().display());
            }
        }

        Ok(())
    }
}
