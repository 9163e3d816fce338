use crate::cli::CheckArgs;
use crate::commands::{CommandContext, CommandExecutor};
use anyhow::{Context, Result};
use file_input::host::DragKind;
use file_input::native::{DragGesture, LocalFile, NoPicker, TerminalRegion};
use file_input::{ActiveTreatment, DropOutcome, SelectionController};
use std::io::Read;

pub struct CheckCommand {
    args: CheckArgs,
}

impl CheckCommand {
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }

    fn collect_files(&self) -> Result<Vec<LocalFile>> {
        let mut files = self
            .args
            .files
            .iter()
            .map(|raw| LocalFile::parse(raw))
            .collect::<Result<Vec<_>>>()?;

        if self.args.uri_list {
            let mut payload = String::new();
            std::io::stdin()
                .read_to_string(&mut payload)
                .context("Failed to read uri-list from stdin")?;
            files.extend(LocalFile::from_uri_list(&payload));
        }

        if files.is_empty() {
            anyhow::bail!("No files to check");
        }
        Ok(files)
    }

    /// Drag `files` over a terminal region and drop them.
    fn simulate_drop(
        &self,
        ctx: &CommandContext,
        files: Vec<LocalFile>,
    ) -> (String, DropOutcome<LocalFile>) {
        let options = ctx.selection_options(&self.args.accept, true);
        let mut controller = SelectionController::new(options, ctx.registry(), NoPicker);
        let region = controller.attach_to_drag_area(
            TerminalRegion::new("check"),
            Some(ActiveTreatment::class("drag-over")),
        );

        controller.handle_drag(region, &mut DragGesture::new(DragKind::DragEnter));
        controller.handle_drag(region, &mut DragGesture::new(DragKind::DragOver));
        let outcome = controller.handle_drag(region, &mut DragGesture::drop(files));

        let accept = controller.acceptance().accept_attribute();
        controller.destroy();
        (accept, outcome)
    }
}

impl CommandExecutor for CheckCommand {
    fn execute(self, ctx: &CommandContext) -> Result<()> {
        let files = self.collect_files()?;
        let (accept, outcome) = self.simulate_drop(ctx, files);

        if self.args.json {
            let payload = serde_json::json!({
                "accept": accept,
                "accepted": outcome.accepted,
                "rejected": outcome.rejected,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        } else {
            for file in &outcome.accepted {
                println!("accepted  {}", file.path().display());
            }
            for file in &outcome.rejected {
                println!("rejected  {}", file.path().display());
            }
        }

        if !outcome.rejected.is_empty() {
            anyhow::bail!(
                "{} of {} file(s) rejected",
                outcome.rejected.len(),
                outcome.accepted.len() + outcome.rejected.len()
            );
        }
        Ok(())
    }
}
