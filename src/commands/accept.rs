use crate::cli::AcceptArgs;
use crate::commands::{CommandContext, CommandExecutor};
use anyhow::Result;
use file_input::AcceptanceSet;

pub struct AcceptCommand {
    args: AcceptArgs,
}

impl AcceptCommand {
    pub fn new(args: AcceptArgs) -> Self {
        Self { args }
    }

    fn expand(&self, ctx: &CommandContext) -> AcceptanceSet {
        ctx.registry().expand_acceptance(&self.args.tokens)
    }

    fn json_payload(&self, acceptance: &AcceptanceSet) -> serde_json::Value {
        serde_json::json!({
            "tokens": self.args.tokens,
            "accepted": acceptance,
            "extensions": acceptance.extensions().collect::<Vec<_>>(),
            "accept_attribute": acceptance.accept_attribute(),
        })
    }
}

impl CommandExecutor for AcceptCommand {
    fn execute(self, ctx: &CommandContext) -> Result<()> {
        let acceptance = self.expand(ctx);

        if self.args.json {
            let payload = self.json_payload(&acceptance);
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(());
        }

        if acceptance.is_empty() {
            println!("No known extension or MIME type matches; every file would be accepted.");
            return Ok(());
        }

        for token in acceptance.iter() {
            println!("{token}");
        }
        println!("\naccept=\"{}\"", acceptance.accept_attribute());

        Ok(())
    }
}
