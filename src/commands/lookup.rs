use crate::cli::LookupArgs;
use crate::commands::{CommandContext, CommandExecutor};
use anyhow::Result;
use itertools::Itertools;

pub struct LookupCommand {
    args: LookupArgs,
}

#[derive(Debug, PartialEq)]
enum Lookup {
    MimeTypes { extension: String, mime_types: Vec<String> },
    Extensions { mime_type: String, extensions: Vec<String> },
}

impl LookupCommand {
    pub fn new(args: LookupArgs) -> Self {
        Self { args }
    }

    fn resolve(&self, ctx: &CommandContext) -> Lookup {
        let token = self.args.token.trim().to_lowercase();

        if token.contains('/') {
            let extensions = ctx.registry().extensions_for(&token);
            return Lookup::Extensions {
                mime_type: token,
                extensions,
            };
        }

        let extension = if token.starts_with('.') {
            token
        } else {
            format!(".{token}")
        };
        let mime_types = ctx.registry().lookup(&extension).unwrap_or_default();
        Lookup::MimeTypes {
            extension,
            mime_types,
        }
    }
}

impl CommandExecutor for LookupCommand {
    fn execute(self, ctx: &CommandContext) -> Result<()> {
        let lookup = self.resolve(ctx);

        if self.args.json {
            let payload = match &lookup {
                Lookup::MimeTypes {
                    extension,
                    mime_types,
                } => serde_json::json!({ "extension": extension, "mime_types": mime_types }),
                Lookup::Extensions {
                    mime_type,
                    extensions,
                } => serde_json::json!({ "mime_type": mime_type, "extensions": extensions }),
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(());
        }

        match lookup {
            Lookup::MimeTypes {
                extension,
                mime_types,
            } => {
                if mime_types.is_empty() {
                    println!("No MIME types known for {extension}.");
                } else {
                    println!("{extension}: {}", mime_types.iter().join(", "));
                }
            }
            Lookup::Extensions {
                mime_type,
                extensions,
            } => {
                if extensions.is_empty() {
                    println!("No extensions known for {mime_type}.");
                } else {
                    println!("{mime_type}: {}", extensions.iter().join(", "));
                }
            }
        }

        Ok(())
    }
}
