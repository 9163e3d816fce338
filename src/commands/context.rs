use anyhow::Result;
use file_input::{Config, SelectionOptions, TypeRegistry};
use std::path::PathBuf;

/// Loaded configuration and the type registry built from it.
#[derive(Debug)]
pub struct CommandContext {
    config: Config,
    registry: TypeRegistry,
}

impl CommandContext {
    pub fn new(config: Config) -> Self {
        let registry = config.registry();
        Self { config, registry }
    }

    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        Ok(Self::new(Config::load(config_path)?))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Options for a new controller; empty `accept` falls back to the
    /// configured `[selection]` list.
    pub fn selection_options(&self, accept: &[String], multi: bool) -> SelectionOptions {
        let accept = if accept.is_empty() {
            self.config.selection.accept.clone()
        } else {
            accept.to_vec()
        };

        SelectionOptions {
            multi: multi || self.config.selection.multi,
            accept,
        }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
