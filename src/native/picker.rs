use super::LocalFile;
use crate::config::{Config, PickerProfile};
use crate::host::{FilePicker, PickerOutcome};
use crate::template::TemplateEngine;
use anyhow::{Context, Result};
use itertools::Itertools;
use log::{debug, info, warn};
use std::process::{Command, Stdio};

const PREFERRED_PICKERS: [&str; 2] = ["zenity", "kdialog"];

/// Runs an external dialog program and reads the chosen paths from its
/// standard output.
#[derive(Debug, Clone)]
pub struct CommandPicker {
    name: String,
    profile: PickerProfile,
    title: String,
    accept: String,
    multiple: bool,
}

impl CommandPicker {
    pub fn new(name: impl Into<String>, profile: PickerProfile, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile,
            title: title.into(),
            accept: String::new(),
            multiple: false,
        }
    }

    /// Picker named by `requested`, or the configured default. `auto`
    /// resolves to the first installed profile.
    pub fn from_config(config: &Config, requested: Option<&str>) -> Result<Self> {
        let requested = requested.unwrap_or(&config.default_picker);
        let name = if requested == "auto" {
            Self::detect_available(config)?
        } else {
            requested.to_string()
        };

        let profile = config
            .get_picker(&name)
            .ok_or_else(|| anyhow::anyhow!("No configuration found for picker: {name}"))?;

        Ok(Self::new(name, profile.clone(), config.title.clone()))
    }

    /// Ad-hoc picker from a shell-style command line.
    pub fn from_command_line(command_line: &str, title: impl Into<String>) -> Result<Self> {
        let mut words = shell_words::split(command_line)
            .with_context(|| format!("Failed to parse picker command `{command_line}`"))?
            .into_iter();
        let command = words
            .next()
            .ok_or_else(|| anyhow::anyhow!("Picker command is empty"))?;

        let profile = PickerProfile {
            command: command.clone(),
            args: words.collect(),
            ..PickerProfile::default()
        };
        Ok(Self::new(command, profile, title))
    }

    pub fn detect_available(config: &Config) -> Result<String> {
        let preferred = PREFERRED_PICKERS
            .iter()
            .copied()
            .filter(|name| config.pickers.contains_key(*name));
        let others = config
            .pickers
            .keys()
            .map(String::as_str)
            .filter(|name| !PREFERRED_PICKERS.contains(name));

        preferred
            .chain(others)
            .find(|name| {
                config
                    .get_picker(name)
                    .is_some_and(|profile| which::which(&profile.command).is_ok())
            })
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No file picker found. Install zenity or kdialog, or add a [pickers] entry."
                )
            })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Program and arguments for the next `show`.
    pub fn command_line(&self) -> (String, Vec<String>) {
        let mut engine = TemplateEngine::new();
        engine
            .set("title", self.title.as_str())
            .set("accept", self.accept.as_str())
            .set("patterns", patterns_for(&self.accept));

        let mut args = Vec::new();
        if self.multiple {
            args.extend(engine.render_args(&self.profile.multi_args));
        }
        args.extend(engine.render_args(&self.profile.args));

        (self.profile.command.clone(), args)
    }

    fn run(&self) -> Result<Vec<LocalFile>> {
        let (command, args) = self.command_line();
        debug!("Running picker `{command}` with {args:?}");

        let output = Command::new(&command)
            .args(&args)
            .envs(&self.profile.env)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("Failed to spawn picker command `{command}`"))?;

        if !output.status.success() {
            info!(
                "Picker `{}` exited with status {:?}",
                self.name,
                output.status.code()
            );
            return Ok(Vec::new());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(self.parse_selection(&stdout))
    }

    fn parse_selection(&self, stdout: &str) -> Vec<LocalFile> {
        let separator = match self.profile.separator.as_str() {
            "" => "\n",
            separator => separator,
        };

        stdout
            .split(separator)
            .map(|entry| entry.trim_end_matches(['\r', '\n']))
            .filter(|entry| !entry.trim().is_empty())
            .filter_map(|entry| match LocalFile::parse(entry) {
                Ok(file) => Some(file),
                Err(err) => {
                    warn!("Ignoring picker output `{entry}`: {err}");
                    None
                }
            })
            .collect()
    }
}

impl FilePicker for CommandPicker {
    type File = LocalFile;

    fn configure(&mut self, accept: &str, multiple: bool) {
        self.accept = accept.to_string();
        self.multiple = multiple;
    }

    fn show(&mut self) -> Option<PickerOutcome<LocalFile>> {
        let files = self.run().unwrap_or_else(|err| {
            warn!("{err:#}");
            Vec::new()
        });

        if files.is_empty() {
            info!("Picker `{}` returned no selection", self.name);
        }
        Some(PickerOutcome::from_files(files))
    }

    fn reset(&mut self) {
        debug!("Picker `{}` keeps no selection between runs", self.name);
    }
}

/// Glob patterns for the dialog's filter, `*` when everything is accepted.
fn patterns_for(accept: &str) -> String {
    let patterns = accept
        .split(',')
        .map(str::trim)
        .filter_map(|token| token.strip_prefix('.'))
        .filter(|extension| !extension.is_empty())
        .map(|extension| format!("*.{extension}"))
        .join(" ");

    if patterns.is_empty() {
        "*".to_string()
    } else {
        patterns
    }
}
