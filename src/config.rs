use crate::controller::SelectionOptions;
use crate::types::TypeRegistry;
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "FILE_INPUT_CONFIG";

/// An external program that shows a file selection dialog.
///
/// `args` and `multi_args` may reference `{title}`, `{patterns}` and
/// `{accept}`. The program prints the chosen paths split by `separator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerProfile {
    pub command: String,
    pub args: Vec<String>,
    /// Extra arguments placed before `args` when multi-select is on.
    pub multi_args: Vec<String>,
    pub separator: String,
    pub env: HashMap<String, String>,
}

impl Default for PickerProfile {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            multi_args: Vec::new(),
            separator: "\n".to_string(),
            env: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Profile name, or `auto` for the first installed one.
    pub default_picker: String,
    pub title: String,
    pub selection: SelectionOptions,
    /// Extension to MIME types, registered on top of the standard table.
    pub types: BTreeMap<String, Vec<String>>,
    pub pickers: BTreeMap<String, PickerProfile>,
}

impl Default for Config {
    fn default() -> Self {
        let mut pickers = BTreeMap::new();

        pickers.insert(
            "zenity".to_string(),
            PickerProfile {
                command: "zenity".to_string(),
                args: vec![
                    "--file-selection".to_string(),
                    "--title={title}".to_string(),
                    "--file-filter={patterns}".to_string(),
                ],
                multi_args: vec!["--multiple".to_string(), "--separator=\n".to_string()],
                ..PickerProfile::default()
            },
        );

        pickers.insert(
            "kdialog".to_string(),
            PickerProfile {
                command: "kdialog".to_string(),
                args: vec![
                    "--title".to_string(),
                    "{title}".to_string(),
                    "--getopenfilename".to_string(),
                    ".".to_string(),
                    "{patterns}".to_string(),
                ],
                multi_args: vec!["--multiple".to_string(), "--separate-output".to_string()],
                ..PickerProfile::default()
            },
        );

        Self {
            default_picker: "auto".to_string(),
            title: "Select files".to_string(),
            selection: SelectionOptions::default(),
            types: BTreeMap::new(),
            pickers,
        }
    }
}

impl Config {
    /// Load from `custom_path`, the override variable, or the default
    /// location. A missing file yields the defaults.
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let config_path = custom_path.unwrap_or_else(Self::config_path);

        if !config_path.exists() {
            debug!(
                "No configuration at {}; using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path).with_context(|| {
            format!("Failed to read configuration at {}", config_path.display())
        })?;
        let config = toml::from_str::<Config>(&contents).with_context(|| {
            format!("Failed to parse configuration at {}", config_path.display())
        })?;

        debug!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    pub fn save(&self, custom_path: Option<&Path>) -> Result<PathBuf> {
        let config_path = custom_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        Ok(config_path)
    }

    pub fn config_path() -> PathBuf {
        if let Ok(override_path) = env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(override_path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("file-input")
            .join("config.toml")
    }

    pub fn get_picker(&self, name: &str) -> Option<&PickerProfile> {
        self.pickers.get(name)
    }

    /// Standard type table plus the `[types]` section.
    ///
    /// MIME strings that do not parse are skipped with a warning.
    pub fn registry(&self) -> TypeRegistry {
        let registry = TypeRegistry::standard();

        for (extension, mime_types) in &self.types {
            let valid: Vec<&str> = mime_types
                .iter()
                .map(|m| m.trim())
                .filter(|m| match m.parse::<mime::Mime>() {
                    Ok(_) => true,
                    Err(err) => {
                        warn!("Skipping MIME type `{m}` for `{extension}`: {err}");
                        false
                    }
                })
                .collect();
            registry.add_mime_type(extension, valid);
        }

        registry
    }
}
