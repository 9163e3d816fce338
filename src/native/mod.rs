//! Desktop host: local files, an external picker program and in-memory
//! drop surfaces.

use crate::controller::FilesPicked;
use crate::host::{
    DragEvent, DragKind, DragSurface, EventTarget, FileDescriptor, FilePicker, PickerOutcome,
    PlatformEvent, ReadableFile,
};
use crate::reader::ReadError;
use anyhow::Result;
use itertools::Itertools;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use url::Url;

mod picker;

pub use picker::CommandPicker;

/// A file on the local filesystem.
///
/// The MIME type is guessed from the extension, the way a browser fills in
/// `File.type`; it is empty when the extension is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
    mime_type: String,
}

impl LocalFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let mime_type = mime_guess::from_path(&path)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();

        Self {
            path,
            name,
            mime_type,
        }
    }

    /// Accepts plain paths and `file://` URIs.
    ///
    /// Other `scheme://` URIs are errors. A colon without an authority, as
    /// in `shot:1.png`, is part of a file name.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            anyhow::bail!("Empty file reference");
        }

        match Url::parse(raw) {
            Ok(uri) if uri.scheme() == "file" => {
                let path = uri
                    .to_file_path()
                    .map_err(|_| anyhow::anyhow!("Invalid file URI: {raw}"))?;
                Ok(Self::from_path(path))
            }
            Ok(uri) if uri.has_authority() && !Path::new(raw).exists() => {
                anyhow::bail!("Unsupported URI scheme `{}` in {raw}", uri.scheme())
            }
            _ => Ok(Self::from_path(raw)),
        }
    }

    /// Parse a `text/uri-list` payload, skipping comments and bad entries.
    pub fn from_uri_list(payload: &str) -> Vec<Self> {
        payload
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| match Self::parse(line) {
                Ok(file) => Some(file),
                Err(err) => {
                    warn!("Skipping dropped entry: {err}");
                    None
                }
            })
            .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileDescriptor for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

impl ReadableFile for LocalFile {
    fn read_bytes(&self) -> impl Future<Output = Result<Vec<u8>, ReadError>> {
        futures::future::ready(fs::read(&self.path).map_err(ReadError::from))
    }
}

/// Drag surface without a display: tracks classes and styles in memory and
/// logs notifications.
#[derive(Debug, Clone, Default)]
pub struct TerminalRegion {
    label: String,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
}

impl TerminalRegion {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

impl<F: FileDescriptor> EventTarget<F> for TerminalRegion {
    fn dispatch(&mut self, event: &FilesPicked<'_, F>) {
        info!(
            "{} received {} file(s) for {}: {}",
            self.label,
            event.files.len(),
            event.controller,
            event.files.iter().map(FileDescriptor::name).join(", ")
        );
    }
}

impl<F: FileDescriptor> DragSurface<F> for TerminalRegion {
    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    fn style(&self, property: &str) -> String {
        self.styles.get(property).cloned().unwrap_or_default()
    }

    fn set_style(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.styles.remove(property);
        } else {
            self.styles.insert(property.to_string(), value.to_string());
        }
    }
}

/// Picker for controllers that only take drops; every dialog is cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPicker;

impl FilePicker for NoPicker {
    type File = LocalFile;

    fn configure(&mut self, _accept: &str, _multiple: bool) {}

    fn show(&mut self) -> Option<PickerOutcome<LocalFile>> {
        debug!("No picker available; cancelling");
        Some(PickerOutcome::Cancelled)
    }

    fn reset(&mut self) {}
}

/// A drag event synthesized by the host.
#[derive(Debug, Clone)]
pub struct DragGesture<F> {
    kind: DragKind,
    files: Vec<F>,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl<F> DragGesture<F> {
    pub fn new(kind: DragKind) -> Self {
        Self {
            kind,
            files: Vec::new(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn drop(files: Vec<F>) -> Self {
        Self {
            files,
            ..Self::new(DragKind::Drop)
        }
    }
}

impl<F> PlatformEvent for DragGesture<F> {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

impl<F> DragEvent for DragGesture<F> {
    type File = F;

    fn kind(&self) -> DragKind {
        self.kind
    }

    fn take_files(&mut self) -> Vec<F> {
        std::mem::take(&mut self.files)
    }
}

/// A click synthesized by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickGesture {
    pub default_prevented: bool,
}

impl PlatformEvent for ClickGesture {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn stop_propagation(&mut self) {}
}
