#![cfg(test)]

use crate::controller::{ControllerId, FilesPicked, RegionHandle};
use crate::host::{
    ClickTarget, DragSurface, EventTarget, FileDescriptor, FilePicker, PickerOutcome, ReadableFile,
};
use crate::native::{ClickGesture, DragGesture};
use crate::reader::ReadError;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::ffi::OsString;
use std::future::Future;
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryFile {
    pub name: String,
    pub mime_type: String,
    contents: Option<Vec<u8>>,
}

impl MemoryFile {
    /// A file whose reads abort.
    pub fn new(name: &str, mime_type: &str) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            contents: None,
        }
    }

    pub fn with_contents(name: &str, mime_type: &str, contents: &[u8]) -> Self {
        Self {
            contents: Some(contents.to_vec()),
            ..Self::new(name, mime_type)
        }
    }
}

impl FileDescriptor for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

impl ReadableFile for MemoryFile {
    fn read_bytes(&self) -> impl Future<Output = Result<Vec<u8>, ReadError>> {
        futures::future::ready(self.contents.clone().ok_or(ReadError::Aborted))
    }
}

#[derive(Debug, Default)]
pub struct PickerLog {
    pub accept: Option<String>,
    pub multiple: Option<bool>,
    pub shown: usize,
    pub resets: usize,
    pub torn_down: bool,
}

#[derive(Debug, Default)]
enum PickerScript {
    Confirm(Vec<MemoryFile>),
    #[default]
    Cancel,
    Deferred,
}

#[derive(Debug, Default)]
pub struct ScriptedPicker {
    script: PickerScript,
    log: Rc<RefCell<PickerLog>>,
}

impl ScriptedPicker {
    pub fn confirming(files: Vec<MemoryFile>) -> Self {
        Self {
            script: PickerScript::Confirm(files),
            ..Self::default()
        }
    }

    pub fn cancelling() -> Self {
        Self::default()
    }

    /// Never answers from `show`; the test completes the pick itself.
    pub fn deferred() -> Self {
        Self {
            script: PickerScript::Deferred,
            ..Self::default()
        }
    }

    pub fn log(&self) -> Rc<RefCell<PickerLog>> {
        Rc::clone(&self.log)
    }
}

impl FilePicker for ScriptedPicker {
    type File = MemoryFile;

    fn configure(&mut self, accept: &str, multiple: bool) {
        let mut log = self.log.borrow_mut();
        log.accept = Some(accept.to_string());
        log.multiple = Some(multiple);
    }

    fn show(&mut self) -> Option<PickerOutcome<MemoryFile>> {
        self.log.borrow_mut().shown += 1;
        match &self.script {
            PickerScript::Confirm(files) => Some(PickerOutcome::Confirmed(files.clone())),
            PickerScript::Cancel => Some(PickerOutcome::Cancelled),
            PickerScript::Deferred => None,
        }
    }

    fn reset(&mut self) {
        self.log.borrow_mut().resets += 1;
    }

    fn teardown(&mut self) {
        self.log.borrow_mut().torn_down = true;
    }
}

/// Owned copy of a [`FilesPicked`] notification.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub controller: ControllerId,
    pub region: Option<RegionHandle>,
    pub files: Vec<String>,
    pub pending: Vec<String>,
}

impl RecordedEvent {
    fn capture<F: FileDescriptor>(event: &FilesPicked<'_, F>) -> Self {
        let names = |files: &[F]| -> Vec<String> {
            files.iter().map(|f| f.name().to_string()).collect()
        };
        Self {
            controller: event.controller,
            region: event.region,
            files: names(event.files),
            pending: names(event.pending),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingTarget {
    events: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl RecordingTarget {
    pub fn events(&self) -> Rc<RefCell<Vec<RecordedEvent>>> {
        Rc::clone(&self.events)
    }
}

impl<F: FileDescriptor> EventTarget<F> for RecordingTarget {
    fn dispatch(&mut self, event: &FilesPicked<'_, F>) {
        self.events.borrow_mut().push(RecordedEvent::capture(event));
    }
}

#[derive(Debug, Default)]
pub struct SurfaceState {
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
    pub style_writes: Vec<(String, String)>,
    pub events: Vec<RecordedEvent>,
    pub detached: bool,
}

impl SurfaceState {
    pub fn style(&self, property: &str) -> String {
        self.styles.get(property).cloned().unwrap_or_default()
    }

    /// Styles with blank values removed, as a browser would report them.
    pub fn non_empty_styles(&self) -> BTreeMap<String, String> {
        self.styles
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl RecordingSurface {
    pub fn state(&self) -> Rc<RefCell<SurfaceState>> {
        Rc::clone(&self.state)
    }
}

impl<F: FileDescriptor> EventTarget<F> for RecordingSurface {
    fn dispatch(&mut self, event: &FilesPicked<'_, F>) {
        self.state
            .borrow_mut()
            .events
            .push(RecordedEvent::capture(event));
    }
}

impl<F: FileDescriptor> DragSurface<F> for RecordingSurface {
    fn add_class(&mut self, class: &str) {
        self.state.borrow_mut().classes.insert(class.to_string());
    }

    fn remove_class(&mut self, class: &str) {
        self.state.borrow_mut().classes.remove(class);
    }

    fn style(&self, property: &str) -> String {
        self.state.borrow().style(property)
    }

    fn set_style(&mut self, property: &str, value: &str) {
        let mut state = self.state.borrow_mut();
        state
            .style_writes
            .push((property.to_string(), value.to_string()));
        state.styles.insert(property.to_string(), value.to_string());
    }

    fn detach(&mut self) {
        self.state.borrow_mut().detached = true;
    }
}

pub type ScriptedDragEvent = DragGesture<MemoryFile>;
pub type ScriptedClickEvent = ClickGesture;

#[derive(Debug, Default)]
pub struct RecordingClick {
    detached: Rc<RefCell<bool>>,
}

impl RecordingClick {
    pub fn detached(&self) -> Rc<RefCell<bool>> {
        Rc::clone(&self.detached)
    }
}

impl ClickTarget for RecordingClick {
    fn detach(&mut self) {
        *self.detached.borrow_mut() = true;
    }
}

pub struct ConfigEnvGuard {
    original: Option<OsString>,
}

impl ConfigEnvGuard {
    const KEY: &'static str = crate::config::CONFIG_PATH_ENV;

    pub fn set(path: &Path) -> Self {
        let original = env::var_os(Self::KEY);
        env::set_var(Self::KEY, path);
        Self { original }
    }

    pub fn unset() -> Self {
        let original = env::var_os(Self::KEY);
        env::remove_var(Self::KEY);
        Self { original }
    }
}

impl Drop for ConfigEnvGuard {
    fn drop(&mut self) {
        if let Some(original) = self.original.take() {
            env::set_var(Self::KEY, original);
        } else {
            env::remove_var(Self::KEY);
        }
    }
}
