//! Traits the embedding host implements.
//!
//! The controller never talks to a windowing system or a DOM directly. A
//! browser binding, a desktop shell or a test harness provides these and
//! forwards user gestures to the controller.

use crate::controller::FilesPicked;
use crate::reader::ReadError;
use std::fmt;
use std::future::Future;

/// A file handed over by the host.
///
/// Implementors are expected to be cheap handles; the controller clones them
/// into its pending buffer.
pub trait FileDescriptor {
    fn name(&self) -> &str;

    /// Declared MIME type, empty when the platform does not know it.
    fn mime_type(&self) -> &str;
}

/// A file whose raw contents can be read.
pub trait ReadableFile: FileDescriptor {
    fn read_bytes(&self) -> impl Future<Output = Result<Vec<u8>, ReadError>>;
}

/// Terminal result of one picker dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerOutcome<F> {
    Confirmed(Vec<F>),
    Cancelled,
}

impl<F> PickerOutcome<F> {
    pub fn from_files(files: Vec<F>) -> Self {
        if files.is_empty() {
            Self::Cancelled
        } else {
            Self::Confirmed(files)
        }
    }
}

/// The platform's file selection dialog.
pub trait FilePicker {
    type File;

    /// Bake the accept attribute and multiplicity into the dialog.
    fn configure(&mut self, accept: &str, multiple: bool);

    /// Show the dialog.
    ///
    /// Blocking pickers return the outcome directly. Pickers that complete
    /// later return `None` and the host reports the outcome through
    /// [`SelectionController::complete_pick`](crate::SelectionController::complete_pick).
    fn show(&mut self) -> Option<PickerOutcome<Self::File>>;

    /// Forget the current value so choosing the same file again still
    /// registers as a change.
    fn reset(&mut self);

    fn teardown(&mut self) {}
}

/// Receiver of "files picked" notifications.
pub trait EventTarget<F> {
    fn dispatch(&mut self, event: &FilesPicked<'_, F>);
}

/// A surface that accepts dropped files.
pub trait DragSurface<F>: EventTarget<F> {
    fn add_class(&mut self, class: &str);
    fn remove_class(&mut self, class: &str);

    /// Current inline value of a style property, empty when unset.
    fn style(&self, property: &str) -> String;
    fn set_style(&mut self, property: &str, value: &str);

    /// Stop forwarding events for this surface.
    fn detach(&mut self) {}
}

/// An element whose clicks open the picker.
pub trait ClickTarget {
    fn detach(&mut self) {}
}

/// Default-action control shared by every forwarded event.
pub trait PlatformEvent {
    fn prevent_default(&mut self);
    fn stop_propagation(&mut self);
}

/// The drag-and-drop event family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragKind {
    Drag,
    DragStart,
    DragEnd,
    DragOver,
    DragEnter,
    DragLeave,
    Drop,
}

impl DragKind {
    pub const ALL: [DragKind; 7] = [
        DragKind::Drag,
        DragKind::DragStart,
        DragKind::DragEnd,
        DragKind::DragOver,
        DragKind::DragEnter,
        DragKind::DragLeave,
        DragKind::Drop,
    ];

    /// DOM event name.
    pub fn as_str(self) -> &'static str {
        match self {
            DragKind::Drag => "drag",
            DragKind::DragStart => "dragstart",
            DragKind::DragEnd => "dragend",
            DragKind::DragOver => "dragover",
            DragKind::DragEnter => "dragenter",
            DragKind::DragLeave => "dragleave",
            DragKind::Drop => "drop",
        }
    }

    pub fn enters_hover(self) -> bool {
        matches!(self, DragKind::DragOver | DragKind::DragEnter)
    }

    pub fn leaves_hover(self) -> bool {
        matches!(self, DragKind::DragLeave | DragKind::DragEnd | DragKind::Drop)
    }
}

impl fmt::Display for DragKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drag-family event on a registered region.
pub trait DragEvent: PlatformEvent {
    type File;

    fn kind(&self) -> DragKind;

    /// Files carried by the transfer. Only meaningful for drops.
    fn take_files(&mut self) -> Vec<Self::File>;
}
