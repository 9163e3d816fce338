use super::{CallbackList, FilesPicked, SelectionController};
use crate::host::{DragEvent, DragKind, DragSurface, FileDescriptor};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt;
use std::mem;

/// Handle for a registered drag region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionHandle(pub(super) u64);

impl fmt::Display for RegionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region-{}", self.0)
    }
}

/// Visual change applied to a region while a drag hovers over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveTreatment {
    /// Add this class while hovering.
    ClassToken(String),
    /// Override these style properties while hovering.
    StyleOverride(BTreeMap<String, String>),
}

impl ActiveTreatment {
    pub fn class(name: impl Into<String>) -> Self {
        Self::ClassToken(name.into())
    }

    pub fn styles<I, K, V>(styles: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::StyleOverride(
            styles
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Default)]
enum HoverState {
    #[default]
    Idle,
    /// Style values seen before the override, restored on leave.
    Hover { captured: Vec<(String, String)> },
}

pub(super) struct DragRegion<F> {
    surface: Box<dyn DragSurface<F>>,
    treatment: Option<ActiveTreatment>,
    state: HoverState,
}

impl<F> DragRegion<F> {
    fn enter_hover(&mut self) {
        if matches!(self.state, HoverState::Hover { .. }) {
            return;
        }

        let Self {
            surface, treatment, ..
        } = self;
        let captured = match treatment {
            Some(ActiveTreatment::ClassToken(class)) => {
                surface.add_class(class);
                Vec::new()
            }
            Some(ActiveTreatment::StyleOverride(styles)) => styles
                .iter()
                .map(|(property, value)| {
                    let previous = surface.style(property);
                    surface.set_style(property, value);
                    (property.clone(), previous)
                })
                .collect(),
            None => Vec::new(),
        };

        self.state = HoverState::Hover { captured };
    }

    fn leave_hover(&mut self) {
        let HoverState::Hover { captured } = mem::take(&mut self.state) else {
            return;
        };

        match &self.treatment {
            Some(ActiveTreatment::ClassToken(class)) => self.surface.remove_class(class),
            Some(ActiveTreatment::StyleOverride(_)) => {
                for (property, previous) in captured {
                    self.surface.set_style(&property, &previous);
                }
            }
            None => {}
        }
    }

    pub(super) fn is_hovered(&self) -> bool {
        matches!(self.state, HoverState::Hover { .. })
    }

    pub(super) fn dispatch(&mut self, event: &FilesPicked<'_, F>) {
        self.surface.dispatch(event);
    }

    pub(super) fn release(&mut self) {
        self.leave_hover();
        self.surface.detach();
    }
}

/// Accepted and rejected files from one drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome<F> {
    pub accepted: Vec<F>,
    pub rejected: Vec<F>,
}

impl<F> DropOutcome<F> {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.rejected.is_empty()
    }
}

impl<F> Default for DropOutcome<F> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<F> SelectionController<F>
where
    F: FileDescriptor + Clone + 'static,
{
    /// Register a surface that accepts dropped files.
    pub fn attach_to_drag_area<S>(
        &mut self,
        surface: S,
        treatment: Option<ActiveTreatment>,
    ) -> RegionHandle
    where
        S: DragSurface<F> + 'static,
    {
        let handle = RegionHandle(self.next_handle());
        self.regions.insert(
            handle,
            DragRegion {
                surface: Box::new(surface),
                treatment,
                state: HoverState::Idle,
            },
        );
        debug!("{} attached {handle}", self.id);
        handle
    }

    /// Unregister a region, reverting any active hover treatment.
    pub fn detach_drag_area(&mut self, handle: RegionHandle) -> &mut Self {
        if let Some(mut region) = self.regions.remove(&handle) {
            region.release();
            debug!("{} detached {handle}", self.id);
        }
        self
    }

    pub fn is_hovered(&self, handle: RegionHandle) -> bool {
        self.regions
            .get(&handle)
            .is_some_and(DragRegion::is_hovered)
    }

    /// Feed one drag-family event for `handle`.
    ///
    /// The default action is always suppressed. Drops are split into
    /// accepted and rejected files; both callback lists may fire for the
    /// same drop.
    pub fn handle_drag<E>(&mut self, handle: RegionHandle, event: &mut E) -> DropOutcome<F>
    where
        E: DragEvent<File = F> + ?Sized,
    {
        event.prevent_default();
        event.stop_propagation();

        let kind = event.kind();
        let Some(region) = self.regions.get_mut(&handle) else {
            debug!("Ignoring {kind} for unknown {handle}");
            return DropOutcome::default();
        };

        if kind.enters_hover() {
            region.enter_hover();
        } else if kind.leaves_hover() {
            region.leave_hover();
        }

        if kind != DragKind::Drop {
            return DropOutcome::default();
        }

        let (accepted, rejected) = self.acceptance.partition(event.take_files());
        debug!(
            "Drop on {handle}: {} accepted, {} rejected",
            accepted.len(),
            rejected.len()
        );

        if !accepted.is_empty() {
            info!("Accepted {} dropped file(s) on {handle}", accepted.len());
            self.accept_batch(Some(handle), &accepted, true);
        }
        if !rejected.is_empty() {
            self.notify(CallbackList::Reject, &rejected);
        }

        DropOutcome { accepted, rejected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SelectionOptions;
    use crate::test_support::{MemoryFile, RecordingSurface, ScriptedDragEvent, ScriptedPicker};
    use crate::types::TypeRegistry;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn controller(accept: &[&str]) -> SelectionController<MemoryFile> {
        SelectionController::new(
            SelectionOptions::new(false, accept.iter().copied()),
            &TypeRegistry::standard(),
            ScriptedPicker::default(),
        )
    }

    fn drop_files(
        controller: &mut SelectionController<MemoryFile>,
        handle: RegionHandle,
        files: Vec<MemoryFile>,
    ) -> DropOutcome<MemoryFile> {
        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragEnter));
        controller.handle_drag(handle, &mut ScriptedDragEvent::drop(files))
    }

    #[test]
    fn test_every_drag_event_is_suppressed() {
        let mut controller = controller(&[]);
        let handle = controller.attach_to_drag_area(RecordingSurface::default(), None);

        for kind in DragKind::ALL {
            let mut event = ScriptedDragEvent::new(kind);
            controller.handle_drag(handle, &mut event);
            assert!(event.default_prevented, "{kind} not prevented");
            assert!(event.propagation_stopped, "{kind} still propagating");
        }
    }

    #[test]
    fn test_unknown_region_is_still_suppressed() {
        let mut controller = controller(&[]);
        let handle = controller.attach_to_drag_area(RecordingSurface::default(), None);
        controller.detach_drag_area(handle);

        let mut event = ScriptedDragEvent::drop(vec![MemoryFile::new("a.txt", "")]);
        let outcome = controller.handle_drag(handle, &mut event);

        assert!(event.default_prevented);
        assert!(outcome.is_empty());
        assert!(controller.files().is_empty());
    }

    #[test]
    fn test_hover_state_transitions() {
        let mut controller = controller(&[]);
        let handle = controller.attach_to_drag_area(RecordingSurface::default(), None);
        assert!(!controller.is_hovered(handle));

        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragOver));
        assert!(controller.is_hovered(handle));

        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::Drag));
        assert!(controller.is_hovered(handle));

        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragLeave));
        assert!(!controller.is_hovered(handle));

        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragEnter));
        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragEnd));
        assert!(!controller.is_hovered(handle));
    }

    #[test]
    fn test_class_token_added_and_removed() {
        let surface = RecordingSurface::default();
        let state = surface.state();
        let mut controller = controller(&[]);
        let handle =
            controller.attach_to_drag_area(surface, Some(ActiveTreatment::class("drop-hover")));

        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragEnter));
        assert!(state.borrow().classes.contains("drop-hover"));

        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragLeave));
        assert!(!state.borrow().classes.contains("drop-hover"));
    }

    #[test]
    fn test_style_override_round_trips_over_cycles() {
        let surface = RecordingSurface::default();
        let state = surface.state();
        state
            .borrow_mut()
            .styles
            .insert("border".to_string(), "1px solid gray".to_string());
        let before = state.borrow().styles.clone();

        let mut controller = controller(&[]);
        let handle = controller.attach_to_drag_area(
            surface,
            Some(ActiveTreatment::styles([
                ("border", "2px dashed blue"),
                ("background", "#eef"),
            ])),
        );

        for _ in 0..3 {
            controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragEnter));
            controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragOver));
            {
                let hovered = state.borrow();
                assert_eq!(hovered.style("border"), "2px dashed blue");
                assert_eq!(hovered.style("background"), "#eef");
            }
            controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragLeave));
            assert_eq!(state.borrow().non_empty_styles(), before);
        }
    }

    #[test]
    fn test_style_changes_between_cycles_are_not_lost() {
        let surface = RecordingSurface::default();
        let state = surface.state();
        let mut controller = controller(&[]);
        let handle = controller
            .attach_to_drag_area(surface, Some(ActiveTreatment::styles([("opacity", "0.5")])));

        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragEnter));
        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::Drop));
        state
            .borrow_mut()
            .styles
            .insert("opacity".to_string(), "0.9".to_string());

        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragEnter));
        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragLeave));

        assert_eq!(state.borrow().style("opacity"), "0.9");
    }

    #[test]
    fn test_leave_without_hover_is_noop() {
        let surface = RecordingSurface::default();
        let state = surface.state();
        let mut controller = controller(&[]);
        let handle = controller.attach_to_drag_area(
            surface,
            Some(ActiveTreatment::styles([("color", "red")])),
        );

        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragLeave));

        assert!(state.borrow().style_writes.is_empty());
    }

    #[test]
    fn test_drop_partitions_png_and_pdf() {
        let surface = RecordingSurface::default();
        let state = surface.state();
        let mut controller = controller(&["png", "jpg"]);
        let handle = controller.attach_to_drag_area(surface, None);

        let selected = Rc::new(RefCell::new(Vec::new()));
        let rejected = Rc::new(RefCell::new(Vec::new()));
        let selected_sink = Rc::clone(&selected);
        let rejected_sink = Rc::clone(&rejected);
        controller.on_file_select(move |_, files: &[MemoryFile]| {
            selected_sink
                .borrow_mut()
                .push(files.iter().map(|f| f.name.clone()).collect::<Vec<_>>());
        });
        controller.on_bad_file_drop(move |_, files: &[MemoryFile]| {
            rejected_sink
                .borrow_mut()
                .push(files.iter().map(|f| f.name.clone()).collect::<Vec<_>>());
        });

        let outcome = drop_files(
            &mut controller,
            handle,
            vec![
                MemoryFile::new("photo.PNG", ""),
                MemoryFile::new("doc.pdf", "application/pdf"),
            ],
        );

        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(*selected.borrow(), [vec!["photo.PNG".to_string()]]);
        assert_eq!(*rejected.borrow(), [vec!["doc.pdf".to_string()]]);
        assert_eq!(controller.files().len(), 1);
        assert_eq!(controller.file().unwrap().name, "photo.PNG");

        let state = state.borrow();
        let events = &state.events;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].region, Some(handle));
        assert_eq!(events[0].files, ["photo.PNG"]);
        assert_eq!(events[0].pending, ["photo.PNG"]);
    }

    #[test]
    fn test_empty_acceptance_accepts_untyped_drop() {
        let mut controller = controller(&[]);
        let handle = controller.attach_to_drag_area(RecordingSurface::default(), None);
        let rejected = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&rejected);
        controller.on_bad_file_drop(move |_, _| *counter.borrow_mut() += 1);

        let outcome = drop_files(&mut controller, handle, vec![MemoryFile::new("Makefile", "")]);

        assert_eq!(outcome.accepted.len(), 1);
        assert!(outcome.rejected.is_empty());
        assert_eq!(*rejected.borrow(), 0);
    }

    #[test]
    fn test_select_callback_sees_and_clears_dropped_files() {
        let mut controller = controller(&["png"]);
        let handle = controller.attach_to_drag_area(RecordingSurface::default(), None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        controller.on_file_select(move |controller, _| {
            sink.borrow_mut().extend(controller.files().iter().map(|f| f.name.clone()));
            controller.clear_files();
        });

        let outcome = drop_files(&mut controller, handle, vec![MemoryFile::new("a.png", "")]);

        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(*seen.borrow(), ["a.png"]);
        assert!(controller.files().is_empty());
    }

    #[test]
    fn test_reject_callback_sees_accepted_part_of_drop() {
        let mut controller = controller(&["png"]);
        let handle = controller.attach_to_drag_area(RecordingSurface::default(), None);
        let pending = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&pending);
        controller.on_bad_file_drop(move |controller, rejected: &[MemoryFile]| {
            assert_eq!(rejected.len(), 1);
            sink.borrow_mut().extend(controller.files().iter().map(|f| f.name.clone()));
        });

        drop_files(
            &mut controller,
            handle,
            vec![MemoryFile::new("a.png", ""), MemoryFile::new("b.gif", "")],
        );

        assert_eq!(*pending.borrow(), ["a.png"]);
    }

    #[test]
    fn test_rejected_only_drop_does_not_notify() {
        let surface = RecordingSurface::default();
        let state = surface.state();
        let mut controller = controller(&["png"]);
        let handle = controller.attach_to_drag_area(surface, None);
        let selected = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&selected);
        controller.on_file_select(move |_, _| *counter.borrow_mut() += 1);

        let outcome = drop_files(&mut controller, handle, vec![MemoryFile::new("a.gif", "")]);

        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(*selected.borrow(), 0);
        assert!(state.borrow().events.is_empty());
        assert!(controller.files().is_empty());
    }

    #[test]
    fn test_empty_drop_only_changes_state() {
        let surface = RecordingSurface::default();
        let state = surface.state();
        let mut controller = controller(&[]);
        let handle =
            controller.attach_to_drag_area(surface, Some(ActiveTreatment::class("hover")));

        let outcome = drop_files(&mut controller, handle, Vec::new());

        assert!(outcome.is_empty());
        assert!(!controller.is_hovered(handle));
        assert!(!state.borrow().classes.contains("hover"));
        assert!(state.borrow().events.is_empty());
    }

    #[test]
    fn test_drops_append_to_pending_buffer() {
        let mut controller = controller(&[]);
        let first = controller.attach_to_drag_area(RecordingSurface::default(), None);
        let second = controller.attach_to_drag_area(RecordingSurface::default(), None);

        drop_files(&mut controller, first, vec![MemoryFile::new("a.txt", "")]);
        drop_files(&mut controller, second, vec![MemoryFile::new("b.txt", "")]);

        let names: Vec<_> = controller.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[test]
    fn test_regions_hover_independently() {
        let mut controller = controller(&[]);
        let first = controller.attach_to_drag_area(RecordingSurface::default(), None);
        let second = controller.attach_to_drag_area(RecordingSurface::default(), None);

        controller.handle_drag(first, &mut ScriptedDragEvent::new(DragKind::DragOver));

        assert!(controller.is_hovered(first));
        assert!(!controller.is_hovered(second));
    }

    #[test]
    fn test_detach_reverts_treatment() {
        let surface = RecordingSurface::default();
        let state = surface.state();
        let mut controller = controller(&[]);
        let handle =
            controller.attach_to_drag_area(surface, Some(ActiveTreatment::class("hover")));

        controller.handle_drag(handle, &mut ScriptedDragEvent::new(DragKind::DragOver));
        controller.detach_drag_area(handle).detach_drag_area(handle);

        let state = state.borrow();
        assert!(!state.classes.contains("hover"));
        assert!(state.detached);
    }
}
