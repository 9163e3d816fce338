use crate::acceptance::AcceptanceSet;
use crate::host::{ClickTarget, EventTarget, FileDescriptor, FilePicker};
use crate::types::TypeRegistry;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

mod drag;
mod notify;
mod picker;
mod subscribers;

pub use drag::{ActiveTreatment, DropOutcome, RegionHandle};
pub use notify::{FilesPicked, LoggingTarget};
pub use picker::{PendingPick, TriggerHandle};
pub use subscribers::SubscriptionId;

use drag::DragRegion;
use picker::Waiter;
use subscribers::{CallbackList, Subscribers};

static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one controller instance in notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u64);

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "selection-{}", self.0)
    }
}

/// Construction options for a [`SelectionController`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionOptions {
    /// Allow choosing several files in one dialog.
    pub multi: bool,
    /// Raw acceptance tokens: extensions (bare or dotted) or MIME types.
    pub accept: Vec<String>,
}

impl SelectionOptions {
    pub fn new<I, S>(multi: bool, accept: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            multi,
            accept: accept.into_iter().map(Into::into).collect(),
        }
    }
}

/// Turns picker confirmations and drops into accepted file batches.
///
/// The controller owns the pending buffer, the subscriber lists and every
/// registered click trigger and drag region. The host forwards events to
/// [`handle_click`](Self::handle_click), [`handle_drag`](Self::handle_drag)
/// and [`complete_pick`](Self::complete_pick).
pub struct SelectionController<F> {
    id: ControllerId,
    multi: bool,
    acceptance: AcceptanceSet,
    files: Vec<F>,
    on_select: Subscribers<F>,
    on_reject: Subscribers<F>,
    triggers: BTreeMap<TriggerHandle, Box<dyn ClickTarget>>,
    regions: BTreeMap<RegionHandle, DragRegion<F>>,
    picker: Box<dyn FilePicker<File = F>>,
    default_target: Box<dyn EventTarget<F>>,
    waiters: Vec<Waiter<F>>,
    next_handle: u64,
}

impl<F> SelectionController<F>
where
    F: FileDescriptor + Clone + 'static,
{
    /// Expand the acceptance list against `registry` and configure `picker`.
    ///
    /// Later registrations on `registry` do not affect this controller.
    pub fn new<P>(options: SelectionOptions, registry: &TypeRegistry, picker: P) -> Self
    where
        P: FilePicker<File = F> + 'static,
    {
        let acceptance = if options.accept.is_empty() {
            AcceptanceSet::any()
        } else {
            registry.expand_acceptance(&options.accept)
        };

        let mut picker: Box<dyn FilePicker<File = F>> = Box::new(picker);
        picker.configure(&acceptance.accept_attribute(), options.multi);

        let id = ControllerId(NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed));
        debug!(
            "Created {id} (multi: {}, {} accepted token(s))",
            options.multi,
            acceptance.len()
        );

        Self {
            id,
            multi: options.multi,
            acceptance,
            files: Vec::new(),
            on_select: Subscribers::new(),
            on_reject: Subscribers::new(),
            triggers: BTreeMap::new(),
            regions: BTreeMap::new(),
            picker,
            default_target: Box::new(LoggingTarget),
            waiters: Vec::new(),
            next_handle: 1,
        }
    }

    /// Replace the target that receives notifications for picker selections.
    pub fn with_default_target<T>(mut self, target: T) -> Self
    where
        T: EventTarget<F> + 'static,
    {
        self.default_target = Box::new(target);
        self
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn acceptance(&self) -> &AcceptanceSet {
        &self.acceptance
    }

    pub fn is_acceptable(&self, file: &F) -> bool {
        self.acceptance.is_acceptable(file)
    }

    /// Every file accepted since the last clear.
    pub fn files(&self) -> &[F] {
        &self.files
    }

    pub fn file(&self) -> Option<&F> {
        self.files.first()
    }

    pub fn clear_files(&mut self) -> &mut Self {
        self.picker.reset();
        self.files.clear();
        self
    }

    /// Run `callback` for every accepted batch.
    ///
    /// The callback receives this controller and the new files; the whole
    /// pending buffer is available through [`files`](Self::files).
    pub fn on_file_select<C>(&mut self, callback: C) -> SubscriptionId
    where
        C: FnMut(&mut SelectionController<F>, &[F]) + 'static,
    {
        let id = SubscriptionId(self.next_handle());
        self.on_select.insert(id, Box::new(callback));
        id
    }

    pub fn off_file_select(&mut self, id: SubscriptionId) -> &mut Self {
        self.on_select.remove(id);
        self
    }

    /// Run `callback` with the rejected files of every drop.
    pub fn on_bad_file_drop<C>(&mut self, callback: C) -> SubscriptionId
    where
        C: FnMut(&mut SelectionController<F>, &[F]) + 'static,
    {
        let id = SubscriptionId(self.next_handle());
        self.on_reject.insert(id, Box::new(callback));
        id
    }

    pub fn off_bad_file_drop(&mut self, id: SubscriptionId) -> &mut Self {
        self.on_reject.remove(id);
        self
    }

    /// Detach everything and release buffers.
    ///
    /// Outstanding [`PendingPick`]s resolve with no files.
    pub fn destroy(mut self) {
        for (_, mut region) in std::mem::take(&mut self.regions) {
            region.release();
        }
        for (_, mut trigger) in std::mem::take(&mut self.triggers) {
            trigger.detach();
        }
        for waiter in self.waiters.drain(..) {
            waiter.settle(Vec::new());
        }
        self.picker.teardown();
        self.on_select.clear();
        self.on_reject.clear();
        self.files.clear();
        info!("Destroyed {}", self.id);
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    /// Append an accepted batch, notify `region` (or the default target)
    /// and run the selection callbacks.
    fn accept_batch(&mut self, region: Option<RegionHandle>, batch: &[F], run_callbacks: bool) {
        self.files.extend(batch.iter().cloned());

        let event = FilesPicked {
            controller: self.id,
            region,
            files: batch,
            pending: &self.files,
        };
        match region.and_then(|handle| self.regions.get_mut(&handle)) {
            Some(entry) => entry.dispatch(&event),
            None => self.default_target.dispatch(&event),
        }

        if run_callbacks {
            self.notify(CallbackList::Select, batch);
        }
    }
}

impl<F> fmt::Debug for SelectionController<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionController")
            .field("id", &self.id)
            .field("multi", &self.multi)
            .field("acceptance", &self.acceptance)
            .field("files", &self.files.len())
            .field("on_select", &self.on_select.len())
            .field("on_reject", &self.on_reject.len())
            .field("triggers", &self.triggers.len())
            .field("regions", &self.regions.len())
            .field("waiters", &self.waiters.len())
            .finish()
    }
}
