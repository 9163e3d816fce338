use super::SelectionController;
use crate::host::{ClickTarget, FileDescriptor, PickerOutcome, PlatformEvent};
use futures::channel::oneshot;
use log::{debug, info};
use std::fmt;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Handle for an element registered with [`SelectionController::open_on_click`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerHandle(pub(super) u64);

impl fmt::Display for TriggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trigger-{}", self.0)
    }
}

pub(super) struct Waiter<F> {
    sender: oneshot::Sender<Vec<F>>,
    skip_callbacks: bool,
}

impl<F> Waiter<F> {
    pub(super) fn settle(self, files: Vec<F>) {
        // The receiving side may already be gone; nothing to report then.
        let _ = self.sender.send(files);
    }
}

/// Result of [`SelectionController::open`].
///
/// Resolves with the newly chosen files, or with an empty list when the
/// dialog was cancelled or the controller went away.
#[must_use = "a pending pick does nothing unless awaited or polled"]
#[derive(Debug)]
pub struct PendingPick<F> {
    receiver: oneshot::Receiver<Vec<F>>,
}

impl<F> PendingPick<F> {
    /// Take the result if the picker already finished.
    pub fn try_take(&mut self) -> Option<Vec<F>> {
        match self.receiver.try_recv() {
            Ok(Some(files)) => Some(files),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Vec::new()),
        }
    }
}

impl<F> Future for PendingPick<F> {
    type Output = Vec<F>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(files)) => Poll::Ready(files),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Vec::new()),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<F> SelectionController<F>
where
    F: FileDescriptor + Clone + 'static,
{
    /// Show the picker.
    ///
    /// On confirmation the new files are appended to the pending buffer, one
    /// notification goes to the default target and the selection callbacks
    /// run unless `skip_callbacks` is set. On cancel nothing happens and the
    /// pick resolves empty.
    pub fn open(&mut self, skip_callbacks: bool) -> PendingPick<F> {
        let (sender, receiver) = oneshot::channel();
        self.waiters.push(Waiter {
            sender,
            skip_callbacks,
        });

        info!("{} opening file picker", self.id);
        if let Some(outcome) = self.picker.show() {
            self.complete_pick(outcome);
        }

        PendingPick { receiver }
    }

    /// Report the outcome of a picker that completes asynchronously.
    ///
    /// One outcome settles every outstanding [`open`](Self::open) call.
    pub fn complete_pick(&mut self, outcome: PickerOutcome<F>) {
        let waiters = mem::take(&mut self.waiters);
        if waiters.is_empty() {
            debug!("{} ignoring picker outcome with no pending open", self.id);
            return;
        }

        let files = match outcome {
            PickerOutcome::Confirmed(files) if !files.is_empty() => files,
            _ => {
                debug!("{} picker cancelled", self.id);
                for waiter in waiters {
                    waiter.settle(Vec::new());
                }
                return;
            }
        };

        info!("{} picked {} file(s)", self.id, files.len());
        let run_callbacks = waiters.iter().any(|waiter| !waiter.skip_callbacks);
        self.accept_batch(None, &files, run_callbacks);

        for waiter in waiters {
            waiter.settle(files.clone());
        }
    }

    pub fn has_pending_pick(&self) -> bool {
        !self.waiters.is_empty()
    }

    /// Open the picker whenever `target` is clicked.
    pub fn open_on_click<T>(&mut self, target: T) -> TriggerHandle
    where
        T: ClickTarget + 'static,
    {
        let handle = TriggerHandle(self.next_handle());
        self.triggers.insert(handle, Box::new(target));
        debug!("{} attached {handle}", self.id);
        handle
    }

    pub fn detach_click_trigger(&mut self, handle: TriggerHandle) -> &mut Self {
        if let Some(mut target) = self.triggers.remove(&handle) {
            target.detach();
            debug!("{} detached {handle}", self.id);
        }
        self
    }

    /// Feed a click on a registered trigger.
    ///
    /// The click's default action is suppressed either way; unknown triggers
    /// open nothing.
    pub fn handle_click<E>(
        &mut self,
        handle: TriggerHandle,
        event: &mut E,
    ) -> Option<PendingPick<F>>
    where
        E: PlatformEvent + ?Sized,
    {
        event.prevent_default();
        if !self.triggers.contains_key(&handle) {
            debug!("Ignoring click on unknown {handle}");
            return None;
        }
        Some(self.open(false))
    }
}
