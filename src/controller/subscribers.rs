use super::SelectionController;
use std::collections::BTreeMap;

/// Returned by `on_file_select` / `on_bad_file_drop`; pass it back to
/// unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(super) u64);

/// Runs with the controller that raised the batch, so it can read or clear
/// the pending buffer.
pub(super) type FileCallback<F> = Box<dyn FnMut(&mut SelectionController<F>, &[F])>;

/// Callbacks keyed by subscription id. Ids grow monotonically, so map order
/// is registration order.
///
/// A slot is `None` while its callback is running.
pub(super) struct Subscribers<F> {
    callbacks: BTreeMap<SubscriptionId, Option<FileCallback<F>>>,
}

impl<F> Subscribers<F> {
    pub fn new() -> Self {
        Self {
            callbacks: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, id: SubscriptionId, callback: FileCallback<F>) {
        self.callbacks.insert(id, Some(callback));
    }

    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        self.callbacks.remove(&id).is_some()
    }

    pub fn ids(&self) -> Vec<SubscriptionId> {
        self.callbacks.keys().copied().collect()
    }

    /// Borrow a callback out for one call.
    pub fn take(&mut self, id: SubscriptionId) -> Option<FileCallback<F>> {
        self.callbacks.get_mut(&id).and_then(Option::take)
    }

    /// Return a callback after its call, unless it was unsubscribed
    /// meanwhile.
    pub fn restore(&mut self, id: SubscriptionId, callback: FileCallback<F>) {
        if let Some(slot) = self.callbacks.get_mut(&id) {
            *slot = Some(callback);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CallbackList {
    Select,
    Reject,
}

impl<F> SelectionController<F> {
    fn subscribers_mut(&mut self, list: CallbackList) -> &mut Subscribers<F> {
        match list {
            CallbackList::Select => &mut self.on_select,
            CallbackList::Reject => &mut self.on_reject,
        }
    }

    /// Run every callback of `list` registered before this call.
    ///
    /// Callbacks may subscribe, unsubscribe or clear the buffer; new
    /// subscriptions first run on the next batch.
    pub(super) fn notify(&mut self, list: CallbackList, files: &[F]) {
        for id in self.subscribers_mut(list).ids() {
            let Some(mut callback) = self.subscribers_mut(list).take(id) else {
                continue;
            };
            callback(self, files);
            self.subscribers_mut(list).restore(id, callback);
        }
    }
}
