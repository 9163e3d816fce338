use super::{ControllerId, RegionHandle};
use crate::host::{EventTarget, FileDescriptor};
use itertools::Itertools;
use log::info;

/// Raised once for every accepted batch, from the picker or from a drop.
#[derive(Debug)]
pub struct FilesPicked<'a, F> {
    pub controller: ControllerId,
    /// Drop region the batch arrived on, `None` for picker selections.
    pub region: Option<RegionHandle>,
    /// The newly accepted files.
    pub files: &'a [F],
    /// The whole pending buffer, including `files`.
    pub pending: &'a [F],
}

/// Default notification target; writes each batch to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTarget;

impl<F: FileDescriptor> EventTarget<F> for LoggingTarget {
    fn dispatch(&mut self, event: &FilesPicked<'_, F>) {
        let source = match event.region {
            Some(region) => region.to_string(),
            None => "picker".to_string(),
        };
        info!(
            "{} files picked via {source}: {} ({} pending)",
            event.controller,
            event.files.iter().map(FileDescriptor::name).join(", "),
            event.pending.len()
        );
    }
}
