//! File selection through a native picker or drag-and-drop regions,
//! filtered by extension and MIME type.
//!
//! A [`TypeRegistry`] expands acceptance tokens such as `"png"` or
//! `"image/jpeg"` into an [`AcceptanceSet`]. A [`SelectionController`] uses
//! that set to filter files coming from the host's picker and drop regions
//! and notifies subscribers. The host side is abstracted by the traits in
//! [`host`]; [`native`] implements them for a desktop session.

pub mod acceptance;
pub mod config;
pub mod controller;
pub mod host;
pub mod native;
pub mod reader;
pub mod template;
pub mod types;

#[cfg(test)]
mod test_support;

pub use acceptance::AcceptanceSet;
pub use config::Config;
pub use controller::{
    ActiveTreatment, ControllerId, DropOutcome, FilesPicked, PendingPick, RegionHandle,
    SelectionController, SelectionOptions, SubscriptionId, TriggerHandle,
};
pub use reader::{get_file_data_uri, get_file_text, ReadError};
pub use types::{TypeRegistry, TypeTable};
