//! Bharat daemon library - exposes the collaborator adapters for
//! integration tests.

pub mod classifier;
pub mod sinks;
pub mod transcript;
