//! Domain model for process group alignment
//!
//! Snapshots and group references are transient: they are read fresh from the
//! server for each level and dropped once that level has been processed.

/// Group identifiers and revisions
pub mod group;

/// Snapshots of a group's contents
pub mod snapshot;

/// Alignment parameters
pub mod request;

pub use group::{GroupId, GroupRef, Revision};
pub use request::{AlignmentRequest, Depth};
pub use snapshot::{FlowContents, FlowSnapshot};
