//! NiFi Align Core - grid alignment of process groups
//!
//! This crate holds the domain model, the grid geometry, the remote
//! interfaces, the session lifecycle and the alignment engine. The HTTP
//! implementation of the remote interfaces lives in `nifi-align-client`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain model - groups, revisions, snapshots and requests
pub mod domain;

/// Grid geometry
pub mod layout;

/// Remote interfaces
pub mod api;

/// Session lifecycle
pub mod session;

/// Alignment engine
pub mod engine;

/// Error types
pub mod error;

/// In-memory implementations for tests
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export key types
pub use api::{AccessApi, FlowApi};
pub use domain::{AlignmentRequest, Depth, FlowContents, FlowSnapshot, GroupId, GroupRef, Revision};
pub use engine::{AlignmentEngine, AlignmentReport};
pub use error::{AlignError, AlignResult};
pub use layout::{GridCell, GridCursor, GridLayout, Position};
pub use session::{Session, SessionManager};
