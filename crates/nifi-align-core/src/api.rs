//! Remote interfaces consumed by the engine and the session manager
//!
//! Implementations talk to the server; the engine awaits every call before
//! issuing the next one.

use async_trait::async_trait;

use crate::domain::{FlowSnapshot, GroupId, GroupRef};
use crate::error::AlignResult;
use crate::layout::Position;
use crate::session::Session;

/// Credential exchange and token invalidation
#[async_trait]
pub trait AccessApi: Send + Sync {
    /// Exchange credentials for a bearer token
    async fn request_token(&self, username: &str, password: &str) -> AlignResult<String>;

    /// Invalidate the session's token on the server
    async fn logout(&self, session: &Session) -> AlignResult<()>;
}

/// Reads and writes on the process group tree
#[async_trait]
pub trait FlowApi: Send + Sync {
    /// Fetch the immediate contents of a group
    async fn fetch_snapshot(&self, session: &Session, group_id: &GroupId) -> AlignResult<FlowSnapshot>;

    /// Move a group; rejected when its revision is stale
    async fn update_position(
        &self,
        session: &Session,
        group: &GroupRef,
        position: Position,
    ) -> AlignResult<()>;
}
