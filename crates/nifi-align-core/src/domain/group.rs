use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a process group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl GroupId {
    /// Sentinel the server resolves to its top-level group
    pub const ROOT: &'static str = "root";

    /// Create a group id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The server-defined root group
    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    /// Resolve an optional user supplied id; blank input means the root group
    pub fn resolve(id: Option<&str>) -> Self {
        match id.map(str::trim) {
            Some(trimmed) if !trimmed.is_empty() => Self::new(trimmed),
            _ => Self::root(),
        }
    }

    /// Whether this is the root sentinel
    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optimistic concurrency token attached to every group
///
/// The engine never interprets it; it is echoed back unchanged on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    /// Monotonic version maintained by the server
    pub version: i64,
    /// Client that made the last modification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// User that made the last modification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modifier: Option<String>,
}

impl Revision {
    /// Revision with only a version
    pub fn new(version: i64) -> Self {
        Self {
            version,
            client_id: None,
            last_modifier: None,
        }
    }
}

/// Reference to a child group as listed in its parent's snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRef {
    /// Group id
    pub id: GroupId,
    /// Revision to send back with any update
    pub revision: Revision,
}

impl GroupRef {
    /// Create a reference
    pub fn new(id: impl Into<String>, revision: Revision) -> Self {
        Self {
            id: GroupId::new(id),
            revision,
        }
    }
}
