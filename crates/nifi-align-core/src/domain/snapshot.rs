use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::group::{GroupId, GroupRef};

/// Counts of the non-group elements found directly inside a group
///
/// Labels are decoration on the canvas and are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowContents {
    /// Processors
    pub processors: usize,
    /// Connections
    pub connections: usize,
    /// Funnels
    pub funnels: usize,
    /// Input ports
    pub input_ports: usize,
    /// Output ports
    pub output_ports: usize,
    /// Remote process groups
    pub remote_process_groups: usize,
}

impl FlowContents {
    /// Whether any live flow element is present
    pub fn has_flow_elements(&self) -> bool {
        self.total() > 0
    }

    /// Total number of flow elements
    pub fn total(&self) -> usize {
        self.processors
            + self.connections
            + self.funnels
            + self.input_ports
            + self.output_ports
            + self.remote_process_groups
    }
}

/// Point-in-time read of one group's immediate contents
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSnapshot {
    /// Id of the group as reported by the server (the root sentinel is resolved)
    pub group_id: GroupId,
    /// Child groups in server discovery order
    pub child_groups: Vec<GroupRef>,
    /// Non-group elements at this level
    pub contents: FlowContents,
    /// When the server produced the snapshot
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl FlowSnapshot {
    /// Snapshot of a group holding only the given children
    pub fn new(group_id: GroupId, child_groups: Vec<GroupRef>) -> Self {
        Self {
            group_id,
            child_groups,
            contents: FlowContents::default(),
            last_refreshed: None,
        }
    }

    /// Set the flow element counts
    pub fn with_contents(mut self, contents: FlowContents) -> Self {
        self.contents = contents;
        self
    }

    /// A group's children may only be moved when it holds no flow elements
    pub fn is_eligible(&self) -> bool {
        !self.contents.has_flow_elements()
    }
}
