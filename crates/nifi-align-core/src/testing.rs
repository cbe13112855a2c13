//! In-memory process group tree
//!
//! This implementation is intended for tests. It keeps a revision per group,
//! rejects stale updates the way the server does and records every call.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::FlowApi;
use crate::domain::{FlowContents, FlowSnapshot, GroupId, GroupRef, Revision};
use crate::error::{AlignError, AlignResult};
use crate::layout::Position;
use crate::session::Session;

/// A call received by [`InMemoryFlow`]
#[derive(Debug, Clone, PartialEq)]
pub enum FlowCall {
    /// Snapshot requested for a group
    Fetch(GroupId),
    /// Position update requested for a group
    Update(GroupId, Position),
}

#[derive(Debug, Clone)]
struct GroupNode {
    children: Vec<String>,
    revision: i64,
    position: Position,
    contents: FlowContents,
}

impl GroupNode {
    fn new() -> Self {
        Self {
            children: Vec::new(),
            revision: 0,
            position: Position::new(-1.0, -1.0),
            contents: FlowContents::default(),
        }
    }
}

#[derive(Debug)]
struct FlowState {
    root_id: String,
    groups: HashMap<String, GroupNode>,
    calls: Vec<FlowCall>,
    updates_seen: usize,
    fail_update: Option<(usize, u16)>,
}

/// Process group tree held in memory
#[derive(Debug, Clone)]
pub struct InMemoryFlow {
    state: Arc<Mutex<FlowState>>,
}

impl InMemoryFlow {
    /// Tree holding only the root group
    pub fn new(root_id: &str) -> Self {
        let mut groups = HashMap::new();
        groups.insert(root_id.to_string(), GroupNode::new());
        Self {
            state: Arc::new(Mutex::new(FlowState {
                root_id: root_id.to_string(),
                groups,
                calls: Vec::new(),
                updates_seen: 0,
                fail_update: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FlowState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a child group; children keep insertion order
    pub fn add_group(&self, parent: &str, id: &str) -> &Self {
        let mut state = self.lock();
        state.groups.insert(id.to_string(), GroupNode::new());
        if let Some(node) = state.groups.get_mut(parent) {
            node.children.push(id.to_string());
        }
        self
    }

    /// Replace the flow element counts of a group
    pub fn set_contents(&self, id: &str, contents: FlowContents) -> &Self {
        if let Some(node) = self.lock().groups.get_mut(id) {
            node.contents = contents;
        }
        self
    }

    /// Put one processor inside a group
    pub fn add_processor(&self, id: &str) -> &Self {
        if let Some(node) = self.lock().groups.get_mut(id) {
            node.contents.processors += 1;
        }
        self
    }

    /// Simulate an edit by another user, making previously read revisions stale
    pub fn bump_revision(&self, id: &str) -> &Self {
        if let Some(node) = self.lock().groups.get_mut(id) {
            node.revision += 1;
        }
        self
    }

    /// Reject the `nth` update (1-based) with the given status
    pub fn fail_update(&self, nth: usize, status: u16) -> &Self {
        self.lock().fail_update = Some((nth, status));
        self
    }

    /// Current position of a group
    pub fn position(&self, id: &str) -> Option<Position> {
        self.lock().groups.get(id).map(|node| node.position)
    }

    /// Current revision of a group
    pub fn revision(&self, id: &str) -> Option<i64> {
        self.lock().groups.get(id).map(|node| node.revision)
    }

    /// All calls in the order they were received
    pub fn calls(&self) -> Vec<FlowCall> {
        self.lock().calls.clone()
    }

    /// Committed and attempted updates in order
    pub fn updates(&self) -> Vec<(GroupId, Position)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                FlowCall::Update(id, position) => Some((id.clone(), *position)),
                FlowCall::Fetch(_) => None,
            })
            .collect()
    }

    /// Ids whose snapshot was fetched, in order
    pub fn fetched(&self) -> Vec<GroupId> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                FlowCall::Fetch(id) => Some(id.clone()),
                FlowCall::Update(..) => None,
            })
            .collect()
    }

    fn resolve(state: &FlowState, id: &GroupId) -> String {
        if id.is_root() {
            state.root_id.clone()
        } else {
            id.as_str().to_string()
        }
    }
}

#[async_trait]
impl FlowApi for InMemoryFlow {
    async fn fetch_snapshot(&self, _session: &Session, group_id: &GroupId) -> AlignResult<FlowSnapshot> {
        let mut state = self.lock();
        state.calls.push(FlowCall::Fetch(group_id.clone()));

        let resolved = Self::resolve(&state, group_id);
        let node = state.groups.get(&resolved).ok_or_else(|| {
            AlignError::remote(404, format!("Unable to find process group with id '{}'.", resolved))
        })?;

        let child_groups = node
            .children
            .iter()
            .filter_map(|child| {
                state
                    .groups
                    .get(child)
                    .map(|c| GroupRef::new(child.clone(), Revision::new(c.revision)))
            })
            .collect();

        Ok(FlowSnapshot::new(GroupId::new(resolved), child_groups).with_contents(node.contents))
    }

    async fn update_position(
        &self,
        _session: &Session,
        group: &GroupRef,
        position: Position,
    ) -> AlignResult<()> {
        let mut state = self.lock();
        state.calls.push(FlowCall::Update(group.id.clone(), position));
        state.updates_seen += 1;

        if let Some((nth, status)) = state.fail_update {
            if nth == state.updates_seen {
                return Err(AlignError::remote(status, format!("Update {} rejected", nth)));
            }
        }

        let node = state.groups.get_mut(group.id.as_str()).ok_or_else(|| {
            AlignError::remote(404, format!("Unable to find process group with id '{}'.", group.id))
        })?;

        if node.revision != group.revision.version {
            return Err(AlignError::remote(
                409,
                format!(
                    "Error: [{}] is not the most up-to-date revision. This component appears to have been modified",
                    group.revision.version
                ),
            ));
        }

        node.position = position;
        node.revision += 1;
        Ok(())
    }
}
