//! Alignment engine
//!
//! Walks the process group tree depth-first and moves the child groups of
//! every eligible group into a row-major grid. Traversal uses an explicit
//! stack of levels; for each child its subtree is aligned first and its own
//! position update is issued afterwards, exactly as a recursive descent would.
//!
//! Errors are fail-fast. Updates already committed stay applied since the
//! server has no transactions.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use tracing::{debug, info, instrument};

use crate::api::FlowApi;
use crate::domain::{AlignmentRequest, Depth, FlowSnapshot, GroupId, GroupRef};
use crate::error::AlignResult;
use crate::layout::{GridCursor, GridLayout};
use crate::session::Session;

/// Summary of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    /// Groups whose children were laid out
    pub groups_visited: usize,
    /// Groups left untouched because they hold flow elements
    pub groups_skipped: usize,
    /// Position updates committed
    pub positions_updated: usize,
}

/// One group whose children are being placed
struct Level {
    group_id: GroupId,
    depth: Depth,
    pending: VecDeque<GroupRef>,
    cursor: GridCursor,
    // subtree of the front child already handled
    descended: bool,
}

/// Lays out child process groups in a grid
#[derive(Debug, Clone)]
pub struct AlignmentEngine<F: FlowApi> {
    flow: F,
    layout: GridLayout,
}

impl<F: FlowApi> AlignmentEngine<F> {
    /// Engine with the standard box size and spacing
    pub fn new(flow: F) -> Self {
        Self {
            flow,
            layout: GridLayout::default(),
        }
    }

    /// Override the grid geometry
    pub fn with_layout(mut self, layout: GridLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Underlying flow client
    pub fn flow(&self) -> &F {
        &self.flow
    }

    /// Align the tree below `request.root`
    ///
    /// A depth of zero returns immediately without contacting the server.
    #[instrument(skip(self, session, request), fields(root = %request.root, depth = %request.max_depth, columns = request.max_columns.get()))]
    pub async fn align(&self, session: &Session, request: &AlignmentRequest) -> AlignResult<AlignmentReport> {
        let mut report = AlignmentReport::default();
        if request.max_depth.is_zero() {
            debug!("Depth is zero, nothing to align");
            return Ok(report);
        }

        info!("Aligning Process Groups...");

        let root = self.flow.fetch_snapshot(session, &request.root).await?;
        let mut stack: Vec<Level> = Vec::new();
        if let Some(level) = self.open_level(root, request.max_depth, request.max_columns, &mut report) {
            stack.push(level);
        }

        while let Some(level) = stack.last_mut() {
            let Some(child) = level.pending.front().cloned() else {
                debug!(group = %level.group_id, "Level complete");
                stack.pop();
                continue;
            };

            if !level.descended {
                level.descended = true;
                if level.depth.recurses() {
                    let child_depth = level.depth.descend();
                    let snapshot = self.flow.fetch_snapshot(session, &child.id).await?;
                    if let Some(next) = self.open_level(snapshot, child_depth, request.max_columns, &mut report) {
                        stack.push(next);
                    }
                    continue;
                }
            }

            let cell = level.cursor.current();
            let position = self.layout.position(cell);
            debug!(
                group = %child.id,
                row = cell.row,
                col = cell.col,
                x = position.x,
                y = position.y,
                "Moving process group"
            );
            self.flow.update_position(session, &child, position).await?;
            report.positions_updated += 1;

            level.pending.pop_front();
            level.cursor.advance();
            level.descended = false;
        }

        info!(
            visited = report.groups_visited,
            skipped = report.groups_skipped,
            updated = report.positions_updated,
            "Aligning Completed!"
        );
        Ok(report)
    }

    /// Start a level for a freshly fetched group, or `None` when nothing is to be placed
    fn open_level(
        &self,
        snapshot: FlowSnapshot,
        depth: Depth,
        max_columns: NonZeroUsize,
        report: &mut AlignmentReport,
    ) -> Option<Level> {
        if !snapshot.is_eligible() {
            debug!(
                group = %snapshot.group_id,
                elements = snapshot.contents.total(),
                "Skipping group holding flow elements"
            );
            report.groups_skipped += 1;
            return None;
        }

        report.groups_visited += 1;
        if snapshot.child_groups.is_empty() {
            return None;
        }

        debug!(
            group = %snapshot.group_id,
            children = snapshot.child_groups.len(),
            depth = %depth,
            "Aligning child groups"
        );
        Some(Level {
            group_id: snapshot.group_id,
            depth,
            pending: snapshot.child_groups.into(),
            cursor: GridCursor::new(max_columns),
            descended: false,
        })
    }
}
