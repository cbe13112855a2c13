//! Grid geometry for process groups on the canvas
//!
//! Pure functions only; nothing here talks to the server.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Width of a process group box in canvas units
pub const GROUP_WIDTH: f64 = 384.0;
/// Height of a process group box in canvas units
pub const GROUP_HEIGHT: f64 = 176.0;
/// Gap between neighbouring boxes
pub const GROUP_GAP: f64 = 10.0;

/// Position on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Create a position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Cell of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Zero-based row
    pub row: usize,
    /// Zero-based column
    pub col: usize,
}

impl GridCell {
    /// Row-major cell of the `index`-th sibling
    pub fn for_index(index: usize, max_columns: NonZeroUsize) -> Self {
        Self {
            row: index / max_columns.get(),
            col: index % max_columns.get(),
        }
    }
}

/// Fixed box size and spacing used to turn cells into coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Box width
    pub node_width: f64,
    /// Box height
    pub node_height: f64,
    /// Spacing between boxes
    pub gap: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            node_width: GROUP_WIDTH,
            node_height: GROUP_HEIGHT,
            gap: GROUP_GAP,
        }
    }
}

impl GridLayout {
    /// Canvas position of the top-left corner of a cell
    pub fn position(&self, cell: GridCell) -> Position {
        Position {
            x: cell.col as f64 * (self.node_width + self.gap),
            y: cell.row as f64 * (self.node_height + self.gap),
        }
    }
}

/// Running row/column counter for the siblings of one level
#[derive(Debug, Clone, Copy)]
pub struct GridCursor {
    max_columns: NonZeroUsize,
    row: usize,
    col: usize,
}

impl GridCursor {
    /// Cursor at the top-left cell
    pub fn new(max_columns: NonZeroUsize) -> Self {
        Self {
            max_columns,
            row: 0,
            col: 0,
        }
    }

    /// Cell the next sibling will occupy
    pub fn current(&self) -> GridCell {
        GridCell {
            row: self.row,
            col: self.col,
        }
    }

    /// Move to the next cell, wrapping to a new row after the last column
    pub fn advance(&mut self) {
        self.col += 1;
        if self.col == self.max_columns.get() {
            self.col = 0;
            self.row += 1;
        }
    }
}
