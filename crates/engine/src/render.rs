//! Renderer boundary
//!
//! A windowed renderer addresses the grid in GRID coordinates: row 0 holds the
//! column headers, column 0 holds the row numbers, and content cell
//! (grid_row, grid_col) is view cell (grid_row - 1, grid_col - 1).
//!
//! The renderer keeps a `RenderKey` from its last pass and only re-fetches
//! visible cells when the key moves. Column geometry is cached in a
//! `ColumnLayout`, rebuilt only when `view_revision` changes.

use std::ops::Range;

use crate::error::{GridError, Result};
use crate::view::GridView;

/// Rows pinned at the top (column headers).
pub const HEADER_ROWS: usize = 1;
/// Columns pinned at the left: the row-number lane and the first data column.
pub const FROZEN_COLUMNS: usize = 2;
/// Fixed width of the row-number lane.
pub const ROW_HEADER_WIDTH: f32 = 50.0;
pub const DEFAULT_ROW_HEIGHT: f32 = 20.0;

/// Total addressable grid, header lanes included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridExtent {
    pub rows: usize,
    pub cols: usize,
}

/// What the renderer should draw at a grid coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    /// Top-left cell, always blank
    Corner,
    /// Column label for grid column N
    ColumnHeader(String),
    /// 1-based row number
    RowHeader(usize),
    /// Content cell; `None` if the row has no entry for this column
    Data(Option<String>),
}

/// Cache-invalidation tokens for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderKey {
    pub view_revision: u64,
    pub store_revision: u64,
}

impl RenderKey {
    /// True when `current` differs, i.e. visible cells must be re-fetched.
    pub fn is_stale(&self, current: RenderKey) -> bool {
        *self != current
    }
}

impl GridView {
    pub fn grid_extent(&self) -> GridExtent {
        GridExtent {
            rows: self.row_count() + HEADER_ROWS,
            cols: self.col_count() + 1,
        }
    }

    pub fn render_key(&self) -> RenderKey {
        RenderKey {
            view_revision: self.view_revision(),
            store_revision: self.store_revision(),
        }
    }

    pub fn column_width(&self, grid_col: usize) -> Result<f32> {
        self.presentation_state(grid_col).map(|s| s.width())
    }

    pub fn grid_cell(&self, grid_row: usize, grid_col: usize) -> Result<GridCell> {
        match (grid_row, grid_col) {
            (0, 0) => Ok(GridCell::Corner),
            (0, c) => Ok(GridCell::ColumnHeader(self.column_label(c - 1)?)),
            (r, 0) => {
                if r > self.row_count() {
                    return Err(GridError::row(r - 1, self.row_count()));
                }
                Ok(GridCell::RowHeader(r))
            }
            (r, c) => Ok(GridCell::Data(self.cell(r - 1, c - 1)?)),
        }
    }

    /// User-edit path. `None` means the user cancelled: nothing changes.
    ///
    /// Header lanes are not editable and are ignored. Returns whether a
    /// write happened.
    pub fn commit_edit(
        &mut self,
        grid_row: usize,
        grid_col: usize,
        value: Option<String>,
    ) -> Result<bool> {
        let Some(value) = value else {
            return Ok(false);
        };
        if grid_row == 0 || grid_col == 0 {
            return Ok(false);
        }
        self.set_cell(grid_row - 1, grid_col - 1, value)?;
        Ok(true)
    }
}

/// Renderer-side column size table (prefix sums over grid column widths).
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    /// view_revision the table was built at; 0 = never built
    view_revision: u64,
    /// offsets[i] = left edge of grid column i; last entry = total width
    offsets: Vec<f32>,
}

impl ColumnLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild if the view's geometry moved since the last build.
    /// Returns whether a rebuild happened.
    pub fn sync(&mut self, view: &GridView) -> bool {
        let cols = view.grid_extent().cols;
        if self.view_revision == view.view_revision() && self.offsets.len() == cols + 1 {
            return false;
        }

        self.offsets.clear();
        self.offsets.reserve(cols + 1);
        let mut x = 0.0f32;
        self.offsets.push(x);
        for grid_col in 0..cols {
            // Negative widths would break the binary search below
            let w = view.column_width(grid_col).unwrap_or(0.0).max(0.0);
            x += w;
            self.offsets.push(x);
        }
        self.view_revision = view.view_revision();
        true
    }

    pub fn column_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn total_width(&self) -> f32 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    pub fn offset_of(&self, grid_col: usize) -> Option<f32> {
        if grid_col < self.column_count() {
            Some(self.offsets[grid_col])
        } else {
            None
        }
    }

    pub fn width_of(&self, grid_col: usize) -> Option<f32> {
        if grid_col < self.column_count() {
            Some(self.offsets[grid_col + 1] - self.offsets[grid_col])
        } else {
            None
        }
    }

    /// Grid columns intersecting [scroll_x, scroll_x + viewport_width).
    pub fn visible_range(&self, scroll_x: f32, viewport_width: f32) -> Range<usize> {
        let n = self.column_count();
        if n == 0 {
            return 0..0;
        }
        let stop = scroll_x + viewport_width;
        let start = self.offsets[1..].partition_point(|&end| end <= scroll_x);
        let end = self.offsets[..n].partition_point(|&left| left < stop);
        start..end.max(start)
    }
}
