//! Windowing: which grid cells are on screen, and a cache of their contents
//!
//! The frozen lanes (row numbers and the first data column) are always part of
//! the window; the remaining columns scroll. Horizontal placement is computed in
//! pixels against the view's `ColumnLayout`, vertical placement in rows.

use std::ops::Range;

use windowgrid_engine::render::{ColumnLayout, GridCell, FROZEN_COLUMNS, HEADER_ROWS};
use windowgrid_engine::{GridView, RenderKey, Result};

/// The grid coordinates one render pass covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Content rows, in grid rows (header row 0 is always drawn on top)
    pub rows: Range<usize>,
    /// Grid columns left to right, frozen lanes first
    pub cols: Vec<usize>,
}

impl Window {
    /// Header row followed by the content rows.
    pub fn grid_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..HEADER_ROWS).chain(self.rows.clone())
    }
}

/// Compute the window for a viewport.
///
/// `first_row` is the first content row as a VIEW row, `scroll_col` the first
/// scrollable GRID column. `width_px` is the whole viewport width.
pub fn compute(
    view: &GridView,
    layout: &ColumnLayout,
    first_row: usize,
    height: usize,
    scroll_col: usize,
    width_px: f32,
) -> Window {
    let extent = view.grid_extent();

    let start = first_row.saturating_add(HEADER_ROWS).min(extent.rows);
    let end = start.saturating_add(height).min(extent.rows);

    let frozen = FROZEN_COLUMNS.min(extent.cols);
    let mut cols: Vec<usize> = (0..frozen).collect();
    let frozen_px = layout.offset_of(frozen).unwrap_or_else(|| layout.total_width());

    let scroll_col = scroll_col.max(frozen);
    if let Some(scroll_x) = layout.offset_of(scroll_col) {
        let available = (width_px - frozen_px).max(0.0);
        let range = layout.visible_range(scroll_x, available);
        cols.extend(range.start.max(scroll_col)..range.end);
    }

    Window {
        rows: start..end,
        cols,
    }
}

/// Visible cell contents, re-fetched only when the window or a revision moves.
#[derive(Debug, Default)]
pub struct WindowCache {
    key: Option<(RenderKey, Window)>,
    cells: Vec<Vec<GridCell>>,
    fetches: usize,
}

impl WindowCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of cells for `window`, header row first.
    pub fn fetch(&mut self, view: &GridView, window: &Window) -> Result<&[Vec<GridCell>]> {
        let render_key = view.render_key();
        let fresh = matches!(&self.key, Some((k, w)) if !k.is_stale(render_key) && w == window);

        if !fresh {
            let mut cells = Vec::with_capacity(window.rows.len() + HEADER_ROWS);
            for grid_row in window.grid_rows() {
                let row = window
                    .cols
                    .iter()
                    .map(|&grid_col| view.grid_cell(grid_row, grid_col))
                    .collect::<Result<Vec<_>>>()?;
                cells.push(row);
            }
            self.cells = cells;
            self.key = Some((render_key, window.clone()));
            self.fetches += 1;
            log::trace!("fetched {} visible rows", self.cells.len());
        }

        Ok(&self.cells)
    }

    /// Number of times cell contents were actually re-read.
    pub fn fetches(&self) -> usize {
        self.fetches
    }
}
