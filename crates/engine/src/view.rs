//! Grid View - the projection layer between renderer and store
//!
//! This module maps between:
//! - View space (what the renderer asks for)
//! - Storage space (where the data lives in `CellStore`)
//!
//! Key invariants:
//! - Renderer code uses view space, `CellStore` uses storage space
//! - Conversion happens here only
//! - Projections only ever hold valid storage indices
//! - Column presentation state is keyed by STORAGE column, so widths survive reordering
//! - All lookups are O(1)
//!
//! Two change tokens are exposed: `CellStore::revision` for cell content and
//! `GridView::view_revision` for geometry. Cell edits never touch the latter.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::column::{ColumnState, MIN_COLUMN_WIDTH};
use crate::error::{Axis, GridError, Result};
use crate::projection::{Identity, Projection};
use crate::render::ROW_HEADER_WIDTH;
use crate::store::CellStore;

/// Shared handle to a store. Several views may sit on one store; all cell
/// mutation still goes through `CellStore::set`.
pub type SharedStore = Rc<RefCell<CellStore>>;

#[derive(Debug)]
pub struct GridView {
    store: SharedStore,

    row_source: Box<dyn Projection>,
    col_source: Box<dyn Projection>,

    /// Maps view_row index -> storage row index
    row_projection: Vec<usize>,
    /// Maps view_col index -> storage col index
    col_projection: Vec<usize>,

    /// Presentation state by STORAGE column (not view column)
    columns: FxHashMap<usize, ColumnState>,

    view_revision: u64,
    min_column_width: f32,
}

impl GridView {
    /// Bind to a store with identity projections.
    pub fn new(store: SharedStore) -> Self {
        Self::with_projections(store, Identity, Identity)
    }

    /// Bind to a store with explicit row/column projection strategies.
    pub fn with_projections(
        store: SharedStore,
        rows: impl Projection + 'static,
        cols: impl Projection + 'static,
    ) -> Self {
        let mut view = Self {
            store,
            row_source: Box::new(rows),
            col_source: Box::new(cols),
            row_projection: Vec::new(),
            col_projection: Vec::new(),
            columns: FxHashMap::default(),
            view_revision: 1,
            min_column_width: MIN_COLUMN_WIDTH,
        };
        // Initial build is not a geometry change
        view.rebuild();
        view
    }

    /// Rebuild projections against the store's current cardinality.
    ///
    /// Existing column widths are kept. Bumps `view_revision` only when a
    /// projection actually changed. Returns whether it did.
    pub fn refresh(&mut self) -> bool {
        let changed = self.rebuild();
        if changed {
            self.view_revision += 1;
            log::debug!("view refreshed, view_revision {}", self.view_revision);
        }
        changed
    }

    /// Swap the row strategy and refresh. Returns whether the projection changed.
    pub fn set_row_projection(&mut self, rows: impl Projection + 'static) -> bool {
        self.row_source = Box::new(rows);
        self.refresh()
    }

    /// Swap the column strategy and refresh. Widths stay with their storage columns.
    pub fn set_col_projection(&mut self, cols: impl Projection + 'static) -> bool {
        self.col_source = Box::new(cols);
        self.refresh()
    }

    fn rebuild(&mut self) -> bool {
        let (row_len, col_len) = {
            let store = self.store.borrow();
            (store.row_count(), store.col_count())
        };

        let rows = valid_indices(self.row_source.project(row_len), row_len, Axis::Row);
        let cols = valid_indices(self.col_source.project(col_len), col_len, Axis::Column);

        for col in 0..col_len {
            self.columns.entry(col).or_default();
        }

        let changed = rows != self.row_projection || cols != self.col_projection;
        self.row_projection = rows;
        self.col_projection = cols;
        changed
    }

    // -------------------------------------------------------------------------
    // Counts & tokens
    // -------------------------------------------------------------------------

    pub fn row_count(&self) -> usize {
        self.row_projection.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_projection.len()
    }

    /// Geometry revision. Starts at 1.
    pub fn view_revision(&self) -> u64 {
        self.view_revision
    }

    /// Data revision of the bound store.
    pub fn store_revision(&self) -> u64 {
        self.store.borrow().revision()
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn row_projection(&self) -> &[usize] {
        &self.row_projection
    }

    pub fn col_projection(&self) -> &[usize] {
        &self.col_projection
    }

    // -------------------------------------------------------------------------
    // View -> storage
    // -------------------------------------------------------------------------

    /// Map view row to storage row - O(1)
    pub fn storage_row(&self, view_row: usize) -> Result<usize> {
        self.row_projection
            .get(view_row)
            .copied()
            .ok_or_else(|| GridError::row(view_row, self.row_projection.len()))
    }

    /// Map view column to storage column - O(1)
    pub fn storage_col(&self, view_col: usize) -> Result<usize> {
        self.col_projection
            .get(view_col)
            .copied()
            .ok_or_else(|| GridError::column(view_col, self.col_projection.len()))
    }

    fn resolve(&self, view_row: usize, view_col: usize) -> Result<(usize, usize)> {
        Ok((self.storage_row(view_row)?, self.storage_col(view_col)?))
    }

    // -------------------------------------------------------------------------
    // Cells
    // -------------------------------------------------------------------------

    pub fn cell(&self, view_row: usize, view_col: usize) -> Result<Option<String>> {
        let (row, col) = self.resolve(view_row, view_col)?;
        let store = self.store.borrow();
        Ok(store.get(row, col)?.map(str::to_owned))
    }

    /// Write through to the store. Returns the store's new revision.
    pub fn set_cell(
        &mut self,
        view_row: usize,
        view_col: usize,
        value: impl Into<String>,
    ) -> Result<u64> {
        let (row, col) = self.resolve(view_row, view_col)?;
        self.store.borrow_mut().set(row, col, value)
    }

    pub fn column_label(&self, view_col: usize) -> Result<String> {
        let col = self.storage_col(view_col)?;
        let store = self.store.borrow();
        store.column_identifier(col).map(str::to_owned)
    }

    // -------------------------------------------------------------------------
    // Column presentation
    //
    // These take GRID columns: column 0 is the row-header lane, column N
    // (N >= 1) is view column N-1.
    // -------------------------------------------------------------------------

    pub fn presentation_state(&self, grid_col: usize) -> Result<ColumnState> {
        if grid_col == 0 {
            return Ok(ColumnState::with_width(ROW_HEADER_WIDTH));
        }
        let col = self.storage_col(grid_col - 1)?;
        Ok(self.columns.get(&col).copied().unwrap_or_default())
    }

    /// Add `delta` to a column's width, clamped to the view's minimum width.
    ///
    /// The row-header lane is fixed: resizing it does nothing and returns
    /// `Ok(false)` without bumping `view_revision`.
    pub fn resize_column(&mut self, grid_col: usize, delta: f32) -> Result<bool> {
        if grid_col == 0 {
            log::debug!("ignoring resize of row-header lane");
            return Ok(false);
        }
        let col = self.storage_col(grid_col - 1)?;
        let min = self.min_column_width;

        let state = self.columns.entry(col).or_default();
        state.resize_by(delta);
        if state.width() < min {
            state.set_width(min);
        }
        let width = state.width();

        self.view_revision += 1;
        log::debug!(
            "resized storage column {} to {} (view_revision {})",
            col,
            width,
            self.view_revision
        );
        Ok(true)
    }

    /// Presentation state for a storage column, if the view tracks it.
    pub fn column_state(&self, storage_col: usize) -> Option<&ColumnState> {
        self.columns.get(&storage_col)
    }

    pub fn min_column_width(&self) -> f32 {
        self.min_column_width
    }

    /// Only affects later resizes; existing widths are left as they are.
    pub fn set_min_column_width(&mut self, width: f32) {
        self.min_column_width = width;
    }
}

/// Drop indices a projection produced that are not valid storage indices.
fn valid_indices(mut indices: Vec<usize>, len: usize, axis: Axis) -> Vec<usize> {
    let before = indices.len();
    indices.retain(|&i| i < len);
    if indices.len() != before {
        log::warn!(
            "{} projection produced {} index(es) outside 0..{}; dropped",
            axis,
            before - indices.len(),
            len
        );
    }
    indices
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::projection::Fixed;
    use crate::render::ColumnLayout;

    fn shared(rows: usize, cols: usize) -> SharedStore {
        Rc::new(RefCell::new(CellStore::new(rows, cols)))
    }

    #[test]
    fn test_identity_projection() {
        let view = GridView::new(shared(4, 3));
        assert_eq!(view.row_count(), 4);
        assert_eq!(view.col_count(), 3);
        assert_eq!(view.row_projection(), &[0, 1, 2, 3]);
        assert_eq!(view.col_projection(), &[0, 1, 2]);
        assert_eq!(view.view_revision(), 1);
        for c in 0..3 {
            assert_eq!(view.column_state(c).map(|s| s.width()), Some(100.0));
        }
    }

    #[test]
    fn test_cell_lookup_and_write_through() {
        let mut view = GridView::new(shared(3, 2));
        assert_eq!(view.cell(1, 1).unwrap().as_deref(), Some("r:1:c:1"));

        assert_eq!(view.set_cell(1, 1, "hello").unwrap(), 2);
        assert_eq!(view.cell(1, 1).unwrap().as_deref(), Some("hello"));
        assert_eq!(view.store_revision(), 2);
        // Cell edits are not geometry changes
        assert_eq!(view.view_revision(), 1);
    }

    #[test]
    fn test_out_of_range_lookups() {
        let mut view = GridView::new(shared(3, 2));
        assert_eq!(
            view.cell(3, 0),
            Err(GridError::OutOfRange { axis: Axis::Row, index: 3, len: 3 })
        );
        assert_eq!(
            view.cell(0, 2),
            Err(GridError::OutOfRange { axis: Axis::Column, index: 2, len: 2 })
        );
        assert!(view.set_cell(3, 0, "x").is_err());
        assert!(view.column_label(2).is_err());
        assert!(view.presentation_state(3).is_err());
        assert_eq!(view.store_revision(), 1);
    }

    #[test]
    fn test_header_lane_convention() {
        let view = GridView::new(shared(2, 2));
        assert_eq!(view.presentation_state(0).unwrap().width(), 50.0);
        assert_eq!(view.presentation_state(1).unwrap().width(), 100.0);
        assert_eq!(view.presentation_state(2).unwrap().width(), 100.0);
    }

    #[test]
    fn test_resize_column() {
        let mut view = GridView::new(shared(2, 2));
        assert!(view.resize_column(1, 15.0).unwrap());
        assert_eq!(view.presentation_state(1).unwrap().width(), 115.0);
        assert_eq!(view.presentation_state(2).unwrap().width(), 100.0);
        assert_eq!(view.view_revision(), 2);
        assert_eq!(view.store_revision(), 1);
    }

    #[test]
    fn test_resize_header_lane_is_noop() {
        let mut view = GridView::new(shared(2, 2));
        assert!(!view.resize_column(0, 30.0).unwrap());
        assert_eq!(view.presentation_state(0).unwrap().width(), 50.0);
        assert_eq!(view.view_revision(), 1);
    }

    #[test]
    fn test_resize_out_of_range() {
        let mut view = GridView::new(shared(2, 2));
        assert!(view.resize_column(3, 10.0).is_err());
        assert_eq!(view.view_revision(), 1);
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let mut view = GridView::new(shared(1, 1));
        view.resize_column(1, -500.0).unwrap();
        assert_eq!(view.presentation_state(1).unwrap().width(), MIN_COLUMN_WIDTH);

        view.set_min_column_width(0.0);
        view.resize_column(1, -500.0).unwrap();
        assert_eq!(view.presentation_state(1).unwrap().width(), 0.0);
        assert_eq!(view.view_revision(), 3);
    }

    #[test]
    fn test_refresh_idempotent_and_keeps_widths() {
        let mut view = GridView::new(shared(3, 3));
        view.resize_column(2, 40.0).unwrap();
        let rows = view.row_projection().to_vec();
        let cols = view.col_projection().to_vec();
        let revision = view.view_revision();

        assert!(!view.refresh());
        assert!(!view.refresh());
        assert_eq!(view.row_projection(), rows.as_slice());
        assert_eq!(view.col_projection(), cols.as_slice());
        assert_eq!(view.presentation_state(2).unwrap().width(), 140.0);
        assert_eq!(view.view_revision(), revision);
    }

    /// Identity until flipped, then reversed.
    #[derive(Debug)]
    struct Reversible(Rc<Cell<bool>>);

    impl Projection for Reversible {
        fn project(&self, len: usize) -> Vec<usize> {
            if self.0.get() {
                (0..len).rev().collect()
            } else {
                (0..len).collect()
            }
        }
    }

    #[test]
    fn test_refresh_picks_up_changed_projection() {
        let flipped = Rc::new(Cell::new(false));
        let mut view =
            GridView::with_projections(shared(2, 3), Identity, Reversible(flipped.clone()));
        view.resize_column(1, 30.0).unwrap();
        assert_eq!(view.view_revision(), 2);

        let mut layout = ColumnLayout::new();
        assert!(layout.sync(&view));
        assert_eq!(layout.width_of(1), Some(130.0));

        flipped.set(true);
        assert!(view.refresh());
        assert_eq!(view.col_projection(), &[2, 1, 0]);
        assert_eq!(view.view_revision(), 3);
        assert_eq!(view.column_label(0).unwrap(), "Column:2");

        // Storage column 0 moved to the right edge and took its width along
        assert!(layout.sync(&view));
        assert_eq!(layout.width_of(1), Some(100.0));
        assert_eq!(layout.width_of(3), Some(130.0));

        assert!(!view.refresh());
        assert_eq!(view.view_revision(), 3);
        assert!(!layout.sync(&view));
    }

    #[test]
    fn test_swap_projection_strategy() {
        let mut view = GridView::new(shared(4, 2));
        assert!(view.set_row_projection(Fixed(vec![3, 0])));
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.cell(0, 1).unwrap().as_deref(), Some("r:3:c:1"));
        assert_eq!(view.view_revision(), 2);

        // Same resulting projection: no geometry change
        assert!(!view.set_row_projection(Fixed(vec![3, 0])));
        assert!(!view.set_col_projection(Identity));
        assert_eq!(view.view_revision(), 2);

        assert!(view.set_col_projection(Fixed(vec![1])));
        assert_eq!(view.column_label(0).unwrap(), "Column:1");
        assert_eq!(view.view_revision(), 3);
    }

    #[test]
    fn test_non_identity_projection() {
        let store = shared(4, 3);
        let mut view = GridView::with_projections(store.clone(), Fixed(vec![3, 1]), Fixed(vec![2, 0]));
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.col_count(), 2);
        assert_eq!(view.cell(0, 0).unwrap().as_deref(), Some("r:3:c:2"));
        assert_eq!(view.column_label(1).unwrap(), "Column:0");

        view.set_cell(1, 0, "moved").unwrap();
        assert_eq!(store.borrow().get(1, 2).unwrap(), Some("moved"));
    }

    #[test]
    fn test_widths_follow_storage_column() {
        let store = shared(1, 3);
        let mut view = GridView::with_projections(store, Identity, Fixed(vec![2, 1, 0]));
        // Grid column 1 is view column 0, which is storage column 2
        view.resize_column(1, 25.0).unwrap();
        assert_eq!(view.column_state(2).map(|s| s.width()), Some(125.0));
        assert_eq!(view.column_state(0).map(|s| s.width()), Some(100.0));
    }

    #[test]
    fn test_invalid_projection_indices_dropped() {
        let view = GridView::with_projections(shared(2, 2), Fixed(vec![0, 5, 1]), Fixed(vec![7]));
        assert_eq!(view.row_projection(), &[0, 1]);
        assert_eq!(view.col_count(), 0);
        // Presentation state still exists for every storage column
        assert!(view.column_state(0).is_some());
        assert!(view.column_state(1).is_some());
    }

    #[test]
    fn test_two_views_share_one_store() {
        let store = shared(2, 2);
        let mut left = GridView::new(store.clone());
        let right = GridView::with_projections(store, Fixed(vec![1, 0]), Identity);

        left.set_cell(0, 0, "shared").unwrap();
        assert_eq!(right.cell(1, 0).unwrap().as_deref(), Some("shared"));
        assert_eq!(right.store_revision(), 2);

        left.resize_column(1, 10.0).unwrap();
        assert_eq!(right.presentation_state(1).unwrap().width(), 100.0);
        assert_eq!(right.view_revision(), 1);
    }
}
