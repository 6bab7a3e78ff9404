//! Data/view core for a windowed grid renderer.
//!
//! `CellStore` owns the cells, `GridView` projects view coordinates onto
//! storage and tracks column presentation, `render` is the boundary a
//! virtualized renderer talks to.

pub mod column;
pub mod error;
pub mod projection;
pub mod render;
pub mod store;
pub mod view;

pub use column::{ColumnState, DEFAULT_COLUMN_WIDTH, MIN_COLUMN_WIDTH};
pub use error::{Axis, GridError, Result};
pub use projection::{Fixed, Identity, Projection};
pub use render::{ColumnLayout, GridCell, GridExtent, RenderKey};
pub use store::{CellStore, Row};
pub use view::{GridView, SharedStore};
