//! Per-column presentation state, keyed by storage column so it survives
//! any reordering of the view.

/// Default width for a data column.
pub const DEFAULT_COLUMN_WIDTH: f32 = 100.0;

/// Floor applied by `GridView::resize_column` unless the view overrides it.
pub const MIN_COLUMN_WIDTH: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnState {
    width: f32,
}

impl Default for ColumnState {
    fn default() -> Self {
        Self {
            width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl ColumnState {
    pub fn with_width(width: f32) -> Self {
        Self { width }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// No validation: callers decide what a sensible width is.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn resize_by(&mut self, delta: f32) {
        self.width += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_width() {
        assert_eq!(ColumnState::default().width(), 100.0);
    }

    #[test]
    fn test_resize_is_unvalidated() {
        let mut state = ColumnState::default();
        state.resize_by(-150.0);
        assert_eq!(state.width(), -50.0);
        state.set_width(0.0);
        assert_eq!(state.width(), 0.0);
    }
}
