//! Headless render pass: one window of the grid as plain text.

use windowgrid_engine::render::{ColumnLayout, FROZEN_COLUMNS};
use windowgrid_engine::{GridView, Result};

use crate::util;
use crate::window::{self, WindowCache};

/// Where the window sits and how big it is, in terminal cells.
#[derive(Debug, Clone, Copy)]
pub struct DumpWindow {
    /// First content row (view row)
    pub row_offset: usize,
    /// First scrolled data column (view column); the frozen lanes are always shown
    pub col_offset: usize,
    pub height: usize,
    pub width: usize,
    pub px_per_char: f32,
}

/// Render the window into text lines: header row, then content rows.
pub fn render(view: &GridView, win: &DumpWindow) -> Result<Vec<String>> {
    let mut layout = ColumnLayout::new();
    layout.sync(view);

    // View column N is grid column N + 1; scrolling never goes left of the frozen lanes
    let scroll_col = win.col_offset.saturating_add(1).max(FROZEN_COLUMNS);
    let grid = window::compute(
        view,
        &layout,
        win.row_offset,
        win.height,
        scroll_col,
        win.width as f32 * win.px_per_char,
    );

    let widths: Vec<usize> = grid
        .cols
        .iter()
        .map(|&c| util::px_to_chars(layout.width_of(c).unwrap_or(0.0), win.px_per_char))
        .collect();

    let mut cache = WindowCache::new();
    let cells = cache.fetch(view, &grid)?;

    let lines = cells
        .iter()
        .map(|row| {
            let line: String = row
                .iter()
                .zip(widths.iter())
                .map(|(cell, &w)| format!("{} ", util::fit(&util::cell_text(cell), w)))
                .collect();
            line.trim_end().to_string()
        })
        .collect();
    Ok(lines)
}

/// Parse `ROW,COL=VALUE` (view coordinates, 0-based).
pub fn parse_set(arg: &str) -> std::result::Result<(usize, usize, String), String> {
    let (coords, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ROW,COL=VALUE, got '{}'", arg))?;
    let (row, col) = coords
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL=VALUE, got '{}'", arg))?;
    let row = parse_index(row, arg)?;
    let col = parse_index(col, arg)?;
    Ok((row, col, value.to_string()))
}

/// Parse `GRID_COL:DELTA`.
pub fn parse_resize(arg: &str) -> std::result::Result<(usize, f32), String> {
    let (col, delta) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected GRID_COL:DELTA, got '{}'", arg))?;
    let col = parse_index(col, arg)?;
    let delta = delta
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|d| d.is_finite())
        .ok_or_else(|| format!("invalid delta in '{}'", arg))?;
    Ok((col, delta))
}

fn parse_index(s: &str, arg: &str) -> std::result::Result<usize, String> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid index '{}' in '{}'", s.trim(), arg))
}
