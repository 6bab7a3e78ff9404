use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use windowgrid_engine::GridCell;

/// Terminal cells needed for a pixel width. Never less than one.
pub(crate) fn px_to_chars(width_px: f32, px_per_char: f32) -> usize {
    if px_per_char <= 0.0 {
        return 1;
    }
    ((width_px / px_per_char).round() as usize).max(1)
}

/// Fit `s` into exactly `width` display columns: pad with spaces, or cut at a
/// char boundary and mark the cut with "~".
pub(crate) fn fit(s: &str, width: usize) -> String {
    let sw = UnicodeWidthStr::width(s);
    if sw <= width {
        return format!("{}{}", s, " ".repeat(width - sw));
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in s.chars() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    out.push('~');
    out.push_str(&" ".repeat(budget - used));
    out
}

/// Text a renderer shows for a grid cell.
pub(crate) fn cell_text(cell: &GridCell) -> String {
    match cell {
        GridCell::Corner => String::new(),
        GridCell::ColumnHeader(label) => label.clone(),
        GridCell::RowHeader(n) => n.to_string(),
        GridCell::Data(value) => value.clone().unwrap_or_default(),
    }
}
