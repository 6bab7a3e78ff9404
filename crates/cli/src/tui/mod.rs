use std::io::stdout;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use windowgrid_config::Settings;
use windowgrid_engine::render::{ColumnLayout, FROZEN_COLUMNS};
use windowgrid_engine::GridView;

use crate::util;
use crate::window::{self, WindowCache};

/// Title bar + status bar
const CHROME_LINES: u16 = 2;

enum Mode {
    Normal,
    Editing { buffer: String },
}

struct TuiApp {
    view: GridView,
    layout: ColumnLayout,
    cache: WindowCache,
    /// Cursor in view coordinates
    cursor_row: usize,
    cursor_col: usize,
    /// First content row shown (view row)
    scroll_row: usize,
    /// First scrollable grid column shown
    scroll_col: usize,
    mode: Mode,
    px_per_char: f32,
    resize_step: f32,
    message: Option<String>,
    should_quit: bool,
    show_help: bool,
}

impl TuiApp {
    fn new(view: GridView, settings: &Settings) -> Self {
        Self {
            view,
            layout: ColumnLayout::new(),
            cache: WindowCache::new(),
            cursor_row: 0,
            cursor_col: 0,
            scroll_row: 0,
            scroll_col: FROZEN_COLUMNS,
            mode: Mode::Normal,
            px_per_char: settings.pixels_per_char,
            resize_step: settings.resize_step,
            message: None,
            should_quit: false,
            show_help: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            // Any key dismisses help
            self.show_help = false;
            return;
        }

        if let Mode::Editing { buffer } = &mut self.mode {
            match key.code {
                KeyCode::Char(c) => buffer.push(c),
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Enter => {
                    let value = std::mem::take(buffer);
                    self.finish_edit(Some(value));
                }
                KeyCode::Esc => self.finish_edit(None),
                _ => {}
            }
            return;
        }

        self.message = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::PageUp => self.move_cursor(-20, 0),
            KeyCode::PageDown => self.move_cursor(20, 0),
            KeyCode::Home | KeyCode::Char('g') => self.cursor_row = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor_row = self.view.row_count().saturating_sub(1);
            }
            KeyCode::Char('0') => self.cursor_col = 0,
            KeyCode::Char('$') => {
                self.cursor_col = self.view.col_count().saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char('e') => self.start_edit(),
            KeyCode::Char('<') => self.resize_current(-self.resize_step),
            KeyCode::Char('>') => self.resize_current(self.resize_step),
            _ => {}
        }
    }

    fn move_cursor(&mut self, drow: i64, dcol: i64) {
        let rows = self.view.row_count();
        let cols = self.view.col_count();
        if rows == 0 || cols == 0 {
            return;
        }
        self.cursor_row = (self.cursor_row as i64 + drow).clamp(0, rows as i64 - 1) as usize;
        self.cursor_col = (self.cursor_col as i64 + dcol).clamp(0, cols as i64 - 1) as usize;
    }

    fn start_edit(&mut self) {
        match self.view.cell(self.cursor_row, self.cursor_col) {
            Ok(value) => {
                self.mode = Mode::Editing {
                    buffer: value.unwrap_or_default(),
                };
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// `None` = the user backed out; the store is left alone.
    fn finish_edit(&mut self, value: Option<String>) {
        self.mode = Mode::Normal;
        match self
            .view
            .commit_edit(self.cursor_row + 1, self.cursor_col + 1, value)
        {
            Ok(true) => {}
            Ok(false) => self.message = Some("edit cancelled".to_string()),
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    fn resize_current(&mut self, delta: f32) {
        if let Err(e) = self.view.resize_column(self.cursor_col + 1, delta) {
            self.message = Some(e.to_string());
        }
    }

    fn width_px(&self, area_width: u16) -> f32 {
        area_width as f32 * self.px_per_char
    }

    fn ensure_visible(&mut self, visible_rows: usize, area_width: u16) {
        if self.cursor_row < self.scroll_row {
            self.scroll_row = self.cursor_row;
        }
        if visible_rows > 0 && self.cursor_row >= self.scroll_row + visible_rows {
            self.scroll_row = self.cursor_row - visible_rows + 1;
        }

        self.layout.sync(&self.view);
        let grid_col = self.cursor_col + 1;
        if grid_col < FROZEN_COLUMNS {
            return;
        }
        if grid_col < self.scroll_col {
            self.scroll_col = grid_col;
            return;
        }

        let width_px = self.width_px(area_width);
        let last_col = self.view.grid_extent().cols;
        loop {
            let w = window::compute(&self.view, &self.layout, 0, 0, self.scroll_col, width_px);
            let shown = w.cols.last().copied().unwrap_or(0);
            if shown >= grid_col || self.scroll_col + 1 >= last_col {
                break;
            }
            self.scroll_col += 1;
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_title(frame, chunks[0]);
        self.draw_grid(frame, chunks[1]);
        self.draw_status(frame, chunks[2]);

        if self.show_help {
            self.draw_help(frame, area);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            " wgrid: {} rows x {} cols ",
            self.view.row_count(),
            self.view.col_count()
        );
        let para = Paragraph::new(Line::from(vec![Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]))
        .style(Style::default().bg(Color::Cyan));
        frame.render_widget(para, area);
    }

    fn draw_grid(&mut self, frame: &mut Frame, area: Rect) {
        if self.view.row_count() == 0 || self.view.col_count() == 0 {
            let msg = Paragraph::new("(empty)").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(msg, area);
            return;
        }

        self.layout.sync(&self.view);
        let content_rows = area.height.saturating_sub(1) as usize;
        let win = window::compute(
            &self.view,
            &self.layout,
            self.scroll_row,
            content_rows,
            self.scroll_col,
            self.width_px(area.width),
        );
        let widths: Vec<usize> = win
            .cols
            .iter()
            .map(|&c| util::px_to_chars(self.layout.width_of(c).unwrap_or(0.0), self.px_per_char))
            .collect();

        let cells = match self.cache.fetch(&self.view, &win) {
            Ok(cells) => cells,
            Err(e) => {
                let msg = Paragraph::new(e.to_string()).style(Style::default().fg(Color::Red));
                frame.render_widget(msg, area);
                return;
            }
        };

        let mut lines: Vec<Line> = Vec::with_capacity(cells.len());
        for (grid_row, row) in win.grid_rows().zip(cells.iter()) {
            let mut spans = Vec::with_capacity(row.len());
            for ((&grid_col, cell), &w) in win.cols.iter().zip(row.iter()).zip(widths.iter()) {
                let on_cursor_row = grid_row == self.cursor_row + 1;
                let on_cursor_col = grid_col == self.cursor_col + 1;

                let style = if grid_row == 0 && on_cursor_col {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else if grid_row == 0 {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else if grid_col == 0 && on_cursor_row {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else if grid_col == 0 {
                    Style::default().fg(Color::DarkGray)
                } else if on_cursor_row && on_cursor_col {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else if on_cursor_row {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };

                let text = util::cell_text(cell);
                spans.push(Span::styled(format!("{} ", util::fit(&text, w)), style));
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let label = self
            .view
            .column_label(self.cursor_col)
            .unwrap_or_else(|_| "?".to_string());

        let left = match &self.mode {
            Mode::Editing { buffer } => {
                format!(" edit {} row {}: {}_", label, self.cursor_row + 1, buffer)
            }
            Mode::Normal => {
                let value = self
                    .view
                    .cell(self.cursor_row, self.cursor_col)
                    .ok()
                    .flatten();
                let width = self
                    .view
                    .column_width(self.cursor_col + 1)
                    .unwrap_or_default();
                let mut s = format!(
                    " {} row {} = {:?}  width {}",
                    label,
                    self.cursor_row + 1,
                    value.unwrap_or_default(),
                    width
                );
                if let Some(msg) = &self.message {
                    s.push_str("  | ");
                    s.push_str(msg);
                }
                s
            }
        };

        let key = self.view.render_key();
        let right = format!(
            "rev {}  view rev {}  ?: help ",
            key.store_revision, key.view_revision
        );

        let padding =
            (area.width as usize).saturating_sub(left.chars().count() + right.chars().count());
        let status = format!("{}{:pad$}{}", left, "", right, pad = padding);

        let para = Paragraph::new(Line::from(vec![Span::styled(
            status,
            Style::default().fg(Color::Black).bg(Color::DarkGray),
        )]))
        .style(Style::default().bg(Color::DarkGray));
        frame.render_widget(para, area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help_lines = [
            "",
            "  Navigation",
            "  ----------",
            "  arrows / hjkl    Move cursor",
            "  PgUp / PgDn      Page up/down",
            "  Home / g         First row",
            "  End  / G         Last row",
            "  0 / $            First / last column",
            "",
            "  Editing",
            "  -------",
            "  Enter / e        Edit cell (Esc cancels)",
            "  < / >            Narrow / widen column",
            "",
            "  General",
            "  -------",
            "  q / Esc          Quit",
            "  ?                Toggle this help",
            "",
        ];
        let help_width: u16 = 46;
        let help_height: u16 = help_lines.len() as u16 + 2;

        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let popup = Rect::new(
            area.x + x,
            area.y + y,
            help_width.min(area.width),
            help_height.min(area.height),
        );

        let lines: Vec<Line> = help_lines
            .iter()
            .map(|s| Line::from(Span::styled(*s, Style::default().fg(Color::White))))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Keybindings ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

/// Run the interactive viewer over `view`.
pub fn run(view: GridView, settings: &Settings) -> Result<(), String> {
    let mut app = TuiApp::new(view, settings);

    terminal::enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    loop {
        let term_size = terminal
            .size()
            .map(|s| Rect::new(0, 0, s.width, s.height))
            .unwrap_or_default();
        // One more line goes to the column header row
        let visible_rows = term_size.height.saturating_sub(CHROME_LINES + 1) as usize;
        app.ensure_visible(visible_rows, term_size.width);

        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        if event::poll(Duration::from_millis(100))
            .map_err(|e| format!("event poll error: {}", e))?
        {
            if let Event::Key(key) = event::read().map_err(|e| format!("event read error: {}", e))? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    log::debug!(
        "viewer closed at revision {} / view revision {}",
        app.view.store_revision(),
        app.view.view_revision()
    );
    Ok(())
}
