// windowgrid CLI - browse a large synthetic grid through the data/view core

mod dump;
mod exit_codes;
mod tui;
mod util;
mod window;

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Args, Parser, Subcommand};

use windowgrid_config::Settings;
use windowgrid_engine::{CellStore, GridView};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("WGRID_COMMIT"),
    ", ",
    env!("WGRID_TARGET"),
    ")"
);

#[derive(Parser)]
#[command(name = "wgrid")]
#[command(about = "Windowed viewer for large tabular datasets")]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// Rows in the generated dataset (default from settings)
    #[arg(long)]
    rows: Option<usize>,

    /// Columns in the generated dataset (default from settings)
    #[arg(long)]
    cols: Option<usize>,

    /// Settings file (default: platform config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the grid interactively
    #[command(after_help = "\
Examples:
  wgrid peek
  wgrid peek --rows 20000 --cols 100

Every cell is allocated up front: budget roughly 50 bytes per cell.")]
    Peek {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Print one window of the grid to stdout
    #[command(after_help = "\
Examples:
  wgrid dump --rows 100 --cols 20
  wgrid dump --row-offset 5000 --col-offset 40 --height 10
  wgrid dump --set 0,0=hello --resize 1:40")]
    Dump {
        #[command(flatten)]
        data: DataArgs,

        /// First content row shown (0-based view row)
        #[arg(long, default_value_t = 0)]
        row_offset: usize,

        /// First scrolled column shown (0-based view column)
        #[arg(long, default_value_t = 0)]
        col_offset: usize,

        /// Content rows to print
        #[arg(long, default_value_t = 20)]
        height: usize,

        /// Line width in characters
        #[arg(long, default_value_t = 120)]
        width: usize,

        /// Write a cell before rendering: ROW,COL=VALUE (view coordinates). Repeatable.
        #[arg(long, value_name = "ROW,COL=VALUE")]
        set: Vec<String>,

        /// Resize a column before rendering: GRID_COL:DELTA (pixels). Repeatable.
        #[arg(long, value_name = "GRID_COL:DELTA", allow_hyphen_values = true)]
        resize: Vec<String>,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into() }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into() }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Peek { data } => cmd_peek(data),
        Commands::Dump {
            data,
            row_offset,
            col_offset,
            height,
            width,
            set,
            resize,
        } => cmd_dump(data, row_offset, col_offset, height, width, set, resize),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            ExitCode::from(code)
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Settings::load_from(path).map_err(|e| CliError::args(e.to_string())),
        None => Ok(Settings::load()),
    }
}

/// Build the store/view pair the rest of the program works through.
fn build_view(settings: &Settings, data: &DataArgs) -> GridView {
    let rows = data.rows.unwrap_or(settings.rows);
    let cols = data.cols.unwrap_or(settings.cols);
    log::info!("building {}x{} grid", rows, cols);

    let store = Rc::new(RefCell::new(CellStore::new(rows, cols)));
    let mut view = GridView::new(store);
    view.set_min_column_width(settings.min_column_width);
    view
}

fn cmd_peek(data: DataArgs) -> Result<(), CliError> {
    let settings = load_settings(data.config.as_ref())?;
    let view = build_view(&settings, &data);
    tui::run(view, &settings).map_err(CliError::runtime)
}

fn cmd_dump(
    data: DataArgs,
    row_offset: usize,
    col_offset: usize,
    height: usize,
    width: usize,
    set: Vec<String>,
    resize: Vec<String>,
) -> Result<(), CliError> {
    let settings = load_settings(data.config.as_ref())?;
    let mut view = build_view(&settings, &data);

    for arg in &set {
        let (row, col, value) = dump::parse_set(arg).map_err(CliError::args)?;
        view.set_cell(row, col, value)
            .map_err(|e| CliError::runtime(format!("--set {}: {}", arg, e)))?;
    }
    for arg in &resize {
        let (grid_col, delta) = dump::parse_resize(arg).map_err(CliError::args)?;
        view.resize_column(grid_col, delta)
            .map_err(|e| CliError::runtime(format!("--resize {}: {}", arg, e)))?;
    }

    let win = dump::DumpWindow {
        row_offset,
        col_offset,
        height,
        width,
        px_per_char: settings.pixels_per_char,
    };
    let lines = dump::render(&view, &win).map_err(|e| CliError::runtime(e.to_string()))?;
    for line in lines {
        println!("{}", line);
    }

    let key = view.render_key();
    println!(
        "-- {} rows x {} cols, revision {}, view revision {}",
        view.row_count(),
        view.col_count(),
        key.store_revision,
        key.view_revision
    );
    Ok(())
}
