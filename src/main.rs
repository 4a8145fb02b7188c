use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;

use desk_wm::config::{Capabilities, WmConfig};
use desk_wm::constants::DEFAULT_SNAP_THRESHOLD;
use desk_wm::drivers::console::{ConsoleInputDriver, ConsoleOutput};
use desk_wm::runner::{Desktop, run_desktop};
use desk_wm::terminal_surface::CellScale;
use desk_wm::tracing_sub;

#[derive(Parser, Debug)]
#[command(
    name = "desk-wm",
    version,
    about = "A desktop-style window manager running in the terminal.",
    after_help = indoc! {"
        Keys:
          Ctrl+N  new window        Ctrl+W  close
          Ctrl+M  maximize/restore  Ctrl+H  minimize
          Ctrl+R  restore           Alt+Left/Right  snap
          Tab     cycle focus       F2      touch layout
          F3      mouse capture     Ctrl+Q  quit

        Drag a title bar to move a window; drop it on the left or right
        edge to snap. Drag the right or bottom border to resize.
    "}
)]
struct Args {
    /// Horizontal pixels represented by one terminal column.
    #[arg(long, default_value_t = 8)]
    px_per_col: u32,

    /// Vertical pixels represented by one terminal row.
    #[arg(long, default_value_t = 16)]
    px_per_row: u32,

    /// Distance in pixels from a viewport edge that arms a snap. 0 disables.
    #[arg(long, default_value_t = DEFAULT_SNAP_THRESHOLD)]
    snap_threshold: u32,

    /// Start in the touch layout: full-surface windows, no drag or resize.
    #[arg(long)]
    touch: bool,

    /// Windows to open at startup.
    #[arg(long, default_value_t = 2)]
    windows: usize,

    /// Append debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        tracing_sub::init_with_file(path)?;
    }

    let capabilities = if args.touch {
        Capabilities::touch()
    } else {
        Capabilities::desktop()
    };
    let config = WmConfig::default()
        .with_snap_threshold(args.snap_threshold)
        .with_capabilities(capabilities);
    let scale = CellScale::new(args.px_per_col, args.px_per_row);
    let (cols, rows) = crossterm::terminal::size()?;
    let mut desktop = Desktop::new(config, scale, cols, rows);
    for _ in 0..args.windows {
        desktop.open_window();
    }
    tracing::info!(cols, rows, ?scale, windows = args.windows, "desktop starting");

    let mut output = ConsoleOutput::new()?;
    output.enter()?;
    let result = run_desktop(
        output.terminal_mut(),
        ConsoleInputDriver::new(),
        &mut desktop,
        Duration::from_millis(16),
        false,
    );
    output.exit()?;

    let stats = desktop.wm().stats();
    tracing::info!(
        gestures = stats.gestures,
        moves = stats.moves,
        frames = stats.frames_written,
        commits = stats.commits,
        "desktop stopped"
    );
    result
}
