use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use desk_wm::{
    BufferedSurface, HostSurface, PointerEvent, PointerPos, Position, Size, WindowManager,
    WmConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "gesture-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replays synthetic drags against the window manager and reports how moves coalesce"
)]
struct BenchCli {
    /// Number of drag gestures to replay.
    #[arg(short = 'g', long = "gestures", default_value_t = 200)]
    gestures: u32,

    /// Pointer moves per gesture.
    #[arg(short = 'm', long = "moves", default_value_t = 100)]
    moves: u32,

    /// Pointer moves delivered between two display frames.
    #[arg(short = 'r', long = "moves-per-frame", default_value_t = 4)]
    moves_per_frame: u32,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Seed for the pointer walk; runs with the same seed are identical.
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,
}

struct BenchConfig {
    gestures: u32,
    moves: u32,
    moves_per_frame: u32,
    width: u32,
    height: u32,
    seed: u64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if cli.gestures == 0 {
            return Err("gestures must be at least 1".to_string());
        }
        if !(1..=100_000).contains(&cli.moves) {
            return Err("moves must be between 1 and 100000".to_string());
        }
        if cli.moves_per_frame == 0 {
            return Err("moves-per-frame must be at least 1".to_string());
        }
        if cli.width < 640 || cli.height < 480 {
            return Err("viewport must be at least 640x480".to_string());
        }
        Ok(Self {
            gestures: cli.gestures,
            moves: cli.moves,
            moves_per_frame: cli.moves_per_frame,
            width: cli.width,
            height: cli.height,
            seed: cli.seed,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    let report = run_benchmark(&config);
    println!("{}", report.render(&config));
    if report.mismatches > 0 {
        return Err(io::Error::other(format!(
            "{} gestures committed a rectangle other than the last rendered one",
            report.mismatches
        )));
    }
    Ok(())
}

struct Walk {
    state: u64,
}

impl Walk {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0xA5A5_A5A5_1234_5678,
        }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Step in `[-span, span]`.
    fn step(&mut self, span: i32) -> i32 {
        (self.next() % (2 * span as u32 + 1)) as i32 - span
    }
}

struct Report {
    elapsed: Duration,
    gestures: u64,
    moves: u64,
    frames_requested: u64,
    frames_written: u64,
    commits: u64,
    snaps: u64,
    mismatches: u64,
}

fn run_benchmark(config: &BenchConfig) -> Report {
    let wm_config = WmConfig::default().with_viewport(config.width, config.height);
    let mut wm = WindowManager::new(wm_config, BufferedSurface::new());
    let id = wm.open("bench", Some(Size::new(480, 320)), Some(Position::new(200, 200)));
    let mut walk = Walk::new(config.seed);
    let mut snaps = 0;
    let mut mismatches = 0;
    let start = Instant::now();

    for _ in 0..config.gestures {
        if wm.get_state(id).is_some_and(|w| w.snapped_side().is_some()) {
            let _ = wm.restore(id);
        }
        let Some(rect) = wm.get_state(id).map(|w| w.rect()) else {
            break;
        };
        let mut pointer = PointerPos::new(rect.x as i32 + 40, rect.y as i32 + 10);
        wm.handle_pointer(PointerEvent::Down {
            pos: pointer,
            click_count: 1,
        });
        for n in 0..config.moves {
            pointer = PointerPos::new(
                pointer.x.saturating_add(walk.step(24)),
                pointer.y.saturating_add(walk.step(24)),
            );
            wm.handle_pointer(PointerEvent::Move { pos: pointer });
            if (n + 1) % config.moves_per_frame == 0 {
                for token in wm.surface_mut().take_due_frames() {
                    wm.run_frame(token);
                }
            }
        }
        wm.handle_pointer(PointerEvent::Up { pos: pointer });

        let Some(state) = wm.get_state(id) else {
            break;
        };
        if state.snapped_side().is_some() {
            snaps += 1;
        } else if wm.surface().read_rect(id) != Some(state.rect()) {
            mismatches += 1;
        }
    }

    let stats = wm.stats();
    Report {
        elapsed: start.elapsed(),
        gestures: stats.gestures,
        moves: stats.moves,
        frames_requested: stats.frames_requested,
        frames_written: stats.frames_written,
        commits: stats.commits,
        snaps,
        mismatches,
    }
}

impl Report {
    fn render(&self, config: &BenchConfig) -> String {
        let per_frame = if self.frames_written > 0 {
            self.moves as f64 / self.frames_written as f64
        } else {
            0.0
        };
        let moves_per_sec = if self.elapsed.as_secs_f64() > 0.0 {
            self.moves as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        };
        indoc::formatdoc!(
            r#"
            Gesture bench on {width}x{height}, {moves_per_frame} moves per frame.
            Gestures: {gestures} | Commits: {commits} | Snaps: {snaps}
            Moves: {moves} | Frames requested: {requested} | Frames written: {written}
            Moves per written frame: {per_frame:.2}
            Elapsed: {elapsed:.3}s (~{moves_per_sec:.0} moves/s)
            Commit mismatches: {mismatches}
            "#,
            width = config.width,
            height = config.height,
            moves_per_frame = config.moves_per_frame,
            gestures = self.gestures,
            commits = self.commits,
            snaps = self.snaps,
            moves = self.moves,
            requested = self.frames_requested,
            written = self.frames_written,
            per_frame = per_frame,
            elapsed = self.elapsed.as_secs_f64(),
            moves_per_sec = moves_per_sec,
            mismatches = self.mismatches,
        )
    }
}
