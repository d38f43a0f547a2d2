//! Sculpt session demo
//!
//! Paints a diagonal of brush strokes onto a toy heightfield, then walks
//! the history back and forth through the shortcut handler.
//!
//! Run with `RUST_LOG=debug` to see the action log traffic.

use clap::{Parser, ValueEnum};

use terrasculpt_demos::brush::{BrushSettings, BrushShape};
use terrasculpt_demos::heightfield::CellXZ;
use terrasculpt_demos::shell::SculptShell;
use terrasculpt_demos::shortcuts::Shortcut;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeArg {
    Square,
    Round,
}

#[derive(Parser, Debug)]
#[command(about = "Record brush strokes and replay them with undo/redo")]
struct Args {
    /// Terrain width in cells
    #[arg(long, default_value_t = 16)]
    width: usize,

    /// Terrain depth in cells
    #[arg(long, default_value_t = 16)]
    depth: usize,

    /// Number of strokes along the diagonal
    #[arg(long, default_value_t = 5)]
    strokes: usize,

    /// Brush radius in cells
    #[arg(long, default_value_t = 2)]
    radius: usize,

    /// Height added per stroke
    #[arg(long, default_value_t = 0.5)]
    strength: f32,

    /// Brush footprint shape
    #[arg(long, value_enum, default_value_t = ShapeArg::Round)]
    shape: ShapeArg,

    /// Undo shortcuts to press after sculpting
    #[arg(long, default_value_t = 3)]
    undo: usize,

    /// Redo shortcuts to press after undoing
    #[arg(long, default_value_t = 1)]
    redo: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting Terrasculpt sculpt session demo");
    log::info!("Core version: {}", terrasculpt_core::VERSION);
    log::info!("Demos version: {}", terrasculpt_demos::VERSION);
    terrasculpt_core::init();

    let shell = SculptShell::new(args.width, args.depth);
    let brush = shell.brush(BrushSettings {
        radius: args.radius,
        strength: args.strength,
        shape: match args.shape {
            ShapeArg::Square => BrushShape::Square,
            ShapeArg::Round => BrushShape::Round,
        },
    });
    let shortcuts = shell.shortcuts();

    for i in 0..args.strokes {
        match brush.stroke(CellXZ::new(i, i)) {
            Ok(cells) => log::info!("Stroke {i}: {cells} cells"),
            Err(e) => log::warn!("Stroke {i} failed: {e}"),
        }
    }
    log::info!(
        "After sculpting: total height {:.2}",
        shell.terrain().borrow().total_height()
    );

    for _ in 0..args.undo {
        if !shortcuts.handle(Shortcut::Undo) {
            log::info!("Nothing left to undo");
            break;
        }
    }
    for _ in 0..args.redo {
        if !shortcuts.handle(Shortcut::Redo) {
            log::info!("Nothing left to redo");
            break;
        }
    }

    let history = shell.log().borrow();
    log::info!(
        "Final: total height {:.2}, {} undo / {} redo entries",
        shell.terrain().borrow().total_height(),
        history.undo_count(),
        history.redo_count()
    );
    for name in history.undo_names() {
        log::info!("  undo: {name}");
    }
    for name in history.redo_names() {
        log::info!("  redo: {name}");
    }
}
