use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use replayboard::Config;
use replayboard::draw::{CairoCanvas, DrawingSurface, MemoryCanvas, RenderContext, ShapeStyle};
use replayboard::input::{Controls, Emitter, Target};
use replayboard::script::{Script, drive};
use replayboard::session::{CanvasState, Coordinator, SessionDependencies};

#[derive(Parser, Debug)]
#[command(name = "replayboard")]
#[command(version, about = "Interactive drawing board with timed replay")]
struct Cli {
    /// Input script to play through the board (TOML, or JSON by extension)
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Write the final canvas to a PNG file
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the committed instructions and their timeline as JSON
    #[arg(long, value_name = "FILE")]
    dump: Option<PathBuf>,

    /// Configuration file (default: ~/.config/replayboard/config.toml)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Replay speed relative to the recording (2.0 halves every gap)
    #[arg(long, value_name = "SPEED")]
    replay_speed: Option<f64>,

    /// Seed for random colors, radii and angles
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(width) = self.width {
            config.canvas.width = width;
        }
        if let Some(height) = self.height {
            config.canvas.height = height;
        }
        if let Some(speed) = self.replay_speed {
            config.replay.speed = speed;
        }
        config.validate_and_clamp();
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let Some(script_path) = cli.script.as_deref() else {
        // No script: show usage
        println!("replayboard: Interactive drawing board with timed replay");
        println!();
        println!("Usage:");
        println!("  replayboard --script session.toml                Play a scripted session");
        println!("  replayboard --script session.toml -o board.png   Render the result");
        println!("  replayboard --help                               Show help");
        println!();
        println!("Keys:");
        println!("  1  draw circles     2  draw markers     3  draw a polygon");
        println!("  S  save (while drawing)                 X  cancel / clear");
        println!("  R  replay the drawing");
        return Ok(());
    };

    let config = cli.load_config()?;
    let script = Script::from_path(script_path)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;

    let (width, height) = (config.canvas.width, config.canvas.height);
    let state = match &cli.output {
        Some(output) => {
            let canvas = CairoCanvas::new(width as i32, height as i32)
                .context("Failed to create cairo canvas")?;
            let (state, surface) =
                runtime.block_on(run_session(canvas, &config, &script, cli.seed))?;
            write_png(surface.context(), output)?;
            state
        }
        None => {
            let canvas = MemoryCanvas::new(f64::from(width), f64::from(height));
            runtime.block_on(run_session(canvas, &config, &script, cli.seed))?.0
        }
    };

    if let Some(dump) = &cli.dump {
        let file = File::create(dump)
            .with_context(|| format!("Failed to create {}", dump.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &state)
            .with_context(|| format!("Failed to write {}", dump.display()))?;
        log::info!("Wrote instruction log to {}", dump.display());
    }

    println!(
        "Session finished: {} shapes committed ({} primitive operations)",
        state.len(),
        state
            .instructions
            .iter()
            .map(|instruction| instruction.primitive_count())
            .sum::<usize>()
    );
    Ok(())
}

/// Plays `script` against a fresh board on `canvas` and returns the committed
/// state with the surface redrawn from it.
async fn run_session<C: RenderContext>(
    canvas: C,
    config: &Config,
    script: &Script,
    seed: Option<u64>,
) -> Result<(CanvasState, DrawingSurface<C>)> {
    let emitter = Emitter::new(config.input.queue_capacity);
    emitter.mount(Target::Canvas);
    let controls = Controls::mount(&emitter);

    let mut surface =
        DrawingSurface::new(canvas).with_style(ShapeStyle::from_config(&config.drawing));
    if let Some(seed) = seed {
        surface = surface.with_seed(seed);
    }

    let deps = SessionDependencies {
        surface,
        emitter: emitter.clone(),
        controls,
    };
    let mut coordinator = Coordinator::new(deps, config);
    let timeline = script.timeline()?;

    let (result, ()) = tokio::join!(
        coordinator.run(),
        drive(timeline, script.end(), emitter)
    );
    result.context("Drawing session failed")?;

    let (state, mut surface) = coordinator.into_parts();
    surface.redraw(&state.instructions);
    Ok((state, surface))
}

fn write_png(canvas: &CairoCanvas, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    canvas
        .write_png(&mut BufWriter::new(file))
        .with_context(|| format!("Failed to write PNG to {}", path.display()))?;
    log::info!("Wrote canvas to {}", path.display());
    Ok(())
}
