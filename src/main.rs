use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use monoplot::{Action, DisplaySize, Framebuffer, GraphConfig, Plot, PlotInput};

/// Plot a function of x on a simulated 128×64 monochrome display.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Function of x, e.g. `x*sin(x)` or `1/x`
    #[arg(default_value = "x*sin(x)")]
    expression: String,

    /// Lower x bound (any constant expression, e.g. `-2*pi`)
    #[arg(long, default_value = "-20", allow_hyphen_values = true)]
    x_min: String,

    /// Upper x bound
    #[arg(long, default_value = "20", allow_hyphen_values = true)]
    x_max: String,

    /// Lower y bound
    #[arg(long, default_value = "-10", allow_hyphen_values = true)]
    y_min: String,

    /// Upper y bound
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    y_max: String,

    /// Comma separated actions replayed before the final frame
    /// (e.g. `zoom-in,pan-left,cursor-toggle,custom-x=pi`)
    #[arg(long, value_delimiter = ',')]
    actions: Vec<Action>,

    /// Show the cursor from the start
    #[arg(long)]
    cursor: bool,

    /// Draw the viewport bounds at the plot edges
    #[arg(long)]
    labels: bool,

    /// Animation frames per pan or zoom
    #[arg(long, default_value_t = 1)]
    steps: u32,

    /// Write the final frame as a binary PBM image
    #[arg(long)]
    pbm: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let input = PlotInput {
        function: cli.expression,
        x_min: cli.x_min,
        x_max: cli.x_max,
        y_min: cli.y_min,
        y_max: cli.y_max,
    };
    let (expression, viewport) = input.parse().context("invalid plot input")?;
    let config = GraphConfig {
        boundary_labels: cli.labels,
        transition_steps: cli.steps,
        transition_delay_ms: 0,
        ..GraphConfig::default()
    };
    let mut plot = Plot::builder(expression, viewport).config(config).build();

    let mut frames: Vec<Framebuffer> = Vec::new();
    if cli.cursor {
        plot.handle(Action::ToggleCursor, &mut frames)?;
    }
    for action in cli.actions {
        let label = format!("{action:?}");
        if !plot.handle(action, &mut frames).with_context(|| format!("applying {label}"))? {
            break;
        }
    }

    let mut frame = Framebuffer::new(DisplaySize::LCD);
    plot.render_into(&mut frame);
    let trace = plot.trace();
    let stats = trace.stats();
    info!(
        frames = frames.len(),
        segments = trace.segments().segments.len(),
        evaluations = stats.evaluations,
        "plotted"
    );

    print!("{}", frame.to_ascii());
    let bounds = plot.input();
    println!(
        "f(x) = {}  x: [{}, {}]  y: [{}, {}]",
        bounds.function, bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max
    );

    if let Some(path) = cli.pbm {
        fs::write(&path, frame.to_pbm()).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}
