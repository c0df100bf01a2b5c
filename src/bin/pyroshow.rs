use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use pyroshow::{FinaleIntensity, FinaleOptions, ShowTimeline, SimulationContext};

#[derive(Parser, Debug)]
#[command(name = "pyroshow", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a show document and report its contents.
    Validate(ValidateArgs),
    /// Run a show headless at a fixed step and print simulation stats.
    Simulate(SimulateArgs),
    /// Compose a finale and append it to a show document.
    Finale(FinaleArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input show JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input show JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Fixed step in milliseconds.
    #[arg(long, default_value_t = 16.0)]
    step_ms: f64,

    /// Playback speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
}

#[derive(Parser, Debug)]
struct FinaleArgs {
    /// Input show JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output show JSON (defaults to rewriting the input).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Number of events to compose.
    #[arg(long, default_value_t = 10)]
    count: usize,

    /// Window the events are spread across, in milliseconds.
    #[arg(long, default_value_t = 10000.0)]
    window_ms: f64,

    /// Timing curve.
    #[arg(long, value_enum, default_value_t = IntensityChoice::Steady)]
    intensity: IntensityChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IntensityChoice {
    Gradual,
    Steady,
    Chaos,
}

impl From<IntensityChoice> for FinaleIntensity {
    fn from(c: IntensityChoice) -> Self {
        match c {
            IntensityChoice::Gradual => FinaleIntensity::Gradual,
            IntensityChoice::Steady => FinaleIntensity::Steady,
            IntensityChoice::Chaos => FinaleIntensity::Chaos,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Finale(args) => cmd_finale(args),
    }
}

fn read_show(path: &Path) -> anyhow::Result<ShowTimeline> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read show document '{}'", path.display()))?;
    let show = ShowTimeline::from_json(&text).with_context(|| "parse show document")?;
    Ok(show)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let show = read_show(&args.in_path)?;
    println!(
        "{} events, {} launchers, duration {:.0} ms",
        show.event_list().len(),
        show.launchers().len(),
        show.duration_ms()
    );
    for e in show.event_list() {
        println!(
            "  #{:<4} {:>8.0} ms  launcher {}  {:<13} {} / {}  {} {} {}",
            e.id,
            e.time_ms,
            e.launcher_id,
            e.firework_type.name(),
            e.primary_color,
            e.secondary_color,
            e.size.name(),
            e.height.name(),
            e.trail.name()
        );
    }
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.step_ms > 0.0, "step must be positive");
    anyhow::ensure!(args.speed > 0.0, "speed must be positive");
    let mut show = read_show(&args.in_path)?;

    // Wire the document's weather into the simulation, if present.
    if let Some(weather) = show.weather.clone() {
        let mut ctx = SimulationContext::new();
        ctx.wind = Some(Box::new(weather));
        show.set_context(ctx);
    }

    show.set_speed(args.speed);
    show.play();

    let dt = args.step_ms / 1000.0;
    let mut frames: u64 = 0;
    let mut peak_particles = 0usize;
    let mut peak_live = 0usize;
    while show.is_playing() {
        show.advance(dt);
        let frame = show.render_frame();
        peak_particles = peak_particles.max(frame.particles.len());
        peak_live = peak_live.max(show.live_count());
        frames += 1;
    }

    println!(
        "simulated {} frames ({:.1} s at {} ms/frame)",
        frames,
        frames as f64 * dt,
        args.step_ms
    );
    println!(
        "fired {}/{} events, peak {} live fireworks, peak {} particles",
        show.event_list().iter().filter(|e| e.triggered).count(),
        show.event_list().len(),
        peak_live,
        peak_particles
    );
    Ok(())
}

fn cmd_finale(args: FinaleArgs) -> anyhow::Result<()> {
    let mut show = read_show(&args.in_path)?;
    let ids = show.add_finale_with_options(&FinaleOptions {
        count: args.count,
        duration_window_ms: args.window_ms,
        intensity: args.intensity.into(),
        ..FinaleOptions::default()
    });
    println!("added {} finale events", ids.len());

    let out = args.out.as_deref().unwrap_or(&args.in_path);
    fs::write(out, show.to_json()?)
        .with_context(|| format!("write show document '{}'", out.display()))?;
    println!("wrote {}", out.display());
    Ok(())
}
