#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::collapsible_if)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

use active_arm::simulation::{
    DivergencePolicy, Preset, Simulation, SimulationConfig, SimulationError,
    batch::{consecutive_seeds, summarize, sweep},
    driver::TraceRenderer,
    inference::ActionSensitivity,
    params::TICKS_PER_FRAME,
};
use active_arm::ui::{Dashboard, recorder::FrameRecorder, render::draw_dashboard};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetArg {
    Reference,
    Tracking,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Reference => Self::Reference,
            PresetArg::Tracking => Self::Tracking,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SensitivityArg {
    FixedGain,
    ObservedChange,
}

impl From<SensitivityArg> for ActionSensitivity {
    fn from(arg: SensitivityArg) -> Self {
        match arg {
            SensitivityArg::FixedGain => Self::FixedGain,
            SensitivityArg::ObservedChange => Self::ObservedChange,
        }
    }
}

/// Active-inference agent reaching for a goal angle with a one-joint arm.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, value_enum, default_value = "tracking")]
    preset: PresetArg,

    /// Seed of the shared random stream (OS entropy when absent)
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    ticks: Option<u64>,

    /// Goal angle in radians
    #[arg(long, allow_negative_numbers = true)]
    goal: Option<f64>,

    /// Sensor noise of the simulated arm
    #[arg(long)]
    process_sigma: Option<f64>,

    /// Noise the agent assumes
    #[arg(long)]
    model_sigma: Option<f64>,

    #[arg(long, value_enum)]
    sensitivity: Option<SensitivityArg>,

    #[arg(long)]
    render_every: Option<u64>,

    /// Log progress instead of opening the dashboard
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Save headless frames and a flipbook into this directory
    #[arg(long)]
    record: Option<PathBuf>,

    /// Run this many seeds in parallel and print aggregate errors
    #[arg(long)]
    sweep: Option<u64>,

    /// Restart the agent instead of stopping when values blow up
    #[arg(long, default_value_t = false)]
    reset_on_divergence: bool,
}

impl Args {
    fn interactive(&self) -> bool {
        !self.headless && self.record.is_none() && self.sweep.is_none()
    }

    fn config(&self) -> SimulationConfig {
        let mut config = SimulationConfig::preset(self.preset.into());
        config.seed = self.seed;
        if let Some(ticks) = self.ticks {
            config.ticks = ticks;
        }
        if let Some(goal) = self.goal {
            config.goal = goal;
        }
        if let Some(sigma) = self.process_sigma {
            config.process.sigma = sigma;
        }
        if let Some(sigma) = self.model_sigma {
            config.model.sigma = sigma;
        }
        if let Some(sensitivity) = self.sensitivity {
            config.model.sensitivity = sensitivity.into();
        }
        match self.render_every {
            Some(every) => config.render_every = every,
            // the angle plot wants every tick
            None if self.interactive() => config.render_every = 1,
            None => {}
        }
        if self.reset_on_divergence {
            config.divergence = DivergencePolicy::Reset;
        }
        config
    }
}

fn init_logging(interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Logs would tear the alternate screen, so the dashboard stays quiet
    // unless RUST_LOG asks otherwise.
    let default = if interactive { "off" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.interactive())?;
    let config = args.config();

    if let Some(runs) = args.sweep {
        let seeds = consecutive_seeds(config.seed.unwrap_or(0), runs)?;
        let results = sweep(&config, &seeds);
        for result in &results {
            match &result.outcome {
                Ok(summary) => println!(
                    "seed {:>6}: |mu - rho| = {:.4}, |x - mu| = {:.4}, resets = {}",
                    result.seed,
                    summary.belief_error(),
                    summary.tracking_error(),
                    summary.resets
                ),
                Err(err) => println!("seed {:>6}: {err}", result.seed),
            }
        }
        let stats = summarize(&results);
        println!(
            "{} runs, {} failed | mean |mu - rho| {:.4} | max |mu - rho| {:.4} | max |x - mu| {:.4}",
            stats.runs,
            stats.failures,
            stats.mean_belief_error,
            stats.max_belief_error,
            stats.max_tracking_error
        );
        return Ok(());
    }

    let mut sim = Simulation::new(config)?;

    if let Some(dir) = &args.record {
        let mut renderer = (TraceRenderer, FrameRecorder::new(dir, "arm", config.arm_length)?);
        let summary = sim.run(&mut renderer)?;
        info!(frames = renderer.1.frames(), dir = %dir.display(), "recording done");
        println!("{summary:?}");
        return Ok(());
    }

    if args.headless {
        let summary = sim.run(&mut TraceRenderer)?;
        println!("{summary:?}");
        return Ok(());
    }

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut dashboard = Dashboard::new(config.arm_length);
    let tick_rate = Duration::from_millis(50);

    let res = run_app(&mut terminal, &mut sim, &mut dashboard, tick_rate);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match res {
        Ok(()) => {
            println!("{:?}", sim.summary());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    sim: &mut Simulation,
    dashboard: &mut Dashboard,
    tick_rate: Duration,
) -> Result<(), SimulationError> {
    let mut last_tick = Instant::now();
    loop {
        // 1. Update
        if last_tick.elapsed() >= tick_rate {
            let ticks = sim.remaining().min(TICKS_PER_FRAME);
            sim.advance(ticks, dashboard)?;
            last_tick = Instant::now();
        }

        // 2. Render
        terminal.draw(|f| draw_dashboard(f, dashboard))?;

        // 3. Input
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
