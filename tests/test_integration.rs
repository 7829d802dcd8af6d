//! Closed-loop runs of the arm and the agent.

use active_arm::simulation::batch::{summarize, sweep};
use active_arm::simulation::driver::NullRenderer;
use active_arm::simulation::inference::ActionSensitivity;
use active_arm::simulation::{
    ArmView, DivergencePolicy, Preset, Renderer, Simulation, SimulationConfig, SimulationError,
};

fn tracking(seed: u64) -> SimulationConfig {
    SimulationConfig::preset(Preset::Tracking).with_seed(seed)
}

#[test]
fn test_reaches_goal() {
    let mut sim = Simulation::new(tracking(7)).unwrap();
    let summary = sim.run(&mut NullRenderer).unwrap();

    assert_eq!(summary.ticks, 20_000);
    assert!(
        summary.belief_error() < 0.05,
        "belief {} too far from goal {}",
        summary.belief.mu,
        summary.goal
    );
    assert!(
        summary.tracking_error() < 0.1,
        "arm {} too far from belief {}",
        summary.true_angle,
        summary.belief.mu
    );
    assert_eq!(summary.resets, 0);
}

#[test]
fn test_observed_change_stays_finite() {
    let mut config = tracking(21);
    config.ticks = 5_000;
    config.model.sensitivity = ActionSensitivity::ObservedChange;
    let mut sim = Simulation::new(config).unwrap();
    let summary = sim.run(&mut NullRenderer).unwrap();
    assert!(summary.belief.is_finite());
}

#[test]
fn test_same_seed_same_run() {
    let mut config = tracking(5);
    config.ticks = 2_000;
    let a = Simulation::new(config).unwrap().run(&mut NullRenderer).unwrap();
    let b = Simulation::new(config).unwrap().run(&mut NullRenderer).unwrap();
    assert_eq!(a, b);
}

fn unstable(policy: DivergencePolicy) -> SimulationConfig {
    let mut config = tracking(13);
    config.ticks = 5_000;
    config.initial_angle = 0.5;
    config.process.step = 5.0;
    config.divergence = policy;
    config
}

#[test]
fn test_divergence_aborts() {
    let mut sim = Simulation::new(unstable(DivergencePolicy::Abort)).unwrap();
    match sim.run(&mut NullRenderer) {
        Err(SimulationError::Divergence(divergence)) => {
            assert!(divergence.tick > 0);
            assert!(divergence.tick <= 5_000);
        }
        other => panic!("expected divergence, got {other:?}"),
    }
}

#[test]
fn test_divergence_resets() {
    let mut sim = Simulation::new(unstable(DivergencePolicy::Reset)).unwrap();
    let summary = sim.run(&mut NullRenderer).unwrap();
    assert!(summary.resets > 0);
    assert!(summary.belief.is_finite());
    assert!(summary.true_angle.is_finite());
}

struct Views(Vec<ArmView>);

impl Renderer for Views {
    fn render(&mut self, view: &ArmView) {
        self.0.push(*view);
    }
}

#[test]
fn test_render_cadence_rounds_up() {
    for (ticks, every) in [(1_000, 100), (1_001, 100), (999, 1_000), (7, 1)] {
        let mut config = tracking(3);
        config.ticks = ticks;
        config.render_every = every;
        let mut views = Views(Vec::new());
        Simulation::new(config).unwrap().run(&mut views).unwrap();

        assert_eq!(views.0.len() as u64, ticks.div_ceil(every), "{ticks}/{every}");
        assert_eq!(views.0.last().map(|v| v.tick), Some(ticks));
    }
}

#[test]
fn test_rendering_does_not_change_run() {
    let mut watched = tracking(7);
    watched.ticks = 2_000;
    watched.render_every = 1;
    let mut quiet = watched;
    quiet.render_every = 1_000;

    let mut views = Views(Vec::new());
    let a = Simulation::new(watched).unwrap().run(&mut views).unwrap();
    let b = Simulation::new(quiet).unwrap().run(&mut NullRenderer).unwrap();

    assert_eq!(views.0.len(), 2_000);
    assert_eq!(a, b);
}

#[test]
fn test_sweep_matches_sequential_runs() {
    let mut config = tracking(0);
    config.ticks = 1_500;
    let seeds = [8, 3, 5, 1];

    let results = sweep(&config, &seeds);
    assert_eq!(results.len(), seeds.len());
    for (result, &seed) in results.iter().zip(&seeds) {
        assert_eq!(result.seed, seed);
        let sequential = Simulation::new(config.with_seed(seed))
            .unwrap()
            .run(&mut NullRenderer)
            .unwrap();
        assert_eq!(result.outcome.as_ref().unwrap(), &sequential);
    }

    let stats = summarize(&results);
    assert_eq!(stats.runs, 4);
    assert_eq!(stats.failures, 0);
    assert!(stats.max_belief_error >= stats.mean_belief_error);
}

#[test]
fn test_sweep_reports_failures() {
    let results = sweep(&unstable(DivergencePolicy::Abort), &[1, 2]);
    let stats = summarize(&results);
    assert_eq!(stats.runs, 0);
    assert_eq!(stats.failures, 2);
}
