use active_arm::simulation::driver::NullRenderer;
use active_arm::simulation::{Renderer, Simulation, SimulationConfig};
use active_arm::ui::Dashboard;
use active_arm::ui::canvas::{BASE, PALETTE, REAL, compute_arm_grid};

#[test]
fn test_arm_grid_dimensions_and_palette() {
    let sim = Simulation::new(SimulationConfig::default().with_seed(1)).unwrap();
    let view = sim.view();
    let rows = 21;
    let cols = 41;

    let grid = compute_arm_grid(&view, 1.0, rows, cols);

    assert_eq!(grid.len(), rows);
    for row in &grid {
        assert_eq!(row.chars().count(), cols);
        for c in row.chars() {
            assert!(PALETTE.contains(c), "unexpected glyph {c:?}");
        }
    }
    assert_eq!(grid[10].chars().nth(20), Some(BASE));
    assert!(grid.iter().any(|row| row.contains(REAL.hand)));
}

#[test]
fn test_empty_grid() {
    let sim = Simulation::new(SimulationConfig::default().with_seed(1)).unwrap();
    assert!(compute_arm_grid(&sim.view(), 1.0, 0, 10).is_empty());
}

#[test]
fn test_dashboard_keeps_history() {
    let mut config = SimulationConfig::default().with_seed(2);
    config.render_every = 1;
    let mut sim = Simulation::new(config).unwrap();
    let mut dashboard = Dashboard::new(config.arm_length);
    assert!(dashboard.latest().is_none());

    sim.advance(25, &mut dashboard).unwrap();

    assert_eq!(dashboard.trace().len(), 25);
    assert_eq!(dashboard.latest().map(|v| v.tick), Some(25));
    assert!(dashboard.hud().starts_with("Tick: 25"));

    dashboard.finish();
    sim.advance(5, &mut NullRenderer).unwrap();
    assert_eq!(dashboard.trace().len(), 25);
}
