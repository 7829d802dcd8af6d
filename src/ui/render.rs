use std::f64::consts::FRAC_PI_2;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use super::Dashboard;
use super::canvas::compute_arm_grid;

/// Splits the screen into HUD, arm canvas and angle chart.
#[must_use]
pub fn dashboard_layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // HUD
            Constraint::Percentage(70), // Arms
            Constraint::Min(0),         // Angle trace
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

pub fn draw_dashboard(f: &mut Frame, dashboard: &Dashboard) {
    let [hud_area, canvas_area, chart_area] = dashboard_layout(f.area());

    // HUD
    let hud = Paragraph::new(Span::styled(
        dashboard.hud(),
        Style::default().add_modifier(Modifier::REVERSED),
    ));
    f.render_widget(hud, hud_area);

    // Arms
    let rows = canvas_area.height.saturating_sub(2) as usize;
    let cols = canvas_area.width.saturating_sub(2) as usize;
    let grid = dashboard
        .latest()
        .map(|view| compute_arm_grid(view, dashboard.arm_length(), rows, cols))
        .unwrap_or_default();
    let text: Vec<Line> = grid
        .into_iter()
        .map(|s| Line::from(Span::raw(s)))
        .collect();
    let field = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" real # | target * | generated + | sensed . "),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black));
    f.render_widget(field, canvas_area);

    // Angle trace
    let (real, belief) = dashboard.trace().series();
    let x_bounds = match (real.first(), real.last()) {
        (Some(first), Some(last)) if last.0 > first.0 => [first.0, last.0],
        (Some(first), _) => [first.0, first.0 + 1.0],
        _ => [0.0, 1.0],
    };
    let datasets = vec![
        Dataset::default()
            .name("real μ")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::White))
            .data(&real),
        Dataset::default()
            .name("model μ")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&belief),
    ];
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(" angle "))
        .x_axis(Axis::default().bounds(x_bounds))
        .y_axis(
            Axis::default()
                .bounds([-FRAC_PI_2, FRAC_PI_2])
                .labels(vec![Span::raw("-π/2"), Span::raw("0"), Span::raw("π/2")]),
        );
    f.render_widget(chart, chart_area);
}
