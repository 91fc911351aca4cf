// File: src/tui_dashboard.rs
// Terminal UI dashboard using ratatui

use std::io;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap,
    },
    Frame, Terminal,
};

use crate::config::AppConfig;
use crate::dashboard::{
    AccessPointsView, DashboardShell, OverviewView, RecentChangesView, ShellView, FOOTER,
    PERIOD_LABEL, SUBTITLE, TITLE,
};
use crate::data_models::Tab;
use crate::fixtures::Fixtures;
use crate::refresh::RandomKpiGenerator;
use crate::widgets::{
    bar_chart, donut_chart, BarChartView, DonutChartView, MetricTileView, TrendGlyph,
};

/// Angular and radial sampling step for the braille donut
const DONUT_ANGLE_STEP: f64 = 1.5;
const DONUT_RADIUS_STEP: f64 = 2.0;

/// Application state for TUI
pub struct TuiApp {
    pub shell: DashboardShell,
    pub selected_row: usize,
    pub should_quit: bool,
}

impl TuiApp {
    pub fn new(fixtures: Arc<Fixtures>) -> Self {
        Self {
            shell: DashboardShell::new(fixtures),
            selected_row: 0,
            should_quit: false,
        }
    }

    /// Handle keyboard input
    pub fn handle_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::Right => {
                let next = self.shell.active_tab().next();
                self.shell.select_tab(next);
            }
            KeyCode::BackTab | KeyCode::Left => {
                let previous = self.shell.active_tab().previous();
                self.shell.select_tab(previous);
            }
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                self.shell.select_tab(Tab::ALL[index]);
            }
            KeyCode::Up if self.shell.active_tab() == Tab::AccessPoints => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Down if self.shell.active_tab() == Tab::AccessPoints => {
                let last = self.shell.rows().len().saturating_sub(1);
                self.selected_row = (self.selected_row + 1).min(last);
            }
            KeyCode::Enter | KeyCode::Char(' ')
                if self.shell.active_tab() == Tab::AccessPoints =>
            {
                self.activate_selected_row();
            }
            _ => {}
        }
    }

    fn activate_selected_row(&mut self) {
        let Some(ap_id) = self
            .shell
            .rows()
            .get(self.selected_row)
            .map(|row| row.ap_id().to_string())
        else {
            return;
        };
        self.shell.toggle_row(&ap_id);
    }
}

/// Run the TUI dashboard
pub async fn run_tui_mode(fixtures: Arc<Fixtures>, config: &AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TuiApp::new(fixtures);
    app.shell
        .mount(RandomKpiGenerator::new(), config.refresh_interval);

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Stop the refresh before giving the terminal back
    app.shell.teardown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    println!("👋 {} closed", TITLE);

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        app.shell.poll_refresh();

        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Let the refresh task make progress between frames
        tokio::task::yield_now().await;
    }
}

/// Render the UI
fn ui(f: &mut Frame, app: &TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Active view
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    render_tabs(f, chunks[1], app.shell.active_tab());

    match app.shell.render() {
        Ok(ShellView::Overview(view)) => render_overview(f, chunks[2], &view),
        Ok(ShellView::AccessPoints(view)) => {
            render_access_points(f, chunks[2], &view, app.selected_row)
        }
        Ok(ShellView::RecentChanges(view)) => render_recent_changes(f, chunks[2], &view),
        Err(e) => render_error(f, chunks[2], &e.to_string()),
    }

    render_footer(f, chunks[3]);
}

/// Render header section
fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("📡 ", Style::default().fg(Color::Yellow)),
            Span::styled(TITLE, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled("   ● ", Style::default().fg(Color::Green)),
            Span::styled("Live", Style::default().fg(Color::White)),
            Span::styled(format!("   {}", PERIOD_LABEL), Style::default().fg(Color::Gray)),
        ]),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(Color::Gray))),
    ])
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_tabs(f: &mut Frame, area: Rect, active: Tab) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.label())).collect();
    let tabs = Tabs::new(titles)
        .select(active.index())
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn render_overview(f: &mut Frame, area: Rect, view: &OverviewView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(10),
        ])
        .split(area);

    for (row_area, tiles) in rows.iter().take(2).zip(view.tiles.chunks(3)) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ])
            .split(*row_area);
        for (tile_area, tile) in cols.iter().zip(tiles) {
            render_metric_tile(f, *tile_area, tile);
        }
    }

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    render_bar_chart(f, charts[0], &view.throughput);
    render_donut_chart(f, charts[1], &view.interference);
}

fn render_metric_tile(f: &mut Frame, area: Rect, tile: &MetricTileView) {
    let mut spans = vec![Span::styled(
        tile.headline.clone(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];

    if let Some(badge) = tile.badge() {
        let color = match tile.trend_glyph {
            TrendGlyph::Up => Color::Green,
            TrendGlyph::Down => Color::Red,
            TrendGlyph::None => Color::Gray,
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} {}", tile.trend_glyph.symbol(), badge),
            Style::default().fg(color),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(tile.title.clone()),
    );
    f.render_widget(paragraph, area);
}

fn render_bar_chart(f: &mut Frame, area: Rect, chart: &BarChartView) {
    let baseline_color = parse_color(bar_chart::BASELINE_COLOR);
    let current_color = parse_color(bar_chart::CURRENT_COLOR);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(1)])
        .split(area);

    let title = format!(
        "📊 {} ({} / {})",
        bar_chart::TITLE,
        bar_chart::BASELINE_LABEL,
        bar_chart::CURRENT_LABEL
    );
    let mut widget = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2)
        .max(100);

    for group in &chart.groups {
        let bars = [
            Bar::default()
                .value(percent(group.baseline_fraction))
                .text_value(format!("{}", group.baseline))
                .style(Style::default().fg(baseline_color)),
            Bar::default()
                .value(percent(group.current_fraction))
                .text_value(format!("{}", group.current))
                .style(Style::default().fg(current_color)),
        ];
        widget = widget.data(
            BarGroup::default()
                .label(Line::from(group.label.clone()))
                .bars(&bars),
        );
    }
    f.render_widget(widget, parts[0]);

    let highlight = Paragraph::new(Line::from(vec![
        Span::styled(" Current Throughput ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{} {}", chart.highlight.current_value, bar_chart::UNIT),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(chart.highlight.badge(), Style::default().fg(Color::Green)),
    ]));
    f.render_widget(highlight, parts[1]);
}

fn percent(fraction: f64) -> u64 {
    (fraction * 100.0).round() as u64
}

fn render_donut_chart(f: &mut Frame, area: Rect, chart: &DonutChartView) {
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let wedges: Vec<(Color, Vec<(f64, f64)>)> = chart
        .slices
        .iter()
        .map(|slice| {
            (
                parse_color(&slice.color),
                ring_points(slice.start_angle, slice.end_angle()),
            )
        })
        .collect();
    let total = chart.total;

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("🍩 {}", donut_chart::TITLE)),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, donut_chart::VIEW_BOX])
        .y_bounds([0.0, donut_chart::VIEW_BOX])
        .paint(move |ctx| {
            for (color, coords) in &wedges {
                ctx.draw(&Points {
                    coords,
                    color: *color,
                });
            }
            ctx.print(
                donut_chart::CENTER - 6.0,
                donut_chart::CENTER,
                Line::from(format!("{} Total", total)),
            );
        });
    f.render_widget(canvas, parts[0]);

    let legend: Vec<Line> = chart
        .legend
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(parse_color(&entry.color))),
                Span::raw(format!("{:<10} {:>3}%", entry.category, entry.percentage_rounded)),
            ])
        })
        .collect();
    let legend = Paragraph::new(legend).block(Block::default().borders(Borders::ALL).title("Sources"));
    f.render_widget(legend, parts[1]);
}

/// Sample an annular wedge into canvas points (canvas y grows upwards)
fn ring_points(start_angle: f64, end_angle: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    let mut radius = donut_chart::HOLE_RADIUS;
    while radius <= donut_chart::OUTER_RADIUS {
        let mut angle = start_angle;
        while angle < end_angle {
            let (x, y) = donut_chart::polar_point(angle, radius);
            points.push((x, donut_chart::VIEW_BOX - y));
            angle += DONUT_ANGLE_STEP;
        }
        radius += DONUT_RADIUS_STEP;
    }
    points
}

fn render_access_points(f: &mut Frame, area: Rect, view: &AccessPointsView, selected: usize) {
    let header_cells = ["AP ID", "Channel", "Power", "Clients", "Avg RSSI", "Status"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let nested_style = Style::default().fg(Color::Gray);
    let mut rows = Vec::new();

    for (i, ap) in view.rows.iter().enumerate() {
        let mut style = Style::default();
        if i == selected {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }

        rows.push(
            Row::new(vec![
                Cell::from(format!("{} {}", ap.chevron, ap.id)),
                Cell::from(ap.channel.to_string()),
                Cell::from(ap.power.clone()),
                Cell::from(ap.client_count.to_string()),
                Cell::from(ap.rssi.clone()),
                Cell::from(ap.status.to_string()).style(Style::default().fg(status_color(ap.status.as_str()))),
            ])
            .style(style),
        );

        if let Some(clients) = &ap.clients {
            rows.push(Row::new(vec![Cell::from(format!("  ↳ {}", clients.title))]).style(nested_style));
            for client in &clients.rows {
                rows.push(
                    Row::new(vec![
                        Cell::from(format!("    {}", client.id)),
                        Cell::from(client.rssi.clone()),
                        Cell::from(client.snr.clone()),
                        Cell::from(client.uplink.clone()),
                        Cell::from(client.downlink.clone()),
                    ])
                    .style(nested_style),
                );
            }
        }
    }

    let widths = [
        Constraint::Length(34),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("📶 {} ({})", view.title, view.badge)),
        );

    f.render_widget(table, area);
}

fn status_color(status: &str) -> Color {
    match status {
        "optimal" => Color::Green,
        "warning" => Color::Yellow,
        "critical" => Color::Red,
        _ => Color::Gray,
    }
}

fn render_recent_changes(f: &mut Frame, area: Rect, view: &RecentChangesView) {
    let mut lines = Vec::new();
    for item in &view.items {
        lines.push(Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Cyan)),
            Span::styled(item.ap_id.clone(), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", item.timestamp), Style::default().fg(Color::Gray)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("│ "),
            Span::styled(item.action.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(format!("│ {}", item.details)));
        lines.push(Line::from(Span::styled(
            format!("│ {}", item.reason),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }

    let timeline = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("🕒 {} ({})", view.title, view.badge)),
        );
    f.render_widget(timeline, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let error = Paragraph::new(Span::styled(message.to_string(), Style::default().fg(Color::Red)))
        .block(Block::default().borders(Borders::ALL).title("⚠ Render error"));
    f.render_widget(error, area);
}

/// Render footer
fn render_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::raw("q quit · 1-3/Tab switch view · ↑↓ select · Enter expand   "),
        Span::styled(FOOTER, Style::default().fg(Color::DarkGray)),
    ]))
    .style(Style::default().fg(Color::Gray))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn parse_color(token: &str) -> Color {
    Color::from_str(token).unwrap_or(Color::Gray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn app() -> TuiApp {
        TuiApp::new(Arc::new(Fixtures::demo()))
    }

    fn draw(app: &TuiApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn keys_switch_tabs() {
        let mut app = app();
        app.handle_input(KeyCode::Char('2'));
        assert_eq!(app.shell.active_tab(), Tab::AccessPoints);
        app.handle_input(KeyCode::Tab);
        assert_eq!(app.shell.active_tab(), Tab::RecentChanges);
        app.handle_input(KeyCode::Right);
        assert_eq!(app.shell.active_tab(), Tab::Overview);
        app.handle_input(KeyCode::BackTab);
        assert_eq!(app.shell.active_tab(), Tab::RecentChanges);
        app.handle_input(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn enter_toggles_selected_row_only() {
        let mut app = app();
        app.handle_input(KeyCode::Char('2'));
        app.handle_input(KeyCode::Down);
        app.handle_input(KeyCode::Down);
        app.handle_input(KeyCode::Enter);

        let expanded: Vec<&str> = app
            .shell
            .rows()
            .iter()
            .filter(|r| r.is_expanded())
            .map(|r| r.ap_id())
            .collect();
        assert_eq!(expanded, ["AP-03"]);

        app.handle_input(KeyCode::Char(' '));
        assert!(app.shell.rows().iter().all(|r| !r.is_expanded()));
    }

    #[test]
    fn selection_is_clamped() {
        let mut app = app();
        app.handle_input(KeyCode::Char('2'));
        app.handle_input(KeyCode::Up);
        assert_eq!(app.selected_row, 0);
        for _ in 0..10 {
            app.handle_input(KeyCode::Down);
        }
        assert_eq!(app.selected_row, 4);
    }

    #[test]
    fn row_keys_ignored_outside_access_points() {
        let mut app = app();
        app.handle_input(KeyCode::Down);
        app.handle_input(KeyCode::Enter);
        assert_eq!(app.selected_row, 0);
        assert!(app.shell.rows().iter().all(|r| !r.is_expanded()));
    }

    #[test]
    fn overview_draws_tiles_and_legend() {
        let screen = draw(&app());
        assert!(screen.contains("Edge Client Throughput"));
        assert!(screen.contains("52.5 Mbps"));
        assert!(screen.contains("Microwave"));
        assert!(screen.contains("+32.6%"));
    }

    #[test]
    fn expanded_row_draws_clients() {
        let mut app = app();
        app.handle_input(KeyCode::Char('2'));
        assert!(!draw(&app).contains("Client-C"));

        app.handle_input(KeyCode::Down);
        app.handle_input(KeyCode::Down);
        app.handle_input(KeyCode::Enter);
        let screen = draw(&app);
        assert!(screen.contains("Clients connected to AP-03"));
        assert!(screen.contains("Client-C"));
    }

    #[test]
    fn ring_points_stay_inside_annulus() {
        for (x, y) in ring_points(0.0, 90.0) {
            let dx = x - donut_chart::CENTER;
            let dy = y - donut_chart::CENTER;
            let r = (dx * dx + dy * dy).sqrt();
            assert!(r >= donut_chart::HOLE_RADIUS - 1e-9 && r <= donut_chart::OUTER_RADIUS + 1e-9);
            // first quadrant clockwise from 12 o'clock is upper right
            assert!(dx >= -1e-9 && dy >= -1e-9);
        }
    }

    #[test]
    fn hex_tokens_become_rgb() {
        assert_eq!(parse_color("#8b5cf6"), Color::Rgb(0x8b, 0x5c, 0xf6));
        assert_eq!(parse_color("not-a-color"), Color::Gray);
    }
}
