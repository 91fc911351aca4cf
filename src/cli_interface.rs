// File: src/cli_interface.rs
// One-shot text rendering of a dashboard tab

use std::collections::BTreeSet;
use std::fmt::Write;
use std::sync::Arc;

use anyhow::Result;

use crate::dashboard::{
    AccessPointsView, DashboardShell, OverviewView, RecentChangesView, ShellView, SUBTITLE, TITLE,
};
use crate::data_models::Tab;
use crate::fixtures::Fixtures;
use crate::widgets::{bar_chart, donut_chart, ClientTableView, TrendGlyph};

/// Width of a full bar in the text bar chart
const BAR_WIDTH: usize = 30;

/// Execute CLI mode: select the tab, activate the requested rows, print
pub async fn run_cli_mode(fixtures: Arc<Fixtures>, tab: Tab, expand: &[String]) -> Result<()> {
    let shell = prepare_shell(fixtures, tab, expand)?;
    let view = shell.render()?;
    print!("{}", render_view(&view));
    Ok(())
}

fn prepare_shell(fixtures: Arc<Fixtures>, tab: Tab, expand: &[String]) -> Result<DashboardShell> {
    let mut shell = DashboardShell::new(fixtures);
    shell.select_tab(tab);

    // Activate each row once, however often it was named
    let expand: BTreeSet<&str> = expand.iter().map(String::as_str).collect();
    for ap_id in expand {
        if shell.toggle_row(ap_id).is_none() {
            anyhow::bail!("Unknown access point: {}", ap_id);
        }
    }
    Ok(shell)
}

/// Render a tab view as box-drawn text
pub fn render_view(view: &ShellView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📡 {} - {}", TITLE, SUBTITLE);
    let _ = writeln!(out, "{}", render_tab_bar(view.tab()));
    let _ = writeln!(out);

    match view {
        ShellView::Overview(v) => render_overview(&mut out, v),
        ShellView::AccessPoints(v) => render_access_points(&mut out, v),
        ShellView::RecentChanges(v) => render_recent_changes(&mut out, v),
    }
    out
}

fn render_tab_bar(active: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" │ ")
}

fn render_overview(out: &mut String, view: &OverviewView) {
    let _ = writeln!(out, "╭─{:─<26}─┬─{:─<16}─┬─{:─<8}─╮", "", "", "");
    let _ = writeln!(out, "│ {:^26} │ {:^16} │ {:^8} │", "Metric", "Value", "Trend");
    let _ = writeln!(out, "├─{:─<26}─┼─{:─<16}─┼─{:─<8}─┤", "", "", "");
    for tile in &view.tiles {
        let trend = match (tile.trend_glyph, tile.badge()) {
            (TrendGlyph::None, _) | (_, None) => "─".to_string(),
            (glyph, Some(badge)) => format!("{}{}", glyph.symbol(), badge),
        };
        let _ = writeln!(out, "│ {:<26} │ {:>16} │ {:>8} │", tile.title, tile.headline, trend);
    }
    let _ = writeln!(out, "╰─{:─<26}─┴─{:─<16}─┴─{:─<8}─╯", "", "", "");

    let chart = &view.throughput;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "📊 {}  (░ {}, █ {})",
        bar_chart::TITLE,
        bar_chart::BASELINE_LABEL,
        bar_chart::CURRENT_LABEL
    );
    for group in &chart.groups {
        let _ = writeln!(out, "  {:>5} ░{:<w$} {}", group.label, bar(group.baseline_fraction, '░'), group.baseline, w = BAR_WIDTH);
        let _ = writeln!(out, "  {:>5} █{:<w$} {}", "", bar(group.current_fraction, '█'), group.current, w = BAR_WIDTH);
    }
    let _ = writeln!(
        out,
        "  Current Throughput: {} {}  [{}]",
        chart.highlight.current_value,
        bar_chart::UNIT,
        chart.highlight.badge()
    );

    let donut = &view.interference;
    let _ = writeln!(out);
    let _ = writeln!(out, "🍩 {}  (Total: {})", donut_chart::TITLE, donut.total);
    for (slice, legend) in donut.slices.iter().zip(&donut.legend) {
        let _ = writeln!(
            out,
            "  {:<10} {:>4}%  {:>6.1}° → {:>6.1}°  {}",
            legend.category,
            legend.percentage_rounded,
            slice.start_angle,
            slice.end_angle(),
            legend.color
        );
    }
}

fn bar(fraction: f64, fill: char) -> String {
    let cells = (fraction * BAR_WIDTH as f64).round() as usize;
    std::iter::repeat(fill).take(cells.min(BAR_WIDTH)).collect()
}

fn render_access_points(out: &mut String, view: &AccessPointsView) {
    let _ = writeln!(out, "📶 {} ({})", view.title, view.badge);
    let _ = writeln!(out, "╭─{:─<9}─┬─{:─<7}─┬─{:─<7}─┬─{:─<7}─┬─{:─<9}─┬─{:─<9}─╮", "", "", "", "", "", "");
    let _ = writeln!(
        out,
        "│ {:^9} │ {:^7} │ {:^7} │ {:^7} │ {:^9} │ {:^9} │",
        "AP ID", "Channel", "Power", "Clients", "Avg RSSI", "Status"
    );
    let _ = writeln!(out, "├─{:─<9}─┼─{:─<7}─┼─{:─<7}─┼─{:─<7}─┼─{:─<9}─┼─{:─<9}─┤", "", "", "", "", "", "");

    for row in &view.rows {
        let _ = writeln!(
            out,
            "│ {} {:<7} │ {:>7} │ {:>7} │ {:>7} │ {:>9} │ {:<9} │",
            row.chevron,
            row.id,
            row.channel,
            row.power,
            row.client_count,
            row.rssi,
            row.status.as_str()
        );
        if let Some(clients) = &row.clients {
            render_client_table(out, clients);
        }
    }
    let _ = writeln!(out, "╰─{:─<9}─┴─{:─<7}─┴─{:─<7}─┴─{:─<7}─┴─{:─<9}─┴─{:─<9}─╯", "", "", "", "", "", "");
}

fn render_client_table(out: &mut String, table: &ClientTableView) {
    let _ = writeln!(out, "│   ↳ {}", table.title);
    let [id, rssi, snr, up, down] = ClientTableView::HEADERS;
    let _ = writeln!(out, "│     {:<14} {:>8} {:>6} {:>10} {:>10}", id, rssi, snr, up, down);
    for client in &table.rows {
        let _ = writeln!(
            out,
            "│     {:<14} {:>8} {:>6} {:>10} {:>10}",
            client.id, client.rssi, client.snr, client.uplink, client.downlink
        );
    }
}

fn render_recent_changes(out: &mut String, view: &RecentChangesView) {
    let _ = writeln!(out, "🕒 {} ({})", view.title, view.badge);
    for item in &view.items {
        let _ = writeln!(out, "  ● {}  {}", item.ap_id, item.timestamp);
        let _ = writeln!(out, "  │ {}", item.action);
        let _ = writeln!(out, "  │ {}", item.details);
        let _ = writeln!(out, "  │ {}", item.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(tab: Tab, expand: &[&str]) -> String {
        let mut shell = DashboardShell::new(Arc::new(Fixtures::demo()));
        shell.select_tab(tab);
        for id in expand {
            shell.toggle_row(id);
        }
        render_view(&shell.render().unwrap())
    }

    #[test]
    fn overview_lists_tiles_and_charts() {
        let text = rendered(Tab::Overview, &[]);
        assert!(text.contains("[Overview]"));
        assert!(text.contains("Edge Client Throughput"));
        assert!(text.contains("▼22.3%"));
        assert!(text.contains("[+32.6%]"));
        assert!(text.contains("Total: 93"));
    }

    #[test]
    fn expanded_access_point_prints_clients() {
        let text = rendered(Tab::AccessPoints, &["AP-03"]);
        assert!(text.contains("Clients connected to AP-03"));
        assert!(text.contains("Client-E"));
        assert!(!text.contains("Clients connected to AP-01"));
        assert!(!text.contains("iPhone-User-1"));
    }

    #[test]
    fn repeated_expand_keeps_row_open() {
        let expand = ["AP-03".to_string(), "AP-03".to_string()];
        let shell = prepare_shell(Arc::new(Fixtures::demo()), Tab::AccessPoints, &expand).unwrap();
        let open: Vec<&str> = shell
            .rows()
            .iter()
            .filter(|r| r.is_expanded())
            .map(|r| r.ap_id())
            .collect();
        assert_eq!(open, ["AP-03"]);
    }

    #[test]
    fn unknown_expand_id_is_an_error() {
        let expand = ["AP-99".to_string()];
        let err = prepare_shell(Arc::new(Fixtures::demo()), Tab::AccessPoints, &expand)
            .err()
            .unwrap();
        assert!(err.to_string().contains("AP-99"));
    }

    #[test]
    fn timeline_shows_transitions() {
        let text = rendered(Tab::RecentChanges, &[]);
        assert!(text.contains("20dBm → 17dBm"));
        assert!(text.contains("(4 changes)"));
    }

    #[test]
    fn bars_scale_with_fraction() {
        assert_eq!(bar(1.0, '█').chars().count(), BAR_WIDTH);
        assert_eq!(bar(0.0, '█'), "");
        assert_eq!(bar(0.5, '░').chars().count(), BAR_WIDTH / 2);
    }
}
