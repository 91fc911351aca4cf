// File: src/html_view.rs
// Server-side HTML rendering of a dashboard tab (SVG donut, CSS bars, expandable rows)

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::dashboard::{
    AccessPointsView, OverviewView, RecentChangesView, ShellView, FOOTER, PERIOD_LABEL, SUBTITLE,
    TITLE,
};
use crate::data_models::Tab;
use crate::widgets::{bar_chart, donut_chart, ApRowView, BarChartView, DonutChartView, MetricTileView};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f1f5f9; color: #0f172a; }
header, nav, main, footer { padding: 12px 32px; }
header { background: #0f172a; color: #f8fafc; display: flex; justify-content: space-between; }
nav a { margin-right: 16px; text-decoration: none; color: #475569; }
nav a.nav-tab-active { color: #2563eb; font-weight: 600; }
.metrics-container { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; }
.metric-card, .chart-card, .content-card { background: #fff; border-radius: 8px; padding: 16px; }
.metric-value { font-size: 28px; font-weight: 700; }
.trend-positive { color: #16a34a; } .trend-negative { color: #dc2626; }
.charts-section { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; margin-top: 16px; }
.bar-chart-container { display: flex; align-items: flex-end; height: 200px; gap: 12px; }
.bar-group { flex: 1; display: flex; flex-direction: column; align-items: center; height: 100%; }
.bars-wrapper { display: flex; align-items: flex-end; gap: 2px; height: 100%; }
.bar { width: 14px; border-radius: 3px 3px 0 0; }
.pie-legend-color { display: inline-block; width: 10px; height: 10px; margin-right: 6px; }
.status-optimal { color: #16a34a; } .status-warning { color: #d97706; } .status-critical { color: #dc2626; }
.data-table-row-main a { color: inherit; text-decoration: none; }
.timeline-item { border-left: 2px solid #cbd5e1; padding: 4px 12px; margin-bottom: 12px; }
"#;

const SCRIPT: &str = r#"
(function () {
  const ws = new WebSocket((location.protocol === "https:" ? "wss://" : "ws://") + location.host + "/ws");
  ws.onmessage = (event) => {
    const msg = JSON.parse(event.data);
    if (msg.type !== "KpiUpdate") return;
    msg.tiles.forEach((tile, i) => {
      const el = document.getElementById("tile-value-" + i);
      if (el) el.textContent = tile.headline;
    });
  };
})();
"#;

/// Render a complete page for one tab; `expanded` is the set of AP ids
/// whose rows are currently open
pub fn render_page(view: &ShellView, expanded: &BTreeSet<String>) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title><style>{STYLE}</style></head><body>",
        title = TITLE
    );
    let _ = write!(
        out,
        "<header><div><h1>{}</h1><p>{}</p></div><div><span>{}</span> <span class=\"status-text\">● Live</span></div></header>",
        TITLE, SUBTITLE, PERIOD_LABEL
    );

    out.push_str("<nav>");
    for tab in Tab::ALL {
        let class = if tab == view.tab() { " class=\"nav-tab-active\"" } else { "" };
        let _ = write!(out, "<a href=\"/?tab={}\"{}>{}</a>", tab.key(), class, tab.label());
    }
    out.push_str("</nav><main>");

    match view {
        ShellView::Overview(v) => render_overview(&mut out, v),
        ShellView::AccessPoints(v) => render_access_points(&mut out, v, expanded),
        ShellView::RecentChanges(v) => render_recent_changes(&mut out, v),
    }

    let _ = write!(
        out,
        "</main><footer><p>{}</p></footer><script>{SCRIPT}</script></body></html>",
        escape(FOOTER)
    );
    out
}

fn render_overview(out: &mut String, view: &OverviewView) {
    out.push_str("<div class=\"metrics-container\">");
    for (i, tile) in view.tiles.iter().enumerate() {
        render_metric_tile(out, i, tile);
    }
    out.push_str("</div><div class=\"charts-section\">");
    render_bar_chart(out, &view.throughput);
    render_donut_chart(out, &view.interference);
    out.push_str("</div>");
}

fn render_metric_tile(out: &mut String, index: usize, tile: &MetricTileView) {
    let _ = write!(
        out,
        "<div class=\"metric-card\"><div class=\"metric-header\">{}</div><div class=\"metric-body\"><span class=\"metric-value\" id=\"tile-value-{}\">{}</span>",
        escape(&tile.title),
        index,
        escape(&tile.headline)
    );
    if let (Some(polarity), Some(badge)) = (tile.trend_glyph.polarity(), tile.badge()) {
        let _ = write!(
            out,
            "<div class=\"metric-trend trend-{}\">{} {}</div>",
            polarity,
            tile.trend_glyph.symbol(),
            badge
        );
    }
    out.push_str("</div></div>");
}

fn render_bar_chart(out: &mut String, chart: &BarChartView) {
    let _ = write!(
        out,
        "<div class=\"chart-card\"><h3 class=\"chart-title\">{}</h3><div class=\"chart-legend-inline\">\
         <span class=\"pie-legend-color\" style=\"background:{}\"></span>{} \
         <span class=\"pie-legend-color\" style=\"background:{}\"></span>{}</div><div class=\"bar-chart-container\">",
        bar_chart::TITLE,
        bar_chart::BASELINE_COLOR,
        bar_chart::BASELINE_LABEL,
        bar_chart::CURRENT_COLOR,
        bar_chart::CURRENT_LABEL
    );
    for group in &chart.groups {
        let _ = write!(
            out,
            "<div class=\"bar-group\"><div class=\"bars-wrapper\">\
             <div class=\"bar bar-baseline\" style=\"height:{:.1}%;background:{}\" title=\"{}\"></div>\
             <div class=\"bar bar-current\" style=\"height:{:.1}%;background:{}\" title=\"{}\"></div>\
             </div><div class=\"bar-label\">{}</div></div>",
            group.baseline_fraction * 100.0,
            bar_chart::BASELINE_COLOR,
            group.baseline_tooltip(),
            group.current_fraction * 100.0,
            bar_chart::CURRENT_COLOR,
            group.current_tooltip(),
            escape(&group.label)
        );
    }
    let _ = write!(
        out,
        "</div><div class=\"chart-highlight\"><span class=\"highlight-label\">Current Throughput</span> \
         <span class=\"highlight-number\">{} {}</span> <span class=\"highlight-badge\">{}</span></div></div>",
        chart.highlight.current_value,
        bar_chart::UNIT,
        chart.highlight.badge()
    );
}

fn render_donut_chart(out: &mut String, chart: &DonutChartView) {
    let _ = write!(
        out,
        "<div class=\"chart-card\"><h3 class=\"chart-title\">{}</h3>\
         <svg viewBox=\"0 0 {vb} {vb}\" class=\"pie-chart\" width=\"240\" height=\"240\">",
        donut_chart::TITLE,
        vb = donut_chart::VIEW_BOX
    );
    for slice in chart.slices.iter().filter(|s| s.sweep_angle > 0.0) {
        let _ = write!(
            out,
            "<path d=\"{}\" fill=\"{}\" class=\"pie-slice\"><title>{}</title></path>",
            slice.svg_path(),
            escape(&slice.color),
            escape(&slice.tooltip())
        );
    }
    let _ = write!(
        out,
        "<circle cx=\"{c}\" cy=\"{c}\" r=\"{r}\" fill=\"rgba(255, 255, 255, 0.95)\" />\
         <text x=\"{c}\" y=\"{c}\" text-anchor=\"middle\" class=\"pie-center-number\">{total}</text>\
         <text x=\"{c}\" y=\"{label_y}\" text-anchor=\"middle\" class=\"pie-center-label\">Total</text></svg>",
        c = donut_chart::CENTER,
        r = donut_chart::HOLE_RADIUS,
        total = chart.total,
        label_y = donut_chart::CENTER + 16.0
    );

    out.push_str("<div class=\"pie-legend-grid\">");
    for entry in &chart.legend {
        let _ = write!(
            out,
            "<div class=\"pie-legend-item\"><span class=\"pie-legend-color\" style=\"background:{}\"></span>\
             <span class=\"pie-legend-name\">{}</span> <span class=\"pie-legend-value\">{}%</span></div>",
            escape(&entry.color),
            escape(&entry.category),
            entry.percentage_rounded
        );
    }
    out.push_str("</div></div>");
}

fn render_access_points(out: &mut String, view: &AccessPointsView, expanded: &BTreeSet<String>) {
    let _ = write!(
        out,
        "<div class=\"content-card\"><div class=\"content-card-header\"><h2>{}</h2><span class=\"content-card-badge\">{}</span></div>\
         <table class=\"data-table\"><thead><tr><th>AP ID</th><th>Channel</th><th>Power</th><th>Clients</th><th>Avg RSSI</th><th>Status</th></tr></thead><tbody>",
        view.title,
        view.badge
    );
    for row in &view.rows {
        render_ap_row(out, row, expanded);
    }
    out.push_str("</tbody></table></div>");
}

fn render_ap_row(out: &mut String, row: &ApRowView, expanded: &BTreeSet<String>) {
    let _ = write!(
        out,
        "<tr class=\"data-table-row-main\"><td><a href=\"{}\">{} {}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
         <td><span class=\"status-pill status-{status}\">{status}</span></td></tr>",
        toggle_link(expanded, &row.id),
        row.chevron,
        escape(&row.id),
        row.channel,
        row.power,
        row.client_count,
        row.rssi,
        status = escape(row.status.as_str())
    );

    let Some(clients) = &row.clients else {
        return;
    };
    let _ = write!(
        out,
        "<tr class=\"data-table-row-nested\"><td colspan=\"6\"><div class=\"nested-table-container\">\
         <h4 class=\"nested-table-title\">{}</h4><table class=\"nested-data-table\"><thead><tr>",
        escape(&clients.title)
    );
    for header in crate::widgets::ClientTableView::HEADERS {
        let _ = write!(out, "<th>{}</th>", header);
    }
    out.push_str("</tr></thead><tbody>");
    for client in &clients.rows {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&client.id),
            client.rssi,
            client.snr,
            client.uplink,
            client.downlink
        );
    }
    out.push_str("</tbody></table></div></td></tr>");
}

/// Link that flips one row and keeps every other row as it is.
///
/// Each id is percent-encoded twice: the query decoder removes the outer
/// layer, and the inner layer keeps `,` inside an id apart from the list
/// separator. Plain ids such as `AP-03` come out unchanged.
pub fn toggle_link(expanded: &BTreeSet<String>, ap_id: &str) -> String {
    let mut next = expanded.clone();
    if !next.remove(ap_id) {
        next.insert(ap_id.to_string());
    }

    let mut link = format!("/?tab={}", Tab::AccessPoints.key());
    if !next.is_empty() {
        let ids: Vec<String> = next
            .iter()
            .map(|id| urlencoding::encode(&urlencoding::encode(id)).into_owned())
            .collect();
        let _ = write!(link, "&expand={}", ids.join(","));
    }
    escape(&link)
}

/// Parse an already query-decoded `expand` value back into AP ids
pub fn parse_expanded(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            urlencoding::decode(id)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| id.to_string())
        })
        .collect()
}

fn render_recent_changes(out: &mut String, view: &RecentChangesView) {
    let _ = write!(
        out,
        "<div class=\"content-card\"><div class=\"content-card-header\"><h2>{}</h2><span class=\"content-card-badge\">{}</span></div><div class=\"timeline\">",
        view.title,
        view.badge
    );
    for item in &view.items {
        let _ = write!(
            out,
            "<div class=\"timeline-item\"><div class=\"timeline-header\"><span class=\"timeline-ap\">{}</span> \
             <span class=\"timeline-time\">{}</span></div><h4 class=\"timeline-action\">{}</h4>\
             <p class=\"timeline-details\">{}</p><div class=\"timeline-reason\">{}</div></div>",
            escape(&item.ap_id),
            escape(&item.timestamp),
            escape(&item.action),
            escape(&item.details),
            escape(&item.reason)
        );
    }
    out.push_str("</div></div>");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardShell;
    use crate::fixtures::Fixtures;
    use std::sync::Arc;

    fn page(tab: Tab, expand: &[&str]) -> String {
        let mut shell = DashboardShell::new(Arc::new(Fixtures::demo()));
        shell.select_tab(tab);
        let mut expanded = BTreeSet::new();
        for id in expand {
            shell.toggle_row(id);
            expanded.insert(id.to_string());
        }
        render_page(&shell.render().unwrap(), &expanded)
    }

    #[test]
    fn overview_page_contains_svg_wedges() {
        let html = page(Tab::Overview, &[]);
        assert_eq!(html.matches("class=\"pie-slice\"").count(), 5);
        assert!(html.contains("<path d=\"M 100 100 L 100 30 A 70 70 0 0 1 "));
        assert!(html.contains("<title>WiFi: 48.4%</title>"));
        assert!(html.contains("r=\"40\""));
        assert!(html.contains("id=\"tile-value-0\">52.5 Mbps<"));
        assert!(html.contains("trend-negative"));
        assert!(html.contains("title=\"Baseline: 45 Mbps\""));
        assert!(html.contains("height:100.0%"));
    }

    #[test]
    fn only_expanded_rows_render_client_tables() {
        let html = page(Tab::AccessPoints, &["AP-03"]);
        assert_eq!(html.matches("data-table-row-nested").count(), 1);
        assert!(html.contains("Clients connected to AP-03"));
        assert!(html.contains("Client-E"));
        assert!(!html.contains("MacBook-Dev"));
    }

    #[test]
    fn toggle_links_flip_one_row() {
        let mut expanded = BTreeSet::new();
        assert_eq!(toggle_link(&expanded, "AP-03"), "/?tab=access-points&amp;expand=AP-03");

        expanded.insert("AP-03".to_string());
        assert_eq!(toggle_link(&expanded, "AP-03"), "/?tab=access-points");
        assert_eq!(
            toggle_link(&expanded, "AP-01"),
            "/?tab=access-points&amp;expand=AP-01,AP-03"
        );
    }

    #[test]
    fn reserved_characters_in_ids_survive_the_link() {
        let id = "AP&1, #2+%";
        let href = toggle_link(&BTreeSet::new(), id);
        assert!(!href.contains('#'));
        assert!(!href.contains(' '));

        let other = "AP-03".to_string();
        let both = toggle_link(&BTreeSet::from([other.clone()]), id);
        let value = both.rsplit("expand=").next().unwrap();
        // a browser and the query extractor undo the outer encoding
        let query_decoded = urlencoding::decode(value).unwrap();
        assert_eq!(parse_expanded(&query_decoded), BTreeSet::from([id.to_string(), other]));
    }

    #[test]
    fn hand_written_expand_lists_still_parse() {
        assert_eq!(
            parse_expanded("AP-01, AP-03,,"),
            BTreeSet::from(["AP-01".to_string(), "AP-03".to_string()])
        );
    }

    #[test]
    fn active_tab_is_marked() {
        let html = page(Tab::RecentChanges, &[]);
        assert!(html.contains("<a href=\"/?tab=recent-changes\" class=\"nav-tab-active\">Recent Changes</a>"));
        assert!(html.contains("149 → 157"));
        assert!(html.contains("50% OBSS detected"));
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }
}
