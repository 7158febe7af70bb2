use crate::event::AccessEvent;
use crate::filter::StreamFilter;
use crate::session::ConnectionState;
use crate::stream::{ChartPoint, StreamViews};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

/// Chart rows shown, newest last.
const CHART_ROWS: usize = 10;
/// Log rows shown, newest first.
const LOG_ROWS: usize = 15;
const BAR_WIDTH: usize = 30;

pub fn render_dashboard(
    views: &StreamViews,
    state: ConnectionState,
    filter: &StreamFilter,
    color: bool,
) -> String {
    let mut out = String::new();

    let status = state.to_string();
    let status = if !color {
        status
    } else {
        match state {
            ConnectionState::Connected => status.green().bold().to_string(),
            ConnectionState::Connecting => status.yellow().bold().to_string(),
            ConnectionState::Disconnected => status.red().bold().to_string(),
        }
    };

    out.push_str(&format!(
        "accesswatch [{status}]\n\
         =====================\n\
         filter: {}\n\n",
        describe_filter(filter)
    ));

    let totals = &views.totals;
    out.push_str(&format!(
        "requests: {} | avg: {:.1}ms | errors: {} ({:.1}%)\n",
        totals.count,
        totals.avg_duration_ms(),
        totals.error_count,
        totals.error_rate()
    ));

    let s = &views.status_totals;
    out.push_str(&format!(
        "Status: 2xx={} 3xx={} 4xx={} 5xx={}\n\n",
        s.count_2xx, s.count_3xx, s.count_4xx, s.count_5xx
    ));

    render_chart(&mut out, &views.chart);
    render_latency(&mut out, views);
    render_log(&mut out, &views.recent, color);

    out
}

fn describe_filter(filter: &StreamFilter) -> String {
    if filter.is_empty() {
        return "<none>".to_string();
    }
    let mut parts = Vec::new();
    if !filter.host.is_empty() {
        parts.push(format!("host~{}", filter.host));
    }
    if !filter.path.is_empty() {
        parts.push(format!("path~{}", filter.path));
    }
    if !filter.method.is_empty() {
        parts.push(format!("method={}", filter.method));
    }
    parts.join(" ")
}

fn render_chart(out: &mut String, chart: &[ChartPoint]) {
    if chart.is_empty() {
        out.push_str("Requests per tick: <waiting for first tick>\n\n");
        return;
    }

    let shown = &chart[chart.len().saturating_sub(CHART_ROWS)..];
    let peak = shown.iter().map(|p| p.counts.sum()).max().unwrap_or(0);

    out.push_str("Requests per tick:\n");
    for point in shown {
        let total = point.counts.sum();
        let bars = if peak == 0 {
            0
        } else {
            ((total as f64 / peak as f64) * BAR_WIDTH as f64).ceil() as usize
        };
        out.push_str(&format!(
            "  {} {:<width$} {:>5}  (4xx={} 5xx={})\n",
            point.time,
            "█".repeat(bars),
            total,
            point.counts.count_4xx,
            point.counts.count_5xx,
            width = BAR_WIDTH
        ));
    }
    out.push('\n');
}

fn render_latency(out: &mut String, views: &StreamViews) {
    let latency = &views.latency;
    let total: u64 = latency.buckets.iter().map(|b| b.count).sum();
    if total == 0 {
        out.push_str("Latency: <no samples>\n\n");
        return;
    }

    out.push_str("Latency:\n");
    for bucket in latency.buckets.iter().filter(|b| b.count > 0) {
        let pct = (bucket.count as f64 / total as f64) * 100.0;
        let bars = ((pct / 5.0).floor() as usize).max(1);
        out.push_str(&format!(
            "  {:<12} {:<20} {:>5.1}%\n",
            bucket.label,
            "█".repeat(bars),
            pct
        ));
    }
    out.push_str(&format!(
        "  p95 ≈ {}ms | p99 ≈ {}ms\n\n",
        latency.p95_ms, latency.p99_ms
    ));
}

fn render_log(out: &mut String, recent: &[Arc<AccessEvent>], color: bool) {
    if recent.is_empty() {
        out.push_str("Recent: <no events>\n");
        return;
    }

    out.push_str("Recent:\n");
    for event in recent.iter().take(LOG_ROWS) {
        let time = event
            .timestamp
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string());
        out.push_str(&format!(
            "  {} {:<7} {} {:>8.1}ms  {}{}\n",
            time,
            event.method,
            status_cell(event.status_code, color),
            event.duration_ms(),
            event.host,
            event.path
        ));
    }
}

fn status_cell(status: u16, color: bool) -> String {
    let text = format!("{status:>3}");
    if !color {
        return text;
    }
    match status / 100 {
        2 => text.green().to_string(),
        3 => text.cyan().to_string(),
        4 => text.yellow().to_string(),
        5 => text.red().to_string(),
        _ => text,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonFrame<'a> {
    connection: ConnectionState,
    filter: &'a StreamFilter,
    #[serde(flatten)]
    views: &'a StreamViews,
}

/// One JSON line per published snapshot.
pub fn render_json(
    views: &StreamViews,
    state: ConnectionState,
    filter: &StreamFilter,
) -> serde_json::Result<String> {
    serde_json::to_string(&JsonFrame {
        connection: state,
        filter,
        views,
    })
}

pub fn redraw(output: &str) {
    print!("\x1b[2J\x1b[H");
    println!("{output}");
    let _ = io::stdout().flush();
}
