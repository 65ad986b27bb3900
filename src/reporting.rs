//! Plain-text rendering of views for the command line.

use std::fmt::Write;

use crate::network::ComponentTable;
use crate::network::table::format_number;
use crate::shape::timeseries::ShapedSeries;
use crate::views::component::{CapacityBreakdown, ComponentSection, MapPoint};
use crate::views::temporal::Chart;
use crate::views::{GeospatialView, MetadataView, Panel, SummaryView, TemporalView, ViewOutput};

pub fn print_view(output: &ViewOutput<'_>, max_rows: usize) {
    print!("{}", render_view(output, max_rows));
}

/// Renders a view; tables and series stop after `max_rows` rows.
pub fn render_view(output: &ViewOutput<'_>, max_rows: usize) -> String {
    let mut out = String::new();
    match output {
        ViewOutput::Summary(view) => summary(&mut out, view, max_rows),
        ViewOutput::Temporal(view) => temporal(&mut out, view, max_rows),
        ViewOutput::Geospatial(view) => geospatial(&mut out, view, max_rows),
        ViewOutput::Metadata(view) => metadata(&mut out, view),
    }
    out
}

fn summary(out: &mut String, view: &SummaryView<'_>, max_rows: usize) {
    let _ = writeln!(out, "--- System Summary ---");
    let rows: Vec<Vec<String>> = view
        .counts
        .iter()
        .map(|c| vec![c.kind.label().to_string(), c.count.to_string()])
        .collect();
    grid(out, &["Component".to_string(), "Count".to_string()], &rows);

    let _ = writeln!(out, "\n--- Network Attributes ---");
    let _ = writeln!(out, "Number of snapshots: {}", view.snapshot_count);
    let _ = writeln!(out, "Investment periods: {:?}", view.investment_periods);
    if let Some(name) = view.name {
        let _ = writeln!(out, "Network name: {name}");
    }
    if let Some(range) = &view.time_range {
        let _ = writeln!(out, "Time range: {} to {}", range.first, range.last);
    }
    section(out, &view.section, max_rows);
}

fn geospatial(out: &mut String, view: &GeospatialView<'_>, max_rows: usize) {
    let _ = writeln!(out, "--- Geospatial View ---");
    section(out, &view.section, max_rows);
}

fn section(out: &mut String, section: &ComponentSection<'_>, max_rows: usize) {
    let label = section.kind.label();
    let table = match &section.table {
        Panel::Ready(table) => *table,
        Panel::Unavailable(notice) => {
            let _ = writeln!(out, "\nnote: {notice}");
            return;
        }
    };
    let _ = writeln!(out, "\n--- {label} Data ---");
    component_table(out, table, max_rows);

    if let Some(points) = &section.map {
        let _ = writeln!(out, "\n--- {label} Locations ({} points) ---", points.len());
        map(out, points, max_rows);
    }
    match &section.capacity {
        Some(Panel::Ready(breakdown)) => capacity(out, section.kind.singular(), breakdown),
        Some(Panel::Unavailable(notice)) => {
            let _ = writeln!(out, "\nnote: {notice}");
        }
        None => {}
    }
}

fn component_table(out: &mut String, table: &ComponentTable, max_rows: usize) {
    let mut headers = vec!["id".to_string()];
    headers.extend(table.column_names().map(str::to_string));
    let rows: Vec<Vec<String>> = table
        .ids()
        .iter()
        .take(max_rows)
        .enumerate()
        .map(|(row, id)| {
            let mut cells = vec![id.clone()];
            cells.extend(table.column_names().map(|col| table.display_cell(row, col)));
            cells
        })
        .collect();
    grid(out, &headers, &rows);
    more(out, table.len(), max_rows);
}

fn map(out: &mut String, points: &[MapPoint<'_>], max_rows: usize) {
    let headers = ["id", "x", "y", "carrier", "color"].map(str::to_string);
    let rows: Vec<Vec<String>> = points
        .iter()
        .take(max_rows)
        .map(|p| {
            vec![
                p.id.to_string(),
                format_number(p.x),
                format_number(p.y),
                p.carrier.unwrap_or_default().to_string(),
                p.color.map(|c| c.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    grid(out, &headers, &rows);
    more(out, points.len(), max_rows);
}

fn capacity(out: &mut String, noun: &str, breakdown: &CapacityBreakdown) {
    let _ = writeln!(out, "\n--- {noun} Capacity by Type ({}) ---", breakdown.attribute);
    let total = breakdown.total();
    let rows: Vec<Vec<String>> = breakdown
        .shares
        .iter()
        .map(|share| {
            let pct = if total != 0.0 {
                format!("{:.1}%", 100.0 * share.total / total)
            } else {
                "-".to_string()
            };
            vec![
                share.carrier.clone(),
                format_number(share.total),
                pct,
                share.color.to_string(),
            ]
        })
        .collect();
    grid(out, &["carrier", "total", "share", "color"].map(str::to_string), &rows);
}

fn temporal(out: &mut String, view: &TemporalView, max_rows: usize) {
    let _ = writeln!(out, "--- Temporal View ---");
    let _ = writeln!(out, "Component: {}", view.kind.label());
    let _ = writeln!(
        out,
        "Attribute: {} (available: {})",
        view.attribute,
        view.attributes.join(", ")
    );
    let modes: Vec<&str> = view.modes.iter().map(|m| m.label()).collect();
    let _ = writeln!(out, "View option: {} (available: {})", view.mode, modes.join(", "));
    match &view.chart {
        Panel::Ready(chart) => series(out, chart, max_rows),
        Panel::Unavailable(notice) => {
            let _ = writeln!(out, "\nnote: {notice}");
        }
    }
}

fn series(out: &mut String, chart: &Chart, max_rows: usize) {
    let _ = writeln!(out, "\n--- {} ---", chart.title);
    let series = chart.series.series();
    let mut headers = vec!["snapshot".to_string()];
    headers.extend(series.iter().map(|(name, _)| name.to_string()));
    let rows: Vec<Vec<String>> = chart
        .series
        .index()
        .iter()
        .take(max_rows)
        .enumerate()
        .map(|(row, snapshot)| {
            let mut cells = vec![snapshot.to_string()];
            cells.extend(
                series
                    .iter()
                    .map(|(_, values)| values[row].map(format_number).unwrap_or_default()),
            );
            cells
        })
        .collect();
    grid(out, &headers, &rows);
    more(out, chart.series.len(), max_rows);
    if let ShapedSeries::Total(total) = &chart.series {
        let sum: f64 = total.values.iter().sum();
        let _ = writeln!(out, "Sum over {} snapshots: {}", total.values.len(), format_number(sum));
    }
}

fn metadata(out: &mut String, view: &MetadataView) {
    let _ = writeln!(out, "--- Network Configuration ---");
    if view.empty {
        let _ = writeln!(out, "note: This network carries no metadata.");
    }
    out.push_str(&view.yaml);
}

fn more(out: &mut String, total: usize, shown: usize) {
    if total > shown {
        let _ = writeln!(out, "... {} more rows", total - shown);
    }
}

/// Left-aligned columns separated by two spaces.
fn grid(out: &mut String, headers: &[String], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };
    let _ = writeln!(out, "{}", line(headers));
    for row in rows {
        let _ = writeln!(out, "{}", line(row));
    }
}
