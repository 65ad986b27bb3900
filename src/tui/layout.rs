//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Tabs, Wrap};

use super::runtime::App;
use super::style;
use crate::loader::SampleNetwork;
use crate::reporting::render_view;
use crate::views::component::MapPoint;
use crate::views::temporal::Chart as SeriesChart;
use crate::views::{GeospatialView, Panel, TemporalView, View, ViewOutput};

/// Rows rendered into scrollable text panels.
const TEXT_ROWS: usize = 500;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // tabs
            Constraint::Min(8),    // body
            Constraint::Length(1), // message
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    match app.output() {
        None => render_empty(frame, chunks[2]),
        Some(ViewOutput::Temporal(view)) => render_temporal(frame, app, &view, chunks[2]),
        Some(ViewOutput::Geospatial(view)) => render_geospatial(frame, app, &view, chunks[2]),
        Some(output) => render_text(frame, app, &render_view(&output, TEXT_ROWS), chunks[2]),
    }
    render_message(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: network name and source.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let detail = app.session().map_or_else(
        || "no network".to_string(),
        |s| {
            let name = s.network().name().unwrap_or("unnamed network");
            format!(" {name} │ {} ", s.source())
        },
    );
    let header = Line::from(vec![
        Span::styled(
            " NETWORK-EXPLORER ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(detail, Style::default().add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<&str> = View::ALL.iter().map(|v| v.label()).collect();
    let tabs = Tabs::new(titles)
        .select(app.view_idx)
        .highlight_style(
            Style::default()
                .fg(style::TAB_ACTIVE)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from("  No network loaded."),
        Line::from(""),
        Line::from("  Load a sample:"),
    ];
    lines.extend(SampleNetwork::ALL.iter().enumerate().map(|(i, sample)| {
        Line::from(format!("    {}  {}: {}", i + 1, sample.name(), sample.description()))
    }));
    let block = Block::default().title(" Welcome ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_text(frame: &mut Frame, app: &App, text: &str, area: Rect) {
    let title = format!(" {} ", app.view().label());
    let paragraph = Paragraph::new(text.to_string())
        .block(Block::default().title(title).borders(Borders::ALL))
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Selected kind/attribute/mode and the entity picker above the chart.
fn render_temporal(frame: &mut Frame, app: &App, view: &TemporalView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);

    let modes: Vec<&str> = view.modes.iter().map(|m| m.label()).collect();
    let controls = vec![
        Line::from(format!(
            "  {}  │  attribute: {} ({})",
            view.kind.label(),
            view.attribute,
            view.attributes.join(", ")
        )),
        Line::from(format!("  view option: {} ({})", view.mode, modes.join(", "))),
        entity_line(app, &view.entities),
    ];
    frame.render_widget(
        Paragraph::new(controls).block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    match &view.chart {
        Panel::Ready(chart) => render_chart(frame, chart, chunks[1]),
        Panel::Unavailable(notice) => render_notice(frame, &notice.to_string(), chunks[1]),
    }
}

/// `[x]`/`[ ]` per entity, cursor highlighted.
fn entity_line(app: &App, entities: &[String]) -> Line<'static> {
    let mut spans = vec![Span::raw("  select: ")];
    let cursor = app.entity_idx % entities.len().max(1);
    for (i, entity) in entities.iter().enumerate() {
        let mark = if app.is_selected(entity, entities) { "[x]" } else { "[ ]" };
        let style = if i == cursor {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("{mark} {entity}"), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

fn render_chart(frame: &mut Frame, chart: &SeriesChart, area: Rect) {
    let points: Vec<(String, Vec<(f64, f64)>)> = chart
        .series
        .series()
        .into_iter()
        .map(|(name, values)| {
            let data = values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
                .collect();
            (name.to_string(), data)
        })
        .collect();

    let datasets: Vec<Dataset> = points
        .iter()
        .zip(&chart.colors)
        .map(|((name, data), color)| {
            Dataset::default()
                .name(name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(style::color(*color)))
                .data(data)
        })
        .collect();

    let y_bounds = style::auto_bounds(points.iter().flat_map(|(_, d)| d.iter().map(|(_, y)| y)));
    let index = chart.series.index();
    let x_hi = (index.len().saturating_sub(1) as f64).max(1.0);
    let first = index.first().map(ToString::to_string).unwrap_or_default();
    let last = index.last().map(ToString::to_string).unwrap_or_default();

    let widget = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {} ", chart.title))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("snapshot")
                .bounds([0.0, x_hi])
                .labels(vec![first, last]),
        )
        .y_axis(
            Axis::default()
                .bounds(y_bounds)
                .labels(vec![format!("{:.1}", y_bounds[0]), format!("{:.1}", y_bounds[1])]),
        );
    frame.render_widget(widget, area);
}

/// Component report on the left, located entities on the right.
fn render_geospatial(frame: &mut Frame, app: &App, view: &GeospatialView<'_>, area: Rect) {
    let Some(points) = view.section.map.as_deref().filter(|p| !p.is_empty()) else {
        let output = ViewOutput::Geospatial(view.clone());
        render_text(frame, app, &render_view(&output, TEXT_ROWS), area);
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let output = ViewOutput::Geospatial(view.clone());
    render_text(frame, app, &render_view(&output, TEXT_ROWS), chunks[0]);
    render_map(frame, view.section.kind.label(), points, chunks[1]);
}

fn render_map(frame: &mut Frame, label: &str, points: &[MapPoint<'_>], area: Rect) {
    let cells: Vec<[(f64, f64); 1]> = points.iter().map(|p| [(p.x, p.y)]).collect();
    let datasets: Vec<Dataset> = cells
        .iter()
        .zip(points)
        .map(|(cell, point)| {
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(style::color(point.color)))
                .data(cell)
        })
        .collect();

    let x_bounds = style::auto_bounds(points.iter().map(|p| &p.x));
    let y_bounds = style::auto_bounds(points.iter().map(|p| &p.y));
    let widget = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {label} Locations "))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("x")
                .bounds(x_bounds)
                .labels(vec![format!("{:.1}", x_bounds[0]), format!("{:.1}", x_bounds[1])]),
        )
        .y_axis(
            Axis::default()
                .title("y")
                .bounds(y_bounds)
                .labels(vec![format!("{:.1}", y_bounds[0]), format!("{:.1}", y_bounds[1])]),
        );
    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, notice: &str, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!("  {notice}"),
        Style::default().fg(style::NOTICE_FG),
    )))
    .wrap(Wrap { trim: false })
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_message(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = &app.message else {
        return;
    };
    let color = if message.starts_with("error") {
        style::ERROR_FG
    } else {
        style::FOOTER_FG
    };
    let line = Line::from(Span::styled(format!(" {message}"), Style::default().fg(color)));
    frame.render_widget(Paragraph::new(line), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Tab:View  c/C:Component  a:Attribute  m:Mode  e/E:Entity  Space:Select  x:Reset  ↑/↓:Scroll  1-3:Sample",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::loader::LoadMethod;
    use crate::shape::color::CarrierPalette;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn empty_screen_lists_samples() {
        let app = App::new(None, CarrierPalette::default());
        let screen = draw(&app);
        assert!(screen.contains("No network loaded."));
        assert!(screen.contains("scigrid_de"));
    }

    #[test]
    fn every_view_renders() {
        let mut app = App::new(
            Some(&LoadMethod::Sample(SampleNetwork::AcDcMeshed)),
            CarrierPalette::default(),
        );
        for _ in View::ALL {
            let screen = draw(&app);
            assert!(screen.contains(app.view().label()));
            app.next_view();
        }
    }

    #[test]
    fn temporal_view_shows_entity_picker() {
        let mut app = App::new(
            Some(&LoadMethod::Sample(SampleNetwork::AcDcMeshed)),
            CarrierPalette::default(),
        );
        app.next_view();
        let entities = app.entities();
        let screen = draw(&app);
        assert!(screen.contains(&format!("[x] {}", entities[0])));
        assert!(screen.contains(&format!("[ ] {}", entities[1])));

        app.toggle_entity();
        let screen = draw(&app);
        assert!(screen.contains(&format!("[ ] {}", entities[0])));
        assert!(screen.contains("Please select at least one generator to plot."));
    }
}
