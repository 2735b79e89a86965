//! Reusable TUI widget components for the fleet dashboard.
//!
//! Provides higher-level building blocks on top of ratatui primitives:
//! - [`UsageBarChart`] - Grouped CPU/RAM/Disk bars, one group per server
//! - [`StatusGauge`] - Online share of the recognized statuses
//! - [`AlertBarChart`] - Low/Medium/Critical distribution
//! - [`SeriesChart`] - Line chart over server position with gap-aware series
//! - [`ServerTable`] - Scrollable nine-column detail table

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, Gauge, GraphType,
        Row, Table, TableState,
    },
    Frame,
};

use crate::aggregate::Projection;
use crate::view::{
    self, format_value, BadgeTone, StatusShare, TableRow, UsageGroup, TABLE_COLUMNS,
};

/// Series colors shared by the usage bars and the comparison chart.
pub const CPU_COLOR: Color = Color::Cyan;
pub const RAM_COLOR: Color = Color::Magenta;
pub const DISK_COLOR: Color = Color::LightYellow;
pub const NETWORK_COLOR: Color = Color::Blue;

// ── UsageBarChart ───────────────────────────────────────────────────────────

/// Grouped percentage bars for every server.
pub struct UsageBarChart<'a> {
    pub groups: &'a [UsageGroup],
}

impl<'a> UsageBarChart<'a> {
    pub fn new(groups: &'a [UsageGroup]) -> Self {
        Self { groups }
    }

    fn bar(value: Option<f64>, color: Color) -> Bar<'static> {
        // Percentages are clamped for drawing only; the text keeps the raw value
        let height = value.map(|v| v.clamp(0.0, 100.0).round() as u64).unwrap_or(0);
        Bar::default()
            .value(height)
            .text_value(format_value(value))
            .style(Style::default().fg(color))
            .value_style(Style::default().fg(Color::Black).bg(color))
    }

    /// Render the chart into the given frame area.
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let legend = Line::from(vec![
            Span::raw(" Resource Usage "),
            Span::styled("■ CPU ", Style::default().fg(CPU_COLOR)),
            Span::styled("■ RAM ", Style::default().fg(RAM_COLOR)),
            Span::styled("■ Disk ", Style::default().fg(DISK_COLOR)),
        ]);

        let mut chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).title(legend))
            .bar_width(3)
            .bar_gap(0)
            .group_gap(2)
            .max(100);

        for group in self.groups {
            let bars = [
                Self::bar(group.cpu, CPU_COLOR),
                Self::bar(group.ram, RAM_COLOR),
                Self::bar(group.disk, DISK_COLOR),
            ];
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(group.label.clone()))
                    .bars(&bars),
            );
        }

        f.render_widget(chart, area);
    }
}

// ── StatusGauge ─────────────────────────────────────────────────────────────

/// Online/offline share; servers with other statuses are not part of the total.
pub struct StatusGauge {
    pub share: StatusShare,
}

impl StatusGauge {
    pub fn new(share: StatusShare) -> Self {
        Self { share }
    }

    /// Online in green over an offline red track; grey when nothing is recognized.
    fn style(&self) -> Style {
        if self.share.online + self.share.offline == 0 {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green).bg(Color::Red)
        }
    }

    /// Render the gauge into the given frame area.
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let gauge = Gauge::default()
            .block(Block::default().title(" Server Status ").borders(Borders::ALL))
            .gauge_style(self.style())
            .ratio(self.share.online_ratio())
            .label(self.share.label());
        f.render_widget(gauge, area);
    }
}

// ── AlertBarChart ───────────────────────────────────────────────────────────

/// Alert level distribution as three colored bars.
pub struct AlertBarChart {
    pub bars: [(&'static str, BadgeTone, usize); 3],
}

impl AlertBarChart {
    pub fn new(bars: [(&'static str, BadgeTone, usize); 3]) -> Self {
        Self { bars }
    }

    /// Render the chart into the given frame area.
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let bars: Vec<Bar> = self
            .bars
            .iter()
            .map(|(label, tone, count)| {
                let color = tone_color(*tone).unwrap_or(Color::Gray);
                Bar::default()
                    .label(Line::from(*label))
                    .value(*count as u64)
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();

        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Alert Level Distribution "),
            )
            .bar_width(8)
            .bar_gap(2)
            .data(BarGroup::default().bars(&bars));
        f.render_widget(chart, area);
    }
}

// ── SeriesChart ─────────────────────────────────────────────────────────────

/// One named line; each segment is a run of points without gaps.
pub struct Series {
    pub name: &'static str,
    pub color: Color,
    pub segments: Vec<Vec<(f64, f64)>>,
}

/// A line chart whose x axis is the server position in the snapshot.
pub struct SeriesChart<'a> {
    pub title: String,
    pub labels: &'a [String],
    pub series: Vec<Series>,
    pub y_max: Option<f64>,
}

impl<'a> SeriesChart<'a> {
    pub fn new(title: impl Into<String>, labels: &'a [String]) -> Self {
        Self {
            title: title.into(),
            labels,
            series: Vec::new(),
            y_max: None,
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Fix the top of the y axis (otherwise the largest point is used).
    pub fn with_y_max(mut self, y_max: f64) -> Self {
        self.y_max = Some(y_max);
        self
    }

    fn y_upper(&self) -> f64 {
        let observed = self
            .series
            .iter()
            .flat_map(|s| s.segments.iter().flatten())
            .map(|(_, y)| *y)
            .fold(0.0_f64, f64::max);
        self.y_max.unwrap_or(observed).max(1.0)
    }

    fn x_upper(&self) -> f64 {
        (self.labels.len().saturating_sub(1) as f64).max(1.0)
    }

    /// First, middle and last server names along the x axis.
    fn x_labels(&self) -> Vec<Span<'a>> {
        match self.labels.len() {
            0 => vec![],
            1 => vec![Span::raw(self.labels[0].as_str())],
            n => {
                let mut labels = vec![Span::raw(self.labels[0].as_str())];
                if n > 2 {
                    labels.push(Span::raw(self.labels[n / 2].as_str()));
                }
                labels.push(Span::raw(self.labels[n - 1].as_str()));
                labels
            }
        }
    }

    /// Render the chart into the given frame area.
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let mut datasets = Vec::new();
        for series in &self.series {
            for (i, segment) in series.segments.iter().enumerate() {
                let mut dataset = Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(series.color))
                    .data(segment);
                // Legend entry only once per series
                if i == 0 {
                    dataset = dataset.name(series.name);
                }
                datasets.push(dataset);
            }
        }

        let y_upper = self.y_upper();
        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.title)),
            )
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([0.0, self.x_upper()])
                    .labels(self.x_labels()),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([0.0, y_upper])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format!("{:.0}", y_upper / 2.0)),
                        Span::raw(format!("{:.0}", y_upper)),
                    ]),
            );
        f.render_widget(chart, area);
    }
}

// ── ServerTable ─────────────────────────────────────────────────────────────

/// The nine-column server detail table.
pub struct ServerTable<'a> {
    pub rows: &'a [TableRow],
    pub state: &'a mut TableState,
}

impl<'a> ServerTable<'a> {
    pub fn new(rows: &'a [TableRow], state: &'a mut TableState) -> Self {
        Self { rows, state }
    }

    /// Render the table into the given frame area.
    pub fn render(self, f: &mut Frame, area: Rect) {
        let header = Row::new(
            TABLE_COLUMNS
                .iter()
                .map(|c| Cell::from(*c).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

        let rows = self.rows.iter().map(|row| {
            let cells = row.cells.iter().enumerate().map(|(i, text)| {
                // Column 7 is the alert level badge
                if i == 7 {
                    Cell::from(text.clone()).style(badge_style(row.tone))
                } else {
                    Cell::from(text.clone())
                }
            });
            Row::new(cells)
        });

        let widths = [
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(15),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Min(19),
        ];

        let title = if self.rows.is_empty() {
            " Server Details (no servers) ".to_string()
        } else {
            format!(" Server Details ({}) ", self.rows.len())
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        f.render_stateful_widget(table, area, self.state);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Terminal color for a badge tone; `Plain` has none.
pub fn tone_color(tone: BadgeTone) -> Option<Color> {
    match tone {
        BadgeTone::Danger => Some(Color::Red),
        BadgeTone::Warning => Some(Color::Yellow),
        BadgeTone::Success => Some(Color::Green),
        BadgeTone::Plain => None,
    }
}

/// Cell style for an alert badge.
pub fn badge_style(tone: BadgeTone) -> Style {
    match (tone, tone_color(tone)) {
        (BadgeTone::Danger, Some(color)) => Style::default()
            .bg(color)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        (_, Some(color)) => Style::default().bg(color).fg(Color::Black),
        (_, None) => Style::default(),
    }
}

/// Build a series from a projection's positional values.
pub fn series(name: &'static str, color: Color, projection: &Projection) -> Series {
    Series {
        name,
        color,
        segments: view::line_segments(projection),
    }
}

/// Create a centered rectangle within the given area.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AlertTally, Summary};
    use crate::model::ServerRecord;
    use crate::view::{alert_bars, table_rows, usage_groups};
    use ratatui::{backend::TestBackend, Terminal};

    fn fleet() -> Vec<ServerRecord> {
        vec![
            ServerRecord::new("1", "web-1")
                .with_status("online")
                .with_alert_level("low")
                .with_usage(35.0, 60.0, 72.5)
                .with_network_traffic(120.0),
            ServerRecord::new("2", "db-1")
                .with_status("offline")
                .with_alert_level("critical"),
            ServerRecord::new("3", "cache-1")
                .with_status("online")
                .with_alert_level("medium")
                .with_usage(150.0, 10.0, 5.0)
                .with_network_traffic(40.0),
        ]
    }

    #[test]
    fn test_tone_color() {
        assert_eq!(tone_color(BadgeTone::Danger), Some(Color::Red));
        assert_eq!(tone_color(BadgeTone::Warning), Some(Color::Yellow));
        assert_eq!(tone_color(BadgeTone::Success), Some(Color::Green));
        assert_eq!(tone_color(BadgeTone::Plain), None);
        assert_eq!(badge_style(BadgeTone::Plain), Style::default());
    }

    #[test]
    fn test_status_gauge_style() {
        let empty = StatusGauge::new(StatusShare {
            online: 0,
            offline: 0,
        });
        assert_eq!(empty.style().fg, Some(Color::DarkGray));

        let mixed = StatusGauge::new(StatusShare {
            online: 3,
            offline: 1,
        });
        assert_eq!(mixed.style().fg, Some(Color::Green));
        assert_eq!(mixed.style().bg, Some(Color::Red));
    }

    #[test]
    fn test_series_chart_bounds() {
        let labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let chart = SeriesChart::new("Traffic", &labels).with_series(Series {
            name: "net",
            color: NETWORK_COLOR,
            segments: vec![vec![(0.0, 10.0), (1.0, 250.0)]],
        });
        assert_eq!(chart.x_upper(), 2.0);
        assert_eq!(chart.y_upper(), 250.0);
        assert_eq!(chart.x_labels().len(), 3);

        let fixed = SeriesChart::new("Usage", &labels).with_y_max(100.0);
        assert_eq!(fixed.y_upper(), 100.0);

        let empty: Vec<String> = Vec::new();
        let chart = SeriesChart::new("Empty", &empty);
        assert_eq!(chart.x_upper(), 1.0);
        assert_eq!(chart.y_upper(), 1.0);
        assert!(chart.x_labels().is_empty());
    }

    #[test]
    fn test_usage_bar_chart_render() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        let groups = usage_groups(&Summary::from_records(&fleet()));

        terminal
            .draw(|f| {
                let area = f.area();
                UsageBarChart::new(&groups).render(f, area)
            })
            .expect("failed to draw");
    }

    #[test]
    fn test_alert_bar_chart_render() {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        let tally = AlertTally {
            low: 1,
            medium: 0,
            critical: 2,
        };

        terminal
            .draw(|f| {
                let area = f.area();
                AlertBarChart::new(alert_bars(&tally)).render(f, area)
            })
            .expect("failed to draw");
    }

    #[test]
    fn test_series_chart_render_with_gaps() {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        let summary = Summary::from_records(&fleet());

        terminal
            .draw(|f| {
                let area = f.area();
                SeriesChart::new("Network Traffic", &summary.network.labels)
                    .with_series(series("Traffic (MB)", NETWORK_COLOR, &summary.network))
                    .render(f, area)
            })
            .expect("failed to draw");
    }

    #[test]
    fn test_server_table_render() {
        let backend = TestBackend::new(120, 10);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        let rows = table_rows(&fleet());
        let mut state = TableState::default();
        state.select(Some(0));

        terminal
            .draw(|f| {
                let area = f.area();
                ServerTable::new(&rows, &mut state).render(f, area)
            })
            .expect("failed to draw");

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Server Name"));
        assert!(text.contains("web-1"));
    }

    #[test]
    fn test_status_gauge_render() {
        let backend = TestBackend::new(50, 3);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        let gauge = StatusGauge::new(StatusShare {
            online: 2,
            offline: 1,
        });

        terminal
            .draw(|f| {
                let area = f.area();
                gauge.render(f, area)
            })
            .expect("failed to draw");
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.width < area.width);
        assert!(centered.height < area.height);
    }
}
