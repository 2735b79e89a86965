//! UI layout and rendering for the fleet dashboard.
//!
//! The page is laid out top to bottom the way the dashboard reads:
//! - Header: title and fetch banner (loading / error / server count)
//! - Resource Usage: grouped CPU/RAM/Disk bars per server
//! - Server Status, Alert Level Distribution, Network Traffic side by side
//! - Server Details table
//! - Resource Usage Comparison across servers

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::widgets::{
    centered_rect, series, AlertBarChart, SeriesChart, ServerTable, StatusGauge, UsageBarChart,
    CPU_COLOR, DISK_COLOR, NETWORK_COLOR, RAM_COLOR,
};
use crate::view::{alert_bars, Banner, StatusShare, TITLE};

/// Top-level rendering function.
pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),      // Header
            Constraint::Percentage(25), // Resource usage
            Constraint::Percentage(22), // Status / alerts / traffic
            Constraint::Min(6),         // Server details
            Constraint::Percentage(20), // Comparison
            Constraint::Length(1),      // Key help
        ])
        .split(area);

    let banner = Banner::for_dashboard(&app.dashboard);

    draw_header(f, &banner, chunks[0]);
    UsageBarChart::new(&app.usage).render(f, chunks[1]);
    draw_cards(f, app, chunks[2]);
    ServerTable::new(&app.rows, &mut app.table_state).render(f, chunks[3]);
    draw_comparison(f, app, chunks[4]);
    draw_help(f, chunks[5]);

    if banner == Banner::Loading {
        draw_loading(f, area);
    }
}

// ── Header ──────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, banner: &Banner, area: Rect) {
    let banner_style = match banner {
        Banner::Loading => Style::default().fg(Color::Yellow),
        Banner::Error { .. } => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
        Banner::Ready { .. } => Style::default().fg(Color::Green),
        Banner::Idle => Style::default().fg(Color::DarkGray),
    };

    let text = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(banner.text(), banner_style)),
    ];

    let header = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

// ── Cards row ───────────────────────────────────────────────────────────────

fn draw_cards(f: &mut Frame, app: &App, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let summary = app.dashboard.summary();

    draw_status(f, StatusShare::from(&summary.status), cards[0]);
    AlertBarChart::new(alert_bars(&summary.alerts)).render(f, cards[1]);
    SeriesChart::new("Network Traffic (MB)", &summary.network.labels)
        .with_series(series("Traffic", NETWORK_COLOR, &summary.network))
        .render(f, cards[2]);
}

fn draw_status(f: &mut Frame, share: StatusShare, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    StatusGauge::new(share).render(f, chunks[0]);

    let legend = vec![
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(Color::Green)),
            Span::raw(format!("Online   {}", share.online)),
        ]),
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(Color::Red)),
            Span::raw(format!("Offline  {}", share.offline)),
        ]),
    ];
    let paragraph = Paragraph::new(legend).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, chunks[1]);
}

// ── Comparison ──────────────────────────────────────────────────────────────

fn draw_comparison(f: &mut Frame, app: &App, area: Rect) {
    let summary = app.dashboard.summary();
    SeriesChart::new("Resource Usage Comparison", &summary.cpu.labels)
        .with_series(series("CPU (%)", CPU_COLOR, &summary.cpu))
        .with_series(series("RAM (%)", RAM_COLOR, &summary.ram))
        .with_series(series("Disk (%)", DISK_COLOR, &summary.disk))
        .with_y_max(100.0)
        .render(f, area);
}

// ── Overlays & help ─────────────────────────────────────────────────────────

fn draw_loading(f: &mut Frame, area: Rect) {
    let popup = centered_rect(30, 20, area);
    f.render_widget(Clear, popup);
    let paragraph = Paragraph::new(Line::from(Span::styled(
        "Loading...",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" Fetching "));
    f.render_widget(paragraph, popup);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(Span::styled(
        " q:quit  j/k:select server  g/G:first/last ",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(help, area);
}
