use std::io::{Stdout, stdout};

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    symbols,
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem, Paragraph, Row, Table},
};

use super::{DashboardView, ListRow, TableRow};
use crate::health::HealthStatus;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn init() -> Result<Tui> {
    setup_panic_hook();
    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Leaves the alternate screen before the panic message is printed.
fn setup_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        original(info);
    }));
}

/// `q`, `Esc` or `Ctrl+C`. Raw mode swallows SIGINT, so Ctrl+C arrives here.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

pub fn status_color(status: HealthStatus) -> Color {
    match status {
        HealthStatus::Good => Color::Green,
        HealthStatus::Warning => Color::Yellow,
        HealthStatus::Critical => Color::Red,
    }
}

pub fn draw(f: &mut Frame, view: &DashboardView, list_rows: usize) {
    let chunks = Layout::vertical([
        Constraint::Length(view.metrics.len().max(view.health.len()) as u16 + 3),
        Constraint::Length(12),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(f.area());

    let tables = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);
    draw_table(f, tables[0], "Métriques", "Métrique", &view.metrics);
    draw_table(f, tables[1], "Santé du système", "Indicateur", &view.health);

    let charts = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    draw_chart(f, charts[0], "Débit (msg/s)", &view.throughput_series, Color::Cyan, None);
    draw_chart(
        f,
        charts[1],
        "Taux de succès (%)",
        &view.success_rate_series,
        Color::Green,
        Some(100.0),
    );

    let lists = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    draw_list(f, lists[0], "Logs Récents", &view.log_rows, list_rows);
    draw_list(f, lists[1], "Événements Récents", &view.event_rows, list_rows);

    let help = Paragraph::new("q / Échap / Ctrl+C : quitter")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[3]);
}

fn draw_table(f: &mut Frame, area: Rect, title: &str, header: &str, rows: &[TableRow]) {
    let rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let value_style = row
                .status
                .map(|s| Style::default().fg(status_color(s)))
                .unwrap_or_default();
            Row::new(vec![
                Cell::from(row.label),
                Cell::from(row.value.clone()).style(value_style),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(24), Constraint::Min(10)])
        .header(
            Row::new(vec![header.to_string(), "Valeur".to_string()])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(table, area);
}

fn draw_chart(
    f: &mut Frame,
    area: Rect,
    title: &str,
    series: &[f64],
    color: Color,
    y_ceiling: Option<f64>,
) {
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();

    let x_max = (series.len().saturating_sub(1) as f64).max(1.0);
    let y_max = y_ceiling.unwrap_or_else(|| {
        let peak = series.iter().copied().fold(0.0, f64::max);
        if peak > 0.0 { peak * 1.2 } else { 1.0 }
    });

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points);

    let last = series.last().copied().unwrap_or_default();
    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} : {:.2}", title, last)),
        )
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0.0"), Span::raw(format!("{:.1}", y_max))]),
        );
    f.render_widget(chart, area);
}

fn draw_list(f: &mut Frame, area: Rect, title: &str, rows: &[ListRow], limit: usize) {
    let items: Vec<ListItem> = rows
        .iter()
        .take(limit)
        .map(|row| ListItem::new(row.text.clone()).style(Style::default().fg(status_color(row.status))))
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(list, area);
}
