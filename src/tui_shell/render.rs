use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::color;
use crate::summary;

use super::app::App;
use super::grid;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(grid::grid_width() + 2),
            Constraint::Min(0),
        ])
        .split(chunks[1]);

    draw_grid(frame, app, body[0]);
    draw_summary(frame, app, body[1]);
    draw_status(frame, app, chunks[2]);

    if app.selector.is_some() {
        draw_selector(frame, app, area);
    }
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let date = crate::model::format_sheet_date(app.date);
    let weekday = format!("{:?}", app.date.weekday());

    let spans = vec![
        Span::styled(
            "Quartergrid",
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        Span::raw("  "),
        Span::raw(format!("{weekday} {date}")),
        Span::raw("  "),
        Span::styled("■", Style::default().fg(cell_color(&app.current_activity.color))),
        Span::raw(" "),
        Span::styled(
            app.current_activity.title.clone(),
            Style::default().fg(Color::Green),
        ),
    ];

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_grid(frame: &mut ratatui::Frame, app: &mut App, area: Rect) {
    let outer = Block::default().borders(Borders::ALL).title("Day");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    app.grid_area = Some(inner);

    let mut lines = Vec::new();
    for hour in 0..grid::HOURS {
        let mut spans = vec![Span::styled(
            format!("{hour:02}:00 "),
            Style::default().fg(Color::Gray),
        )];
        for quarter in 0..grid::QUARTERS_PER_HOUR {
            let index = (hour * grid::QUARTERS_PER_HOUR + quarter) as usize;
            let Some(slot) = app.sheet.slot(index) else {
                continue;
            };
            let fill = cell_color(&slot.fill);
            let border = cell_color(&slot.border);

            spans.push(Span::styled("▏", Style::default().fg(border).bg(fill)));
            let body = if slot.pending { "····" } else { "    " };
            spans.push(Span::styled(body, Style::default().fg(border).bg(fill)));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_summary(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let outer = Block::default().borders(Borders::ALL).title("Summary");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let mut lines = vec![Line::from(vec![
        Span::styled("Total ", Style::default().fg(Color::Gray)),
        Span::styled(
            summary::total(&app.summary),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ])];

    for row in summary::rows(&app.summary) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{: >6}  ", row.sum),
                Style::default().fg(cell_color(&row.color)),
            ),
            Span::raw(row.title),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_status(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let line = if let Some(err) = &app.last_error {
        Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        ))
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::White),
        ))
    } else {
        Line::from("")
    };

    let hint = Line::from(Span::styled(
        "drag to paint  a activity  [ ] day  r reload  q quit",
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
    ));

    frame.render_widget(
        Paragraph::new(vec![line, hint]).block(Block::default().borders(Borders::TOP)),
        area,
    );
}

fn draw_selector(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(selector) = &app.selector else {
        return;
    };

    let height = (selector.items.len() as u16 + 2).min(area.height.saturating_sub(2));
    let width = 40.min(area.width);
    let rect = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    let mut lines = Vec::new();
    for (i, activity) in selector.items.iter().enumerate() {
        let style = if i == selector.selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled("■ ", style.fg(cell_color(&activity.color))),
            Span::styled(activity.title.clone(), style),
        ]));
    }

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Activity")),
        rect,
    );
}

fn cell_color(hex: &str) -> Color {
    match color::to_rgb(hex) {
        Some((r, g, b)) => Color::Rgb(r, g, b),
        None => Color::Reset,
    }
}
