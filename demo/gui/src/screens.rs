//! Screen rendering functions for the TUI.

use forms_core::page::{Element, InputField, Page, RadioButton, ResultTable};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

/// Width of the label column in the parameter and result panels
const LABEL_WIDTH: usize = 26;

fn focus_marker(focused: bool) -> Span<'static> {
    if focused {
        Span::styled("> ", Style::default().fg(Color::Cyan))
    } else {
        Span::raw("  ")
    }
}

fn input_line(input: &InputField, focused: bool) -> Line<'static> {
    let label = format!("{:<width$}", format!("{}:", input.label), width = LABEL_WIDTH);
    // Empty fields show their placeholder dimmed; that is what gets sent
    let value = if input.value.is_empty() {
        Span::styled(
            input.placeholder.clone(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(input.value.clone())
    };
    let mut spans = vec![
        focus_marker(focused),
        Span::styled(label, Style::default().fg(Color::Yellow)),
        value,
    ];
    if focused {
        spans.push(Span::styled("_", Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

fn radio_line(radio: &RadioButton, focused: bool) -> Line<'static> {
    let bullet = if radio.checked { "(*) " } else { "( ) " };
    let style = if radio.checked {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    Line::from(vec![
        focus_marker(focused),
        Span::styled(bullet, style),
        Span::styled(radio.label.clone(), style),
    ])
}

fn button_line(label: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Line::from(vec![
        focus_marker(focused),
        Span::styled(format!("[ {} ]", label), style),
    ])
}

/// Draw a form page: parameters on the left, results on the right and any
/// results tables underneath.
pub fn draw_page(frame: &mut Frame, area: Rect, page: &Page, focused_id: Option<&str>) {
    let tables: Vec<&ResultTable> = page
        .elements()
        .iter()
        .filter_map(|e| match e {
            Element::Table(table) => Some(table),
            _ => None,
        })
        .collect();

    let mut constraints = vec![Constraint::Length(14)];
    constraints.extend(tables.iter().map(|_| Constraint::Min(5)));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[0]);

    draw_parameters(frame, top[0], page, focused_id);
    draw_results(frame, top[1], page);

    for (table, chunk) in tables.iter().zip(chunks.iter().skip(1)) {
        draw_table(frame, *chunk, table);
    }
}

/// Draw inputs, radio groups and buttons in declaration order
fn draw_parameters(frame: &mut Frame, area: Rect, page: &Page, focused_id: Option<&str>) {
    let mut lines = Vec::new();
    let mut last_group: Option<&str> = None;

    for element in page.elements() {
        let focused = focused_id == Some(element.id());
        match element {
            Element::Input(input) => lines.push(input_line(input, focused)),
            Element::Radio(radio) => {
                if last_group != Some(radio.group.as_str()) {
                    lines.push(Line::from(""));
                    last_group = Some(radio.group.as_str());
                }
                lines.push(radio_line(radio, focused));
            }
            Element::Button(button) => {
                lines.push(Line::from(""));
                lines.push(button_line(&button.label, focused));
            }
            Element::Output(_) | Element::Table(_) => {}
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(" Parameters ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Draw output fields exactly as rendered by the controller
fn draw_results(frame: &mut Frame, area: Rect, page: &Page) {
    let lines: Vec<Line> = page
        .elements()
        .iter()
        .filter_map(|e| match e {
            Element::Output(output) => Some(Line::from(vec![
                Span::styled(
                    format!("{:<width$}", format!("{}:", output.label), width = LABEL_WIDTH / 2),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(output.content.clone(), Style::default().fg(Color::Green)),
            ])),
            _ => None,
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(" Results ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Draw a results table
fn draw_table(frame: &mut Frame, area: Rect, table: &ResultTable) {
    let header_cells = table
        .columns
        .iter()
        .map(|h| Cell::from(h.clone()).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows = table
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(|c| Cell::from(c.clone()))));

    let count = table.columns.len().max(1) as u32;
    let widths: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();

    let title = format!(" Coupons ({}) ", table.rows.len());
    let widget = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));

    frame.render_widget(widget, area);
}

/// Draw a blocking alert centred over `area`
pub fn draw_alert(frame: &mut Frame, area: Rect, message: &str) {
    let popup = centered_rect(50, 7, area);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] OK",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let alert = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Warning ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(alert, popup);
}

/// Rectangle of `percent_x` width and `height` rows centred in `area`
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let width = area.width.saturating_mul(percent_x) / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
