//! UI rendering with Ratatui.
//!
//! Design: Minimal black and white aesthetic. No colored borders.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use notes_core::{Confirm, DocumentStore, Note};

use crate::app::NotesScreen;

/// Render the notes screen.
pub fn render<S: DocumentStore, C: Confirm>(frame: &mut Frame, screen: &NotesScreen<S, C>) {
    let area = frame.area();
    if screen.loading && !screen.refreshing {
        render_loading(frame, area);
        return;
    }

    // Main layout: content area + status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Note list
            Constraint::Length(1), // Status bar (single line, no border)
        ])
        .split(area);

    if screen.notes.is_empty() {
        render_empty(frame, chunks[0]);
    } else {
        render_list(frame, screen, chunks[0]);
    }
    render_status(frame, screen, chunks[1]);

    if screen.modal_visible {
        render_editor(frame, screen);
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let text = Paragraph::new("Loading notes...").alignment(Alignment::Center);
    frame.render_widget(text, centered(area, 100, 1));
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let block = Block::default().title(" notes ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = Text::from(vec![
        Line::from("No notes yet. Create one!"),
        Line::styled("Press n to add a note", Style::default().add_modifier(Modifier::DIM)),
    ]);
    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, centered(inner, 100, 2));
}

fn list_line(note: &Note) -> Line<'static> {
    let updated = note
        .updated_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string();
    // Titles may span lines; only the first one fits a list row
    let title = note.title.lines().next().unwrap_or_default().to_string();

    Line::from(vec![
        Span::raw(format!("  {title}")),
        Span::styled(format!("  {updated}"), Style::default().add_modifier(Modifier::DIM)),
    ])
}

fn render_list<S: DocumentStore, C: Confirm>(
    frame: &mut Frame,
    screen: &NotesScreen<S, C>,
    area: Rect,
) {
    let items: Vec<ListItem> = screen
        .notes
        .iter()
        .enumerate()
        .map(|(i, note)| {
            let style = if i == screen.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };

            ListItem::new(list_line(note)).style(style)
        })
        .collect();

    let title = if screen.refreshing {
        " notes (refreshing) ".to_string()
    } else {
        format!(" notes ({}) ", screen.notes.len())
    };
    let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));

    frame.render_widget(list, area);
}

fn render_editor<S: DocumentStore, C: Confirm>(frame: &mut Frame, screen: &NotesScreen<S, C>) {
    let area = center(
        frame.area(),
        Constraint::Percentage(70),
        Constraint::Percentage(60),
    );
    let title = if screen.is_editing() { " Edit Note " } else { " New Note " };

    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(" ctrl-s save  esc cancel ").alignment(Alignment::Right))
        .borders(Borders::ALL);

    // Trailing block marks the cursor position
    let body = Paragraph::new(format!("{}\u{2588}", screen.note_text))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(body, area);
}

/// Render the status bar.
fn render_status<S: DocumentStore, C: Confirm>(
    frame: &mut Frame,
    screen: &NotesScreen<S, C>,
    area: Rect,
) {
    let status_text = if let Some(ref alert) = screen.alert {
        let label = if alert.is_error() { "error: " } else { "" };
        Line::from(vec![
            Span::raw(label),
            Span::styled(alert.message.as_str(), Style::default().add_modifier(Modifier::DIM)),
        ])
    } else {
        let hint = |key: &'static str, action: &'static str| {
            [
                Span::styled(key, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(action),
            ]
        };
        Line::from(
            [
                hint("n", " new  "),
                hint("enter", " edit  "),
                hint("d", " delete  "),
                hint("r", " refresh  "),
                hint("q", " quit"),
            ]
            .concat(),
        )
    };

    frame.render_widget(Paragraph::new(status_text), area);
}

/// Render the delete confirmation dialog.
pub fn render_confirm(frame: &mut Frame, title: &str, message: &str) {
    let area = centered(frame.area(), 40, 5);
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL);

    let text = Text::from(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" delete  "),
            Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]),
    ]);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        area,
    );
}

/// A rectangle `percent_x`% wide and `rows` high, centered in `area`.
fn centered(area: Rect, percent_x: u16, rows: u16) -> Rect {
    center(area, Constraint::Percentage(percent_x), Constraint::Length(rows))
}

fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [row] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    let [cell] = Layout::horizontal([horizontal]).flex(Flex::Center).areas(row);
    cell
}
