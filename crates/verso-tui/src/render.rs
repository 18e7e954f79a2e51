//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState` by immutable reference, draw to a ratatui
//! Frame, and never mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::input::InputField;
use crate::state::{AppState, Focus, TurnState};
use crate::text::single_line_summary;

/// Height of each bordered input box.
const INPUT_HEIGHT: u16 = 3;

/// Height of status line at the bottom.
const STATUS_HEIGHT: u16 = 1;

/// Width of the version selector column.
const VERSIONS_WIDTH: u16 = 26;

/// Spinner frames for status line animation.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Tick count per spinner frame.
const SPINNER_SPEED_DIVISOR: usize = 2;

/// Renders the entire TUI to the frame.
pub fn render(state: &AppState, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INPUT_HEIGHT),  // Prompt input
            Constraint::Length(INPUT_HEIGHT),  // Feedback input
            Constraint::Min(1),                // Versions + code + history
            Constraint::Length(STATUS_HEIGHT), // Status line
        ])
        .split(area);

    render_input_box(
        frame,
        chunks[0],
        &state.prompt_input,
        &format!(" Prompt ({}) ", state.model),
        state.focus == Focus::Prompt,
    );
    render_input_box(
        frame,
        chunks[1],
        &state.feedback_input,
        " Feedback ",
        state.focus == Focus::Feedback,
    );

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(VERSIONS_WIDTH),
            Constraint::Min(1),
            Constraint::Percentage(35),
        ])
        .split(chunks[2]);

    render_versions(state, frame, main[0]);
    render_code(state, frame, main[1]);
    render_history(state, frame, main[2]);
    render_status_line(state, frame, chunks[3]);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_input_box(
    frame: &mut Frame,
    area: Rect,
    field: &InputField,
    title: &str,
    focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(title.to_string());
    let text = Paragraph::new(field.text().to_string()).block(block);
    frame.render_widget(text, area);

    if focused {
        // Place the terminal cursor inside the box, after the typed text.
        let max_x = area.x + area.width.saturating_sub(2);
        let x = (area.x + 1 + field.cursor_column()).min(max_x);
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn render_versions(state: &AppState, frame: &mut Frame, area: Rect) {
    let focused = state.focus == Focus::Versions;
    let labels = state.session.version_labels();

    let lines: Vec<Line<'static>> = if labels.is_empty() {
        vec![Line::from(Span::styled(
            "(no versions)",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        let inner_width = area.width.saturating_sub(4) as usize;
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let selected = i == state.selected_version;
                let marker = if selected { "> " } else { "  " };
                let style = if selected && focused {
                    Style::default().fg(Color::Cyan)
                } else if selected {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(Span::styled(
                    format!("{marker}{}", single_line_summary(label, inner_width)),
                    style,
                ))
            })
            .collect()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(" Versions ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_code(state: &AppState, frame: &mut Frame, area: Rect) {
    let content = state
        .session
        .current_code()
        .map_or_else(
            || "No code yet. Write a prompt and press Enter.".to_string(),
            ToString::to_string,
        );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Code ");
    let code = Paragraph::new(content)
        .block(block)
        .scroll((state.code_scroll, 0));
    frame.render_widget(code, area);
}

fn render_history(state: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" History ");
    let history = Paragraph::new(state.session.history_text())
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.history_scroll, 0));
    frame.render_widget(history, area);
}

/// Renders the status line at the bottom.
fn render_status_line(state: &AppState, frame: &mut Frame, area: Rect) {
    let spans: Vec<Span> = match &state.turn_state {
        TurnState::Busy { .. } => {
            let spinner_idx = (state.spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len();
            vec![
                Span::styled(SPINNER_FRAMES[spinner_idx], Style::default().fg(Color::Yellow)),
                Span::raw(" "),
                Span::styled("Generating...", Style::default().fg(Color::Yellow)),
                Span::raw("  "),
                Span::styled("Esc", Style::default().fg(Color::DarkGray)),
                Span::raw(" to cancel"),
            ]
        }
        TurnState::Idle => {
            if let Some(status) = &state.status {
                let color = if status.is_error {
                    Color::Red
                } else {
                    Color::Green
                };
                vec![Span::styled(
                    status.text.clone(),
                    Style::default().fg(color),
                )]
            } else {
                vec![
                    Span::styled("Tab", Style::default().fg(Color::DarkGray)),
                    Span::raw(" switch pane  "),
                    Span::styled("Enter", Style::default().fg(Color::DarkGray)),
                    Span::raw(" submit/select  "),
                    Span::styled("Ctrl+C", Style::default().fg(Color::DarkGray)),
                    Span::raw(" quit"),
                ]
            }
        }
    };

    let status = Paragraph::new(Line::from(spans)).alignment(Alignment::Left);
    frame.render_widget(status, area);
}
