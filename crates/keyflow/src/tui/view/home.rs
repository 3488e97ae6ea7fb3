use keyflow_core::auth::AuthClient;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::tui::app::{App, Focus};
use crate::tui::view::util::centered_rect;

pub fn render<C: AuthClient>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let panel = centered_rect(48, 16, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(4), // providers
            Constraint::Length(1), // separator
            Constraint::Length(3), // phone input
            Constraint::Length(1), // inline error
            Constraint::Length(3), // continue
        ])
        .split(panel);

    let title = Paragraph::new("Sign up or log in")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    render_providers(frame, chunks[1], app);

    let separator = Paragraph::new("── or ──").alignment(Alignment::Center);
    frame.render_widget(separator, chunks[2]);

    render_phone_input(frame, chunks[3], app);

    if let Some(error) = app.phone_error() {
        let error_line = Paragraph::new(error).style(Style::default().fg(Color::Red));
        frame.render_widget(error_line, chunks[4]);
    }

    render_continue(frame, chunks[5], app);
}

fn render_providers<C: AuthClient>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let items: Vec<ListItem> = app
        .providers()
        .iter()
        .map(|provider| ListItem::new(format!("Continue with {provider}")))
        .collect();
    let mut state = ListState::default();
    state.select(Some(app.provider_index()));
    let highlight = if matches!(app.focus(), Focus::Providers) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let list = List::new(items)
        .block(Block::default().title("Providers").borders(Borders::ALL))
        .highlight_style(highlight)
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_phone_input<C: AuthClient>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let border_color = if app.phone_error().is_some() {
        Color::Red
    } else if matches!(app.focus(), Focus::Phone) {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let content = if app.phone_input().is_empty() && !matches!(app.focus(), Focus::Phone) {
        Line::styled("+1 415 555 0100", Style::default().fg(Color::DarkGray))
    } else {
        Line::from(app.phone_input().to_owned())
    };
    let input = Paragraph::new(content).block(
        Block::default()
            .title("Phone number")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(input, area);
}

fn render_continue<C: AuthClient>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let style = if app.can_continue() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let label = if app.busy() { "Working…" } else { "Continue" };
    let button = Paragraph::new(label)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, area);
}
