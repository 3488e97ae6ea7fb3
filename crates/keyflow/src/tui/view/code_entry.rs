use keyflow_core::auth::AuthClient;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::App;
use crate::tui::view::util::centered_rect;

pub fn render<C: AuthClient>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let panel = centered_rect(48, 12, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(2), // destination + countdown
            Constraint::Length(3), // code input
            Constraint::Length(1), // inline error
            Constraint::Length(1), // key hints
        ])
        .split(panel);

    let title = Paragraph::new("Enter the code we sent you")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let destination = app.challenge_phone_display().unwrap_or_default();
    let countdown = match app.challenge_remaining_secs() {
        Some(secs) if secs > 0 => format!("expires in {}:{:02}", secs / 60, secs % 60),
        _ => "expired".into(),
    };
    let info = Paragraph::new(format!("{destination}  ({countdown})")).alignment(Alignment::Center);
    frame.render_widget(info, chunks[1]);

    let border_color = if app.code_error().is_some() {
        Color::Red
    } else {
        Color::Yellow
    };
    let input = Paragraph::new(app.code_input()).alignment(Alignment::Center).block(
        Block::default()
            .title("Code")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(input, chunks[2]);

    if let Some(error) = app.code_error() {
        let error_line = Paragraph::new(error.to_owned())
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        frame.render_widget(error_line, chunks[3]);
    }

    let hints = Paragraph::new("Enter verifies, 'r' resends, Esc goes back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hints, chunks[4]);
}
