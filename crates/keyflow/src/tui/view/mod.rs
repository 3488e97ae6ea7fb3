use keyflow_core::auth::AuthClient;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::app::{App, AppScreen};

mod code_entry;
mod home;
mod session;
pub mod util;

pub fn render_app<C: AuthClient>(frame: &mut Frame, app: &App<C>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(frame.size());

    match app.screen() {
        AppScreen::Home => home::render(frame, layout[0], app),
        AppScreen::CodeEntry => code_entry::render(frame, layout[0], app),
        AppScreen::LoggedIn => session::render(frame, layout[0], app),
    }

    let status = Paragraph::new(app.status()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, layout[1]);
}
