use keyflow_core::auth::AuthClient;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::tui::app::App;

pub fn render<C: AuthClient>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(4)])
        .split(area);

    let title = Paragraph::new("You're logged in!")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = app
        .rows()
        .iter()
        .map(|row| ListItem::new(format!("{:<18} {}", row.title, row.content)))
        .collect();
    let mut state = ListState::default();
    state.select(Some(app.selected_row()));
    let list = List::new(items)
        .block(Block::default().title("Account").borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Yellow));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}
