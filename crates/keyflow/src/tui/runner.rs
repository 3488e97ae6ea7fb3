use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use keyflow_core::auth::RestAuthClient;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::tui::app::{App, AppScreen, Focus};
use crate::tui::view::render_app;

pub async fn run(client: Arc<RestAuthClient>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(&mut stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client);
    let result = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<RestAuthClient>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render_app(frame, app))?;

        // Short poll so the code-entry countdown stays fresh.
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            break;
        }

        match app.screen() {
            AppScreen::Home => match key.code {
                KeyCode::Esc => break,
                KeyCode::Tab => app.toggle_focus(),
                KeyCode::Up => {
                    if matches!(app.focus(), Focus::Providers) {
                        app.move_provider_selection(-1);
                    }
                }
                KeyCode::Down => {
                    if matches!(app.focus(), Focus::Providers) {
                        app.move_provider_selection(1);
                    }
                }
                KeyCode::Enter => match app.focus() {
                    Focus::Providers => app.start_oauth().await,
                    Focus::Phone => app.submit_phone().await,
                },
                KeyCode::Backspace => {
                    if matches!(app.focus(), Focus::Phone) {
                        app.pop_phone_char();
                    }
                }
                KeyCode::Char(ch) => {
                    if matches!(app.focus(), Focus::Phone) {
                        app.push_phone_char(ch);
                    }
                }
                _ => {}
            },
            AppScreen::CodeEntry => match key.code {
                KeyCode::Esc => app.dismiss_code_entry(),
                KeyCode::Enter => app.submit_code().await,
                KeyCode::Backspace => app.pop_code_char(),
                KeyCode::Char('r') | KeyCode::Char('R') => app.resend_code().await,
                KeyCode::Char(ch) => app.push_code_char(ch),
                _ => {}
            },
            AppScreen::LoggedIn => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => break,
                KeyCode::Up | KeyCode::Char('k') => app.move_row_selection(-1),
                KeyCode::Down | KeyCode::Char('j') => app.move_row_selection(1),
                KeyCode::Char('l') | KeyCode::Char('L') => app.log_out().await,
                _ => {}
            },
        }
    }
    Ok(())
}
