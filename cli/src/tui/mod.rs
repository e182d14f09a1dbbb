pub mod app;
pub mod ui;

use std::io;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use puck_core::PlayerRepository;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::{App, InputMode, View};

pub fn run<R: PlayerRepository>(repo: &R) -> Result<()> {
    // Load before touching the terminal so a bad dataset reports normally.
    let mut app = App::new(repo)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(std::time::Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Tab => app.next_view(),
                    KeyCode::BackTab => app.previous_view(),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Right | KeyCode::Char('l') => app.next_stat(),
                    KeyCode::Left | KeyCode::Char('h') => app.previous_stat(),
                    code => handle_view_key(app, code),
                }
            }
            InputMode::Searching => {
                match key.code {
                    KeyCode::Enter => app.submit_search(),
                    KeyCode::Esc => app.exit_input_mode(),
                    KeyCode::Char(c) => app.input_char(c),
                    KeyCode::Backspace => app.delete_char(),
                    KeyCode::Left => app.move_cursor_left(),
                    KeyCode::Right => app.move_cursor_right(),
                    KeyCode::Down | KeyCode::Tab => app.next_suggestion(),
                    KeyCode::Up | KeyCode::BackTab => app.previous_suggestion(),
                    _ => {}
                }
            }
        }
    }
}

fn handle_view_key(app: &mut App, code: KeyCode) {
    match app.view {
        View::Rankings => match code {
            KeyCode::Char('+') | KeyCode::Char('=') => app.raise_weight(),
            KeyCode::Char('-') => app.lower_weight(),
            KeyCode::Char('m') => app.toggle_min_max(),
            KeyCode::Char('w') => app.toggle_weight_mode(),
            KeyCode::Char(c @ '1'..='4') => app.toggle_position(c as usize - '1' as usize),
            _ => {}
        },
        View::Roster => match code {
            KeyCode::Char('/') | KeyCode::Char('a') => app.enter_search_mode(),
            KeyCode::Char('d') | KeyCode::Delete => app.remove_selected(),
            KeyCode::Char('t') => app.toggle_aggregate_mode(),
            KeyCode::Char('c') => app.toggle_chart(),
            _ => {}
        },
        View::Trade => match code {
            KeyCode::Char('/') | KeyCode::Char('a') => app.enter_search_mode(),
            KeyCode::Char('d') | KeyCode::Delete => app.remove_selected(),
            KeyCode::Char('t') => app.toggle_aggregate_mode(),
            KeyCode::Char('s') => app.switch_side(),
            KeyCode::Char('n') => app.next_series(),
            KeyCode::Char('v') => app.toggle_series(),
            _ => {}
        },
    }
}
