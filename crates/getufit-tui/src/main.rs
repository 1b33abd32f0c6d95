use ratatui::{backend::CrosstermBackend, Terminal};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;

mod app;
mod form;
mod ui;

use app::{App, View};
use getufit_config::ConfigManager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Load config (created with defaults on first run)
    let manager = ConfigManager::load_default().await?;
    let config = manager.get().read().await.clone();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(&config).await?;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    let mut last_tick = tokio::time::Instant::now();
    let tick_rate = tokio::time::Duration::from_millis(100);

    loop {
        // Draw UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Handle timeout for event polling
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| tokio::time::Duration::from_secs(0));

        // Handle events
        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = crossterm::event::read()? {
                if handle_key_event(app, key) {
                    return Ok(());
                }
            }
        }

        // Process request completions
        app.process_events().await;

        // Update on tick
        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = tokio::time::Instant::now();
        }
    }
}

/// Returns true when the app should quit
fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return true,
            KeyCode::Char('t') => app.navigate(View::Chat),
            KeyCode::Char('p') => app.navigate(View::Plan),
            KeyCode::Char('f') => app.navigate(View::Files),
            KeyCode::Char('b') => app.navigate(View::OwnBot),
            KeyCode::Char('o') => app.navigate(View::Onboarding),
            KeyCode::Char('l') => {
                // Remount the current chat view, discarding its transcript
                if matches!(app.view, View::Chat | View::OwnBot) {
                    app.navigate(app.view);
                }
            }
            _ => {}
        }
        return false;
    }

    match app.view {
        View::Onboarding => match key.code {
            KeyCode::Enter => app.submit_onboarding(),
            KeyCode::Tab | KeyCode::Down => app.onboarding.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => app.onboarding.form.prev_field(),
            KeyCode::Left => app.onboarding.form.cycle(-1),
            KeyCode::Right => app.onboarding.form.cycle(1),
            KeyCode::Char(c) => app.onboarding.form.push_char(c),
            KeyCode::Backspace => app.onboarding.form.pop_char(),
            _ => {}
        },
        View::Chat | View::OwnBot => match key.code {
            KeyCode::Enter => {
                if app.view == View::Chat {
                    app.send_chat();
                } else {
                    app.send_own_bot();
                }
            }
            _ => {
                if let Some(chat) = app.active_chat_mut() {
                    match key.code {
                        KeyCode::Char(c) => chat.input.push(c),
                        KeyCode::Backspace => {
                            chat.input.pop();
                        }
                        KeyCode::Up => chat.scroll = chat.scroll.saturating_add(1),
                        KeyCode::Down => chat.scroll = chat.scroll.saturating_sub(1),
                        _ => {}
                    }
                }
            }
        },
        View::Plan => match key.code {
            KeyCode::Up => app.plan.scroll = app.plan.scroll.saturating_sub(1),
            KeyCode::Down => app.plan.scroll = app.plan.scroll.saturating_add(1),
            KeyCode::PageUp => app.plan.scroll = app.plan.scroll.saturating_sub(10),
            KeyCode::PageDown => app.plan.scroll = app.plan.scroll.saturating_add(10),
            _ => {}
        },
        View::Files => {}
    }
    false
}
