mod app;
mod attachment;
mod config;
mod emitter;
mod log;
mod script;
mod session;
mod stream;
mod ui;

use anyhow::Result;
use app::App;
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use emitter::Emitter;
use ratatui::{backend::CrosstermBackend, Terminal};
use session::Session;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Debug, Clone, Copy)]
enum AppCommand {
    Quit,
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = log::init_logging(&config::app_dir()?)?;
    info!(log = %log_path.display(), "starting scripted chat");
    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "could not load config");
            return Err(e);
        }
    };

    let table = Arc::new(config.load_script()?);
    info!(steps = table.len(), "loaded response script");
    let emitter = Emitter::new(table, config.emitter_config());
    let mut app = App::new(config.title.clone(), Session::new(emitter.table().len()));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &emitter, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "chat exited with an error");
    }
    result
}

async fn run(terminal: &mut Term, app: &mut App, emitter: &Emitter, config: &Config) -> Result<()> {
    app.start_session(emitter, config.greeting);

    loop {
        match run_app(terminal, app, emitter, config).await? {
            AppCommand::Quit => break,
            AppCommand::Reset => {
                info!("chat history cleared");
                app.reset();
                app.start_session(emitter, config.greeting);
            }
        }
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Term,
    app: &mut App,
    emitter: &Emitter,
    config: &Config,
) -> Result<AppCommand> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

            match key.code {
                KeyCode::Esc => return Ok(AppCommand::Quit),
                KeyCode::Char('c') if ctrl => return Ok(AppCommand::Quit),
                KeyCode::Char('l') if ctrl => return Ok(AppCommand::Reset),
                KeyCode::Char('s') if ctrl => save_attachment(app, config),
                KeyCode::Up => app.scroll_up(),
                KeyCode::Down => app.scroll_down(),
                KeyCode::Char(c) if !ctrl => app.push_char(c),
                KeyCode::Backspace => app.pop_char(),
                KeyCode::Enter => {
                    if app.submit() {
                        respond(terminal, app, emitter, config).await?;
                    }
                }
                _ => {}
            }
        }
    }
}

/// Reveal the reply for the current step: optional thinking pause, then one
/// redraw per chunk with the configured pacing.
async fn respond(terminal: &mut Term, app: &mut App, emitter: &Emitter, config: &Config) -> Result<()> {
    let cursor = app.session.cursor();
    let response = match emitter.emit(cursor) {
        Ok(Some(response)) => response,
        Ok(None) => return Ok(()),
        Err(e) => {
            error!(cursor, error = %e, "attachment unavailable");
            app.abort_response(format!("Attachment unavailable: {}", e));
            return Ok(());
        }
    };

    if let Some(wait) = response.waiting {
        app.set_thinking();
        terminal.draw(|f| ui::render(f, app))?;
        tokio::time::sleep(wait).await;
        discard_pending_input()?;
    }

    app.begin_stream();
    for chunk in response.chunks() {
        app.push_chunk(chunk);
        terminal.draw(|f| ui::render(f, app))?;
        discard_pending_input()?;
        tokio::time::sleep(config.chunk_delay()).await;
    }

    app.finish_response(response);
    Ok(())
}

/// Drop keystrokes typed while a reply is on screen; input is closed until it finishes.
fn discard_pending_input() -> Result<()> {
    while event::poll(Duration::ZERO)? {
        let _ = event::read()?;
    }
    Ok(())
}

fn save_attachment(app: &mut App, config: &Config) {
    let status = match &app.attachment {
        None => "No attachment to save".to_string(),
        Some(attachment) => {
            let download = &attachment.download;
            match config.download_dir().and_then(|dir| download.save_to(&dir)) {
                Ok(path) => {
                    info!(
                        path = %path.display(),
                        disposition = %download.content_disposition(),
                        "saved attachment"
                    );
                    format!("Saved {}", path.display())
                }
                Err(e) => {
                    warn!(file = %download.filename, error = %e, "could not save attachment");
                    format!("Could not save {}: {}", download.filename, e)
                }
            }
        }
    };
    app.set_status(Some(status));
}
