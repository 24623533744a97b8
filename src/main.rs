use kintree::{actions, app, config, event, logger, ui};

use anyhow::Result;
use app::AppState;
use clap::Parser;
use config::{load_config, CliArgs};
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, LevelFilter};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

/// Owns raw mode and mouse capture; both are released on drop, including
/// when the main loop bails out with an error.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = load_config(&args)?;

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    let level = config.log_level.parse().unwrap_or(LevelFilter::Info);
    if let Err(e) = logger::FileLogger::init(level) {
        eprintln!("Logging disabled: {:#}", e);
    }

    // Create application state
    let mut app = AppState::new(config);
    if let Some(path) = app.config.default_file.clone() {
        if path.exists() {
            actions::open(&mut app, &path);
        } else {
            info!("{} does not exist yet; starting a new tree", path.display());
            app.filename = Some(path);
        }
    }

    let mut guard = TerminalGuard::new()?;
    let res = run_app(&mut guard.terminal, &mut app);
    drop(guard);

    // Handle any errors from the main loop
    if let Err(err) = res {
        error!("main loop failed: {:#}", err);
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()> {
    while app.running {
        // Draw the UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if let Some(action) = event::handle_events(app)? {
            // Failed actions have already reported themselves on the status line.
            if let Err(e) = actions::execute_action(action, app) {
                error!("action failed: {:#}", e);
            }
        }
    }

    Ok(())
}
