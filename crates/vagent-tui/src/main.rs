use anyhow::Result;

use vagent_core::Config;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use handler::handle_event;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::load().unwrap_or_else(|_| Config::new());
    let mut app = App::new(config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    // Initial directory fetch; the result arrives as an event on the main
    // loop like everything else.
    app.refresh_assistants(&events.sender());

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => {
                let tx = events.sender();
                handle_event(&mut app, event, &tx)?;
            }
            None => break,
        }
    }

    tui::restore()?;
    Ok(())
}

/// Log to a file only when VAGENT_LOG is set (the terminal owns stderr).
fn init_logging() {
    let Ok(filter) = std::env::var("VAGENT_LOG") else {
        return;
    };
    let Some(config_dir) = dirs::config_dir() else {
        return;
    };

    let log_dir = config_dir.join("vagent");
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(log_dir.join("vagent.log")) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}
