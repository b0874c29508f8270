//! Notes TUI - terminal front end for the notes collection.
//!
//! Reads the backend configuration from the environment (`APPWRITE_*`,
//! `NOTES_*`). Pass `--memory` to run against an empty in-process store.

mod app;
mod confirm;
mod ui;

use std::cell::RefCell;
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notes_core::{
    AppwriteDocuments, Config, Confirm, DocumentStore, MemoryDocuments, NoteService, Owner,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::NotesScreen;
use confirm::DialogConfirm;

const DEFAULT_LOG_FILTER: &str = "notes_tui=info,notes_core=info";

#[derive(Parser)]
#[command(name = "notes-tui")]
#[command(about = "Terminal UI for notes backed by an Appwrite document collection")]
struct Args {
    /// Use an empty in-process store instead of the backend
    #[arg(long)]
    memory: bool,
}

fn log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("notes")
        .join("notes-tui.log")
}

/// Log to a file; stdout belongs to the alternate screen.
fn init_logging() -> anyhow::Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::options().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log = init_logging()?;
    tracing::info!(log = %log.display(), "starting notes-tui");

    let (store, owner) = if args.memory {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocuments::new());
        (store, Owner::from_env()?)
    } else {
        let config = Config::from_env()?;
        tracing::debug!(
            endpoint = %config.endpoint,
            database = %config.database_id,
            collection = %config.collection_id,
            "using backend"
        );
        let store: Arc<dyn DocumentStore> = Arc::new(AppwriteDocuments::new(&config)?);
        (store, config.owner)
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Rc::new(RefCell::new(Terminal::new(backend)?));

    // Create screen and run
    let mut screen = NotesScreen::new(
        NoteService::new(store),
        DialogConfirm::new(terminal.clone()),
        owner.user_id.clone(),
        owner.filter().map(str::to_string),
    );
    let result = run_app(&terminal, &mut screen).await;

    // Restore terminal
    disable_raw_mode()?;
    let mut terminal = terminal.borrow_mut();
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "notes-tui exited with an error");
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Main event loop.
async fn run_app<B, S, C>(
    terminal: &RefCell<Terminal<B>>,
    screen: &mut NotesScreen<S, C>,
) -> io::Result<()>
where
    B: ratatui::backend::Backend,
    S: DocumentStore,
    C: Confirm,
{
    // Show the loading view while the first fetch runs
    terminal.borrow_mut().draw(|frame| ui::render(frame, screen))?;
    screen.mount().await;

    loop {
        terminal.borrow_mut().draw(|frame| ui::render(frame, screen))?;

        let event = tokio::task::spawn_blocking(event::read)
            .await
            .map_err(io::Error::other)??;

        if let Event::Key(key) = event {
            // Only handle key press events (not release)
            if key.kind != KeyEventKind::Press {
                continue;
            }
            screen.handle_key(key).await;
        }

        if screen.should_quit {
            break;
        }
    }

    Ok(())
}
