use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notes_core::{
    AppwriteDocuments, Assume, Config, Confirm, DocumentStore, MemoryDocuments, NoteService, Owner,
};

mod commands;
mod prompt;

const DEFAULT_LOG_FILTER: &str = "notes=info,notes_core=info";

#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Minimal notes backed by an Appwrite document collection")]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Backend flags. Each one falls back to the environment variable it names.
#[derive(Args)]
struct BackendArgs {
    /// Backend API endpoint, e.g. https://cloud.appwrite.io/v1 [env: APPWRITE_ENDPOINT]
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// [env: APPWRITE_PROJECT_ID]
    #[arg(long, global = true)]
    project: Option<String>,

    /// [env: APPWRITE_DATABASE_ID]
    #[arg(long, global = true)]
    database: Option<String>,

    /// [env: APPWRITE_COLLECTION_ID]
    #[arg(long, global = true)]
    collection: Option<String>,

    /// [env: APPWRITE_API_KEY]
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Owner stamped on new notes [env: NOTES_USER_ID, default: user-001]
    #[arg(long, global = true)]
    user: Option<String>,

    /// Request timeout in seconds [env: NOTES_TIMEOUT_SECS, default: 30]
    #[arg(long, global = true)]
    timeout: Option<String>,

    /// Use an empty in-process store instead of the backend
    #[arg(long, global = true)]
    memory: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List notes, newest first
    List {
        /// Only notes owned by the configured user (also NOTES_SCOPE_TO_OWNER)
        #[arg(long)]
        mine: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one note
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// Create a note
    Add {
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },
    /// Replace a note's content
    Edit {
        id: String,

        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },
    /// Delete a note
    Delete {
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

impl BackendArgs {
    /// Flag value for a configuration key, else the environment.
    fn lookup(&self, key: &str) -> Option<String> {
        let flag = match key {
            "APPWRITE_ENDPOINT" => self.endpoint.as_ref(),
            "APPWRITE_PROJECT_ID" => self.project.as_ref(),
            "APPWRITE_DATABASE_ID" => self.database.as_ref(),
            "APPWRITE_COLLECTION_ID" => self.collection.as_ref(),
            "APPWRITE_API_KEY" => self.api_key.as_ref(),
            "NOTES_USER_ID" => self.user.as_ref(),
            "NOTES_TIMEOUT_SECS" => self.timeout.as_ref(),
            _ => None,
        };
        flag.cloned().or_else(|| std::env::var(key).ok())
    }

    fn config(&self) -> notes_core::Result<Config> {
        Config::from_lookup(|key| self.lookup(key))
    }

    fn owner(&self) -> notes_core::Result<Owner> {
        Owner::from_lookup(|key| self.lookup(key))
    }

    fn store(&self) -> anyhow::Result<Arc<dyn DocumentStore>> {
        if self.memory {
            return Ok(Arc::new(MemoryDocuments::new()));
        }

        let config = self.config()?;
        tracing::debug!(
            endpoint = %config.endpoint,
            database = %config.database_id,
            collection = %config.collection_id,
            "using backend"
        );
        Ok(Arc::new(AppwriteDocuments::new(&config)?))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if let Some(hint) = e.downcast_ref::<notes_core::Error>().and_then(commands::hint) {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let owner = cli.backend.owner()?;
    let service = NoteService::new(cli.backend.store()?);
    let user = owner.user_id.as_str();
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::List { mine, json } => {
            let filter = if mine { Some(user) } else { owner.filter() };
            commands::list(&service, filter, json, &mut out).await?;
        }
        Commands::Show { id, json } => {
            commands::show(&service, &id, json, &mut out).await?;
        }
        Commands::Add { content } => {
            commands::add(&service, &content.join(" "), user, &mut out).await?;
        }
        Commands::Edit { id, content } => {
            commands::edit(&service, &id, &content.join(" "), &mut out).await?;
        }
        Commands::Delete { id, yes } => {
            let confirm: Box<dyn Confirm> = if yes {
                Box::new(Assume(true))
            } else {
                Box::new(prompt::StdinConfirm)
            };
            commands::delete(&service, confirm.as_ref(), &id, &mut out).await?;
        }
    }

    Ok(())
}
