//! Core library for notes.
//!
//! This crate provides the note model, the document access layer over an
//! Appwrite-compatible backend, and the note service that ties them together,
//! independent of any front end (terminal UI, CLI, etc.).
//!
//! # Usage
//!
//! ```no_run
//! use notes_core::{AppwriteDocuments, Config, NewNote, NoteService};
//!
//! # async fn run() -> notes_core::Result<()> {
//! let config = Config::from_env()?;
//! let service = NoteService::new(AppwriteDocuments::new(&config)?);
//!
//! service.create_note(NewNote::from_content("Buy milk", &config.owner.user_id)).await?;
//! let notes = service.get_notes(None).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod confirm;
pub mod documents;
pub mod error;
pub mod models;
pub mod service;

// Re-export commonly used types at crate root
pub use config::{Config, Owner};
pub use confirm::{Assume, Confirm};
pub use documents::{AppwriteDocuments, DocumentStore, MemoryDocuments};
pub use error::{Error, ErrorKind, Result};
pub use models::{Document, NewNote, Note, NoteChanges, Query};
pub use service::NoteService;
