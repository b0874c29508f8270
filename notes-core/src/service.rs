//! Note service.
//!
//! Translates note operations into document operations, stamping the
//! timestamp fields and mapping backend documents into [`Note`]s.
//!
//! Every operation logs a failure and returns the underlying error unchanged.

use crate::documents::{unique_id, DocumentStore};
use crate::error::{Error, Result};
use crate::models::{fields, now, NewNote, Note, NoteChanges, Query, ID_KEY};

pub struct NoteService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> NoteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All notes, newest first, optionally restricted to one owner.
    pub async fn get_notes(&self, user_id: Option<&str>) -> Result<Vec<Note>> {
        let mut queries = Vec::with_capacity(2);
        if let Some(user_id) = user_id {
            queries.push(Query::equal(fields::USER_ID, user_id));
        }
        queries.push(Query::order_desc(fields::CREATED_AT));

        let result = async {
            self.store
                .list_documents(&queries)
                .await?
                .into_iter()
                .map(Note::from_document)
                .collect::<Result<Vec<_>>>()
        }
        .await;

        result.inspect_err(|e| tracing::error!(error = ?e, ?user_id, "error getting notes"))
    }

    pub async fn get_note(&self, id: &str) -> Result<Note> {
        let result = async {
            let doc = self
                .store
                .list_documents(&[Query::equal(ID_KEY, id)])
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| Error::NoteNotFound(id.to_string()))?;
            Note::from_document(doc)
        }
        .await;

        result.inspect_err(|e| tracing::error!(error = ?e, id, "error getting note"))
    }

    pub async fn create_note(&self, input: NewNote) -> Result<Note> {
        let id = unique_id();
        let data = input.into_fields(now());
        tracing::debug!(id = %id, ?data, "creating note");

        let result = async {
            let doc = self.store.create_document(&id, data).await?;
            Note::from_document(doc)
        }
        .await;

        match result {
            Ok(note) => {
                tracing::info!(id = %note.id, "note created");
                Ok(note)
            }
            Err(e) => {
                tracing::error!(error = ?e, "error creating note");
                Err(e)
            }
        }
    }

    /// Apply `changes` to note `id`. `createdAt` is never touched.
    pub async fn update_note(&self, id: &str, changes: NoteChanges) -> Result<Note> {
        let data = changes.into_fields(now());
        tracing::debug!(id, ?data, "updating note");

        let result = async {
            let doc = self.store.update_document(id, data).await?;
            Note::from_document(doc)
        }
        .await;

        match result {
            Ok(note) => {
                tracing::info!(id, "note updated");
                Ok(note)
            }
            Err(e) => {
                tracing::error!(error = ?e, id, "error updating note");
                Err(e)
            }
        }
    }

    pub async fn delete_note(&self, id: &str) -> Result<()> {
        tracing::debug!(id, "deleting note");

        match self.store.delete_document(id).await {
            Ok(()) => {
                tracing::info!(id, "note deleted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = ?e, id, "error deleting note");
                Err(e)
            }
        }
    }
}
