//! Document access layer.
//!
//! Generic list/create/update/delete against one configured database and
//! collection pair. Errors from the backend are passed through unchanged.

mod appwrite;
mod memory;

pub use appwrite::AppwriteDocuments;
pub use memory::MemoryDocuments;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::{Document, Query};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents matching `queries`, in the order they request.
    ///
    /// No pagination cursor is exposed; the backend's default page applies.
    async fn list_documents(&self, queries: &[Query]) -> Result<Vec<Document>>;

    async fn create_document(&self, id: &str, data: Map<String, Value>) -> Result<Document>;

    /// Partial update: only the keys present in `data` are written.
    async fn update_document(&self, id: &str, data: Map<String, Value>) -> Result<Document>;

    async fn delete_document(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<S> {
    async fn list_documents(&self, queries: &[Query]) -> Result<Vec<Document>> {
        (**self).list_documents(queries).await
    }

    async fn create_document(&self, id: &str, data: Map<String, Value>) -> Result<Document> {
        (**self).create_document(id, data).await
    }

    async fn update_document(&self, id: &str, data: Map<String, Value>) -> Result<Document> {
        (**self).update_document(id, data).await
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        (**self).delete_document(id).await
    }
}

/// Generate a fresh document identifier.
///
/// 32 lowercase hex characters, within the backend's 36-character limit and
/// valid as an id (alphanumeric, no leading special character).
pub fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
