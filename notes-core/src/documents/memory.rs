use std::cmp::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::DocumentStore;
use crate::error::{Error, Result};
use crate::models::{format_timestamp, now, Document, Query, CREATED_KEY, ID_KEY, UPDATED_KEY};

/// In-process document store with the same contract as the HTTP backend.
///
/// Documents keep insertion order unless a query sorts them. Used by tests
/// and for running the front ends without a backend.
#[derive(Debug, Default)]
pub struct MemoryDocuments {
    documents: Mutex<Vec<Document>>,
    fail_next: Mutex<Option<Error>>,
}

impl MemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with documents as-is, bypassing validation.
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Mutex::new(documents),
            ..Self::default()
        }
    }

    /// Make the next operation fail with `error` instead of touching the store.
    pub fn fail_next(&self, error: Error) {
        *lock(&self.fail_next) = Some(error);
    }

    pub fn len(&self) -> usize {
        lock(&self.documents).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        lock(&self.documents).iter().find(|d| d.id == id).cloned()
    }

    fn injected_failure(&self) -> Result<()> {
        match lock(&self.fail_next).take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

// A poisoned lock only means a test panicked mid-operation; the data is still usable.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn field<'a>(doc: &'a Document, attribute: &str) -> Option<&'a Value> {
    doc.fields.get(attribute)
}

fn matches(doc: &Document, query: &Query) -> bool {
    match query {
        Query::Equal { attribute, values } if attribute == ID_KEY => {
            values.iter().any(|v| v.as_str() == Some(doc.id.as_str()))
        }
        Query::Equal { attribute, values } => {
            field(doc, attribute).is_some_and(|value| values.contains(value))
        }
        Query::OrderAsc { .. } | Query::OrderDesc { .. } => true,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        // Missing values sort after present ones
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn compare(a: &Document, b: &Document, queries: &[Query]) -> Ordering {
    for query in queries {
        let ordering = match query {
            Query::OrderAsc { attribute } => {
                compare_values(field(a, attribute), field(b, attribute))
            }
            Query::OrderDesc { attribute } => {
                compare_values(field(b, attribute), field(a, attribute))
            }
            Query::Equal { .. } => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl DocumentStore for MemoryDocuments {
    async fn list_documents(&self, queries: &[Query]) -> Result<Vec<Document>> {
        self.injected_failure()?;

        let documents = lock(&self.documents);
        let mut found: Vec<Document> = documents
            .iter()
            .filter(|doc| queries.iter().all(|q| matches(doc, q)))
            .cloned()
            .collect();
        found.sort_by(|a, b| compare(a, b, queries));

        Ok(found)
    }

    async fn create_document(&self, id: &str, mut data: Map<String, Value>) -> Result<Document> {
        self.injected_failure()?;

        let mut documents = lock(&self.documents);
        if documents.iter().any(|d| d.id == id) {
            return Err(Error::Backend {
                status: 409,
                kind: "document_already_exists".into(),
                message: format!("Document with the requested ID '{id}' already exists."),
            });
        }

        let stamp = format_timestamp(now());
        data.insert(CREATED_KEY.into(), stamp.clone().into());
        data.insert(UPDATED_KEY.into(), stamp.into());

        let doc = Document::new(id, data);
        documents.push(doc.clone());
        Ok(doc)
    }

    async fn update_document(&self, id: &str, data: Map<String, Value>) -> Result<Document> {
        self.injected_failure()?;

        let mut documents = lock(&self.documents);
        let doc = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::not_found(id))?;

        doc.fields.extend(data);
        doc.fields
            .insert(UPDATED_KEY.into(), format_timestamp(now()).into());
        Ok(doc.clone())
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        self.injected_failure()?;

        let mut documents = lock(&self.documents);
        let before = documents.len();
        documents.retain(|d| d.id != id);

        if documents.len() == before {
            return Err(Error::not_found(id));
        }
        Ok(())
    }
}
