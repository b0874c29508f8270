use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use serde_json::{json, Map, Value};

use super::DocumentStore;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Document, DocumentList, Query};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";

/// Document store backed by the Appwrite REST API.
#[derive(Debug, Clone)]
pub struct AppwriteDocuments {
    client: Client,
    documents_url: String,
    project_id: String,
    api_key: Option<String>,
}

impl AppwriteDocuments {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            documents_url: config.documents_url(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.documents_url, id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header(PROJECT_HEADER, &self.project_id)
            .header(header::ACCEPT, "application/json");

        match &self.api_key {
            Some(key) => request.header(KEY_HEADER, key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::from_response_body(status.as_u16(), &body))
        }
    }
}

#[async_trait]
impl DocumentStore for AppwriteDocuments {
    async fn list_documents(&self, queries: &[Query]) -> Result<Vec<Document>> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_wire()))
            .collect();
        tracing::debug!(url = %self.documents_url, ?params, "listing documents");

        let request = self.client.get(&self.documents_url).query(&params);
        let list: DocumentList = self.send(request).await?.json().await?;
        tracing::debug!(total = list.total, returned = list.documents.len(), "listed documents");

        Ok(list.documents)
    }

    async fn create_document(&self, id: &str, data: Map<String, Value>) -> Result<Document> {
        tracing::debug!(url = %self.documents_url, id, "creating document");

        let body = json!({ "documentId": id, "data": data });
        let request = self.client.post(&self.documents_url).json(&body);

        Ok(self.send(request).await?.json().await?)
    }

    async fn update_document(&self, id: &str, data: Map<String, Value>) -> Result<Document> {
        tracing::debug!(url = %self.documents_url, id, "updating document");

        let body = json!({ "data": data });
        let request = self.client.patch(self.document_url(id)).json(&body);

        Ok(self.send(request).await?.json().await?)
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        tracing::debug!(url = %self.documents_url, id, "deleting document");

        let request = self.client.delete(self.document_url(id));
        self.send(request).await?;

        Ok(())
    }
}
