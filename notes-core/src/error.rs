//! Error type shared by the document access layer and the note service.

use serde::Deserialize;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing configuration: {0} is not set")]
    MissingConfig(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer from the document backend.
    #[error("{message}")]
    Backend {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("malformed document {id}: {reason}")]
    MalformedDocument { id: String, reason: String },

    #[error("note not found: {0}")]
    NoteNotFound(String),

    #[error("note content is empty")]
    EmptyContent,
}

/// Coarse classification; the CLI picks its hint line from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    PermissionDenied,
    NotFound,
    Validation,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) => ErrorKind::Network,
            Self::Backend { status: 401 | 403, .. } => ErrorKind::PermissionDenied,
            Self::Backend { status: 404, .. } | Self::NoteNotFound(_) => ErrorKind::NotFound,
            Self::EmptyContent | Self::InvalidConfig(_) | Self::MissingConfig(_) => {
                ErrorKind::Validation
            }
            _ => ErrorKind::Other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub(crate) fn not_found(id: &str) -> Self {
        Self::Backend {
            status: 404,
            kind: "document_not_found".into(),
            message: format!("Document with the requested ID '{id}' could not be found."),
        }
    }

    /// Build a backend error from a failed response body.
    ///
    /// Falls back to the raw body when it is not the backend's JSON error shape.
    pub(crate) fn from_response_body(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct BackendBody {
            message: String,
            #[serde(rename = "type", default)]
            kind: String,
        }

        match serde_json::from_str::<BackendBody>(body) {
            Ok(parsed) => Self::Backend {
                status,
                kind: parsed.kind,
                message: parsed.message,
            },
            Err(_) => Self::Backend {
                status,
                kind: "unknown".into(),
                message: if body.trim().is_empty() {
                    format!("backend responded with status {status}")
                } else {
                    body.trim().to_string()
                },
            },
        }
    }
}
