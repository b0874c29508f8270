use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key under which the backend exposes a document's identifier.
pub const ID_KEY: &str = "$id";
pub const CREATED_KEY: &str = "$createdAt";
pub const UPDATED_KEY: &str = "$updatedAt";

/// A raw document as stored by the backend: its identifier plus an open set
/// of fields (application fields and `$`-prefixed system attributes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Response envelope of the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub total: u64,
    pub documents: Vec<Document>,
}

/// A filter or sort instruction passed to the list operation.
///
/// Serializes to the JSON query strings the backend accepts, e.g.
/// `{"method":"equal","attribute":"userId","values":["user-001"]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum Query {
    Equal { attribute: String, values: Vec<Value> },
    OrderAsc { attribute: String },
    OrderDesc { attribute: String },
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equal {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    pub fn order_asc(attribute: impl Into<String>) -> Self {
        Self::OrderAsc {
            attribute: attribute.into(),
        }
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Self::OrderDesc {
            attribute: attribute.into(),
        }
    }

    pub fn attribute(&self) -> &str {
        match self {
            Self::Equal { attribute, .. }
            | Self::OrderAsc { attribute }
            | Self::OrderDesc { attribute } => attribute,
        }
    }

    /// Encoded form sent as a `queries[]` parameter.
    pub fn to_wire(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
