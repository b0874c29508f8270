use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document::Document;
use crate::error::{Error, Result};

/// Titles are the leading characters of the content, up to this many.
pub const TITLE_MAX_CHARS: usize = 50;

/// Backend field names of a note document.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const CONTENT: &str = "content";
    pub const USER_ID: &str = "userId";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Parse a backend document, mapping its `$id` to [`Note::id`].
    pub fn from_document(doc: Document) -> Result<Self> {
        let text = |key: &str| -> Result<String> {
            match doc.fields.get(key) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(malformed(&doc.id, format!("field `{key}` is not a string: {other}"))),
                None => Err(malformed(&doc.id, format!("missing field `{key}`"))),
            }
        };
        let time = |key: &str| -> Result<DateTime<Utc>> {
            let raw = text(key)?;
            DateTime::parse_from_rfc3339(&raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| malformed(&doc.id, format!("field `{key}` is not a timestamp ({raw:?}): {e}")))
        };

        Ok(Self {
            title: text(fields::TITLE)?,
            content: text(fields::CONTENT)?,
            user_id: text(fields::USER_ID)?,
            created_at: time(fields::CREATED_AT)?,
            updated_at: time(fields::UPDATED_AT)?,
            id: doc.id,
        })
    }
}

fn malformed(id: &str, reason: String) -> Error {
    Error::MalformedDocument {
        id: id.to_string(),
        reason,
    }
}

/// The title stored for a given content: its first [`TITLE_MAX_CHARS`] characters.
pub fn derive_title(content: &str) -> String {
    content.chars().take(TITLE_MAX_CHARS).collect()
}

/// Current time at the precision the backend stores (milliseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// ISO-8601 form used on the wire, e.g. `2024-01-01T12:00:00.000Z`.
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub user_id: String,
}

impl NewNote {
    pub fn from_content(content: impl Into<String>, user_id: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            title: derive_title(&content),
            content,
            user_id: user_id.into(),
        }
    }

    pub(crate) fn into_fields(self, stamp: DateTime<Utc>) -> Map<String, Value> {
        let stamp = format_timestamp(stamp);
        let mut data = Map::new();
        data.insert(fields::TITLE.into(), self.title.into());
        data.insert(fields::CONTENT.into(), self.content.into());
        data.insert(fields::USER_ID.into(), self.user_id.into());
        data.insert(fields::CREATED_AT.into(), stamp.clone().into());
        data.insert(fields::UPDATED_AT.into(), stamp.into());
        data
    }
}

/// Partial update of a note. `None` fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteChanges {
    /// Replace the content and re-derive the title from it.
    pub fn from_content(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            title: Some(derive_title(&content)),
            content: Some(content),
        }
    }

    pub(crate) fn into_fields(self, stamp: DateTime<Utc>) -> Map<String, Value> {
        let mut data = Map::new();
        if let Some(title) = self.title {
            data.insert(fields::TITLE.into(), title.into());
        }
        if let Some(content) = self.content {
            data.insert(fields::CONTENT.into(), content.into());
        }
        data.insert(fields::UPDATED_AT.into(), format_timestamp(stamp).into());
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn title_is_whole_short_content() {
        assert_eq!(derive_title("Buy milk"), "Buy milk");
        assert_eq!(derive_title(""), "");
    }

    #[test]
    fn title_truncates_long_content() {
        let content = "a".repeat(30) + &"b".repeat(50);
        assert_eq!(content.chars().count(), 80);

        let title = derive_title(&content);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
        assert!(content.starts_with(&title));
    }

    #[test]
    fn title_counts_characters_not_bytes() {
        let content = "é".repeat(60);
        assert_eq!(derive_title(&content), "é".repeat(50));
    }

    #[test]
    fn parses_backend_document() {
        let note = Note::from_document(document(json!({
            "$id": "64f0c1",
            "$createdAt": "2024-01-01T12:00:00.000+00:00",
            "title": "Buy milk",
            "content": "Buy milk",
            "userId": "user-001",
            "createdAt": "2024-01-01T12:00:00.000Z",
            "updatedAt": "2024-01-02T08:30:00.500Z",
        })))
        .unwrap();

        assert_eq!(note.id, "64f0c1");
        assert_eq!(note.title, "Buy milk");
        assert_eq!(note.user_id, "user-001");
        assert!(note.updated_at > note.created_at);
        assert_eq!(format_timestamp(note.updated_at), "2024-01-02T08:30:00.500Z");
    }

    #[test]
    fn rejects_missing_field() {
        let err = Note::from_document(document(json!({
            "$id": "x1",
            "title": "t",
            "userId": "u",
            "createdAt": "2024-01-01T12:00:00.000Z",
            "updatedAt": "2024-01-01T12:00:00.000Z",
        })))
        .unwrap_err();

        match err {
            Error::MalformedDocument { id, reason } => {
                assert_eq!(id, "x1");
                assert!(reason.contains("content"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_timestamp() {
        let err = Note::from_document(document(json!({
            "$id": "x2",
            "title": "t",
            "content": "t",
            "userId": "u",
            "createdAt": "yesterday",
            "updatedAt": "2024-01-01T12:00:00.000Z",
        })))
        .unwrap_err();

        assert!(matches!(err, Error::MalformedDocument { .. }));
    }

    #[test]
    fn new_note_stamps_both_timestamps_equal() {
        let stamp = now();
        let data = NewNote::from_content("Buy milk", "user-001").into_fields(stamp);

        assert_eq!(data["title"], "Buy milk");
        assert_eq!(data["createdAt"], data["updatedAt"]);
    }

    #[test]
    fn changes_only_touch_supplied_fields() {
        let data = NoteChanges {
            title: None,
            content: Some("new body".into()),
        }
        .into_fields(now());

        assert!(!data.contains_key("title"));
        assert!(!data.contains_key("createdAt"));
        assert_eq!(data["content"], "new body");
        assert!(data.contains_key("updatedAt"));
    }
}
