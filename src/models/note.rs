use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::notes;

/// A saved note as returned by `GET /notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i32,
    pub user_id: i32,
    pub domain: String,
    pub content: String,
    pub timestamp: String,
    pub url: Option<String>,
}

impl From<notes::Model> for Note {
    fn from(model: notes::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            domain: model.domain,
            content: model.content,
            timestamp: model.timestamp,
            url: model.url,
        }
    }
}

/// Fields of a note about to be inserted for an already-resolved user.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub user_id: i32,
    pub domain: String,
    pub content: String,
    pub url: Option<String>,
}

/// Current instant in the fixed-width form stored in `notes.timestamp`.
#[must_use]
pub fn note_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
