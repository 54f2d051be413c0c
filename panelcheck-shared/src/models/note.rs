/// Note model
///
/// Notes are append-only free text attached to a project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text note on a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub project_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a note
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub project_id: i64,
    pub content: String,
}
