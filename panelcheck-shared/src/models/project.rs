/// Project model
///
/// A project is a job site owned by exactly one user. Notes and panel
/// analyses hang off a project by `project_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     name TEXT NOT NULL,
///     address TEXT NOT NULL,
///     description TEXT,
///     status TEXT NOT NULL DEFAULT 'in_progress',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Project lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Work is ongoing
    #[default]
    InProgress,

    /// Work is finished
    Completed,
}

impl ProjectStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is not a known status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown project status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ProjectStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A project owned by a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Sequential project ID
    pub id: i64,

    /// Owning user (immutable)
    pub user_id: i64,

    /// Project title
    pub name: String,

    /// Job site address
    pub address: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current status
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Whether `user_id` owns this project
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Input for creating a new project
///
/// The owner is passed separately to the store so it can never come from a
/// request body.
#[derive(Debug, Clone, Default)]
pub struct CreateProject {
    pub name: String,
    pub address: String,
    pub description: Option<String>,

    /// Defaults to [`ProjectStatus::InProgress`] when absent
    pub status: Option<ProjectStatus>,
}
