/// Record store for users, projects, notes and panel analyses
///
/// [`RecordStore`] is the single persistence seam of the application. Two
/// implementations are provided:
///
/// - [`memory::MemoryStore`]: process-local maps behind one lock, empty at
///   startup and discarded on shutdown
/// - [`postgres::PgStore`]: PostgreSQL tables managed by the workspace
///   migrations
///
/// Both backends allocate ids from an independent sequence per entity type,
/// so ids are unique and increasing within one table but carry no ordering
/// relationship across tables.
///
/// Lookups return `Ok(None)` for missing records. Translating absence into a
/// not-found response is the caller's job. No operation checks ownership;
/// callers load the parent project and compare `user_id` first.
///
/// # Example
///
/// ```
/// use panelcheck_shared::models::CreateProject;
/// use panelcheck_shared::store::{memory::MemoryStore, RecordStore};
///
/// # async fn example() -> Result<(), panelcheck_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let project = store
///     .create_project(
///         CreateProject {
///             name: "Service upgrade".to_string(),
///             address: "42 Elm St".to_string(),
///             ..Default::default()
///         },
///         1,
///     )
///     .await?;
///
/// assert_eq!(store.get_project(project.id).await?, Some(project));
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use crate::models::{
    CreateNote, CreatePanelAnalysis, CreateProject, CreateUser, Note, PanelAnalysis, Project,
    ProjectStatus, User,
};
use async_trait::async_trait;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness rule was violated (e.g., duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The database rejected or failed the operation
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Uniform CRUD interface over the four record types
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for diagnostics ("memory", "postgres")
    fn backend(&self) -> &'static str;

    /// Verifies the backend is reachable
    async fn health_check(&self) -> StoreResult<()>;

    /// Finds a user by ID
    async fn get_user(&self, id: i64) -> StoreResult<Option<User>>;

    /// Finds a user by email, ignoring case
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Creates a user with a lowercased email
    ///
    /// Fails with [`StoreError::Conflict`] if the email is already taken.
    async fn create_user(&self, input: CreateUser) -> StoreResult<User>;

    /// Finds a project by ID
    async fn get_project(&self, id: i64) -> StoreResult<Option<Project>>;

    /// Lists projects owned by `user_id`, oldest first
    async fn get_projects_by_owner(&self, user_id: i64) -> StoreResult<Vec<Project>>;

    /// Creates a project owned by `owner_id`
    async fn create_project(&self, input: CreateProject, owner_id: i64) -> StoreResult<Project>;

    /// Sets a project's status, returning the updated project if it exists
    async fn update_project_status(
        &self,
        id: i64,
        status: ProjectStatus,
    ) -> StoreResult<Option<Project>>;

    /// Lists notes for a project, oldest first
    async fn get_notes_by_project(&self, project_id: i64) -> StoreResult<Vec<Note>>;

    /// Appends a note
    async fn create_note(&self, input: CreateNote) -> StoreResult<Note>;

    /// Lists panel analyses for a project, oldest first
    async fn get_analyses_by_project(&self, project_id: i64) -> StoreResult<Vec<PanelAnalysis>>;

    /// Records a panel analysis
    async fn create_analysis(&self, input: CreatePanelAnalysis) -> StoreResult<PanelAnalysis>;
}
