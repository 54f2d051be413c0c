/// PostgreSQL record store
///
/// Each table has its own `BIGSERIAL` id sequence and `created_at` defaults
/// to `NOW()`. Statements run individually; no transaction spans an
/// ownership check and the write that follows it.
///
/// # Example
///
/// ```no_run
/// use panelcheck_shared::db::pool::{create_pool, DatabaseConfig};
/// use panelcheck_shared::store::{postgres::PgStore, RecordStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgStore::new(pool);
/// let projects = store.get_projects_by_owner(1).await?;
/// # Ok(())
/// # }
/// ```

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{
    user::normalize_email, AnalysisResult, CreateNote, CreatePanelAnalysis, CreateProject,
    CreateUser, Note, PanelAnalysis, Project, ProjectStatus, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};

/// Name of the unique index on `LOWER(users.email)`
const USERS_EMAIL_KEY: &str = "users_email_key";

/// Row shape of `panel_analyses`
#[derive(sqlx::FromRow)]
struct PanelAnalysisRow {
    id: i64,
    project_id: i64,
    image_url: String,
    analysis: Json<AnalysisResult>,
    compliant: bool,
    created_at: DateTime<Utc>,
}

impl From<PanelAnalysisRow> for PanelAnalysis {
    fn from(row: PanelAnalysisRow) -> Self {
        PanelAnalysis {
            id: row.id,
            project_id: row.project_id,
            image_url: row.image_url,
            analysis: row.analysis.0,
            compliant: row.compliant,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed [`RecordStore`]
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing connection pool
    ///
    /// Migrations must already have been applied (see
    /// [`crate::db::migrations::run_migrations`]).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique violation on the email index to a conflict
fn map_user_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.constraint() == Some(USERS_EMAIL_KEY) {
            return StoreError::Conflict("Email already exists".to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl RecordStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> StoreResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash
            FROM users
            WHERE LOWER(email) = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash
            "#,
        )
        .bind(normalize_email(&input.email))
        .bind(input.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_insert_error)?;

        Ok(user)
    }

    async fn get_project(&self, id: i64) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, name, address, description, status, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn get_projects_by_owner(&self, user_id: i64) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, name, address, description, status, created_at
            FROM projects
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn create_project(&self, input: CreateProject, owner_id: i64) -> StoreResult<Project> {
        let status = input.status.unwrap_or_default();

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (user_id, name, address, description, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, address, description, status, created_at
            "#,
        )
        .bind(owner_id)
        .bind(input.name)
        .bind(input.address)
        .bind(input.description)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn update_project_status(
        &self,
        id: i64,
        status: ProjectStatus,
    ) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET status = $2
            WHERE id = $1
            RETURNING id, user_id, name, address, description, status, created_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn get_notes_by_project(&self, project_id: i64) -> StoreResult<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, project_id, content, created_at
            FROM notes
            WHERE project_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    async fn create_note(&self, input: CreateNote) -> StoreResult<Note> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (project_id, content)
            VALUES ($1, $2)
            RETURNING id, project_id, content, created_at
            "#,
        )
        .bind(input.project_id)
        .bind(input.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    async fn get_analyses_by_project(&self, project_id: i64) -> StoreResult<Vec<PanelAnalysis>> {
        let rows = sqlx::query_as::<_, PanelAnalysisRow>(
            r#"
            SELECT id, project_id, image_url, analysis, compliant, created_at
            FROM panel_analyses
            WHERE project_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PanelAnalysis::from).collect())
    }

    async fn create_analysis(&self, input: CreatePanelAnalysis) -> StoreResult<PanelAnalysis> {
        let compliant = input.analysis.compliant;

        let row = sqlx::query_as::<_, PanelAnalysisRow>(
            r#"
            INSERT INTO panel_analyses (project_id, image_url, analysis, compliant)
            VALUES ($1, $2, $3, $4)
            RETURNING id, project_id, image_url, analysis, compliant, created_at
            "#,
        )
        .bind(input.project_id)
        .bind(input.image_url)
        .bind(Json(input.analysis))
        .bind(compliant)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
