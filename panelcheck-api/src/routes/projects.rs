/// Project endpoints
///
/// # Endpoints
///
/// - `GET /api/projects` - Projects owned by the caller, oldest first
/// - `POST /api/projects` - Create a project
/// - `GET /api/projects/:id` - One project
/// - `PATCH /api/projects/:id` - Change a project's status
///
/// Every project-scoped request goes through [`load_owned_project`]. A
/// project that is missing or belongs to someone else is reported as 404,
/// so callers cannot probe for other users' ids.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{AppJson, AppPath},
    middleware::session::AuthContext,
};
use axum::{extract::State, http::StatusCode, Json};
use panelcheck_shared::models::{CreateProject, Project, ProjectStatus, User};
use serde::Deserialize;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, message = "Project title is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    pub description: Option<String>,

    /// Defaults to `in_progress`
    pub status: Option<ProjectStatus>,
}

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ProjectStatus,
}

/// Loads a project the caller owns, or fails with 404
pub async fn load_owned_project(state: &AppState, id: i64, user: &User) -> ApiResult<Project> {
    match state.store.get_project(id).await? {
        Some(project) if project.is_owned_by(user.id) => Ok(project),
        Some(_) => {
            tracing::warn!(project_id = id, user_id = user.id, "Project owned by another user");
            Err(ApiError::NotFound("Project not found".to_string()))
        }
        None => Err(ApiError::NotFound("Project not found".to_string())),
    }
}

/// List the caller's projects
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = state.store.get_projects_by_owner(auth.user.id).await?;
    Ok(Json(projects))
}

/// Create a project owned by the caller
///
/// # Endpoint
///
/// ```text
/// POST /api/projects
/// Content-Type: application/json
///
/// {
///   "name": "Kitchen remodel",
///   "address": "12 Elm St",
///   "description": "200A service upgrade"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Blank name or address, unknown status
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(mut req): AppJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.name = req.name.trim().to_string();
    req.address = req.address.trim().to_string();
    req.validate()?;

    let project = state
        .store
        .create_project(
            CreateProject {
                name: req.name,
                address: req.address,
                description: req.description,
                status: req.status,
            },
            auth.user.id,
        )
        .await?;

    tracing::info!(project_id = project.id, user_id = auth.user.id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Fetch one of the caller's projects
pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Project>> {
    let project = load_owned_project(&state, id, &auth.user).await?;
    Ok(Json(project))
}

/// Change the status of one of the caller's projects
///
/// # Endpoint
///
/// ```text
/// PATCH /api/projects/:id
/// Content-Type: application/json
///
/// { "status": "completed" }
/// ```
pub async fn update_project_status(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateStatusRequest>,
) -> ApiResult<Json<Project>> {
    load_owned_project(&state, id, &auth.user).await?;

    let project = state
        .store
        .update_project_status(id, req.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    tracing::info!(project_id = id, status = %req.status, "Project status updated");

    Ok(Json(project))
}
