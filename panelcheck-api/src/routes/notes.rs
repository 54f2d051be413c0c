/// Note endpoints
///
/// - `GET /api/projects/:id/notes` - Notes on a project, oldest first
/// - `POST /api/projects/:id/notes` - Append a note
use crate::{
    app::AppState,
    error::ApiResult,
    extract::{AppJson, AppPath},
    middleware::session::AuthContext,
    routes::projects::load_owned_project,
};
use axum::{extract::State, http::StatusCode, Json};
use panelcheck_shared::models::{CreateNote, Note};
use serde::Deserialize;
use validator::Validate;

/// Create note request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    #[validate(length(min = 1, message = "Note content is required"))]
    pub content: String,
}

pub async fn list_notes(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(project_id): AppPath<i64>,
) -> ApiResult<Json<Vec<Note>>> {
    load_owned_project(&state, project_id, &auth.user).await?;

    let notes = state.store.get_notes_by_project(project_id).await?;
    Ok(Json(notes))
}

pub async fn create_note(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(project_id): AppPath<i64>,
    AppJson(mut req): AppJson<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    load_owned_project(&state, project_id, &auth.user).await?;

    req.content = req.content.trim().to_string();
    req.validate()?;

    let note = state
        .store
        .create_note(CreateNote {
            project_id,
            content: req.content,
        })
        .await?;

    tracing::debug!(project_id, note_id = note.id, "Note added");

    Ok((StatusCode::CREATED, Json(note)))
}
