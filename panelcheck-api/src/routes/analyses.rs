/// Panel analysis endpoints
///
/// - `GET /api/projects/:id/analyses` - Past analyses, oldest first
/// - `POST /api/projects/:id/analyze` - Analyze a panel photo and store the verdict
///
/// The photo is sent as base64 in `{"image": ...}`. A `data:<mime>;base64,`
/// prefix is accepted and stripped, as are line breaks from MIME-wrapped
/// encoders. A record is only stored after the analysis service answered
/// with a valid verdict.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{AppJson, AppPath},
    middleware::session::AuthContext,
    routes::projects::load_owned_project,
};
use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use panelcheck_shared::models::{CreatePanelAnalysis, PanelAnalysis};
use serde::Deserialize;
use std::time::Instant;

/// Analyze request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64 image, optionally as a data URL
    pub image: String,
}

/// Strips an optional data-URL prefix and any ASCII whitespace, then checks
/// the payload is base64
fn normalize_image(image: &str) -> ApiResult<String> {
    let image = image.trim();

    let payload = match image.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| ApiError::validation("image", "Image must be base64-encoded"))?,
        None => image,
    };

    let payload: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if payload.is_empty() {
        return Err(ApiError::validation("image", "Image is required"));
    }

    STANDARD
        .decode(&payload)
        .map_err(|_| ApiError::validation("image", "Image must be valid base64"))?;

    Ok(payload)
}

pub async fn list_analyses(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(project_id): AppPath<i64>,
) -> ApiResult<Json<Vec<PanelAnalysis>>> {
    load_owned_project(&state, project_id, &auth.user).await?;

    let analyses = state.store.get_analyses_by_project(project_id).await?;
    Ok(Json(analyses))
}

/// Analyze a panel photo
///
/// # Endpoint
///
/// ```text
/// POST /api/projects/:id/analyze
/// Content-Type: application/json
///
/// { "image": "/9j/4AAQSkZJRg..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Empty or non-base64 image
/// - `404 Not Found`: Project missing or not owned by the caller
/// - `500 Internal Server Error`: Analysis service failed (`analysis_error`)
///   or replied with an invalid shape (`analysis_parse_error`)
pub async fn analyze_panel(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(project_id): AppPath<i64>,
    AppJson(req): AppJson<AnalyzeRequest>,
) -> ApiResult<Json<PanelAnalysis>> {
    load_owned_project(&state, project_id, &auth.user).await?;

    let image = normalize_image(&req.image)?;

    let started = Instant::now();
    let result = state.analyzer.analyze(&image).await?;

    tracing::info!(
        project_id,
        compliant = result.compliant,
        duration_ms = started.elapsed().as_millis() as u64,
        "Panel analyzed"
    );

    let analysis = state
        .store
        .create_analysis(CreatePanelAnalysis {
            project_id,
            image_url: image,
            analysis: result,
        })
        .await?;

    Ok(Json(analysis))
}
