use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use nexgen_core::model::{validate_draft, ConnectionStatus, Project, ProjectDraft, ProjectUpdate};
use nexgen_core::pricing;

use crate::error::ApiError;
use crate::AppState;

use super::pricing::QuoteRequest;

/// Project list plus the connection health the sidebar indicator shows.
/// A backend failure is part of the payload, not an HTTP error: the
/// board renders either way.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsResponse {
    pub connection_status: ConnectionStatus,
    pub projects: Vec<Project>,
    /// Diagnostic lines for the on-demand debug panel.
    pub log: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn list(State(state): State<Arc<AppState>>) -> Json<ProjectsResponse> {
    let mut log = vec![format!(
        "Fetching projects via {} backend...",
        state.config.backend.kind
    )];

    match state.storage.fetch_projects().await {
        Ok(projects) => {
            log.push(format!("Fetched {} row(s).", projects.len()));
            let connection_status = if projects.is_empty() {
                ConnectionStatus::Empty
            } else {
                ConnectionStatus::Connected
            };
            Json(ProjectsResponse {
                connection_status,
                projects,
                log,
                error: None,
            })
        }
        Err(e) => {
            tracing::error!("project fetch failed: {}", e);
            log.push(format!("Fetch failed: {e}"));
            Json(ProjectsResponse {
                connection_status: ConnectionStatus::Error,
                projects: Vec::new(),
                log,
                error: Some(e.to_string()),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(flatten)]
    pub draft: ProjectDraft,
    /// When present, the calculator prices the order: `value` is replaced
    /// by the quoted total and the order summary is appended to the notes.
    #[serde(default)]
    pub quote: Option<QuoteRequest>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let mut draft = req.draft;

    if let Some(q) = req.quote {
        draft.service_type = q.service_type;
        draft.value =
            pricing::compute_total(q.service_type, &q.feature_ids, q.rush, q.adjustment);
        let summary = pricing::describe_order(q.service_type, &q.feature_ids, q.rush, q.adjustment);
        draft.notes = if draft.notes.is_empty() {
            summary
        } else {
            format!("{}\n\n{}", draft.notes, summary)
        };
    }

    validate_draft(&draft)?;

    let project = state.storage.add_project(&draft).await?;
    tracing::info!("created project {} for {}", project.id, project.client_name);
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<ProjectUpdate>,
) -> Result<Json<Project>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::bad_request("no fields to update"));
    }
    let project = state.storage.set_project(&id, &update).await?;
    Ok(Json(project))
}
