// HTTP request handlers
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::fetch_state::FetchState;
use crate::domain::dashboard::TeacherOverview;
use crate::domain::student::{NewComment, StudentProfile};
use crate::error::ApiError;
use crate::presentation::app_state::AppState;

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub refresh: Option<bool>,
}

#[derive(Deserialize)]
pub struct TeacherQuery {
    pub refresh: Option<bool>,
    pub group: Option<String>,
}

/// JSON shape of a fetch-state snapshot. A load error with cached data
/// still carries the data; an empty success is a success, not an error.
#[derive(Debug, Serialize)]
pub struct Snapshot<T> {
    pub status: &'static str,
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_validating: bool,
}

impl<T> Snapshot<T> {
    pub fn from_state(state: FetchState<T>) -> Self {
        let status = match &state {
            FetchState::Idle => "idle",
            FetchState::Loading => "loading",
            FetchState::Success(_) => "success",
            FetchState::Revalidating(_) => "revalidating",
            FetchState::Error { .. } => "error",
        };
        let is_validating = state.is_validating();
        let error = state.error_message().map(str::to_string);
        let data = match state {
            FetchState::Success(data) | FetchState::Revalidating(data) => Some(data),
            FetchState::Error { stale, .. } => stale,
            _ => None,
        };
        Self {
            status,
            data,
            error,
            is_validating,
        }
    }
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub section_id: String,
    pub expanded: bool,
}

#[derive(Serialize)]
pub struct TeacherDashboardResponse {
    #[serde(flatten)]
    pub snapshot: Snapshot<TeacherOverview>,
    pub filtered_students: Vec<StudentProfile>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn parent_dashboard(
    Path(student_id): Path<String>,
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let snapshot = if query.refresh.unwrap_or(false) {
        state.parent_service.refresh(&student_id).await
    } else {
        state.parent_service.dashboard(&student_id).await
    };
    Json(Snapshot::from_state(snapshot))
}

pub async fn toggle_parent_section(
    Path((student_id, section_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let expanded = state
        .parent_service
        .toggle_section(&student_id, &section_id)
        .await;
    Json(ToggleResponse {
        section_id,
        expanded,
    })
}

pub async fn student_dashboard(
    Path(student_id): Path<String>,
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let snapshot = if query.refresh.unwrap_or(false) {
        state.student_service.refresh(&student_id).await
    } else {
        state.student_service.dashboard(&student_id).await
    };
    Json(Snapshot::from_state(snapshot))
}

pub async fn teacher_dashboard(
    Path(teacher_id): Path<String>,
    Query(query): Query<TeacherQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    if let Some(group) = &query.group {
        state.teacher_service.set_group_filter(&teacher_id, group).await;
    }
    let snapshot = if query.refresh.unwrap_or(false) {
        state.teacher_service.refresh(&teacher_id).await
    } else {
        state.teacher_service.overview(&teacher_id).await
    };
    let filtered_students = state.teacher_service.filtered_students(&teacher_id).await;
    Json(TeacherDashboardResponse {
        snapshot: Snapshot::from_state(snapshot),
        filtered_students,
    })
}

pub async fn student_comments(
    Path((_teacher_id, student_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let snapshot = state.teacher_service.student_comments(&student_id).await;
    Json(Snapshot::from_state(snapshot))
}

/// Save a comment. Failures keep the draft on the service side and map to
/// an HTTP error; the rest of the dashboard state is untouched.
pub async fn submit_comment(
    Path((teacher_id, student_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(comment): Json<NewComment>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!("teacher {teacher_id} saving comment for student {student_id}");
    state
        .teacher_service
        .update_draft(&student_id, &comment.text, comment.comment_type)
        .await;
    let record = state.teacher_service.save_comment(&student_id).await?;
    Ok(Json(record))
}

pub async fn materials(
    Path(subject): Path<String>,
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let snapshot = if query.refresh.unwrap_or(false) {
        state.materials_service.refresh(&subject).await
    } else {
        state.materials_service.materials(&subject).await
    };
    Json(Snapshot::from_state(snapshot))
}

pub async fn toggle_material_topic(
    Path((subject, module_id, topic_id)): Path<(String, String, String)>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let expanded = state
        .materials_service
        .toggle_topic(&subject, &module_id, &topic_id)
        .await;
    Json(ToggleResponse {
        section_id: crate::application::ui_state::SectionToggles::topic_key(
            &module_id, &topic_id,
        ),
        expanded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_separates_error_from_empty_success() {
        let empty: FetchState<Vec<u32>> = FetchState::Success(Vec::new());
        let snapshot = Snapshot::from_state(empty);
        assert_eq!(snapshot.status, "success");
        assert_eq!(snapshot.data, Some(Vec::new()));
        assert!(snapshot.error.is_none());

        let failed: FetchState<Vec<u32>> = FetchState::Error {
            message: "server error: boom".to_string(),
            stale: None,
        };
        let snapshot = Snapshot::from_state(failed);
        assert_eq!(snapshot.status, "error");
        assert!(snapshot.data.is_none());
        assert_eq!(snapshot.error.as_deref(), Some("server error: boom"));
    }

    #[tokio::test]
    async fn snapshot_keeps_stale_data_next_to_the_error() {
        let state = FetchState::Error {
            message: "network error: timed out".to_string(),
            stale: Some(7),
        };
        let snapshot = Snapshot::from_state(state);
        assert_eq!(snapshot.status, "error");
        assert_eq!(snapshot.data, Some(7));
        assert!(snapshot.error.is_some());
    }
}
