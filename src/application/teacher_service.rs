// Teacher dashboard state container - groups, rosters, and comment drafts
use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::application::api_client::EduApi;
use crate::application::fetch_state::{CellMap, FetchState};
use crate::application::ui_state::ListFilter;
use crate::domain::dashboard::TeacherOverview;
use crate::domain::student::{CommentRecord, CommentType, NewComment, StudentProfile};
use crate::error::{ApiError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "message")]
pub enum DraftStatus {
    Editing,
    Saving,
    Failed(String),
}

/// An unsent comment for one student. Survives a failed save so the
/// teacher never loses typed text.
#[derive(Debug, Clone, Serialize)]
pub struct CommentDraft {
    pub text: String,
    pub comment_type: CommentType,
    pub status: DraftStatus,
}

pub struct TeacherService {
    api: Arc<dyn EduApi>,
    overviews: CellMap<TeacherOverview>,
    comments: CellMap<Vec<CommentRecord>>,
    drafts: RwLock<HashMap<String, CommentDraft>>,
    filters: RwLock<HashMap<String, ListFilter>>,
}

impl TeacherService {
    pub fn new(api: Arc<dyn EduApi>) -> Self {
        Self {
            api,
            overviews: CellMap::new(),
            comments: CellMap::new(),
            drafts: RwLock::new(HashMap::new()),
            filters: RwLock::new(HashMap::new()),
        }
    }

    pub async fn overview(&self, teacher_id: &str) -> FetchState<TeacherOverview> {
        let cell = self.overviews.cell(teacher_id).await;
        let api = self.api.clone();
        let id = teacher_id.to_string();
        cell.ensure(move || Self::load_overview(api, id)).await
    }

    pub async fn refresh(&self, teacher_id: &str) -> FetchState<TeacherOverview> {
        let cell = self.overviews.cell(teacher_id).await;
        let api = self.api.clone();
        let id = teacher_id.to_string();
        cell.refresh(move || Self::load_overview(api, id)).await
    }

    async fn load_overview(api: Arc<dyn EduApi>, teacher_id: String) -> Result<TeacherOverview> {
        let groups = api.teacher_groups(&teacher_id).await?;

        // One roster fetch per group, all in flight together.
        let rosters = join_all(
            groups
                .iter()
                .map(|group| api.group_students(&group.id)),
        )
        .await;

        let mut students = Vec::new();
        for roster in rosters {
            students.extend(roster?);
        }

        Ok(TeacherOverview {
            teacher_id,
            groups,
            students,
        })
    }

    /// Change the group filter. Purely client-side; never refetches.
    pub async fn set_group_filter(&self, teacher_id: &str, group_id: &str) {
        let mut filters = self.filters.write().await;
        filters
            .entry(teacher_id.to_string())
            .or_default()
            .set("group", group_id);
    }

    /// The cached roster narrowed to the selected group ("all" passes
    /// everything through). Empty when the overview has not loaded.
    pub async fn filtered_students(&self, teacher_id: &str) -> Vec<StudentProfile> {
        let cell = self.overviews.cell(teacher_id).await;
        let snapshot = cell.snapshot().await;
        let Some(overview) = snapshot.data() else {
            return Vec::new();
        };

        let filters = self.filters.read().await;
        let Some(filter) = filters.get(teacher_id) else {
            return overview.students.clone();
        };
        filter.apply(&overview.students, "group", |student| {
            student.group_id.as_deref().unwrap_or("")
        })
    }

    /// Comments already on record for one student.
    pub async fn student_comments(&self, student_id: &str) -> FetchState<Vec<CommentRecord>> {
        let cell = self.comments.cell(student_id).await;
        let api = self.api.clone();
        let id = student_id.to_string();
        cell.ensure(move || async move { api.comments(&id).await })
            .await
    }

    /// Start or overwrite the draft for one student.
    pub async fn update_draft(&self, student_id: &str, text: &str, comment_type: CommentType) {
        let mut drafts = self.drafts.write().await;
        drafts.insert(
            student_id.to_string(),
            CommentDraft {
                text: text.to_string(),
                comment_type,
                status: DraftStatus::Editing,
            },
        );
    }

    pub async fn draft(&self, student_id: &str) -> Option<CommentDraft> {
        self.drafts.read().await.get(student_id).cloned()
    }

    /// Submit the draft for one student. On success the confirmed record is
    /// merged into the cached comment list and the draft cleared; on
    /// failure the draft text stays editable with a per-student error and
    /// nothing else is touched.
    pub async fn save_comment(&self, student_id: &str) -> Result<CommentRecord> {
        let payload = {
            let mut drafts = self.drafts.write().await;
            let Some(draft) = drafts.get_mut(student_id) else {
                return Err(ApiError::Validation("no draft to save".into()));
            };
            draft.status = DraftStatus::Saving;
            NewComment {
                text: draft.text.clone(),
                comment_type: draft.comment_type,
            }
        };

        match self.api.submit_comment(student_id, &payload).await {
            Ok(record) => {
                self.drafts.write().await.remove(student_id);
                let cell = self.comments.cell(student_id).await;
                let merged = cell.update(|list| list.push(record.clone())).await;
                if !merged {
                    tracing::debug!(
                        "saved comment for {student_id} before the comment list was loaded"
                    );
                }
                Ok(record)
            }
            Err(err) => {
                let mut drafts = self.drafts.write().await;
                if let Some(draft) = drafts.get_mut(student_id) {
                    draft.status = DraftStatus::Failed(err.user_message());
                }
                Err(err)
            }
        }
    }
}
