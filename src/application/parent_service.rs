// Parent dashboard state container - per-student statistics for parents
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::application::aggregator::{
    ProgressIndicators, analyze_discipline, analyze_exams, classify_performance,
    compute_admission_chance, summarize_comments, summarize_notifications,
};
use crate::application::api_client::EduApi;
use crate::application::fetch_state::{CellMap, FetchState};
use crate::application::ui_state::SectionToggles;
use crate::domain::dashboard::ParentDashboard;
use crate::error::Result;

/// How many comments the "recent comments" strip shows.
const RECENT_COMMENTS: usize = 5;

pub struct ParentService {
    api: Arc<dyn EduApi>,
    dashboards: CellMap<ParentDashboard>,
    toggles: RwLock<HashMap<String, SectionToggles>>,
}

impl ParentService {
    pub fn new(api: Arc<dyn EduApi>) -> Self {
        Self {
            api,
            dashboards: CellMap::new(),
            toggles: RwLock::new(HashMap::new()),
        }
    }

    /// Cached dashboard for one student; loads on first access.
    pub async fn dashboard(&self, student_id: &str) -> FetchState<ParentDashboard> {
        let cell = self.dashboards.cell(student_id).await;
        let api = self.api.clone();
        let id = student_id.to_string();
        cell.ensure(move || Self::load(api, id)).await
    }

    /// Force a refetch. The previous payload stays visible while the
    /// refresh runs; an in-flight load is superseded.
    pub async fn refresh(&self, student_id: &str) -> FetchState<ParentDashboard> {
        let cell = self.dashboards.cell(student_id).await;
        let api = self.api.clone();
        let id = student_id.to_string();
        cell.refresh(move || Self::load(api, id)).await
    }

    /// All sections are fetched concurrently; derived metrics are computed
    /// once per load, so re-renders never recompute them.
    async fn load(api: Arc<dyn EduApi>, student_id: String) -> Result<ParentDashboard> {
        let (grades, discipline, exams, admission, comments, notifications) = futures::join!(
            api.subject_grades(&student_id),
            api.discipline(&student_id),
            api.exams(&student_id),
            api.admission(&student_id),
            api.comments(&student_id),
            api.notifications(&student_id),
        );
        let grades = grades?;
        let discipline = discipline?.sanitized();
        let exams = exams?;
        let admission = admission?;
        let comments = comments?;
        let notifications = notifications?;

        let performance = classify_performance(&grades);
        let discipline = analyze_discipline(&discipline);
        let exam_analysis = analyze_exams(&exams);
        let indicators = ProgressIndicators::from_analyses(&discipline, &exam_analysis);
        let admission = compute_admission_chance(
            admission.current_score,
            admission.required_score,
            &indicators,
        );

        tracing::debug!(
            "parent dashboard assembled for {}: {} subjects, risk {:?}",
            student_id,
            performance.total_subjects,
            discipline.overall_risk
        );

        Ok(ParentDashboard {
            student_id,
            performance,
            discipline,
            exams: exam_analysis,
            admission,
            comments: summarize_comments(&comments, RECENT_COMMENTS),
            notifications: summarize_notifications(&notifications),
        })
    }

    /// Flip one collapsible section for one student's dashboard.
    pub async fn toggle_section(&self, student_id: &str, section_id: &str) -> bool {
        let mut toggles = self.toggles.write().await;
        toggles
            .entry(student_id.to_string())
            .or_default()
            .toggle(section_id)
    }

    pub async fn is_section_expanded(&self, student_id: &str, section_id: &str) -> bool {
        let toggles = self.toggles.read().await;
        toggles
            .get(student_id)
            .is_some_and(|t| t.is_expanded(section_id))
    }
}
