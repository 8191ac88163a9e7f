// Student dashboard state container - the student's own progress view
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::application::aggregator::{
    ProgressIndicators, analyze_discipline, analyze_exams, classify_performance,
    compute_admission_chance, summarize_notifications,
};
use crate::application::api_client::EduApi;
use crate::application::fetch_state::{CellMap, FetchState};
use crate::domain::dashboard::StudentDashboard;
use crate::error::Result;

pub const DEFAULT_TAB: &str = "overview";

pub struct StudentService {
    api: Arc<dyn EduApi>,
    dashboards: CellMap<StudentDashboard>,
    selected_tabs: RwLock<HashMap<String, String>>,
}

impl StudentService {
    pub fn new(api: Arc<dyn EduApi>) -> Self {
        Self {
            api,
            dashboards: CellMap::new(),
            selected_tabs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn dashboard(&self, student_id: &str) -> FetchState<StudentDashboard> {
        let cell = self.dashboards.cell(student_id).await;
        let api = self.api.clone();
        let id = student_id.to_string();
        cell.ensure(move || Self::load(api, id)).await
    }

    pub async fn refresh(&self, student_id: &str) -> FetchState<StudentDashboard> {
        let cell = self.dashboards.cell(student_id).await;
        let api = self.api.clone();
        let id = student_id.to_string();
        cell.refresh(move || Self::load(api, id)).await
    }

    async fn load(api: Arc<dyn EduApi>, student_id: String) -> Result<StudentDashboard> {
        let (profile, grades, discipline, exams, admission, notifications) = futures::join!(
            api.student_profile(&student_id),
            api.subject_grades(&student_id),
            api.discipline(&student_id),
            api.exams(&student_id),
            api.admission(&student_id),
            api.notifications(&student_id),
        );
        let profile = profile?;
        let grades = grades?;
        let discipline = discipline?.sanitized();
        let exams = exams?;
        let admission = admission?;
        let notifications = notifications?;

        let performance = classify_performance(&grades);
        let discipline_analysis = analyze_discipline(&discipline);
        let exam_analysis = analyze_exams(&exams);
        let indicators = ProgressIndicators::from_analyses(&discipline_analysis, &exam_analysis);
        let admission = compute_admission_chance(
            admission.current_score,
            admission.required_score,
            &indicators,
        );

        Ok(StudentDashboard {
            profile,
            performance,
            exams: exam_analysis,
            admission,
            notifications: summarize_notifications(&notifications),
        })
    }

    pub async fn select_tab(&self, student_id: &str, tab: &str) {
        let mut tabs = self.selected_tabs.write().await;
        tabs.insert(student_id.to_string(), tab.to_string());
    }

    pub async fn selected_tab(&self, student_id: &str) -> String {
        let tabs = self.selected_tabs.read().await;
        tabs.get(student_id)
            .cloned()
            .unwrap_or_else(|| DEFAULT_TAB.to_string())
    }
}
