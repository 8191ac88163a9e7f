// HTTP implementation of the EduApi client trait
use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::application::api_client::EduApi;
use crate::domain::student::{
    AdmissionSnapshot, CommentRecord, DisciplineStatistics, ExamStatistics, GroupSummary,
    MaterialModule, NewComment, NotificationItem, StudentProfile, SubjectGrades,
};
use crate::error::{ApiError, Result};
use crate::infrastructure::config::BackendSettings;

#[derive(Debug, Clone)]
pub struct HttpEduApi {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpEduApi {
    pub fn new(settings: &BackendSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Server(format!("malformed response: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {url}");
        let response = self.with_auth(self.client.get(&url)).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("POST {url}");
        let response = self
            .with_auth(self.client.post(&url))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl EduApi for HttpEduApi {
    async fn subject_grades(&self, student_id: &str) -> Result<BTreeMap<String, SubjectGrades>> {
        self.get_json(&format!("students/{student_id}/grades")).await
    }

    async fn discipline(&self, student_id: &str) -> Result<DisciplineStatistics> {
        self.get_json(&format!("students/{student_id}/discipline"))
            .await
    }

    async fn exams(&self, student_id: &str) -> Result<ExamStatistics> {
        self.get_json(&format!("students/{student_id}/exams")).await
    }

    async fn admission(&self, student_id: &str) -> Result<AdmissionSnapshot> {
        self.get_json(&format!("students/{student_id}/admission"))
            .await
    }

    async fn comments(&self, student_id: &str) -> Result<Vec<CommentRecord>> {
        self.get_json(&format!("students/{student_id}/comments"))
            .await
    }

    async fn notifications(&self, student_id: &str) -> Result<Vec<NotificationItem>> {
        self.get_json(&format!("students/{student_id}/notifications"))
            .await
    }

    async fn student_profile(&self, student_id: &str) -> Result<StudentProfile> {
        self.get_json(&format!("students/{student_id}/profile"))
            .await
    }

    async fn teacher_groups(&self, teacher_id: &str) -> Result<Vec<GroupSummary>> {
        self.get_json(&format!("teachers/{teacher_id}/groups")).await
    }

    async fn group_students(&self, group_id: &str) -> Result<Vec<StudentProfile>> {
        self.get_json(&format!("groups/{group_id}/students")).await
    }

    async fn materials(&self, subject: &str) -> Result<Vec<MaterialModule>> {
        self.get_json(&format!("materials/{subject}")).await
    }

    async fn submit_comment(
        &self,
        student_id: &str,
        comment: &NewComment,
    ) -> Result<CommentRecord> {
        self.post_json(&format!("students/{student_id}/comments"), comment)
            .await
    }
}
