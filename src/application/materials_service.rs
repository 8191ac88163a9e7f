// Materials state container - study modules and topics per subject
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::application::api_client::EduApi;
use crate::application::fetch_state::{CellMap, FetchState};
use crate::application::ui_state::SectionToggles;
use crate::domain::dashboard::MaterialsView;
use crate::error::Result;

pub struct MaterialsService {
    api: Arc<dyn EduApi>,
    views: CellMap<MaterialsView>,
    toggles: RwLock<HashMap<String, SectionToggles>>,
    selected_modules: RwLock<HashMap<String, String>>,
}

impl MaterialsService {
    pub fn new(api: Arc<dyn EduApi>) -> Self {
        Self {
            api,
            views: CellMap::new(),
            toggles: RwLock::new(HashMap::new()),
            selected_modules: RwLock::new(HashMap::new()),
        }
    }

    pub async fn materials(&self, subject: &str) -> FetchState<MaterialsView> {
        let cell = self.views.cell(subject).await;
        let api = self.api.clone();
        let subject = subject.to_string();
        cell.ensure(move || Self::load(api, subject)).await
    }

    pub async fn refresh(&self, subject: &str) -> FetchState<MaterialsView> {
        let cell = self.views.cell(subject).await;
        let api = self.api.clone();
        let subject = subject.to_string();
        cell.refresh(move || Self::load(api, subject)).await
    }

    async fn load(api: Arc<dyn EduApi>, subject: String) -> Result<MaterialsView> {
        let modules = api.materials(&subject).await?;
        Ok(MaterialsView { subject, modules })
    }

    /// Expand or collapse one topic. Topics default to collapsed.
    pub async fn toggle_topic(&self, subject: &str, module_id: &str, topic_id: &str) -> bool {
        let key = SectionToggles::topic_key(module_id, topic_id);
        let mut toggles = self.toggles.write().await;
        toggles.entry(subject.to_string()).or_default().toggle(&key)
    }

    pub async fn is_topic_expanded(&self, subject: &str, module_id: &str, topic_id: &str) -> bool {
        let key = SectionToggles::topic_key(module_id, topic_id);
        let toggles = self.toggles.read().await;
        toggles
            .get(subject)
            .is_some_and(|t| t.is_expanded(&key))
    }

    pub async fn select_module(&self, subject: &str, module_id: &str) {
        let mut selected = self.selected_modules.write().await;
        selected.insert(subject.to_string(), module_id.to_string());
    }

    pub async fn selected_module(&self, subject: &str) -> Option<String> {
        self.selected_modules.read().await.get(subject).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::StubApi;

    #[tokio::test]
    async fn materials_load_per_subject() {
        let service = MaterialsService::new(Arc::new(StubApi::default()));
        let state = service.materials("math").await;
        let view = state.data().expect("materials should load");
        assert_eq!(view.subject, "math");
        assert_eq!(view.modules.len(), 1);
        assert_eq!(view.modules[0].topics.len(), 2);
    }

    #[tokio::test]
    async fn topic_toggles_use_the_key_convention_and_stay_independent() {
        let service = MaterialsService::new(Arc::new(StubApi::default()));

        assert!(!service.is_topic_expanded("math", "m1", "t1").await);
        assert!(service.toggle_topic("math", "m1", "t1").await);
        assert!(service.is_topic_expanded("math", "m1", "t1").await);
        assert!(!service.is_topic_expanded("math", "m1", "t2").await);

        // Same ids under a different subject are a different section.
        assert!(!service.is_topic_expanded("physics", "m1", "t1").await);
    }

    #[tokio::test]
    async fn module_selection_is_per_subject() {
        let service = MaterialsService::new(Arc::new(StubApi::default()));
        assert_eq!(service.selected_module("math").await, None);

        service.select_module("math", "m1").await;
        assert_eq!(service.selected_module("math").await.as_deref(), Some("m1"));
        assert_eq!(service.selected_module("physics").await, None);
    }
}
