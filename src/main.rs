// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::application::api_client::EduApi;
use crate::application::materials_service::MaterialsService;
use crate::application::parent_service::ParentService;
use crate::application::student_service::StudentService;
use crate::application::teacher_service::TeacherService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_client::HttpEduApi;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, materials, parent_dashboard, student_comments, student_dashboard,
    submit_comment, teacher_dashboard, toggle_material_topic, toggle_parent_section,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_app_config()?;

    // Create the backend API client (infrastructure layer)
    let api: Arc<dyn EduApi> = Arc::new(HttpEduApi::new(&config.api)?);

    // Create the role services (application layer)
    let state = Arc::new(AppState {
        parent_service: ParentService::new(api.clone()),
        student_service: StudentService::new(api.clone()),
        teacher_service: TeacherService::new(api.clone()),
        materials_service: MaterialsService::new(api),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboards/parent/:student_id", get(parent_dashboard))
        .route(
            "/dashboards/parent/:student_id/sections/:section_id/toggle",
            post(toggle_parent_section),
        )
        .route("/dashboards/student/:student_id", get(student_dashboard))
        .route("/dashboards/teacher/:teacher_id", get(teacher_dashboard))
        .route(
            "/teachers/:teacher_id/students/:student_id/comments",
            get(student_comments).post(submit_comment),
        )
        .route("/materials/:subject", get(materials))
        .route(
            "/materials/:subject/modules/:module_id/topics/:topic_id/toggle",
            post(toggle_material_topic),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    println!("Starting educenter-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
