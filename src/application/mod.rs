// Application layer - Aggregation, fetch lifecycle, and role services
pub mod aggregator;
pub mod api_client;
pub mod fetch_state;
pub mod materials_service;
pub mod parent_service;
pub mod student_service;
pub mod teacher_service;
pub mod ui_state;

#[cfg(test)]
pub mod test_support;
