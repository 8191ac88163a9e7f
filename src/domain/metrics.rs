// Derived view-model types produced by the aggregation layer
use serde::{Deserialize, Serialize};

use super::student::{CommentRecord, NotificationItem};

/// Status label for a numeric grade on the 0-10 scale. The string forms are
/// the exact copy rendered by the dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceStatus {
    Excellent,
    Good,
    Satisfactory,
    NeedsAttention,
}

impl PerformanceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PerformanceStatus::Excellent => "excellent",
            PerformanceStatus::Good => "good",
            PerformanceStatus::Satisfactory => "satisfactory",
            PerformanceStatus::NeedsAttention => "needs attention",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStatus {
    Achieved,
    OnTrack,
    Borderline,
    AtRisk,
}

impl AdmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AdmissionStatus::Achieved => "achieved",
            AdmissionStatus::OnTrack => "on track",
            AdmissionStatus::Borderline => "borderline",
            AdmissionStatus::AtRisk => "at risk",
        }
    }
}

/// One subject's derived standing inside a performance summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectStanding {
    pub subject: String,
    pub average_score: f64,
    pub status: PerformanceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub overall_status: PerformanceStatus,
    pub average_score: f64,
    pub total_subjects: usize,
    pub subjects: Vec<SubjectStanding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisciplineAnalysis {
    pub attendance_percentage: u32,
    pub is_attendance_critical: bool,
    pub is_homework_critical: bool,
    pub is_polls_critical: bool,
    pub overall_risk: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamAnalysis {
    pub pass_rate: u32,
    pub average_performance: f64,
    pub is_improving: bool,
    pub needs_attention: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionChance {
    pub current_score: f64,
    pub required_score: f64,
    pub probability_percentage: u32,
    pub status: AdmissionStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSummary {
    pub unread_count: usize,
    pub notifications: Vec<NotificationItem>,
}

/// Per-type comment counts plus the most recent comments, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDigest {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub recent: Vec<CommentRecord>,
}
