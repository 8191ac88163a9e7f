// Composed per-role dashboard view models
use serde::{Deserialize, Serialize};

use super::metrics::{
    AdmissionChance, CommentDigest, DisciplineAnalysis, ExamAnalysis, NotificationSummary,
    PerformanceSummary,
};
use super::student::{GroupSummary, MaterialModule, StudentProfile};

/// Everything the parent dashboard renders for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentDashboard {
    pub student_id: String,
    pub performance: PerformanceSummary,
    pub discipline: DisciplineAnalysis,
    pub exams: ExamAnalysis,
    pub admission: AdmissionChance,
    pub comments: CommentDigest,
    pub notifications: NotificationSummary,
}

/// The student's own view of their progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDashboard {
    pub profile: StudentProfile,
    pub performance: PerformanceSummary,
    pub exams: ExamAnalysis,
    pub admission: AdmissionChance,
    pub notifications: NotificationSummary,
}

/// A teacher's group roster view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherOverview {
    pub teacher_id: String,
    pub groups: Vec<GroupSummary>,
    pub students: Vec<StudentProfile>,
}

/// Study materials for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialsView {
    pub subject: String,
    pub modules: Vec<MaterialModule>,
}
