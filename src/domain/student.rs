// Raw payload models returned by the center's backend API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One graded section of a subject: points earned vs. points available.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SectionScore {
    pub score: f64,
    pub total: f64,
}

impl SectionScore {
    pub fn new(score: f64, total: f64) -> Self {
        Self { score, total }
    }

    /// Section result normalized to the 0-10 grade scale. 0 when nothing
    /// was graded yet.
    pub fn on_grade_scale(&self) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        (10.0 * self.score / self.total).clamp(0.0, 10.0)
    }

    pub fn is_graded(&self) -> bool {
        self.total > 0.0
    }
}

/// Per-subject grade breakdown. The subject name is the key of the map this
/// arrives in, not a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectGrades {
    pub polls: SectionScore,
    pub tests: SectionScore,
    pub control_works: SectionScore,
}

impl SubjectGrades {
    pub fn sections(&self) -> [SectionScore; 3] {
        [self.polls, self.tests, self.control_works]
    }
}

/// Attendance and assignment-compliance counters for one student.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisciplineStatistics {
    pub total_absences: u32,
    pub total_lessons: u32,
    pub missed_homeworks: u32,
    pub total_homeworks: u32,
    pub missed_polls: u32,
    pub total_polls: u32,
    pub teacher_remarks: u32,
}

impl DisciplineStatistics {
    /// Clamp every "missed" counter to its total so malformed payloads
    /// cannot produce negative attendance or ratios above 1.
    pub fn sanitized(mut self) -> Self {
        self.total_absences = self.total_absences.min(self.total_lessons);
        self.missed_homeworks = self.missed_homeworks.min(self.total_homeworks);
        self.missed_polls = self.missed_polls.min(self.total_polls);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamKind {
    Monthly,
    Intermediate,
    Final,
}

/// One recorded exam attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamRecord {
    pub kind: ExamKind,
    pub score: f64,
    pub max_score: f64,
    pub taken_at: DateTime<Utc>,
}

impl ExamRecord {
    /// Score as a percentage of the maximum, clamped to [0, 100].
    /// 0 when max_score is 0.
    pub fn percentage(&self) -> f64 {
        if self.max_score <= 0.0 {
            return 0.0;
        }
        (100.0 * self.score / self.max_score).clamp(0.0, 100.0)
    }
}

/// Exam attempts for one student, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamStatistics {
    pub attempts: Vec<ExamRecord>,
}

/// Current ДТМ standing against the target university's requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionSnapshot {
    pub current_score: f64,
    pub required_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentType {
    Positive,
    Neutral,
    Negative,
}

/// A teacher's comment about a student. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub teacher_id: String,
    pub teacher_name: String,
    pub text: String,
    pub comment_type: CommentType,
    pub created_at: DateTime<Utc>,
}

/// Payload for submitting a new comment. A retry after a failed save
/// re-submits the same payload unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub text: String,
    pub comment_type: CommentType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Normal,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: String,
    pub full_name: String,
    pub group_id: Option<String>,
    pub target_university: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub student_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialTopic {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialModule {
    pub id: String,
    pub title: String,
    pub topics: Vec<MaterialTopic>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn section_score_normalizes_to_grade_scale() {
        assert_eq!(SectionScore::new(8.0, 10.0).on_grade_scale(), 8.0);
        assert_eq!(SectionScore::new(45.0, 50.0).on_grade_scale(), 9.0);
        assert_eq!(SectionScore::new(3.0, 0.0).on_grade_scale(), 0.0);
    }

    #[test]
    fn exam_percentage_is_clamped() {
        let base = ExamRecord {
            kind: ExamKind::Monthly,
            score: 72.0,
            max_score: 80.0,
            taken_at: Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap(),
        };
        assert_eq!(base.percentage(), 90.0);

        let over = ExamRecord { score: 90.0, max_score: 80.0, ..base.clone() };
        assert_eq!(over.percentage(), 100.0);

        let ungraded = ExamRecord { score: 10.0, max_score: 0.0, ..base };
        assert_eq!(ungraded.percentage(), 0.0);
    }

    #[test]
    fn sanitize_caps_missed_counts() {
        let stats = DisciplineStatistics {
            total_absences: 30,
            total_lessons: 20,
            missed_homeworks: 11,
            total_homeworks: 10,
            missed_polls: 2,
            total_polls: 8,
            teacher_remarks: 1,
        }
        .sanitized();
        assert_eq!(stats.total_absences, 20);
        assert_eq!(stats.missed_homeworks, 10);
        assert_eq!(stats.missed_polls, 2);
    }
}
