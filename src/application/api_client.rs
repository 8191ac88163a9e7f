// Client trait for the center's backend API - the external collaborator
// every state container fetches through.
use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::student::{
    AdmissionSnapshot, CommentRecord, DisciplineStatistics, ExamStatistics, GroupSummary,
    MaterialModule, NewComment, NotificationItem, StudentProfile, SubjectGrades,
};
use crate::error::Result;

#[async_trait]
pub trait EduApi: Send + Sync {
    /// Per-subject grade breakdown, keyed by subject name.
    async fn subject_grades(&self, student_id: &str) -> Result<BTreeMap<String, SubjectGrades>>;

    /// Attendance and assignment-compliance counters.
    async fn discipline(&self, student_id: &str) -> Result<DisciplineStatistics>;

    /// Recorded exam attempts, oldest first.
    async fn exams(&self, student_id: &str) -> Result<ExamStatistics>;

    /// Current ДТМ score against the target requirement.
    async fn admission(&self, student_id: &str) -> Result<AdmissionSnapshot>;

    /// Teacher comments about the student.
    async fn comments(&self, student_id: &str) -> Result<Vec<CommentRecord>>;

    /// Notifications addressed to the student's account.
    async fn notifications(&self, student_id: &str) -> Result<Vec<NotificationItem>>;

    async fn student_profile(&self, student_id: &str) -> Result<StudentProfile>;

    /// Groups taught by a teacher.
    async fn teacher_groups(&self, teacher_id: &str) -> Result<Vec<GroupSummary>>;

    /// Roster of one group.
    async fn group_students(&self, group_id: &str) -> Result<Vec<StudentProfile>>;

    /// Study-material modules for a subject.
    async fn materials(&self, subject: &str) -> Result<Vec<MaterialModule>>;

    /// Submit a teacher comment. Retrying after a failure re-submits the
    /// same payload; the server side owns deduplication if any.
    async fn submit_comment(&self, student_id: &str, comment: &NewComment)
        -> Result<CommentRecord>;
}
