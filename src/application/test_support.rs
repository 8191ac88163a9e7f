// Canned EduApi implementation shared by the service tests.
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::application::api_client::EduApi;
use crate::domain::student::{
    AdmissionSnapshot, CommentRecord, CommentType, DisciplineStatistics, ExamKind, ExamRecord,
    ExamStatistics, GroupSummary, MaterialModule, MaterialTopic, NewComment, NotificationItem,
    NotificationPriority, SectionScore, StudentProfile, SubjectGrades,
};
use crate::error::{ApiError, Result};

fn at(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, 9, 0, 0).unwrap()
}

/// Deterministic backend double. Individual calls can be made to fail via
/// the atomic flags; submitted comments are recorded for assertions.
#[derive(Default)]
pub struct StubApi {
    pub fail_discipline: AtomicBool,
    pub fail_submit: AtomicBool,
    pub submitted: Mutex<Vec<(String, NewComment)>>,
}

#[async_trait]
impl EduApi for StubApi {
    async fn subject_grades(&self, _student_id: &str) -> Result<BTreeMap<String, SubjectGrades>> {
        let mut grades = BTreeMap::new();
        grades.insert(
            "math".to_string(),
            SubjectGrades {
                polls: SectionScore::new(9.0, 10.0),
                tests: SectionScore::new(8.0, 10.0),
                control_works: SectionScore::new(10.0, 10.0),
            },
        );
        Ok(grades)
    }

    async fn discipline(&self, _student_id: &str) -> Result<DisciplineStatistics> {
        if self.fail_discipline.load(Ordering::SeqCst) {
            return Err(ApiError::Network("backend unreachable".into()));
        }
        Ok(DisciplineStatistics {
            total_absences: 1,
            total_lessons: 20,
            missed_homeworks: 0,
            total_homeworks: 10,
            missed_polls: 0,
            total_polls: 8,
            teacher_remarks: 0,
        })
    }

    async fn exams(&self, _student_id: &str) -> Result<ExamStatistics> {
        Ok(ExamStatistics {
            attempts: vec![
                ExamRecord {
                    kind: ExamKind::Monthly,
                    score: 60.0,
                    max_score: 100.0,
                    taken_at: at(9, 1),
                },
                ExamRecord {
                    kind: ExamKind::Monthly,
                    score: 75.0,
                    max_score: 100.0,
                    taken_at: at(10, 1),
                },
            ],
        })
    }

    async fn admission(&self, _student_id: &str) -> Result<AdmissionSnapshot> {
        Ok(AdmissionSnapshot {
            current_score: 192.0,
            required_score: 189.0,
        })
    }

    async fn comments(&self, _student_id: &str) -> Result<Vec<CommentRecord>> {
        Ok(vec![CommentRecord {
            teacher_id: "t-1".to_string(),
            teacher_name: "A. Karimova".to_string(),
            text: "Active in class".to_string(),
            comment_type: CommentType::Positive,
            created_at: at(10, 1),
        }])
    }

    async fn notifications(&self, _student_id: &str) -> Result<Vec<NotificationItem>> {
        Ok(vec![NotificationItem {
            id: "n1".to_string(),
            kind: "exam".to_string(),
            title: "Results".to_string(),
            message: "Monthly exam graded".to_string(),
            priority: NotificationPriority::High,
            is_read: false,
            created_at: at(10, 2),
        }])
    }

    async fn student_profile(&self, student_id: &str) -> Result<StudentProfile> {
        Ok(StudentProfile {
            id: student_id.to_string(),
            full_name: "Aziza Rakhimova".to_string(),
            group_id: Some("g-101".to_string()),
            target_university: Some("TUIT".to_string()),
        })
    }

    async fn teacher_groups(&self, _teacher_id: &str) -> Result<Vec<GroupSummary>> {
        Ok(vec![
            GroupSummary {
                id: "g-101".to_string(),
                name: "Math A".to_string(),
                subject: "math".to_string(),
                student_count: 2,
            },
            GroupSummary {
                id: "g-102".to_string(),
                name: "Physics B".to_string(),
                subject: "physics".to_string(),
                student_count: 1,
            },
        ])
    }

    async fn group_students(&self, group_id: &str) -> Result<Vec<StudentProfile>> {
        let student = |id: &str, name: &str| StudentProfile {
            id: id.to_string(),
            full_name: name.to_string(),
            group_id: Some(group_id.to_string()),
            target_university: None,
        };
        Ok(match group_id {
            "g-101" => vec![student("s-1", "Aziza Rakhimova"), student("s-2", "Botir Aliyev")],
            "g-102" => vec![student("s-3", "Dilnoza Usmonova")],
            _ => Vec::new(),
        })
    }

    async fn materials(&self, _subject: &str) -> Result<Vec<MaterialModule>> {
        Ok(vec![MaterialModule {
            id: "m1".to_string(),
            title: "Algebra".to_string(),
            topics: vec![
                MaterialTopic {
                    id: "t1".to_string(),
                    title: "Quadratic equations".to_string(),
                    url: None,
                },
                MaterialTopic {
                    id: "t2".to_string(),
                    title: "Inequalities".to_string(),
                    url: None,
                },
            ],
        }])
    }

    async fn submit_comment(
        &self,
        student_id: &str,
        comment: &NewComment,
    ) -> Result<CommentRecord> {
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(ApiError::Network("request never reached the server".into()));
        }
        self.submitted
            .lock()
            .unwrap()
            .push((student_id.to_string(), comment.clone()));
        Ok(CommentRecord {
            teacher_id: "t-1".to_string(),
            teacher_name: "A. Karimova".to_string(),
            text: comment.text.clone(),
            comment_type: comment.comment_type,
            created_at: at(10, 3),
        })
    }
}
