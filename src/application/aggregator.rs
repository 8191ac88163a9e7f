// Derived-metrics aggregation - pure transforms from raw payloads to
// classified view-model fields. No I/O, no mutation of inputs; missing or
// zero data degrades to the lowest-severity-safe defaults instead of
// failing.
use std::collections::BTreeMap;

use crate::domain::metrics::{
    AdmissionChance, AdmissionStatus, CommentDigest, DisciplineAnalysis, ExamAnalysis,
    NotificationSummary, PerformanceStatus, PerformanceSummary, RiskLevel, SubjectStanding,
};
use crate::domain::student::{
    CommentRecord, CommentType, DisciplineStatistics, ExamStatistics, NotificationItem,
    SubjectGrades,
};

/// Classification thresholds rendered in dashboard copy. Changing any of
/// these changes what parents and students see.
pub mod thresholds {
    /// Grade-scale (0-10) cutoffs for status labels.
    pub const EXCELLENT_MIN: f64 = 8.0;
    pub const GOOD_MIN: f64 = 6.0;
    pub const SATISFACTORY_MIN: f64 = 4.0;

    /// Attendance below this percentage is critical.
    pub const ATTENDANCE_CRITICAL_BELOW: u32 = 75;
    /// Missed-to-total ratio above this is critical (homeworks and polls).
    pub const MISS_RATIO_CRITICAL: f64 = 0.3;
    /// More remarks than this alone puts the student at high risk.
    pub const REMARKS_HIGH_RISK_ABOVE: u32 = 3;

    /// Exam pass bar, in percent.
    pub const EXAM_PASS_PERCENT: f64 = 60.0;
    /// Minimum percentage-point gain over the previous attempt that counts
    /// as improvement.
    pub const EXAM_IMPROVEMENT_MIN_GAIN: f64 = 5.0;
    /// Number of most recent attempts the exam analysis looks at.
    pub const EXAM_WINDOW: usize = 5;

    /// Admission-chance ramp: probability is 0 at a score gap of
    /// ADMISSION_GAP_FLOOR and saturates at 100 once the gap closes.
    pub const ADMISSION_GAP_FLOOR: f64 = -20.0;
    pub const ADMISSION_GAP_SPAN: f64 = 20.0;
    /// Probability bands for the status label.
    pub const ADMISSION_ON_TRACK_MIN: u32 = 70;
    pub const ADMISSION_BORDERLINE_MIN: u32 = 40;

    /// A sub-metric must be at least this weak (on a 0-100 scale) to earn
    /// a recommendation.
    pub const WEAKNESS_FLOOR: f64 = 25.0;
}

/// Map a 0-10 average onto its status label.
pub fn status_for_score(average: f64) -> PerformanceStatus {
    if average >= thresholds::EXCELLENT_MIN {
        PerformanceStatus::Excellent
    } else if average >= thresholds::GOOD_MIN {
        PerformanceStatus::Good
    } else if average >= thresholds::SATISFACTORY_MIN {
        PerformanceStatus::Satisfactory
    } else {
        PerformanceStatus::NeedsAttention
    }
}

/// Average of the graded sections, on the 0-10 scale. A subject with
/// nothing graded yet averages 0.
pub fn subject_average(grades: &SubjectGrades) -> f64 {
    let graded: Vec<f64> = grades
        .sections()
        .iter()
        .filter(|s| s.is_graded())
        .map(|s| s.on_grade_scale())
        .collect();
    if graded.is_empty() {
        return 0.0;
    }
    graded.iter().sum::<f64>() / graded.len() as f64
}

/// Per-subject standings plus the overall status across all subjects.
pub fn classify_performance(subjects: &BTreeMap<String, SubjectGrades>) -> PerformanceSummary {
    let standings: Vec<SubjectStanding> = subjects
        .iter()
        .map(|(subject, grades)| {
            let average = subject_average(grades);
            SubjectStanding {
                subject: subject.clone(),
                average_score: average,
                status: status_for_score(average),
            }
        })
        .collect();

    let average_score = if standings.is_empty() {
        0.0
    } else {
        standings.iter().map(|s| s.average_score).sum::<f64>() / standings.len() as f64
    };

    PerformanceSummary {
        overall_status: status_for_score(average_score),
        average_score,
        total_subjects: standings.len(),
        subjects: standings,
    }
}

fn miss_ratio_critical(missed: u32, total: u32) -> bool {
    if total == 0 {
        return false;
    }
    f64::from(missed.min(total)) / f64::from(total) > thresholds::MISS_RATIO_CRITICAL
}

/// Attendance percentage and the three critical flags, folded into an
/// overall risk level.
pub fn analyze_discipline(discipline: &DisciplineStatistics) -> DisciplineAnalysis {
    let attendance_percentage = if discipline.total_lessons == 0 {
        0
    } else {
        let absences = discipline.total_absences.min(discipline.total_lessons);
        let attended = discipline.total_lessons - absences;
        (100.0 * f64::from(attended) / f64::from(discipline.total_lessons)).round() as u32
    };

    let is_attendance_critical = attendance_percentage < thresholds::ATTENDANCE_CRITICAL_BELOW;
    let is_homework_critical =
        miss_ratio_critical(discipline.missed_homeworks, discipline.total_homeworks);
    let is_polls_critical = miss_ratio_critical(discipline.missed_polls, discipline.total_polls);

    let critical_flags = [is_attendance_critical, is_homework_critical, is_polls_critical]
        .iter()
        .filter(|&&flag| flag)
        .count();

    let overall_risk = if critical_flags >= 2
        || discipline.teacher_remarks > thresholds::REMARKS_HIGH_RISK_ABOVE
    {
        RiskLevel::High
    } else if critical_flags == 1 || discipline.teacher_remarks > 0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    DisciplineAnalysis {
        attendance_percentage,
        is_attendance_critical,
        is_homework_critical,
        is_polls_critical,
        overall_risk,
    }
}

/// Pass rate and trend over the last `EXAM_WINDOW` attempts.
pub fn analyze_exams(exams: &ExamStatistics) -> ExamAnalysis {
    let window: Vec<f64> = exams
        .attempts
        .iter()
        .rev()
        .take(thresholds::EXAM_WINDOW)
        .map(|attempt| attempt.percentage())
        .collect();

    if window.is_empty() {
        return ExamAnalysis {
            pass_rate: 0,
            average_performance: 0.0,
            is_improving: false,
            needs_attention: false,
        };
    }

    // window is newest-first after the rev() above
    let latest = window[0];
    let passed = window
        .iter()
        .filter(|&&p| p >= thresholds::EXAM_PASS_PERCENT)
        .count();
    let pass_rate = (100.0 * passed as f64 / window.len() as f64).round() as u32;
    let average_performance = window.iter().sum::<f64>() / window.len() as f64;
    let is_improving = window
        .get(1)
        .is_some_and(|&previous| latest - previous >= thresholds::EXAM_IMPROVEMENT_MIN_GAIN);

    ExamAnalysis {
        pass_rate,
        average_performance,
        is_improving,
        needs_attention: latest < thresholds::EXAM_PASS_PERCENT,
    }
}

/// Sub-metric inputs for admission recommendations, each on a 0-100 scale
/// where higher is better.
#[derive(Debug, Clone)]
pub struct ProgressIndicators {
    pub attendance_percentage: u32,
    pub homework_completion_percentage: u32,
    pub exam_improving: bool,
    pub exam_average_performance: f64,
}

impl Default for ProgressIndicators {
    fn default() -> Self {
        Self {
            attendance_percentage: 100,
            homework_completion_percentage: 100,
            exam_improving: true,
            exam_average_performance: 100.0,
        }
    }
}

impl ProgressIndicators {
    pub fn from_analyses(discipline: &DisciplineAnalysis, exams: &ExamAnalysis) -> Self {
        Self {
            attendance_percentage: discipline.attendance_percentage,
            homework_completion_percentage: if discipline.is_homework_critical {
                // Below the critical ratio bar; exact completion is not in
                // the analysis, the flag is enough to rank the weakness.
                ((1.0 - thresholds::MISS_RATIO_CRITICAL) * 100.0) as u32
            } else {
                100
            },
            exam_improving: exams.is_improving && !exams.needs_attention,
            exam_average_performance: exams.average_performance,
        }
    }
}

const RECOMMENDATION_ATTENDANCE: &str =
    "Attend lessons more consistently; attendance is the weakest area right now";
const RECOMMENDATION_HOMEWORK: &str =
    "Complete and hand in homework on time to close the preparation gap";
const RECOMMENDATION_EXAMS: &str =
    "Schedule extra mock exams and review mistakes from the latest attempt";

/// Probability of reaching the required ДТМ score, with up to three
/// recommendations keyed by the weakest sub-metric.
pub fn compute_admission_chance(
    current_score: f64,
    required_score: f64,
    indicators: &ProgressIndicators,
) -> AdmissionChance {
    let gap = current_score - required_score;
    let ramp = 100.0 * (gap - thresholds::ADMISSION_GAP_FLOOR) / thresholds::ADMISSION_GAP_SPAN;
    let probability_percentage = ramp.round().clamp(0.0, 100.0) as u32;

    let status = if gap >= 0.0 {
        AdmissionStatus::Achieved
    } else if probability_percentage >= thresholds::ADMISSION_ON_TRACK_MIN {
        AdmissionStatus::OnTrack
    } else if probability_percentage >= thresholds::ADMISSION_BORDERLINE_MIN {
        AdmissionStatus::Borderline
    } else {
        AdmissionStatus::AtRisk
    };

    // Rank sub-metrics by weakness (0-100, higher = weaker) and recommend
    // for the ones that are genuinely weak, weakest first.
    let exam_weakness = if indicators.exam_improving {
        0.0
    } else {
        (100.0 - indicators.exam_average_performance).max(0.0)
    };
    let mut weaknesses = [
        (
            100.0 - f64::from(indicators.attendance_percentage.min(100)),
            RECOMMENDATION_ATTENDANCE,
        ),
        (
            100.0 - f64::from(indicators.homework_completion_percentage.min(100)),
            RECOMMENDATION_HOMEWORK,
        ),
        (exam_weakness, RECOMMENDATION_EXAMS),
    ];
    weaknesses.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let recommendations: Vec<String> = weaknesses
        .iter()
        .filter(|(weakness, _)| *weakness >= thresholds::WEAKNESS_FLOOR)
        .take(3)
        .map(|(_, text)| (*text).to_string())
        .collect();

    AdmissionChance {
        current_score,
        required_score,
        probability_percentage,
        status,
        recommendations,
    }
}

/// Unread count plus the items stably sorted newest first. Calling this on
/// its own output yields the same ordering.
pub fn summarize_notifications(items: &[NotificationItem]) -> NotificationSummary {
    let unread_count = items.iter().filter(|n| !n.is_read).count();
    let mut notifications = items.to_vec();
    // stable sort: ties keep their insertion order
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    NotificationSummary {
        unread_count,
        notifications,
    }
}

/// Per-type comment counts plus the `limit` most recent comments.
pub fn summarize_comments(comments: &[CommentRecord], limit: usize) -> CommentDigest {
    let count_of = |kind: CommentType| {
        comments
            .iter()
            .filter(|c| c.comment_type == kind)
            .count()
    };

    let mut recent = comments.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(limit);

    CommentDigest {
        total: comments.len(),
        positive: count_of(CommentType::Positive),
        neutral: count_of(CommentType::Neutral),
        negative: count_of(CommentType::Negative),
        recent,
    }
}
