use crate::model::{AnswerSheet, Question, QuestionStatus};

//
// ─── GRADE BREAKDOWN ──────────────────────────────────────────────────────────
//

/// Raw grading output, before it is folded into a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeBreakdown {
    pub statuses: Vec<QuestionStatus>,
    pub correct_count: u32,
    pub attempted_count: u32,
}

/// Grades a finished answer sheet against the presented questions.
///
/// Position `i` of the result describes `questions[i]`: no recorded choice is
/// `Skipped`, the correct choice is `Correct`, anything else is `Wrong`. An
/// out-of-range choice index is not rejected anywhere upstream, so it lands
/// here as `Wrong` like any other mismatch. Pure function; grading twice over
/// the same inputs gives the same breakdown.
#[must_use]
pub fn grade(questions: &[&Question], answers: &AnswerSheet) -> GradeBreakdown {
    let mut statuses = Vec::with_capacity(questions.len());
    let mut correct_count = 0_u32;
    let mut attempted_count = 0_u32;

    for (position, question) in questions.iter().enumerate() {
        let status = match answers.selected(position) {
            None => QuestionStatus::Skipped,
            Some(choice) if question.is_correct(choice) => {
                correct_count = correct_count.saturating_add(1);
                QuestionStatus::Correct
            }
            Some(_) => QuestionStatus::Wrong,
        };
        if status != QuestionStatus::Skipped {
            attempted_count = attempted_count.saturating_add(1);
        }
        statuses.push(status);
    }

    GradeBreakdown {
        statuses,
        correct_count,
        attempted_count,
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
