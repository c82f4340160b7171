use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::entity::{Lesson, LessonWithProgressRow};

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonWithProgress {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub completed: bool,
    pub score: Option<i32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_unlocked: bool,
}

impl LessonWithProgress {
    /// `rows` must already be in display order.
    pub fn from_rows(rows: Vec<LessonWithProgressRow>) -> Vec<Self> {
        let completed: Vec<bool> = rows.iter().map(|row| row.completed).collect();
        rows.into_iter()
            .zip(unlock_flags(&completed))
            .map(|(row, is_unlocked)| Self {
                lesson: row.lesson,
                completed: row.completed,
                score: row.score,
                completed_at: row.completed_at,
                is_unlocked,
            })
            .collect()
    }
}

/// The first lesson is always open, every other one opens once its
/// predecessor is completed. Completed lessons stay open.
pub fn unlock_flags(completed: &[bool]) -> Vec<bool> {
    completed
        .iter()
        .enumerate()
        .map(|(idx, done)| idx == 0 || *done || completed[idx - 1])
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_lesson_is_unlocked() {
        assert_eq!(unlock_flags(&[false, false, false]), vec![true, false, false]);
    }

    #[test]
    fn completion_unlocks_next() {
        assert_eq!(
            unlock_flags(&[true, true, false, false]),
            vec![true, true, true, false]
        );
    }

    #[test]
    fn completed_lessons_stay_unlocked() {
        assert_eq!(unlock_flags(&[false, false, true]), vec![true, false, true]);
        assert!(unlock_flags(&[]).is_empty());
    }
}
