use serde::Serialize;

use crate::model::entity::{Module, ModuleWithProgressRow};

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleWithProgress {
    #[serde(flatten)]
    pub module: Module,
    pub total_lessons: i64,
    pub completed_lessons: i64,
    pub progress_percent: i64,
    pub is_completed: bool,
}

impl From<ModuleWithProgressRow> for ModuleWithProgress {
    fn from(row: ModuleWithProgressRow) -> Self {
        Self {
            module: row.module,
            total_lessons: row.total_lessons,
            completed_lessons: row.completed_lessons,
            progress_percent: progress_percent(row.completed_lessons, row.total_lessons),
            is_completed: row.total_lessons > 0 && row.completed_lessons >= row.total_lessons,
        }
    }
}

/// Rounded to the nearest whole percent, 0 for empty modules.
pub fn progress_percent(completed: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    let completed = completed.clamp(0, total);
    (completed * 100 + total / 2) / total
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn percent_rounding() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(0, 4), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(4, 4), 100);
        assert_eq!(progress_percent(5, 4), 100);
    }
}
