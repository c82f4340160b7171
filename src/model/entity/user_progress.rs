use crate::model::entity::user::XP_PER_LEVEL;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    id: i32,
    user_id: i32,
    lesson_id: i32,
    completed: bool,
    score: Option<i32>,
    completed_at: DateTime<Utc>,
}

impl ResourceTyped for UserProgress {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::UserProgress
    }
}

/// Result of marking a lesson as completed.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub progress: UserProgress,
    /// Zero when the lesson had already been completed.
    pub xp_awarded: i32,
    pub xp: i32,
    pub level: i32,
}

#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_lessons: i64,
    pub completed_lessons: i64,
    pub xp: i32,
    pub level: i32,
}

impl UserProgress {
    /// Marks `lesson_id` as completed for `user_id`. XP is only awarded the
    /// first time, later calls keep the best score. Returns `None` when the
    /// lesson does not exist.
    pub async fn complete_lesson(
        mm: &ModelManager,
        user_id: i32,
        lesson_id: i32,
        score: Option<i32>,
    ) -> DatabaseResult<Option<CompletionOutcome>> {
        let mut tx = mm.executor().begin().await?;

        let xp_reward: Option<i32> = sqlx::query_scalar("SELECT xp_reward FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(xp_reward) = xp_reward else {
            return Ok(None);
        };

        let inserted: Option<UserProgress> = sqlx::query_as(
            r#"
            INSERT INTO user_progress (user_id, lesson_id, completed, score, completed_at)
            VALUES ($1, $2, TRUE, $3, now())
            ON CONFLICT (user_id, lesson_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .bind(score)
        .fetch_optional(&mut *tx)
        .await?;

        let (progress, xp_awarded) = match inserted {
            Some(progress) => (progress, xp_reward),
            None => {
                let progress: UserProgress = sqlx::query_as(
                    r#"
                    UPDATE user_progress SET score = GREATEST(score, $3)
                    WHERE user_id = $1 AND lesson_id = $2
                    RETURNING *
                    "#,
                )
                .bind(user_id)
                .bind(lesson_id)
                .bind(score)
                .fetch_one(&mut *tx)
                .await?;
                (progress, 0)
            }
        };

        let (xp, level): (i32, i32) = sqlx::query_as(
            r#"
            UPDATE users SET
                xp = xp + $2,
                level = (xp + $2) / $3 + 1
            WHERE id = $1
            RETURNING xp, level
            "#,
        )
        .bind(user_id)
        .bind(xp_awarded)
        .bind(XP_PER_LEVEL)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            user = user_id,
            lesson = lesson_id,
            xp_awarded,
            xp,
            level,
            "lesson completed"
        );

        Ok(Some(CompletionOutcome {
            progress,
            xp_awarded,
            xp,
            level,
        }))
    }
}

impl ProgressSummary {
    pub async fn for_user(mm: &ModelManager, user_id: i32) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM lessons) AS total_lessons,
                (SELECT COUNT(*) FROM user_progress up
                    WHERE up.user_id = u.id AND up.completed) AS completed_lessons,
                u.xp,
                u.level
            FROM users u
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }
}
