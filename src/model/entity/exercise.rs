use std::str::FromStr;

use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Kinds of exercise a lesson can contain. Stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseType {
    VocabCheck,
    MultipleChoice,
    Translate,
    Listening,
}

impl ExerciseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VocabCheck => "vocab_check",
            Self::MultipleChoice => "multiple_choice",
            Self::Translate => "translate",
            Self::Listening => "listening",
        }
    }
}

impl FromStr for ExerciseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vocab_check" => Ok(Self::VocabCheck),
            "multiple_choice" => Ok(Self::MultipleChoice),
            "translate" => Ok(Self::Translate),
            "listening" => Ok(Self::Listening),
            other => Err(format!("Unknown exercise type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    id: i32,
    lesson_id: i32,
    exercise_type: String,
    question: String,
    instruction: String,
    #[sqlx(rename = "order_index")]
    order: i32,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseCreate {
    pub lesson_id: i32,
    pub exercise_type: String,
    pub question: String,
    pub instruction: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseUpdate {
    pub exercise_type: Option<String>,
    pub question: Option<String>,
    pub instruction: Option<String>,
    pub order: Option<i32>,
}

impl ExerciseCreate {
    pub fn validate(&self) -> Result<(), String> {
        if self.lesson_id <= 0 {
            return Err(String::from("Invalid lesson ID"));
        }
        ExerciseType::from_str(&self.exercise_type)?;
        if self.question.trim().is_empty() {
            return Err(String::from("question must not be empty"));
        }
        if self.order.is_some_and(|o| o < 0) {
            return Err(String::from("order must not be negative"));
        }
        Ok(())
    }
}

impl ExerciseUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(kind) = &self.exercise_type {
            ExerciseType::from_str(kind)?;
        }
        if self.question.as_deref().is_some_and(|q| q.trim().is_empty()) {
            return Err(String::from("question must not be empty"));
        }
        if self.order.is_some_and(|o| o < 0) {
            return Err(String::from("order must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ExerciseFilter {
    pub lesson_id: Option<i32>,
}

impl ResourceTyped for Exercise {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Exercise
    }
}

impl Exercise {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn lesson_id(&self) -> i32 {
        self.lesson_id
    }

    pub fn exercise_type(&self) -> &str {
        &self.exercise_type
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn order(&self) -> i32 {
        self.order
    }
}

#[async_trait]
impl CrudRepository<Exercise, ExerciseCreate, ExerciseUpdate, i32> for Exercise {
    async fn create(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: ExerciseCreate,
    ) -> DatabaseResult<Self> {
        let exercise: Exercise = sqlx::query_as(
            r#"
            INSERT INTO exercises (lesson_id, exercise_type, question, instruction, order_index)
            VALUES (
                $1, $2, $3, $4,
                COALESCE($5, (SELECT COALESCE(MAX(order_index) + 1, 0) FROM exercises WHERE lesson_id = $1))
            )
            RETURNING *
            "#,
        )
        .bind(data.lesson_id)
        .bind(&data.exercise_type)
        .bind(data.question.trim())
        .bind(data.instruction.unwrap_or_default())
        .bind(data.order)
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), exercise = exercise.id, "exercise created");
        Ok(exercise)
    }

    async fn update(
        self,
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: ExerciseUpdate,
    ) -> DatabaseResult<Self> {
        let exercise: Exercise = sqlx::query_as(
            r#"
            UPDATE exercises SET
                exercise_type = COALESCE($1, exercise_type),
                question = COALESCE($2, question),
                instruction = COALESCE($3, instruction),
                order_index = COALESCE($4, order_index)
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(data.exercise_type)
        .bind(data.question.as_deref().map(str::trim))
        .bind(data.instruction)
        .bind(data.order)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), exercise = exercise.id, "exercise updated");
        Ok(exercise)
    }

    async fn delete(self, mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<Self> {
        sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        tracing::info!(actor = actor.user_id(), exercise = self.id, "exercise deleted");
        Ok(self)
    }

    async fn find_by_id(mm: &ModelManager, id: i32) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM exercises WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM exercises ORDER BY order_index, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl Exercise {
    pub async fn find_all(mm: &ModelManager, filter: ExerciseFilter) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT * FROM exercises
            WHERE ($1::INTEGER IS NULL OR lesson_id = $1)
            ORDER BY lesson_id, order_index, id
            "#,
        )
        .bind(filter.lesson_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exercise_type_round_trips_through_text() {
        for kind in [
            ExerciseType::VocabCheck,
            ExerciseType::MultipleChoice,
            ExerciseType::Translate,
            ExerciseType::Listening,
        ] {
            assert_eq!(kind.as_str().parse::<ExerciseType>().unwrap(), kind);
        }
        assert!("essay".parse::<ExerciseType>().is_err());
    }

    #[test]
    fn create_rejects_unknown_type() {
        let data: ExerciseCreate = serde_json::from_str(
            r#"{"lessonId": 1, "exerciseType": "essay", "question": "Was ist das?"}"#,
        )
        .unwrap();
        assert_eq!(data.validate().unwrap_err(), "Unknown exercise type `essay`");
    }
}
