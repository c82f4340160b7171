use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseOption {
    id: i32,
    exercise_id: i32,
    text: String,
    image_src: Option<String>,
    // never leaves the server, answers are checked via /check
    #[serde(skip_serializing, default)]
    #[schema(write_only)]
    is_correct: bool,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseOptionCreate {
    pub exercise_id: i32,
    pub text: String,
    pub image_src: Option<String>,
    pub is_correct: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseOptionUpdate {
    pub text: Option<String>,
    pub image_src: Option<String>,
    pub is_correct: Option<bool>,
}

impl ExerciseOptionCreate {
    pub fn validate(&self) -> Result<(), String> {
        if self.exercise_id <= 0 {
            return Err(String::from("Invalid exercise ID"));
        }
        if self.text.trim().is_empty() {
            return Err(String::from("text must not be empty"));
        }
        Ok(())
    }
}

impl ExerciseOptionUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if self.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(String::from("text must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ExerciseOptionFilter {
    pub exercise_id: Option<i32>,
}

impl ResourceTyped for ExerciseOption {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::ExerciseOption
    }
}

impl ExerciseOption {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn exercise_id(&self) -> i32 {
        self.exercise_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image_src(&self) -> Option<&str> {
        self.image_src.as_deref()
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

#[async_trait]
impl CrudRepository<ExerciseOption, ExerciseOptionCreate, ExerciseOptionUpdate, i32>
    for ExerciseOption
{
    async fn create(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: ExerciseOptionCreate,
    ) -> DatabaseResult<Self> {
        let option: ExerciseOption = sqlx::query_as(
            r#"
            INSERT INTO exercise_options (exercise_id, text, image_src, is_correct)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(data.exercise_id)
        .bind(data.text.trim())
        .bind(data.image_src)
        .bind(data.is_correct.unwrap_or(false))
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), option = option.id, "exercise option created");
        Ok(option)
    }

    async fn update(
        self,
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: ExerciseOptionUpdate,
    ) -> DatabaseResult<Self> {
        let option: ExerciseOption = sqlx::query_as(
            r#"
            UPDATE exercise_options SET
                text = COALESCE($1, text),
                image_src = COALESCE($2, image_src),
                is_correct = COALESCE($3, is_correct)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(data.text.as_deref().map(str::trim))
        .bind(data.image_src)
        .bind(data.is_correct)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), option = option.id, "exercise option updated");
        Ok(option)
    }

    async fn delete(self, mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<Self> {
        sqlx::query("DELETE FROM exercise_options WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        tracing::info!(actor = actor.user_id(), option = self.id, "exercise option deleted");
        Ok(self)
    }

    async fn find_by_id(mm: &ModelManager, id: i32) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM exercise_options WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM exercise_options ORDER BY id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercise_options")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

// Utils

impl ExerciseOption {
    pub async fn find_all(
        mm: &ModelManager,
        filter: ExerciseOptionFilter,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT * FROM exercise_options
            WHERE ($1::INTEGER IS NULL OR exercise_id = $1)
            ORDER BY exercise_id, id
            "#,
        )
        .bind(filter.exercise_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }

    pub async fn find_all_by_exercise(
        mm: &ModelManager,
        exercise_id: i32,
    ) -> DatabaseResult<Vec<Self>> {
        Self::find_all(
            mm,
            ExerciseOptionFilter {
                exercise_id: Some(exercise_id),
            },
        )
        .await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn correctness_is_not_serialized() {
        let option = ExerciseOption {
            id: 3,
            exercise_id: 1,
            text: String::from("der Apfel"),
            image_src: Some(String::from("/assets/apple.png")),
            is_correct: true,
        };
        let json = serde_json::to_value(&option).unwrap();
        assert_eq!(json["imageSrc"], "/assets/apple.png");
        assert!(json.get("isCorrect").is_none());
    }
}
