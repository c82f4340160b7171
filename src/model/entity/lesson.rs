use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

pub const DEFAULT_XP_REWARD: i32 = 10;
pub const DEFAULT_ESTIMATED_TIME: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    id: i32,
    module_id: i32,
    title: String,
    description: String,
    #[sqlx(rename = "order_index")]
    order: i32,
    xp_reward: i32,
    /// Minutes.
    estimated_time: i32,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn module_id(&self) -> i32 {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn xp_reward(&self) -> i32 {
        self.xp_reward
    }

    pub fn estimated_time(&self) -> i32 {
        self.estimated_time
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonCreate {
    pub module_id: i32,
    pub title: String,
    pub description: Option<String>,
    /// Appended after the last lesson of the module when omitted.
    pub order: Option<i32>,
    pub xp_reward: Option<i32>,
    pub estimated_time: Option<i32>,
}

impl LessonCreate {
    pub fn validate(&self) -> Result<(), String> {
        if self.module_id <= 0 {
            return Err(String::from("Invalid module ID"));
        }
        validate_title(&self.title)?;
        validate_numbers(self.order, self.xp_reward, self.estimated_time)
    }
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub xp_reward: Option<i32>,
    pub estimated_time: Option<i32>,
}

impl LessonUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_numbers(self.order, self.xp_reward, self.estimated_time)
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err(String::from("Lesson title must not be empty"));
    }
    Ok(())
}

fn validate_numbers(
    order: Option<i32>,
    xp_reward: Option<i32>,
    estimated_time: Option<i32>,
) -> Result<(), String> {
    if order.is_some_and(|o| o < 0) {
        return Err(String::from("order must not be negative"));
    }
    if xp_reward.is_some_and(|x| x < 0) {
        return Err(String::from("xpReward must not be negative"));
    }
    if estimated_time.is_some_and(|t| t < 0) {
        return Err(String::from("estimatedTime must not be negative"));
    }
    Ok(())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LessonFilter {
    pub module_id: Option<i32>,
}

#[async_trait]
impl CrudRepository<Lesson, LessonCreate, LessonUpdate, i32> for Lesson {
    async fn create(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: LessonCreate,
    ) -> DatabaseResult<Self> {
        let lesson: Lesson = sqlx::query_as(
            r#"
            INSERT INTO lessons (module_id, title, description, order_index, xp_reward, estimated_time)
            VALUES (
                $1, $2, $3,
                COALESCE($4, (SELECT COALESCE(MAX(order_index) + 1, 0) FROM lessons WHERE module_id = $1)),
                $5, $6
            )
            RETURNING *
            "#,
        )
        .bind(data.module_id)
        .bind(data.title.trim())
        .bind(data.description.unwrap_or_default())
        .bind(data.order)
        .bind(data.xp_reward.unwrap_or(DEFAULT_XP_REWARD))
        .bind(data.estimated_time.unwrap_or(DEFAULT_ESTIMATED_TIME))
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), lesson = lesson.id, "lesson created");
        Ok(lesson)
    }

    async fn update(
        self,
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: LessonUpdate,
    ) -> DatabaseResult<Self> {
        let lesson: Lesson = sqlx::query_as(
            r#"
            UPDATE lessons SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                order_index = COALESCE($3, order_index),
                xp_reward = COALESCE($4, xp_reward),
                estimated_time = COALESCE($5, estimated_time)
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(data.title.as_deref().map(str::trim))
        .bind(data.description)
        .bind(data.order)
        .bind(data.xp_reward)
        .bind(data.estimated_time)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), lesson = lesson.id, "lesson updated");
        Ok(lesson)
    }

    async fn delete(self, mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<Self> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        tracing::info!(actor = actor.user_id(), lesson = self.id, "lesson deleted");
        Ok(self)
    }

    async fn find_by_id(mm: &ModelManager, id: i32) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons ORDER BY order_index, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl Lesson {
    pub async fn find_all(mm: &ModelManager, filter: LessonFilter) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT * FROM lessons
            WHERE ($1::INTEGER IS NULL OR module_id = $1)
            ORDER BY module_id, order_index, id
            "#,
        )
        .bind(filter.module_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn all_by_module(mm: &ModelManager, module_id: i32) -> DatabaseResult<Vec<Self>> {
        Self::find_all(
            mm,
            LessonFilter {
                module_id: Some(module_id),
            },
        )
        .await
    }
}

// Utils

#[derive(Debug, sqlx::FromRow)]
pub struct LessonWithProgressRow {
    #[sqlx(flatten)]
    pub lesson: Lesson,
    pub completed: bool,
    pub score: Option<i32>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LessonWithProgressRow {
    pub async fn fetch_by_module(
        mm: &ModelManager,
        module_id: i32,
        user_id: i32,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                l.*,
                COALESCE(up.completed, FALSE) AS completed,
                up.score,
                up.completed_at
            FROM lessons l
            LEFT JOIN user_progress up
                ON up.lesson_id = l.id AND up.user_id = $2
            WHERE l.module_id = $1
            ORDER BY l.order_index, l.id
            "#,
        )
        .bind(module_id)
        .bind(user_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn create(title: &str) -> LessonCreate {
        LessonCreate {
            module_id: 1,
            title: title.to_string(),
            description: None,
            order: None,
            xp_reward: None,
            estimated_time: None,
        }
    }

    #[test]
    fn create_requires_title() {
        assert!(create("Begrüßungen").validate().is_ok());
        assert!(create("   ").validate().is_err());
    }

    #[test]
    fn create_rejects_non_positive_module() {
        let mut data = create("Zahlen");
        data.module_id = 0;
        assert_eq!(data.validate().unwrap_err(), "Invalid module ID");
    }

    #[test]
    fn update_rejects_negative_numbers() {
        let update = LessonUpdate {
            xp_reward: Some(-5),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(LessonUpdate::default().validate().is_ok());
    }

    #[test]
    fn create_body_is_camel_case() {
        let data: LessonCreate = serde_json::from_str(
            r#"{"moduleId": 3, "title": "Farben", "xpReward": 20, "estimatedTime": 7}"#,
        )
        .unwrap();
        assert_eq!(data.module_id, 3);
        assert_eq!(data.xp_reward, Some(20));
        assert_eq!(data.estimated_time, Some(7));
        assert_eq!(data.order, None);
    }
}
