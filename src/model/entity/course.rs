use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    id: i32,
    title: String,
    description: String,
    image_url: Option<String>,
    #[sqlx(rename = "order_index")]
    order: i32,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseCreate {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub order: Option<i32>,
}

impl CourseCreate {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err(String::from("Course title must not be empty"));
        }
        if self.order.is_some_and(|o| o < 0) {
            return Err(String::from("order must not be negative"));
        }
        Ok(())
    }
}

impl CourseUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(String::from("Course title must not be empty"));
        }
        if self.order.is_some_and(|o| o < 0) {
            return Err(String::from("order must not be negative"));
        }
        Ok(())
    }
}

impl ResourceTyped for Course {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl Course {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn order(&self) -> i32 {
        self.order
    }
}

#[async_trait]
impl CrudRepository<Course, CourseCreate, CourseUpdate, i32> for Course {
    async fn create(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: CourseCreate,
    ) -> DatabaseResult<Self> {
        let course: Course = sqlx::query_as(
            r#"
            INSERT INTO courses (title, description, image_url, order_index)
            VALUES ($1, $2, $3, COALESCE($4, (SELECT COALESCE(MAX(order_index) + 1, 0) FROM courses)))
            RETURNING *
            "#,
        )
        .bind(data.title.trim())
        .bind(data.description.unwrap_or_default())
        .bind(data.image_url)
        .bind(data.order)
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), course = course.id, "course created");
        Ok(course)
    }

    async fn update(
        self,
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: CourseUpdate,
    ) -> DatabaseResult<Self> {
        let course: Course = sqlx::query_as(
            r#"
            UPDATE courses SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                image_url = COALESCE($3, image_url),
                order_index = COALESCE($4, order_index)
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(data.title.as_deref().map(str::trim))
        .bind(data.description)
        .bind(data.image_url)
        .bind(data.order)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), course = course.id, "course updated");
        Ok(course)
    }

    async fn delete(self, mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<Self> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        tracing::info!(actor = actor.user_id(), course = self.id, "course deleted");
        Ok(self)
    }

    async fn find_by_id(mm: &ModelManager, id: i32) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses ORDER BY order_index, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl Course {
    pub async fn all(mm: &ModelManager) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses ORDER BY order_index, id")
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }
}
