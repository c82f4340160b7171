use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    id: i32,
    course_id: i32,
    title: String,
    description: String,
    #[sqlx(rename = "order_index")]
    order: i32,
    is_locked: bool,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleCreate {
    pub course_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub is_locked: Option<bool>,
}

impl ModuleCreate {
    pub fn validate(&self) -> Result<(), String> {
        if self.course_id <= 0 {
            return Err(String::from("Invalid course ID"));
        }
        if self.title.trim().is_empty() {
            return Err(String::from("Module title must not be empty"));
        }
        if self.order.is_some_and(|o| o < 0) {
            return Err(String::from("order must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub is_locked: Option<bool>,
}

impl ModuleUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(String::from("Module title must not be empty"));
        }
        if self.order.is_some_and(|o| o < 0) {
            return Err(String::from("order must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ModuleFilter {
    pub course_id: Option<i32>,
}

impl ResourceTyped for Module {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Module
    }
}

impl Module {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn course_id(&self) -> i32 {
        self.course_id
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

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }
}

#[async_trait]
impl CrudRepository<Module, ModuleCreate, ModuleUpdate, i32> for Module {
    async fn create(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: ModuleCreate,
    ) -> DatabaseResult<Self> {
        let module: Module = sqlx::query_as(
            r#"
            INSERT INTO modules (course_id, title, description, order_index, is_locked)
            VALUES (
                $1, $2, $3,
                COALESCE($4, (SELECT COALESCE(MAX(order_index) + 1, 0) FROM modules WHERE course_id = $1)),
                $5
            )
            RETURNING *
            "#,
        )
        .bind(data.course_id)
        .bind(data.title.trim())
        .bind(data.description.unwrap_or_default())
        .bind(data.order)
        .bind(data.is_locked.unwrap_or(false))
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), module = module.id, "module created");
        Ok(module)
    }

    async fn update(
        self,
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: ModuleUpdate,
    ) -> DatabaseResult<Self> {
        let module: Module = sqlx::query_as(
            r#"
            UPDATE modules SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                order_index = COALESCE($3, order_index),
                is_locked = COALESCE($4, is_locked)
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(data.title.as_deref().map(str::trim))
        .bind(data.description)
        .bind(data.order)
        .bind(data.is_locked)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), module = module.id, "module updated");
        Ok(module)
    }

    async fn delete(self, mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<Self> {
        sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        tracing::info!(actor = actor.user_id(), module = self.id, "module deleted");
        Ok(self)
    }

    async fn find_by_id(mm: &ModelManager, id: i32) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM modules WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM modules ORDER BY order_index, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM modules")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl Module {
    pub async fn find_all(mm: &ModelManager, filter: ModuleFilter) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT * FROM modules
            WHERE ($1::INTEGER IS NULL OR course_id = $1)
            ORDER BY course_id, order_index, id
            "#,
        )
        .bind(filter.course_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn all_by_course(mm: &ModelManager, course_id: i32) -> DatabaseResult<Vec<Self>> {
        Self::find_all(
            mm,
            ModuleFilter {
                course_id: Some(course_id),
            },
        )
        .await
    }
}

// Utils

#[derive(Debug, sqlx::FromRow)]
pub struct ModuleWithProgressRow {
    #[sqlx(flatten)]
    pub module: Module,
    pub total_lessons: i64,
    pub completed_lessons: i64,
}

impl ModuleWithProgressRow {
    pub async fn fetch_by_course(
        mm: &ModelManager,
        course_id: i32,
        user_id: i32,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                m.*,
                COUNT(l.id) AS total_lessons,
                COUNT(up.id) FILTER (WHERE up.completed) AS completed_lessons
            FROM modules m
            LEFT JOIN lessons l ON l.module_id = m.id
            LEFT JOIN user_progress up
                ON up.lesson_id = l.id AND up.user_id = $2
            WHERE m.course_id = $1
            GROUP BY m.id
            ORDER BY m.order_index, m.id
            "#,
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn create_validation() {
        let data: ModuleCreate =
            serde_json::from_str(r#"{"courseId": 2, "title": "Grundlagen", "isLocked": true}"#)
                .unwrap();
        assert!(data.validate().is_ok());
        assert_eq!(data.is_locked, Some(true));

        let data: ModuleCreate =
            serde_json::from_str(r#"{"courseId": -1, "title": "Grundlagen"}"#).unwrap();
        assert_eq!(data.validate().unwrap_err(), "Invalid course ID");
    }

    #[test]
    fn update_rejects_blank_title() {
        let update = ModuleUpdate {
            title: Some(String::from(" ")),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn serializes_camel_case() {
        let module = Module {
            id: 1,
            course_id: 5,
            title: String::from("Reisen"),
            description: String::new(),
            order: 0,
            is_locked: false,
        };
        let json = serde_json::to_value(&module).unwrap();
        assert_eq!(json["courseId"], 5);
        assert_eq!(json["isLocked"], false);
        assert_eq!(json["order"], 0);
    }
}
