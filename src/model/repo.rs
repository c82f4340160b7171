use serde::{Deserialize, Serialize};

use crate::{
    model::{ModelManager, error::DatabaseResult},
    web::AuthenticatedUser,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Course,
    Module,
    Lesson,
    Vocabulary,
    Exercise,
    ExerciseOption,
    User,
    UserProgress,
}

impl ResourceType {
    /// Human readable name used in client-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Course => "Course",
            Self::Module => "Module",
            Self::Lesson => "Lesson",
            Self::Vocabulary => "Vocabulary",
            Self::Exercise => "Exercise",
            Self::ExerciseOption => "Exercise option",
            Self::User => "User",
            Self::UserProgress => "Progress",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

/// Persistence operations shared by every entity. `C` is the create payload,
/// `U` the partial update payload and `V` the primary key.
#[async_trait::async_trait]
pub trait CrudRepository<T, C, U, V>
where
    T: ResourceTyped,
    V: Clone + Copy,
{
    async fn create(mm: &ModelManager, actor: &AuthenticatedUser, data: C) -> DatabaseResult<T>;

    async fn update(
        self,
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: U,
    ) -> DatabaseResult<T>
    where
        Self: Sized;

    /// Removes the row and hands it back to the caller.
    async fn delete(self, mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<T>
    where
        Self: Sized;

    async fn find_by_id(mm: &ModelManager, id: V) -> DatabaseResult<Option<T>>;

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<T>>;

    async fn count(mm: &ModelManager) -> DatabaseResult<i64>;
}

#[async_trait::async_trait]
pub trait PaginatableRepository<T, C, U, V>
where
    T: ResourceTyped + CrudRepository<T, C, U, V>,
    V: Clone + Copy,
{
    async fn page(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Page<T>>;
}

#[macro_export]
macro_rules! impl_paginatable_for {
    ($ent:ident, $ent_create:ident, $ent_update:ident, $ent_id:ty) => {
        #[async_trait::async_trait]
        impl $crate::model::PaginatableRepository<$ent, $ent_create, $ent_update, $ent_id>
            for $ent
        {
            async fn page(
                mm: &$crate::model::ModelManager,
                limit: i64,
                offset: i64,
            ) -> $crate::model::DatabaseResult<$crate::model::Page<$ent>> {
                let (items, count) = tokio::try_join!(
                    <$ent as $crate::model::CrudRepository<$ent, $ent_create, $ent_update, $ent_id>>::list(mm, limit, offset),
                    <$ent as $crate::model::CrudRepository<$ent, $ent_create, $ent_update, $ent_id>>::count(mm),
                )?;
                Ok($crate::model::Page::new(items, count, limit, offset))
            }
        }
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resource_names_are_human_readable() {
        assert_eq!(ResourceType::Lesson.to_string(), "Lesson");
        assert_eq!(ResourceType::ExerciseOption.to_string(), "Exercise option");
    }

    #[test]
    fn page_serializes_flat() {
        let page = Page::new(vec![1, 2], 7, 2, 4);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["total"], 7);
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
    }
}
