use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    id: i32,
    lesson_id: Option<i32>,
    word: String,
    translation: String,
    part_of_speech: Option<String>,
    example_sentence: Option<String>,
    image_src: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyCreate {
    pub lesson_id: Option<i32>,
    pub word: String,
    pub translation: String,
    pub part_of_speech: Option<String>,
    pub example_sentence: Option<String>,
    pub image_src: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyUpdate {
    pub lesson_id: Option<i32>,
    pub word: Option<String>,
    pub translation: Option<String>,
    pub part_of_speech: Option<String>,
    pub example_sentence: Option<String>,
    pub image_src: Option<String>,
}

impl VocabularyCreate {
    pub fn validate(&self) -> Result<(), String> {
        if self.lesson_id.is_some_and(|id| id <= 0) {
            return Err(String::from("Invalid lesson ID"));
        }
        if self.word.trim().is_empty() || self.translation.trim().is_empty() {
            return Err(String::from("word and translation must not be empty"));
        }
        Ok(())
    }
}

impl VocabularyUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if self.lesson_id.is_some_and(|id| id <= 0) {
            return Err(String::from("Invalid lesson ID"));
        }
        let blank = |s: &Option<String>| s.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&self.word) || blank(&self.translation) {
            return Err(String::from("word and translation must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct VocabularyFilter {
    pub lesson_id: Option<i32>,
}

impl ResourceTyped for Vocabulary {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Vocabulary
    }
}

impl Vocabulary {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn lesson_id(&self) -> Option<i32> {
        self.lesson_id
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }
}

#[async_trait]
impl CrudRepository<Vocabulary, VocabularyCreate, VocabularyUpdate, i32> for Vocabulary {
    async fn create(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: VocabularyCreate,
    ) -> DatabaseResult<Self> {
        let entry: Vocabulary = sqlx::query_as(
            r#"
            INSERT INTO vocabulary (lesson_id, word, translation, part_of_speech, example_sentence, image_src)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.lesson_id)
        .bind(data.word.trim())
        .bind(data.translation.trim())
        .bind(data.part_of_speech)
        .bind(data.example_sentence)
        .bind(data.image_src)
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), vocabulary = entry.id, "vocabulary created");
        Ok(entry)
    }

    async fn update(
        self,
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: VocabularyUpdate,
    ) -> DatabaseResult<Self> {
        let entry: Vocabulary = sqlx::query_as(
            r#"
            UPDATE vocabulary SET
                lesson_id = COALESCE($1, lesson_id),
                word = COALESCE($2, word),
                translation = COALESCE($3, translation),
                part_of_speech = COALESCE($4, part_of_speech),
                example_sentence = COALESCE($5, example_sentence),
                image_src = COALESCE($6, image_src)
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(data.lesson_id)
        .bind(data.word.as_deref().map(str::trim))
        .bind(data.translation.as_deref().map(str::trim))
        .bind(data.part_of_speech)
        .bind(data.example_sentence)
        .bind(data.image_src)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(actor = actor.user_id(), vocabulary = entry.id, "vocabulary updated");
        Ok(entry)
    }

    async fn delete(self, mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<Self> {
        sqlx::query("DELETE FROM vocabulary WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        tracing::info!(actor = actor.user_id(), vocabulary = self.id, "vocabulary deleted");
        Ok(self)
    }

    async fn find_by_id(mm: &ModelManager, id: i32) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM vocabulary WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM vocabulary ORDER BY id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vocabulary")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl Vocabulary {
    pub async fn find_all(
        mm: &ModelManager,
        filter: VocabularyFilter,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT * FROM vocabulary
            WHERE ($1::INTEGER IS NULL OR lesson_id = $1)
            ORDER BY id
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
    fn create_requires_word_and_translation() {
        let data: VocabularyCreate =
            serde_json::from_str(r#"{"word": "der Hund", "translation": "the dog"}"#).unwrap();
        assert!(data.validate().is_ok());

        let data: VocabularyCreate =
            serde_json::from_str(r#"{"word": "", "translation": "the dog"}"#).unwrap();
        assert!(data.validate().is_err());
    }

    #[test]
    fn update_rejects_bad_lesson() {
        let update = VocabularyUpdate {
            lesson_id: Some(0),
            ..Default::default()
        };
        assert_eq!(update.validate().unwrap_err(), "Invalid lesson ID");
    }
}
