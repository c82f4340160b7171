use serde::{Deserialize, Serialize};

use crate::model::entity::{CompletionOutcome, UserProgress};

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub const MIN_PASSWORD_LEN: usize = 6;

impl RegisterBody {
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err(String::from("username must not be empty"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters long"
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl UserUpdateBody {
    pub fn validate(&self) -> Result<(), String> {
        if self
            .password
            .as_ref()
            .is_some_and(|p| p.chars().count() < MIN_PASSWORD_LEN)
        {
            return Err(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters long"
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonBody {
    pub lesson_id: i32,
    pub score: Option<i32>,
}

impl CompleteLessonBody {
    pub fn validate(&self) -> Result<(), String> {
        if self.lesson_id <= 0 {
            return Err(String::from("Invalid lesson ID"));
        }
        if self.score.is_some_and(|s| s < 0) {
            return Err(String::from("score must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub progress: UserProgress,
    pub xp_awarded: i32,
    pub xp: i32,
    pub level: i32,
}

impl From<CompletionOutcome> for CompletionResponse {
    fn from(outcome: CompletionOutcome) -> Self {
        Self {
            progress: outcome.progress,
            xp_awarded: outcome.xp_awarded,
            xp: outcome.xp,
            level: outcome.level,
        }
    }
}
