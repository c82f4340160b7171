use serde::{Deserialize, Serialize};

use crate::model::entity::{Exercise, ExerciseOption};

/// One selectable answer of a multiple choice widget.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseItem {
    pub id: i32,
    pub text: String,
    pub image_src: Option<String>,
}

impl From<&ExerciseOption> for ExerciseItem {
    fn from(option: &ExerciseOption) -> Self {
        Self {
            id: option.id(),
            text: option.text().to_string(),
            image_src: option.image_src().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseWithItems {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub items: Vec<ExerciseItem>,
}

impl ExerciseWithItems {
    pub fn new(exercise: Exercise, options: &[ExerciseOption]) -> Self {
        Self {
            exercise,
            items: options.iter().map(ExerciseItem::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerBody {
    pub option_id: i32,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerResponse {
    pub is_correct: bool,
    pub correct_option_id: Option<i32>,
}

impl CheckAnswerResponse {
    /// `None` when `option_id` is not one of `options`.
    pub fn evaluate(options: &[ExerciseOption], option_id: i32) -> Option<Self> {
        let chosen = options.iter().find(|o| o.id() == option_id)?;
        Some(Self {
            is_correct: chosen.is_correct(),
            correct_option_id: options.iter().find(|o| o.is_correct()).map(|o| o.id()),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn options() -> Vec<ExerciseOption> {
        serde_json::from_value(serde_json::json!([
            {"id": 1, "exerciseId": 9, "text": "der Hund", "imageSrc": null, "isCorrect": false},
            {"id": 2, "exerciseId": 9, "text": "die Katze", "imageSrc": "/assets/cat.png", "isCorrect": true},
        ]))
        .unwrap()
    }

    #[test]
    fn check_answer() {
        let options = options();
        let right = CheckAnswerResponse::evaluate(&options, 2).unwrap();
        assert!(right.is_correct);
        assert_eq!(right.correct_option_id, Some(2));

        let wrong = CheckAnswerResponse::evaluate(&options, 1).unwrap();
        assert!(!wrong.is_correct);
        assert_eq!(wrong.correct_option_id, Some(2));

        assert!(CheckAnswerResponse::evaluate(&options, 77).is_none());
    }

    #[test]
    fn items_hide_correctness() {
        let options = options();
        let item = serde_json::to_value(ExerciseItem::from(&options[1])).unwrap();
        assert_eq!(item["imageSrc"], "/assets/cat.png");
        assert!(item.get("isCorrect").is_none());
    }
}
