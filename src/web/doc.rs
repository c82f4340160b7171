use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::web::middlewares::AUTH_TOKEN;

pub struct AuthModifier;

impl Modify for AuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    AUTH_TOKEN,
                    "JWT token for current user",
                ))),
            );
            schema.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "GermanGains API"),
    paths(
        crate::web::routes::health::info_handler,
        crate::web::routes::health::health_handler,
        crate::web::routes::health::test_db_handler,
        crate::web::routes::user::user_register_handler,
        crate::web::routes::user::user_login_handler,
        crate::web::routes::user::user_logout_handler,
        crate::web::routes::user::user_me_handler,
        crate::web::routes::user::user_progress_handler,
        crate::web::routes::user::user_complete_lesson_handler,
        crate::web::routes::user::user_leaderboard_handler,
        crate::web::routes::user::user_list_handler,
        crate::web::routes::user::user_update_handler,
        crate::web::routes::user::user_delete_handler,
        crate::web::routes::courses::courses_list_handler,
        crate::web::routes::courses::courses_get_handler,
        crate::web::routes::courses::courses_modules_handler,
        crate::web::routes::courses::courses_create_handler,
        crate::web::routes::courses::courses_update_handler,
        crate::web::routes::courses::courses_delete_handler,
        crate::web::routes::modules::modules_list_handler,
        crate::web::routes::modules::modules_get_handler,
        crate::web::routes::modules::modules_create_handler,
        crate::web::routes::modules::modules_update_handler,
        crate::web::routes::modules::modules_delete_handler,
        crate::web::routes::modules::modules_by_course_handler,
        crate::web::routes::modules::modules_progress_handler,
        crate::web::routes::lessons::lessons_list_handler,
        crate::web::routes::lessons::lessons_get_handler,
        crate::web::routes::lessons::lessons_create_handler,
        crate::web::routes::lessons::lessons_update_handler,
        crate::web::routes::lessons::lessons_delete_handler,
        crate::web::routes::lessons::lessons_by_module_handler,
        crate::web::routes::lessons::lessons_progress_handler,
        crate::web::routes::vocabulary::vocabulary_list_handler,
        crate::web::routes::vocabulary::vocabulary_get_handler,
        crate::web::routes::vocabulary::vocabulary_create_handler,
        crate::web::routes::vocabulary::vocabulary_update_handler,
        crate::web::routes::vocabulary::vocabulary_delete_handler,
        crate::web::routes::exercises::exercises_list_handler,
        crate::web::routes::exercises::exercises_get_handler,
        crate::web::routes::exercises::exercises_check_handler,
        crate::web::routes::exercises::exercises_create_handler,
        crate::web::routes::exercises::exercises_update_handler,
        crate::web::routes::exercises::exercises_delete_handler,
        crate::web::routes::exercise_options::options_list_handler,
        crate::web::routes::exercise_options::options_get_handler,
        crate::web::routes::exercise_options::options_create_handler,
        crate::web::routes::exercise_options::options_update_handler,
        crate::web::routes::exercise_options::options_delete_handler,
    ),
    modifiers(&AuthModifier),
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/lesson/{id}",
            "/api/modules/course/{course_id}/progress",
            "/api/exercises/{id}/check",
            "/api/users/leaderboard",
            "/test-db",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn option_correctness_is_write_only() {
        use crate::model::entity::ExerciseOption;
        use utoipa::PartialSchema;

        let schema = serde_json::to_value(ExerciseOption::schema()).unwrap();
        assert_eq!(schema["properties"]["isCorrect"]["writeOnly"], true);
        assert!(schema["properties"]["text"].get("writeOnly").is_none());
    }
}
