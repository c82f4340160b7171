use crate::{
    Config,
    web::{AppState, doc::ApiDoc},
};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use serde::Deserialize;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod courses;
pub mod exercise_options;
pub mod exercises;
pub mod health;
pub mod lessons;
pub mod modules;
pub mod user;
pub mod vocabulary;

/// Second origin allowed next to the configured frontend.
pub const DEV_ORIGIN: &str = "http://localhost:4242";

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl PaginationQuery {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

pub fn build_app<S: Send + Sync + Clone + 'static>(state: AppState) -> Router<S> {
    let config = state.config();
    let mut router = Router::new()
        .merge(health::routes(state.clone()))
        .nest("/api/users", user::routes(state.clone()))
        .nest("/api/courses", courses::routes(state.clone()))
        .nest("/api/modules", modules::routes(state.clone()))
        .nest("/api/lesson", lessons::routes(state.clone()))
        .nest("/api/vocabulary", vocabulary::routes(state.clone()))
        .nest("/api/exercises", exercises::routes(state.clone()))
        .nest("/api/exercise-options", exercise_options::routes(state.clone()))
        .nest_service("/assets", ServeDir::new(config.app().assets_dir()));

    if config.app().docs() {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi));
    }

    router
        .layer(CookieManagerLayer::new())
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = [config.app().frontend_url(), DEV_ORIGIN]
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("ignoring invalid CORS origin `{origin}`: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pagination_defaults_and_bounds() {
        let page: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!((page.limit(), page.offset()), (DEFAULT_PAGE_LIMIT, 0));

        let page: PaginationQuery =
            serde_json::from_str(r#"{"limit": 1000, "offset": -4}"#).unwrap();
        assert_eq!((page.limit(), page.offset()), (MAX_PAGE_LIMIT, 0));
    }
}
