use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::{
    model::{
        CrudRepository, ResourceType, ResourceTyped,
        entity::{Vocabulary, VocabularyCreate, VocabularyFilter, VocabularyUpdate},
    },
    web::{
        ApiResponse, AppState, RequestContext, WebError, WebJson, WebQuery, WebResult,
        error::ErrorResponse, middlewares, parse_id, parse_optional_id,
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VocabularyQuery {
    /// Only words introduced by this lesson
    lesson_id: Option<String>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(vocabulary_list_handler).post(vocabulary_create_handler))
        .route(
            "/{id}",
            get(vocabulary_get_handler)
                .put(vocabulary_update_handler)
                .delete(vocabulary_delete_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

async fn find_entry(state: &AppState, id: i32) -> WebResult<Vocabulary> {
    Vocabulary::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_db(Vocabulary::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(Vocabulary::get_resource_type(), id))
}

#[utoipa::path(
    get,
    path = "/api/vocabulary",
    params(VocabularyQuery),
    responses(
        (status = 200, description = "Vocabulary entries", body = ApiResponse<Vec<Vocabulary>>),
        (status = 400, description = "Invalid lesson ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "vocabulary"
)]
pub async fn vocabulary_list_handler(
    State(state): State<AppState>,
    WebQuery(query): WebQuery<VocabularyQuery>,
) -> WebResult<impl IntoResponse> {
    let lesson_id = parse_optional_id(query.lesson_id.as_deref(), ResourceType::Lesson)?;
    let entries = Vocabulary::find_all(state.pool(), VocabularyFilter { lesson_id })
        .await
        .map_err(|e| WebError::from_db(Vocabulary::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(entries))))
}

#[utoipa::path(
    get,
    path = "/api/vocabulary/{id}",
    params(
        ("id" = i32, Path, description = "ID of the vocabulary entry")
    ),
    responses(
        (status = 200, description = "Entry found", body = ApiResponse<Vocabulary>),
        (status = 400, description = "Invalid vocabulary ID", body = ErrorResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "vocabulary"
)]
pub async fn vocabulary_get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Vocabulary::get_resource_type())?;
    let entry = find_entry(&state, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(entry))))
}

#[utoipa::path(
    post,
    path = "/api/vocabulary",
    request_body = VocabularyCreate,
    responses(
        (status = 201, description = "Entry created", body = ApiResponse<Vocabulary>),
        (status = 400, description = "Invalid payload or unknown lesson", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "vocabulary"
)]
pub async fn vocabulary_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    WebJson(payload): WebJson<VocabularyCreate>,
) -> WebResult<impl IntoResponse> {
    let actor = ctx.admin(state.pool(), Vocabulary::get_resource_type()).await?;
    payload.validate().map_err(|reason| {
        WebError::resource_bad_request(Vocabulary::get_resource_type(), reason)
    })?;

    let entry = Vocabulary::create(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(Vocabulary::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entry))))
}

#[utoipa::path(
    put,
    path = "/api/vocabulary/{id}",
    request_body = VocabularyUpdate,
    params(
        ("id" = i32, Path, description = "ID of the vocabulary entry")
    ),
    responses(
        (status = 200, description = "Entry updated", body = ApiResponse<Vocabulary>),
        (status = 400, description = "Invalid vocabulary ID or payload", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "vocabulary"
)]
pub async fn vocabulary_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WebJson(payload): WebJson<VocabularyUpdate>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Vocabulary::get_resource_type())?;
    let actor = ctx.admin(state.pool(), Vocabulary::get_resource_type()).await?;
    payload.validate().map_err(|reason| {
        WebError::resource_bad_request(Vocabulary::get_resource_type(), reason)
    })?;

    let updated = find_entry(&state, id)
        .await?
        .update(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(Vocabulary::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/vocabulary/{id}",
    params(
        ("id" = i32, Path, description = "ID of the vocabulary entry")
    ),
    responses(
        (status = 200, description = "Entry deleted, the removed record is returned", body = ApiResponse<Vocabulary>),
        (status = 400, description = "Invalid vocabulary ID", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "vocabulary"
)]
pub async fn vocabulary_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Vocabulary::get_resource_type())?;
    let actor = ctx.admin(state.pool(), Vocabulary::get_resource_type()).await?;

    let deleted = find_entry(&state, id)
        .await?
        .delete(state.pool(), &actor)
        .await
        .map_err(|e| WebError::from_db(Vocabulary::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_message(
            deleted,
            format!("Vocabulary with ID {id} successfully deleted"),
        )),
    ))
}
