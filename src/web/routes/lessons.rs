use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::model::entity::{Lesson, LessonCreate, LessonFilter, LessonUpdate, LessonWithProgressRow};
use crate::model::{CrudRepository, ResourceType, ResourceTyped};
use crate::web::dto::lessons::LessonWithProgress;
use crate::web::error::ErrorResponse;
use crate::web::{
    ApiResponse, AppState, RequestContext, WebError, WebJson, WebQuery, WebResult, middlewares,
    parse_id, parse_optional_id,
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LessonQuery {
    /// Only lessons of this module
    module_id: Option<String>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(lessons_list_handler).post(lessons_create_handler))
        .route(
            "/{id}",
            get(lessons_get_handler)
                .put(lessons_update_handler)
                .delete(lessons_delete_handler),
        )
        .route("/module/{module_id}", get(lessons_by_module_handler))
        .route(
            "/module/{module_id}/progress",
            get(lessons_progress_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/lesson",
    description = "List lessons, optionally filtered by module",
    params(LessonQuery),
    responses(
        (status = 200, description = "Lessons in display order", body = ApiResponse<Vec<Lesson>>),
        (status = 400, description = "Invalid module ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
pub async fn lessons_list_handler(
    State(state): State<AppState>,
    WebQuery(query): WebQuery<LessonQuery>,
) -> WebResult<impl IntoResponse> {
    let module_id = parse_optional_id(query.module_id.as_deref(), ResourceType::Module)?;
    let lessons = Lesson::find_all(state.pool(), LessonFilter { module_id })
        .await
        .map_err(|e| WebError::from_db(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(lessons))))
}

#[utoipa::path(
    get,
    path = "/api/lesson/{id}",
    description = "Fetch a single lesson",
    params(
        ("id" = i32, Path, description = "ID of the lesson to get")
    ),
    responses(
        (status = 200, description = "Lesson found", body = ApiResponse<Lesson>),
        (status = 400, description = "Invalid lesson ID", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
pub async fn lessons_get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Lesson::get_resource_type())?;
    let lesson = Lesson::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_db(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(Lesson::get_resource_type(), id))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(lesson))))
}

#[utoipa::path(
    post,
    path = "/api/lesson",
    request_body = LessonCreate,
    description = "Create a lesson inside an existing module",
    responses(
        (status = 201, description = "Lesson created", body = ApiResponse<Lesson>),
        (status = 400, description = "Invalid payload or unknown module", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub async fn lessons_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    WebJson(payload): WebJson<LessonCreate>,
) -> WebResult<impl IntoResponse> {
    let actor = ctx.admin(state.pool(), Lesson::get_resource_type()).await?;
    payload
        .validate()
        .map_err(|reason| WebError::resource_bad_request(Lesson::get_resource_type(), reason))?;

    let lesson = Lesson::create(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(lesson))))
}

#[utoipa::path(
    put,
    path = "/api/lesson/{id}",
    request_body = LessonUpdate,
    description = "Partially update a lesson",
    params(
        ("id" = i32, Path, description = "ID of the lesson to update")
    ),
    responses(
        (status = 200, description = "Lesson updated", body = ApiResponse<Lesson>),
        (status = 400, description = "Invalid lesson ID or payload", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub async fn lessons_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WebJson(payload): WebJson<LessonUpdate>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Lesson::get_resource_type())?;
    let actor = ctx.admin(state.pool(), Lesson::get_resource_type()).await?;
    payload
        .validate()
        .map_err(|reason| WebError::resource_bad_request(Lesson::get_resource_type(), reason))?;

    let found = Lesson::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_db(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(Lesson::get_resource_type(), id))?;

    let updated = found
        .update(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/lesson/{id}",
    description = "Delete a lesson together with its exercises and progress",
    params(
        ("id" = i32, Path, description = "ID of the lesson to delete")
    ),
    responses(
        (status = 200, description = "Lesson deleted, the removed record is returned", body = ApiResponse<Lesson>),
        (status = 400, description = "Invalid lesson ID", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub async fn lessons_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Lesson::get_resource_type())?;
    let actor = ctx.admin(state.pool(), Lesson::get_resource_type()).await?;

    let found = Lesson::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_db(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(Lesson::get_resource_type(), id))?;

    let deleted = found
        .delete(state.pool(), &actor)
        .await
        .map_err(|e| WebError::from_db(Lesson::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_message(
            deleted,
            format!("Lesson with ID {id} successfully deleted"),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/lesson/module/{module_id}",
    description = "Lessons of a module in display order",
    params(
        ("module_id" = i32, Path, description = "ID of the module")
    ),
    responses(
        (status = 200, description = "Lessons of the module", body = ApiResponse<Vec<Lesson>>),
        (status = 400, description = "Invalid module ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
pub async fn lessons_by_module_handler(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let module_id = parse_id(&module_id, ResourceType::Module)?;
    let lessons = Lesson::all_by_module(state.pool(), module_id)
        .await
        .map_err(|e| WebError::from_db(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(lessons))))
}

#[utoipa::path(
    get,
    path = "/api/lesson/module/{module_id}/progress",
    description = "Lessons of a module with the caller's completion state and unlock flags",
    params(
        ("module_id" = i32, Path, description = "ID of the module")
    ),
    responses(
        (status = 200, description = "Lessons with progress", body = ApiResponse<Vec<LessonWithProgress>>),
        (status = 400, description = "Invalid module ID or user not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub async fn lessons_progress_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let module_id = parse_id(&module_id, ResourceType::Module)?;
    let user = ctx.progress_user(state.pool()).await?;

    let rows = LessonWithProgressRow::fetch_by_module(state.pool(), module_id, user.user_id())
        .await
        .map_err(|e| WebError::from_db(ResourceType::UserProgress, e))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(LessonWithProgress::from_rows(rows))),
    ))
}
