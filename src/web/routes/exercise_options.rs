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
        entity::{ExerciseOption, ExerciseOptionCreate, ExerciseOptionFilter, ExerciseOptionUpdate},
    },
    web::{
        ApiResponse, AppState, RequestContext, WebError, WebJson, WebQuery, WebResult,
        error::ErrorResponse, middlewares, parse_id, parse_optional_id,
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExerciseOptionQuery {
    /// Only options of this exercise
    exercise_id: Option<String>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(options_list_handler).post(options_create_handler))
        .route(
            "/{id}",
            get(options_get_handler)
                .put(options_update_handler)
                .delete(options_delete_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

async fn find_option(state: &AppState, id: i32) -> WebResult<ExerciseOption> {
    ExerciseOption::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_db(ExerciseOption::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(ExerciseOption::get_resource_type(), id))
}

#[utoipa::path(
    get,
    path = "/api/exercise-options",
    params(ExerciseOptionQuery),
    responses(
        (status = 200, description = "Exercise options", body = ApiResponse<Vec<ExerciseOption>>),
        (status = 400, description = "Invalid exercise ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "exercise-options"
)]
pub async fn options_list_handler(
    State(state): State<AppState>,
    WebQuery(query): WebQuery<ExerciseOptionQuery>,
) -> WebResult<impl IntoResponse> {
    let exercise_id = parse_optional_id(query.exercise_id.as_deref(), ResourceType::Exercise)?;
    let options = ExerciseOption::find_all(state.pool(), ExerciseOptionFilter { exercise_id })
        .await
        .map_err(|e| WebError::from_db(ExerciseOption::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(options))))
}

#[utoipa::path(
    get,
    path = "/api/exercise-options/{id}",
    params(
        ("id" = i32, Path, description = "ID of the option")
    ),
    responses(
        (status = 200, description = "Option found", body = ApiResponse<ExerciseOption>),
        (status = 400, description = "Invalid exercise option ID", body = ErrorResponse),
        (status = 404, description = "Option not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "exercise-options"
)]
pub async fn options_get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, ExerciseOption::get_resource_type())?;
    let option = find_option(&state, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(option))))
}

#[utoipa::path(
    post,
    path = "/api/exercise-options",
    request_body = ExerciseOptionCreate,
    responses(
        (status = 201, description = "Option created", body = ApiResponse<ExerciseOption>),
        (status = 400, description = "Invalid payload or unknown exercise", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "exercise-options"
)]
pub async fn options_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    WebJson(payload): WebJson<ExerciseOptionCreate>,
) -> WebResult<impl IntoResponse> {
    let actor = ctx.admin(state.pool(), ExerciseOption::get_resource_type()).await?;
    payload.validate().map_err(|reason| {
        WebError::resource_bad_request(ExerciseOption::get_resource_type(), reason)
    })?;

    let option = ExerciseOption::create(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(ExerciseOption::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(option))))
}

#[utoipa::path(
    put,
    path = "/api/exercise-options/{id}",
    request_body = ExerciseOptionUpdate,
    params(
        ("id" = i32, Path, description = "ID of the option")
    ),
    responses(
        (status = 200, description = "Option updated", body = ApiResponse<ExerciseOption>),
        (status = 400, description = "Invalid exercise option ID or payload", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Option not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "exercise-options"
)]
pub async fn options_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WebJson(payload): WebJson<ExerciseOptionUpdate>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, ExerciseOption::get_resource_type())?;
    let actor = ctx.admin(state.pool(), ExerciseOption::get_resource_type()).await?;
    payload.validate().map_err(|reason| {
        WebError::resource_bad_request(ExerciseOption::get_resource_type(), reason)
    })?;

    let updated = find_option(&state, id)
        .await?
        .update(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(ExerciseOption::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/exercise-options/{id}",
    params(
        ("id" = i32, Path, description = "ID of the option")
    ),
    responses(
        (status = 200, description = "Option deleted, the removed record is returned", body = ApiResponse<ExerciseOption>),
        (status = 400, description = "Invalid exercise option ID", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Option not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "exercise-options"
)]
pub async fn options_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, ExerciseOption::get_resource_type())?;
    let actor = ctx.admin(state.pool(), ExerciseOption::get_resource_type()).await?;

    let deleted = find_option(&state, id)
        .await?
        .delete(state.pool(), &actor)
        .await
        .map_err(|e| WebError::from_db(ExerciseOption::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_message(
            deleted,
            format!("Exercise option with ID {id} successfully deleted"),
        )),
    ))
}
