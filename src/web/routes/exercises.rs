use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    model::{
        CrudRepository, ResourceType, ResourceTyped,
        entity::{Exercise, ExerciseCreate, ExerciseFilter, ExerciseOption, ExerciseUpdate},
    },
    web::{
        ApiResponse, AppState, RequestContext, WebError, WebJson, WebQuery, WebResult,
        dto::exercises::{CheckAnswerBody, CheckAnswerResponse, ExerciseWithItems},
        error::ErrorResponse,
        middlewares, parse_id, parse_optional_id,
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExerciseQuery {
    /// Only exercises of this lesson
    lesson_id: Option<String>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(exercises_list_handler).post(exercises_create_handler))
        .route(
            "/{id}",
            get(exercises_get_handler)
                .put(exercises_update_handler)
                .delete(exercises_delete_handler),
        )
        .route("/{id}/check", post(exercises_check_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

async fn find_exercise(state: &AppState, id: i32) -> WebResult<Exercise> {
    Exercise::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_db(Exercise::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(Exercise::get_resource_type(), id))
}

async fn options_of(state: &AppState, exercise_id: i32) -> WebResult<Vec<ExerciseOption>> {
    ExerciseOption::find_all_by_exercise(state.pool(), exercise_id)
        .await
        .map_err(|e| WebError::from_db(ExerciseOption::get_resource_type(), e))
}

#[utoipa::path(
    get,
    path = "/api/exercises",
    params(ExerciseQuery),
    responses(
        (status = 200, description = "Exercises in display order", body = ApiResponse<Vec<Exercise>>),
        (status = 400, description = "Invalid lesson ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "exercises"
)]
pub async fn exercises_list_handler(
    State(state): State<AppState>,
    WebQuery(query): WebQuery<ExerciseQuery>,
) -> WebResult<impl IntoResponse> {
    let lesson_id = parse_optional_id(query.lesson_id.as_deref(), ResourceType::Lesson)?;
    let exercises = Exercise::find_all(state.pool(), ExerciseFilter { lesson_id })
        .await
        .map_err(|e| WebError::from_db(Exercise::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(exercises))))
}

#[utoipa::path(
    get,
    path = "/api/exercises/{id}",
    description = "Fetch an exercise with the answer items a client renders",
    params(
        ("id" = i32, Path, description = "ID of the exercise")
    ),
    responses(
        (status = 200, description = "Exercise found", body = ApiResponse<ExerciseWithItems>),
        (status = 400, description = "Invalid exercise ID", body = ErrorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "exercises"
)]
pub async fn exercises_get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Exercise::get_resource_type())?;
    let (exercise, options) = tokio::try_join!(find_exercise(&state, id), options_of(&state, id))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(ExerciseWithItems::new(exercise, &options))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/exercises/{id}/check",
    request_body = CheckAnswerBody,
    description = "Check whether the chosen option answers the exercise",
    params(
        ("id" = i32, Path, description = "ID of the exercise")
    ),
    responses(
        (status = 200, description = "Answer evaluated", body = ApiResponse<CheckAnswerResponse>),
        (status = 400, description = "Invalid ID or option of another exercise", body = ErrorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "exercises"
)]
pub async fn exercises_check_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WebJson(payload): WebJson<CheckAnswerBody>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Exercise::get_resource_type())?;
    let (exercise, options) = tokio::try_join!(find_exercise(&state, id), options_of(&state, id))?;

    let result = CheckAnswerResponse::evaluate(&options, payload.option_id).ok_or_else(|| {
        WebError::resource_bad_request(
            ExerciseOption::get_resource_type(),
            format!(
                "Option {} does not belong to exercise {}",
                payload.option_id,
                exercise.id()
            ),
        )
    })?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(result))))
}

#[utoipa::path(
    post,
    path = "/api/exercises",
    request_body = ExerciseCreate,
    responses(
        (status = 201, description = "Exercise created", body = ApiResponse<Exercise>),
        (status = 400, description = "Invalid payload or unknown lesson", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "exercises"
)]
pub async fn exercises_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    WebJson(payload): WebJson<ExerciseCreate>,
) -> WebResult<impl IntoResponse> {
    let actor = ctx.admin(state.pool(), Exercise::get_resource_type()).await?;
    payload
        .validate()
        .map_err(|reason| WebError::resource_bad_request(Exercise::get_resource_type(), reason))?;

    let exercise = Exercise::create(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(Exercise::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(exercise))))
}

#[utoipa::path(
    put,
    path = "/api/exercises/{id}",
    request_body = ExerciseUpdate,
    params(
        ("id" = i32, Path, description = "ID of the exercise")
    ),
    responses(
        (status = 200, description = "Exercise updated", body = ApiResponse<Exercise>),
        (status = 400, description = "Invalid exercise ID or payload", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "exercises"
)]
pub async fn exercises_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WebJson(payload): WebJson<ExerciseUpdate>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Exercise::get_resource_type())?;
    let actor = ctx.admin(state.pool(), Exercise::get_resource_type()).await?;
    payload
        .validate()
        .map_err(|reason| WebError::resource_bad_request(Exercise::get_resource_type(), reason))?;

    let updated = find_exercise(&state, id)
        .await?
        .update(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(Exercise::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/exercises/{id}",
    params(
        ("id" = i32, Path, description = "ID of the exercise")
    ),
    responses(
        (status = 200, description = "Exercise deleted, the removed record is returned", body = ApiResponse<Exercise>),
        (status = 400, description = "Invalid exercise ID", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "exercises"
)]
pub async fn exercises_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Exercise::get_resource_type())?;
    let actor = ctx.admin(state.pool(), Exercise::get_resource_type()).await?;

    let deleted = find_exercise(&state, id)
        .await?
        .delete(state.pool(), &actor)
        .await
        .map_err(|e| WebError::from_db(Exercise::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_message(
            deleted,
            format!("Exercise with ID {id} successfully deleted"),
        )),
    ))
}
