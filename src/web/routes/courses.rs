use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};

use crate::{
    model::{
        CrudRepository, ResourceTyped,
        entity::{Course, CourseCreate, CourseUpdate, Module},
    },
    web::{
        ApiResponse, AppState, RequestContext, WebError, WebJson, WebResult, error::ErrorResponse,
        middlewares, parse_id,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(courses_list_handler).post(courses_create_handler))
        .route(
            "/{id}",
            get(courses_get_handler)
                .put(courses_update_handler)
                .delete(courses_delete_handler),
        )
        .route("/{id}/modules", get(courses_modules_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "All courses in display order", body = ApiResponse<Vec<Course>>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn courses_list_handler(State(state): State<AppState>) -> WebResult<impl IntoResponse> {
    let courses = Course::all(state.pool())
        .await
        .map_err(|e| WebError::from_db(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(courses))))
}

async fn find_course(state: &AppState, id: i32) -> WebResult<Course> {
    Course::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_db(Course::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(Course::get_resource_type(), id))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(
        ("id" = i32, Path, description = "ID of the course to get")
    ),
    responses(
        (status = 200, description = "Course found", body = ApiResponse<Course>),
        (status = 400, description = "Invalid course ID", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn courses_get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Course::get_resource_type())?;
    let course = find_course(&state, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(course))))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/modules",
    params(
        ("id" = i32, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Modules of the course", body = ApiResponse<Vec<Module>>),
        (status = 400, description = "Invalid course ID", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn courses_modules_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Course::get_resource_type())?;
    let course = find_course(&state, id).await?;
    let modules = Module::all_by_course(state.pool(), course.id())
        .await
        .map_err(|e| WebError::from_db(Module::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(modules))))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CourseCreate,
    responses(
        (status = 201, description = "Course created", body = ApiResponse<Course>),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "courses"
)]
pub async fn courses_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    WebJson(payload): WebJson<CourseCreate>,
) -> WebResult<impl IntoResponse> {
    let actor = ctx.admin(state.pool(), Course::get_resource_type()).await?;
    payload
        .validate()
        .map_err(|reason| WebError::resource_bad_request(Course::get_resource_type(), reason))?;

    let course = Course::create(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(Course::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(course))))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    request_body = CourseUpdate,
    params(
        ("id" = i32, Path, description = "ID of the course to update")
    ),
    responses(
        (status = 200, description = "Course updated", body = ApiResponse<Course>),
        (status = 400, description = "Invalid course ID or payload", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "courses"
)]
pub async fn courses_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WebJson(payload): WebJson<CourseUpdate>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Course::get_resource_type())?;
    let actor = ctx.admin(state.pool(), Course::get_resource_type()).await?;
    payload
        .validate()
        .map_err(|reason| WebError::resource_bad_request(Course::get_resource_type(), reason))?;

    let updated = find_course(&state, id)
        .await?
        .update(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(
        ("id" = i32, Path, description = "ID of the course to delete")
    ),
    responses(
        (status = 200, description = "Course deleted, the removed record is returned", body = ApiResponse<Course>),
        (status = 400, description = "Invalid course ID", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "courses"
)]
pub async fn courses_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Course::get_resource_type())?;
    let actor = ctx.admin(state.pool(), Course::get_resource_type()).await?;

    let deleted = find_course(&state, id)
        .await?
        .delete(state.pool(), &actor)
        .await
        .map_err(|e| WebError::from_db(Course::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_message(
            deleted,
            format!("Course with ID {id} successfully deleted"),
        )),
    ))
}
