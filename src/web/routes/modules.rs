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
        entity::{Module, ModuleCreate, ModuleFilter, ModuleUpdate, ModuleWithProgressRow},
    },
    web::{
        ApiResponse, AppState, RequestContext, WebError, WebJson, WebQuery, WebResult,
        dto::modules::ModuleWithProgress, error::ErrorResponse, middlewares, parse_id,
        parse_optional_id,
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ModuleQuery {
    /// Only modules of this course
    course_id: Option<String>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(modules_list_handler).post(modules_create_handler))
        .route(
            "/{id}",
            get(modules_get_handler)
                .put(modules_update_handler)
                .delete(modules_delete_handler),
        )
        .route("/course/{course_id}", get(modules_by_course_handler))
        .route(
            "/course/{course_id}/progress",
            get(modules_progress_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/modules",
    description = "List modules, optionally filtered by course",
    params(ModuleQuery),
    responses(
        (status = 200, description = "Modules in display order", body = ApiResponse<Vec<Module>>),
        (status = 400, description = "Invalid course ID", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules"
)]
pub async fn modules_list_handler(
    State(state): State<AppState>,
    WebQuery(query): WebQuery<ModuleQuery>,
) -> WebResult<impl IntoResponse> {
    let course_id = parse_optional_id(query.course_id.as_deref(), ResourceType::Course)?;
    let modules = Module::find_all(state.pool(), ModuleFilter { course_id })
        .await
        .map_err(|e| WebError::from_db(Module::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(modules))))
}

#[utoipa::path(
    get,
    path = "/api/modules/{id}",
    params(
        ("id" = i32, Path, description = "ID of the module to get")
    ),
    responses(
        (status = 200, description = "Module found", body = ApiResponse<Module>),
        (status = 400, description = "Invalid module ID", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules"
)]
pub async fn modules_get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Module::get_resource_type())?;
    let module = Module::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_db(Module::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(Module::get_resource_type(), id))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(module))))
}

#[utoipa::path(
    post,
    path = "/api/modules",
    request_body = ModuleCreate,
    responses(
        (status = 201, description = "Module created", body = ApiResponse<Module>),
        (status = 400, description = "Invalid payload or unknown course", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "modules"
)]
pub async fn modules_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    WebJson(payload): WebJson<ModuleCreate>,
) -> WebResult<impl IntoResponse> {
    let actor = ctx.admin(state.pool(), Module::get_resource_type()).await?;
    payload
        .validate()
        .map_err(|reason| WebError::resource_bad_request(Module::get_resource_type(), reason))?;

    let module = Module::create(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(Module::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(module))))
}

#[utoipa::path(
    put,
    path = "/api/modules/{id}",
    request_body = ModuleUpdate,
    params(
        ("id" = i32, Path, description = "ID of the module to update")
    ),
    responses(
        (status = 200, description = "Module updated", body = ApiResponse<Module>),
        (status = 400, description = "Invalid module ID or payload", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "modules"
)]
pub async fn modules_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WebJson(payload): WebJson<ModuleUpdate>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Module::get_resource_type())?;
    let actor = ctx.admin(state.pool(), Module::get_resource_type()).await?;
    payload
        .validate()
        .map_err(|reason| WebError::resource_bad_request(Module::get_resource_type(), reason))?;

    let found = Module::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_db(Module::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(Module::get_resource_type(), id))?;

    let updated = found
        .update(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::from_db(Module::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/modules/{id}",
    params(
        ("id" = i32, Path, description = "ID of the module to delete")
    ),
    responses(
        (status = 200, description = "Module deleted, the removed record is returned", body = ApiResponse<Module>),
        (status = 400, description = "Invalid module ID", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "modules"
)]
pub async fn modules_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, Module::get_resource_type())?;
    let actor = ctx.admin(state.pool(), Module::get_resource_type()).await?;

    let found = Module::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_db(Module::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(Module::get_resource_type(), id))?;

    let deleted = found
        .delete(state.pool(), &actor)
        .await
        .map_err(|e| WebError::from_db(Module::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_message(
            deleted,
            format!("Module with ID {id} successfully deleted"),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/modules/course/{course_id}",
    params(
        ("course_id" = i32, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Modules of the course", body = ApiResponse<Vec<Module>>),
        (status = 400, description = "Invalid course ID", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules"
)]
pub async fn modules_by_course_handler(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let course_id = parse_id(&course_id, ResourceType::Course)?;
    let modules = Module::all_by_course(state.pool(), course_id)
        .await
        .map_err(|e| WebError::from_db(Module::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(modules))))
}

#[utoipa::path(
    get,
    path = "/api/modules/course/{course_id}/progress",
    description = "Modules of a course with the caller's aggregate lesson progress",
    params(
        ("course_id" = i32, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Modules with progress", body = ApiResponse<Vec<ModuleWithProgress>>),
        (status = 400, description = "Invalid course ID or user not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "modules"
)]
pub async fn modules_progress_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let course_id = parse_id(&course_id, ResourceType::Course)?;
    let user = ctx.progress_user(state.pool()).await?;

    let modules: Vec<ModuleWithProgress> =
        ModuleWithProgressRow::fetch_by_course(state.pool(), course_id, user.user_id())
            .await
            .map_err(|e| WebError::from_db(ResourceType::UserProgress, e))?
            .into_iter()
            .map(ModuleWithProgress::from)
            .collect();

    Ok((StatusCode::OK, Json(ApiResponse::ok(modules))))
}
