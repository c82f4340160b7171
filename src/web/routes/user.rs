use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    auth::{self, UserClaims, hash_password, verify_password},
    model::{
        CrudRepository, DatabaseError, PaginatableRepository, ResourceType, ResourceTyped,
        check_access,
        entity::{ProgressSummary, UserEntity, UserEntityCreate, UserEntityUpdate, UserProgress},
    },
    ranking::{self, LeaderboardUser, Ranking},
    web::{
        ApiResponse, AppState, AuthenticatedUser, RequestContext, WebError, WebJson, WebQuery,
        WebResult,
        dto::users::{
            CompleteLessonBody, CompletionResponse, LoginBody, RegisterBody, UserUpdateBody,
        },
        error::ErrorResponse,
        middlewares::{self, auth_cookie, removal_cookie},
        parse_id,
        routes::PaginationQuery,
    },
};

pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 20;
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Number of users to rank, 20 by default and at most 100
    limit: Option<i64>,
    /// Client viewport width in pixels, decides how many rows are visible
    viewport_width: Option<u32>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/register", post(user_register_handler))
        .route("/login", post(user_login_handler))
        .route("/logout", post(user_logout_handler))
        .route("/me", get(user_me_handler))
        .route(
            "/progress",
            get(user_progress_handler).post(user_complete_lesson_handler),
        )
        .route("/leaderboard", get(user_leaderboard_handler))
        .route("/", get(user_list_handler))
        .route(
            "/{id}",
            put(user_update_handler).delete(user_delete_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

fn issue_token(state: &AppState, cookies: &Cookies, user: &UserEntity) -> WebResult<()> {
    let token = auth::generate_token(UserClaims::for_user(user.id()), state.config().app().jwt())
        .map_err(|e| WebError::server_crypt_error(e.into()))?;
    cookies.add(auth_cookie(token));
    Ok(())
}

fn access_error(e: DatabaseError) -> WebError {
    WebError::from_db(UserEntity::get_resource_type(), e)
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterBody,
    description = "Creates a new user and signs it in",
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserEntity>),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn user_register_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    WebJson(payload): WebJson<RegisterBody>,
) -> WebResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|reason| WebError::resource_bad_request(UserEntity::get_resource_type(), reason))?;

    let found = UserEntity::find_by_username(state.pool(), &payload.username)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    if found.is_some() {
        return Err(WebError::registration_conflict(payload.username));
    }

    let hash = hash_password(&payload.password).map_err(WebError::server_crypt_error)?;
    let data = UserEntityCreate {
        username: payload.username,
        password_hash: hash,
        first_name: payload.first_name,
        last_name: payload.last_name,
        role: None,
    };

    let created = UserEntity::create(state.pool(), &AuthenticatedUser::system(), data)
        .await
        .map_err(access_error)?;

    issue_token(&state, &cookies, &created)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    description = "Authorizes user in the system",
    request_body = LoginBody,
    responses(
        (status = 200, description = "User signed in", body = ApiResponse<UserEntity>),
        (status = 401, description = "Credentials invalid", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users",
)]
pub async fn user_login_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    WebJson(payload): WebJson<LoginBody>,
) -> WebResult<impl IntoResponse> {
    let found = UserEntity::find_by_username(state.pool(), &payload.username)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(WebError::auth_invalid_credentials)?;

    let is_verified =
        verify_password(found.hash(), &payload.password).map_err(WebError::server_crypt_error)?;

    if !is_verified {
        return Err(WebError::auth_invalid_credentials());
    }

    issue_token(&state, &cookies, &found)?;
    tracing::info!(user = found.id(), "user signed in");

    Ok((StatusCode::OK, Json(ApiResponse::ok(found))))
}

#[utoipa::path(
    post,
    path = "/api/users/logout",
    responses(
        (status = 200, description = "Auth cookie cleared"),
    ),
    tag = "users"
)]
pub async fn user_logout_handler(cookies: Cookies) -> impl IntoResponse {
    cookies.remove(removal_cookie());
    (StatusCode::OK, Json(ApiResponse::message("Logged out")))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserEntity>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "users"
)]
pub async fn user_me_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user(state.pool()).await?;
    let found = UserEntity::find_by_id(state.pool(), user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(|| {
            WebError::not_found_with_id(UserEntity::get_resource_type(), user.user_id())
        })?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(found))))
}

#[utoipa::path(
    get,
    path = "/api/users/progress",
    description = "Lesson completion and XP summary of the current user",
    responses(
        (status = 200, description = "Progress summary", body = ApiResponse<ProgressSummary>),
        (status = 400, description = "User not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "users"
)]
pub async fn user_progress_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.progress_user(state.pool()).await?;
    let summary = ProgressSummary::for_user(state.pool(), user.user_id())
        .await
        .map_err(|e| WebError::from_db(ResourceType::UserProgress, e))?
        .ok_or_else(|| {
            WebError::not_found_with_id(UserEntity::get_resource_type(), user.user_id())
        })?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(summary))))
}

#[utoipa::path(
    post,
    path = "/api/users/progress",
    request_body = CompleteLessonBody,
    description = "Marks a lesson as completed. XP is awarded on the first completion only",
    responses(
        (status = 200, description = "Lesson completed", body = ApiResponse<CompletionResponse>),
        (status = 400, description = "Invalid payload or user not authenticated", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "users"
)]
pub async fn user_complete_lesson_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    WebJson(payload): WebJson<CompleteLessonBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.progress_user(state.pool()).await?;
    payload.validate().map_err(|reason| {
        WebError::resource_bad_request(UserProgress::get_resource_type(), reason)
    })?;

    let outcome =
        UserProgress::complete_lesson(state.pool(), user.user_id(), payload.lesson_id, payload.score)
            .await
            .map_err(|e| WebError::from_db(UserProgress::get_resource_type(), e))?
            .ok_or_else(|| {
                WebError::not_found_with_id(ResourceType::Lesson, payload.lesson_id)
            })?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(CompletionResponse::from(outcome))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/leaderboard",
    params(LeaderboardQuery),
    description = "Users ranked by XP, shaped for the ranking page",
    responses(
        (status = 200, description = "Ranking", body = ApiResponse<Ranking>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn user_leaderboard_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    WebQuery(query): WebQuery<LeaderboardQuery>,
) -> WebResult<impl IntoResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    let users: Vec<LeaderboardUser> = UserEntity::leaderboard(state.pool(), limit)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .iter()
        .map(LeaderboardUser::from)
        .collect();

    let current = ctx.claimed_user_id();
    let ranking = ranking::build_ranking(&users, current, query.viewport_width);

    Ok((StatusCode::OK, Json(ApiResponse::ok(ranking))))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Returns requested page", body = ApiResponse<crate::model::Page<UserEntity>>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users",
    security(
        ("cookie" = [])
    )
)]
pub async fn user_list_handler(
    ctx: RequestContext,
    WebQuery(page): WebQuery<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    ctx.admin(state.pool(), UserEntity::get_resource_type())
        .await?;

    let users = UserEntity::page(state.pool(), page.limit(), page.offset())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(users))))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    request_body = UserUpdateBody,
    params(
        ("id" = i32, Path, description = "ID of the user to update")
    ),
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserEntity>),
        (status = 400, description = "Invalid user ID or payload", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "You don't have enough permissions to do this", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users",
    security(
        ("cookie" = [])
    )
)]
pub async fn user_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WebJson(payload): WebJson<UserUpdateBody>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, UserEntity::get_resource_type())?;
    let user = ctx.user(state.pool()).await?;
    payload
        .validate()
        .map_err(|reason| WebError::resource_bad_request(UserEntity::get_resource_type(), reason))?;

    let found = UserEntity::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(UserEntity::get_resource_type(), id))?;

    check_access(state.pool(), &user, &found, user.user_id())
        .await
        .map_err(access_error)?;

    let password_hash = payload
        .password
        .as_deref()
        .map(hash_password)
        .transpose()
        .map_err(WebError::server_crypt_error)?;

    let data = UserEntityUpdate {
        first_name: payload.first_name,
        last_name: payload.last_name,
        password_hash,
    };

    let updated = found
        .update(state.pool(), &user, data)
        .await
        .map_err(access_error)?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    description = "Deletes specified user",
    params(
        ("id" = i32, Path, description = "ID of the user to delete")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<UserEntity>),
        (status = 400, description = "Invalid user ID", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not allowed to do this", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users",
    security(
        ("cookie" = [])
    )
)]
pub async fn user_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let id = parse_id(&id, UserEntity::get_resource_type())?;
    let user = ctx.user(state.pool()).await?;

    let found = UserEntity::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::not_found_with_id(UserEntity::get_resource_type(), id))?;

    check_access(state.pool(), &user, &found, user.user_id())
        .await
        .map_err(access_error)?;

    let deleted = found
        .delete(state.pool(), &user)
        .await
        .map_err(access_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_message(
            deleted,
            format!("User with ID {id} successfully deleted"),
        )),
    ))
}
