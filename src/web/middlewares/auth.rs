use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tower_cookies::{Cookie, Cookies, cookie::SameSite};

use crate::{
    auth,
    web::{AppState, RequestContext},
};

pub static AUTH_TOKEN: &str = "SID";

/// Verifies the token from the `SID` cookie or a bearer header and records
/// the claimed user id. No query runs here, the user row is loaded by the
/// [`RequestContext`] guards. Requests without a valid token continue
/// anonymously.
pub async fn extract_context_fn(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Response {
    let token = cookies
        .get(AUTH_TOKEN)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| bearer_token(&req));

    let claimed_user_id = token.and_then(|token| {
        match auth::process_token(&token, state.config().app().jwt()) {
            Ok(data) => data.claims.user_id(),
            Err(e) => {
                tracing::debug!("rejected auth token: {e}");
                None
            }
        }
    });

    req.extensions_mut()
        .insert(RequestContext::new(claimed_user_id));

    next.run(req).await
}

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

pub fn auth_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_TOKEN, token);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(AUTH_TOKEN);
    cookie.set_path("/");
    cookie
}
