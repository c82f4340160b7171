mod auth;
pub use auth::{AUTH_TOKEN, auth_cookie, extract_context_fn, removal_cookie};
