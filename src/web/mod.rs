mod context;
pub use context::{AuthenticatedUser, RequestContext, UserRole};

mod error;
pub use error::{ErrorResponse, WebError, WebResult};

mod envelope;
pub use envelope::ApiResponse;

mod extract;
pub use extract::{WebJson, WebQuery, parse_id, parse_optional_id};

pub mod dto;

pub mod middlewares;

mod state;
pub use state::AppState;

pub mod routes;

pub mod doc;
