//! Extractors that report malformed input through [`WebError`].

use axum::extract::{FromRequest, FromRequestParts};

use crate::model::ResourceType;
use crate::web::{WebError, WebResult};

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(WebError))]
pub struct WebJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(WebError))]
pub struct WebQuery<T>(pub T);

/// Parses a path or query identifier. Anything that is not a positive
/// integer is rejected with `Invalid <resource> ID`.
pub fn parse_id(raw: &str, resource_type: ResourceType) -> WebResult<i32> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(WebError::resource_bad_request(
            resource_type,
            invalid_id_message(resource_type),
        )),
    }
}

pub fn parse_optional_id(
    raw: Option<&str>,
    resource_type: ResourceType,
) -> WebResult<Option<i32>> {
    raw.map(|raw| parse_id(raw, resource_type)).transpose()
}

pub fn invalid_id_message(resource_type: ResourceType) -> String {
    format!("Invalid {} ID", resource_type.display_name().to_lowercase())
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn accepts_positive_integers() {
        assert_eq!(parse_id("7", ResourceType::Lesson).unwrap(), 7);
        assert_eq!(parse_id(" 12 ", ResourceType::Module).unwrap(), 12);
    }

    #[test]
    fn rejects_everything_else() {
        for raw in ["abc", "", "0", "-3", "1.5", "99999999999"] {
            let err = parse_id(raw, ResourceType::Lesson).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.client_display(), "Invalid lesson ID");
        }
    }

    #[test]
    fn optional_ids() {
        assert_eq!(parse_optional_id(None, ResourceType::Course).unwrap(), None);
        assert_eq!(
            parse_optional_id(Some("5"), ResourceType::Course).unwrap(),
            Some(5)
        );
        assert_eq!(
            parse_optional_id(Some("x"), ResourceType::ExerciseOption)
                .unwrap_err()
                .client_display(),
            "Invalid exercise option ID"
        );
    }
}
