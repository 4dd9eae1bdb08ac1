use axum::extract::{FromRequest, Request};
use axum::response::Response;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use hotcoffee_infra::services::{ServiceError, DEFAULT_POPULAR_LIMIT};

use crate::app::errors;

/// JSON request body. Any rejection (bad syntax, wrong shape, missing
/// content type) becomes a 400 `validation_error` envelope.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(errors::service_error_to_response(ServiceError::Validation(
                rejection.body_text(),
            ))),
        }
    }
}

/// Create payloads accept either a single object or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Query parameters for `GET /reports/popular-items`.
#[derive(Debug, Default, Deserialize)]
pub struct PopularItemsQuery {
    pub limit: Option<usize>,
}

impl PopularItemsQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_POPULAR_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_or_many_accepts_object_and_array() {
        let one: OneOrMany<serde_json::Value> = serde_json::from_str(r#"{"a": 1}"#).unwrap();
        assert!(matches!(one, OneOrMany::One(_)));

        let many: OneOrMany<serde_json::Value> = serde_json::from_str(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        assert!(matches!(many, OneOrMany::Many(v) if v.len() == 2));
    }

    #[test]
    fn popular_limit_defaults_to_five() {
        assert_eq!(PopularItemsQuery::default().limit(), 5);
        assert_eq!(PopularItemsQuery { limit: Some(2) }.limit(), 2);
    }
}
