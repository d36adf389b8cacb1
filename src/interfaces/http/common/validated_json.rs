//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` works like `axum::Json<T>`, but additionally runs
//! `validator::Validate::validate()` on the deserialized value.
//! Malformed JSON is a 400; a body that parses but fails validation is a
//! 422 listing every offending field.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    JsonError(JsonRejection),
    ValidationError(validator::ValidationErrors),
}

/// `field: message` for every field error, sorted by field name
fn describe(errors: &validator::ValidationErrors) -> String {
    let mut lines: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    lines.sort();

    if lines.is_empty() {
        "Validation failed".to_string()
    } else {
        lines.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection))
                    .with_code("invalid_json");
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::ValidationError(errors) => {
                let body = ApiResponse::<()>::error(describe(&errors)).with_code("validation");
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct RenterBody {
        #[validate(length(min = 1, max = 64, message = "renter_id must be 1-64 chars"))]
        renter_id: String,
        #[validate(range(min = 1, max = 30))]
        days: u32,
    }

    async fn handler(ValidatedJson(body): ValidatedJson<RenterBody>) -> String {
        format!("{}:{}", body.renter_id, body.days)
    }

    async fn send(body: Body) -> StatusCode {
        let app = Router::new().route("/test", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/test")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        app.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let body = serde_json::json!({"renter_id": "u1", "days": 3});
        assert_eq!(send(Body::from(body.to_string())).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        assert_eq!(send(Body::from("not json")).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn failed_validation_is_422() {
        let body = serde_json::json!({"renter_id": "", "days": 0});
        assert_eq!(
            send(Body::from(body.to_string())).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn describe_lists_fields() {
        let errors = RenterBody {
            renter_id: String::new(),
            days: 40,
        }
        .validate()
        .unwrap_err();
        let text = describe(&errors);
        assert!(text.starts_with("days: "));
        assert!(text.contains("renter_id: renter_id must be 1-64 chars"));
    }
}
