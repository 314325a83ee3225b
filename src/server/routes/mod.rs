mod health;
mod questions;
mod users;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub use health::health_router;
pub use questions::questions_router;
pub use users::users_router;

use super::error::{ApiError, Resource};

pub type ApiResponse<T> = Result<T, ApiError>;

const MALFORMED_BODY: &str = "O corpo da requisição deve ser um objeto JSON válido.";

/// JSON request body. A missing body, an empty body or a request without a
/// JSON content type reads as `T::default()`, i.e. an empty object.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Ok(Self(T::default()));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::warn!("Failed to read request body: {e}");
            ApiError::InvalidData(MALFORMED_BODY.to_owned())
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        serde_json::from_slice(&bytes).map(Self).map_err(|e| {
            tracing::debug!("Rejected request body: {e}");
            ApiError::InvalidData(MALFORMED_BODY.to_owned())
        })
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json")
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

// an id that is not an integer cannot match any row
fn parse_id(raw: &str, resource: Resource) -> Result<i32, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound(resource))
}

fn message(status: StatusCode, mensagem: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "mensagem": mensagem })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct NamePayload {
        #[serde(default)]
        nome: Option<String>,
    }

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<NamePayload, ApiError> {
        let mut builder = axum::http::Request::builder().method("PUT").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();
        JsonBody::<NamePayload>::from_request(request, &())
            .await
            .map(|JsonBody(body)| body)
    }

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42", Resource::User).unwrap(), 42);
        assert!(matches!(
            parse_id("abc", Resource::User),
            Err(ApiError::NotFound(Resource::User))
        ));
        assert!(matches!(
            parse_id("99999999999", Resource::Question),
            Err(ApiError::NotFound(Resource::Question))
        ));
    }

    #[test]
    fn json_content_types_are_recognised() {
        let mut headers = HeaderMap::new();
        assert!(!has_json_content_type(&headers));
        for (value, expected) in [
            ("application/json", true),
            ("Application/JSON; charset=utf-8", true),
            ("application/merge-patch+json", true),
            ("text/plain", false),
        ] {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
            assert_eq!(has_json_content_type(&headers), expected, "{value}");
        }
    }

    #[tokio::test]
    async fn absent_or_empty_body_reads_as_empty_object() {
        assert_eq!(extract(None, "").await.unwrap(), NamePayload::default());
        assert_eq!(extract(None, r#"{"nome": "Ana"}"#).await.unwrap(), NamePayload::default());
        assert_eq!(extract(Some("application/json"), "").await.unwrap(), NamePayload::default());
        assert_eq!(extract(Some("application/json"), " \n").await.unwrap(), NamePayload::default());
    }

    #[tokio::test]
    async fn json_body_is_parsed() {
        let body = extract(Some("application/json"), r#"{"nome": "Ana"}"#).await.unwrap();
        assert_eq!(body.nome.as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn malformed_body_gets_fixed_message() {
        for body in [r#"{"nome": "#, r#"{"nome": 5}"#, "[]"] {
            match extract(Some("application/json"), body).await {
                Err(ApiError::InvalidData(message)) => assert_eq!(message, MALFORMED_BODY),
                other => panic!("expected invalid data for {body}, got {other:?}"),
            }
        }
    }
}
