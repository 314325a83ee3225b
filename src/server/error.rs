use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub const INVALID_DATA: &str = "Dados inválidos";
const INTERNAL_ERROR: &str = "Erro interno do servidor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Question,
    User,
}

impl Resource {
    pub fn not_found_message(self) -> &'static str {
        match self {
            Resource::Question => "Questão não encontrada",
            Resource::User => "Usuário não encontrado",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("{0:?} not found")]
    NotFound(Resource),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::InvalidData(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "erro": INVALID_DATA, "mensagem": message }),
            ),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                json!({ "mensagem": resource.not_found_message() }),
            ),
            ApiError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "erro": INTERNAL_ERROR }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
