use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    configuration::CompatSettings,
    db::queries::questions::{self, NewQuestion, QuestionChanges},
    db::Question,
    server::{
        app::AppState,
        deserializers::deserialize_non_empty_string,
        error::{ApiError, Resource},
    },
};

use super::{message, parse_id, ApiResponse, JsonBody};

const REQUIRED_FIELDS: &str =
    "Todos os campos (enunciado, disciplina, tema, nivel) são obrigatórios.";

#[derive(Debug, Default, Deserialize)]
struct QuestionPayload {
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    enunciado: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    disciplina: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    tema: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    nivel: Option<String>,
}

impl TryFrom<QuestionPayload> for NewQuestion {
    type Error = ApiError;

    fn try_from(payload: QuestionPayload) -> Result<Self, Self::Error> {
        match payload {
            QuestionPayload {
                enunciado: Some(enunciado),
                disciplina: Some(disciplina),
                tema: Some(tema),
                nivel: Some(nivel),
            } => Ok(NewQuestion {
                enunciado,
                disciplina,
                tema,
                nivel,
            }),
            _ => Err(ApiError::InvalidData(REQUIRED_FIELDS.to_owned())),
        }
    }
}

impl From<QuestionPayload> for QuestionChanges {
    fn from(payload: QuestionPayload) -> Self {
        QuestionChanges {
            enunciado: payload.enunciado,
            disciplina: payload.disciplina,
            tema: payload.tema,
            nivel: payload.nivel,
        }
    }
}

async fn get_questions(State(pool): State<PgPool>) -> ApiResponse<Json<Vec<Question>>> {
    tracing::info!("GET /questoes requested");
    Ok(Json(questions::get_all_questions(&pool).await?))
}

async fn question(
    State(pool): State<PgPool>,
    State(compat): State<CompatSettings>,
    Path(id): Path<String>,
) -> ApiResponse<Response> {
    tracing::info!(id = %id, "GET /questoes/{{id}} requested");
    let id = parse_id(&id, Resource::Question)?;
    let question = questions::get_question(&pool, id)
        .await?
        .ok_or(ApiError::NotFound(Resource::Question))?;

    if compat.wrap_single_question {
        Ok(Json(vec![question]).into_response())
    } else {
        Ok(Json(question).into_response())
    }
}

async fn create_question(
    State(pool): State<PgPool>,
    JsonBody(payload): JsonBody<QuestionPayload>,
) -> ApiResponse<impl IntoResponse> {
    tracing::info!("POST /questoes requested");
    let new_question = NewQuestion::try_from(payload)?;
    let id = questions::create_question(&pool, &new_question).await?;
    tracing::info!(id, "Question created");
    Ok(message(StatusCode::CREATED, "Questão criada com sucesso!"))
}

async fn update_question(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<QuestionPayload>,
) -> ApiResponse<impl IntoResponse> {
    tracing::info!(id = %id, "PUT /questoes/{{id}} requested");
    let id = parse_id(&id, Resource::Question)?;
    if !questions::update_question(&pool, id, &payload.into()).await? {
        return Err(ApiError::NotFound(Resource::Question));
    }
    Ok(message(StatusCode::OK, "Questão atualizada com sucesso!"))
}

async fn delete_question(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> ApiResponse<impl IntoResponse> {
    tracing::info!(id = %id, "DELETE /questoes/{{id}} requested");
    let id = parse_id(&id, Resource::Question)?;
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::NotFound(Resource::Question));
    }
    Ok(message(StatusCode::OK, "Questão excluída com sucesso!"))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questoes", get(get_questions).post(create_question))
        .route(
            "/questoes/{id}",
            get(question).put(update_question).delete(delete_question),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> QuestionPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn complete_payload_becomes_new_question() {
        let question = NewQuestion::try_from(payload(
            r#"{"enunciado": "2+2?", "disciplina": "Matemática", "tema": "Soma", "nivel": "fácil"}"#,
        ))
        .unwrap();
        assert_eq!(question.enunciado, "2+2?");
        assert_eq!(question.nivel, "fácil");
    }

    #[test]
    fn missing_or_empty_field_is_invalid() {
        for json in [
            r#"{}"#,
            r#"{"enunciado": "2+2?", "disciplina": "Matemática", "tema": "Soma"}"#,
            r#"{"enunciado": "", "disciplina": "Matemática", "tema": "Soma", "nivel": "fácil"}"#,
        ] {
            match NewQuestion::try_from(payload(json)) {
                Err(ApiError::InvalidData(message)) => assert_eq!(message, REQUIRED_FIELDS),
                other => panic!("expected invalid data for {json}, got {other:?}"),
            }
        }
    }

    #[test]
    fn changes_only_carry_non_empty_fields() {
        let changes: QuestionChanges = payload(r#"{"tema": "Subtração", "nivel": ""}"#).into();
        assert_eq!(
            changes,
            QuestionChanges {
                tema: Some("Subtração".to_owned()),
                ..Default::default()
            }
        );
    }
}
