use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    db::queries::users::{self, NewUser, UserChanges},
    db::User,
    server::{
        app::AppState,
        deserializers::{deserialize_non_empty_string, deserialize_non_zero_number},
        error::{ApiError, Resource},
    },
};

use super::{message, parse_id, ApiResponse, JsonBody};

const REQUIRED_FIELDS: &str = "Os campos (nome, idade, curso) são obrigatórios.";

#[derive(Debug, Default, Deserialize)]
struct UserPayload {
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    nome: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_zero_number")]
    idade: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    curso: Option<String>,
}

impl TryFrom<UserPayload> for NewUser {
    type Error = ApiError;

    fn try_from(payload: UserPayload) -> Result<Self, Self::Error> {
        match payload {
            UserPayload {
                nome: Some(nome),
                idade: Some(idade),
                curso: Some(curso),
            } => Ok(NewUser { nome, idade, curso }),
            _ => Err(ApiError::InvalidData(REQUIRED_FIELDS.to_owned())),
        }
    }
}

impl From<UserPayload> for UserChanges {
    fn from(payload: UserPayload) -> Self {
        UserChanges {
            nome: payload.nome,
            idade: payload.idade,
            curso: payload.curso,
        }
    }
}

async fn get_users(State(pool): State<PgPool>) -> ApiResponse<Json<Vec<User>>> {
    tracing::info!("GET /usuarios requested");
    Ok(Json(users::get_users(&pool).await?))
}

async fn user(State(pool): State<PgPool>, Path(id): Path<String>) -> ApiResponse<Json<User>> {
    tracing::info!(id = %id, "GET /usuarios/{{id}} requested");
    let id = parse_id(&id, Resource::User)?;
    users::get_user(&pool, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(Resource::User))
}

async fn create_user(
    State(pool): State<PgPool>,
    JsonBody(payload): JsonBody<UserPayload>,
) -> ApiResponse<impl IntoResponse> {
    tracing::info!("POST /usuarios requested");
    let new_user = NewUser::try_from(payload)?;
    let id = users::create_user(&pool, &new_user).await?;
    tracing::info!(id, "User created");
    Ok(message(StatusCode::CREATED, "Usuário criado com sucesso!"))
}

async fn update_user(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UserPayload>,
) -> ApiResponse<impl IntoResponse> {
    tracing::info!(id = %id, "PUT /usuarios/{{id}} requested");
    let id = parse_id(&id, Resource::User)?;
    if !users::update_user(&pool, id, &payload.into()).await? {
        return Err(ApiError::NotFound(Resource::User));
    }
    Ok(message(StatusCode::OK, "Usuário atualizado com sucesso!"))
}

async fn delete_user(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> ApiResponse<impl IntoResponse> {
    tracing::info!(id = %id, "DELETE /usuarios/{{id}} requested");
    let id = parse_id(&id, Resource::User)?;
    if !users::delete_user(&pool, id).await? {
        return Err(ApiError::NotFound(Resource::User));
    }
    Ok(message(StatusCode::OK, "Usuário excluído com sucesso!"))
}

pub fn users_router(state: AppState) -> Router {
    Router::new()
        .route("/usuarios", get(get_users).post(create_user))
        .route(
            "/usuarios/{id}",
            get(user).put(update_user).delete(delete_user),
        )
        .with_state(state)
}
