use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i32,
    pub enunciado: String,
    pub disciplina: String,
    pub tema: String,
    pub nivel: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub enunciado: String,
    pub disciplina: String,
    pub tema: String,
    pub nivel: String,
}

/// Replacement values for an existing row; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionChanges {
    pub enunciado: Option<String>,
    pub disciplina: Option<String>,
    pub tema: Option<String>,
    pub nivel: Option<String>,
}

pub async fn get_all_questions(pool: &PgPool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, enunciado, disciplina, tema, nivel FROM questoes ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question(pool: &PgPool, id: i32) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, enunciado, disciplina, tema, nivel FROM questoes WHERE questoes.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_question(pool: &PgPool, question: &NewQuestion) -> sqlx::Result<i32> {
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO questoes (enunciado, disciplina, tema, nivel) VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(&question.enunciado)
    .bind(&question.disciplina)
    .bind(&question.tema)
    .bind(&question.nivel)
    .fetch_one(pool)
    .await
}

/// Returns `false` when no row has the given id.
pub async fn update_question(
    pool: &PgPool,
    id: i32,
    changes: &QuestionChanges,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE questoes SET
            enunciado = COALESCE($1, enunciado),
            disciplina = COALESCE($2, disciplina),
            tema = COALESCE($3, tema),
            nivel = COALESCE($4, nivel)
        WHERE questoes.id = $5
        "#,
    )
    .bind(changes.enunciado.as_deref())
    .bind(changes.disciplina.as_deref())
    .bind(changes.tema.as_deref())
    .bind(changes.nivel.as_deref())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns `false` when no row has the given id.
pub async fn delete_question(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM questoes WHERE questoes.id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
