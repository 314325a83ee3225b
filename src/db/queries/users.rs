use serde::{Deserialize, Serialize, Serializer};
use sqlx::{FromRow, PgPool};

// `idade` is read back as float8 so integer, numeric and real columns all decode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub nome: String,
    #[serde(serialize_with = "serialize_age")]
    pub idade: f64,
    pub curso: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub nome: String,
    pub idade: f64,
    pub curso: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub nome: Option<String>,
    pub idade: Option<f64>,
    pub curso: Option<String>,
}

// whole ages go out as JSON integers (20, not 20.0)
fn serialize_age<S>(idade: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if idade.fract() == 0.0 && idade.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*idade as i64)
    } else {
        serializer.serialize_f64(*idade)
    }
}

pub async fn get_users(pool: &PgPool) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, nome, idade::float8 AS idade, curso FROM usuarios ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_user(pool: &PgPool, id: i32) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, nome, idade::float8 AS idade, curso FROM usuarios WHERE usuarios.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_user(pool: &PgPool, user: &NewUser) -> sqlx::Result<i32> {
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO usuarios (nome, idade, curso) VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(&user.nome)
    .bind(user.idade)
    .bind(&user.curso)
    .fetch_one(pool)
    .await
}

pub async fn update_user(pool: &PgPool, id: i32, changes: &UserChanges) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE usuarios SET
            nome = COALESCE($1, nome),
            idade = COALESCE($2, idade),
            curso = COALESCE($3, curso)
        WHERE usuarios.id = $4
        "#,
    )
    .bind(changes.nome.as_deref())
    .bind(changes.idade)
    .bind(changes.curso.as_deref())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_user(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM usuarios WHERE usuarios.id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(idade: f64) -> User {
        User {
            id: 1,
            nome: "Ana".to_owned(),
            idade,
            curso: "CS".to_owned(),
        }
    }

    #[test]
    fn whole_ages_serialize_as_integers() {
        assert_eq!(
            serde_json::to_value(user(20.0)).unwrap(),
            json!({ "id": 1, "nome": "Ana", "idade": 20, "curso": "CS" })
        );
    }

    #[test]
    fn fractional_ages_keep_their_fraction() {
        assert_eq!(serde_json::to_value(user(20.5)).unwrap()["idade"], json!(20.5));
    }
}
