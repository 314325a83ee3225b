pub mod queries;

use secrecy::ExposeSecret;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::configuration::DatabaseSettings;

pub use queries::questions::Question;
pub use queries::users::User;

use sqlx::Error;

/// Builds the pool without opening a connection; an unreachable database
/// only shows up once a query runs.
pub fn establish_connection(settings: &DatabaseSettings) -> Result<PgPool, Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect_lazy(settings.url.expose_secret())
}

pub async fn ping(pool: &PgPool) -> Result<(), Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
