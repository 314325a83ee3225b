use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

const DEFAULT_CONFIG_FILE: &str = "configuration";
/// Connection string variable used by existing deployments.
const LEGACY_URL_VAR: &str = "URL_BD";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub compat: CompatSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub description: String,
    pub author: String,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(deserialize_with = "deserialize_secret")]
    pub url: SecretString,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Switches restoring response shapes older clients depend on.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CompatSettings {
    /// `GET /questoes/{id}` answers with a one-element array instead of the bare row.
    pub wrap_single_question: bool,
    /// `GET /` answers 200 even when the database check fails.
    pub health_always_ok: bool,
}

impl Default for CompatSettings {
    fn default() -> Self {
        Self {
            wrap_single_question: true,
            health_always_ok: true,
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Loads settings from defaults, an optional file, `APP__*` variables and `URL_BD`.
///
/// When `path` is `None`, a `configuration.{toml,yaml,json}` file in the working
/// directory is used if present.
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    dotenv::dotenv().ok();
    layered(
        path,
        Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
        std::env::var(LEGACY_URL_VAR).ok(),
    )
}

fn layered(
    path: Option<&Path>,
    environment: Environment,
    legacy_url: Option<String>,
) -> Result<Settings, ConfigError> {
    let compat = CompatSettings::default();
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 3000)?
        .set_default("application.description", "API para Questões e Usuários")?
        .set_default("application.author", "Arthur Porto")?
        .set_default("database.max_connections", 10)?
        .set_default("database.acquire_timeout_secs", 30)?
        .set_default("compat.wrap_single_question", compat.wrap_single_question)?
        .set_default("compat.health_always_ok", compat.health_always_ok)?
        .add_source(file)
        .add_source(environment)
        .set_override_option("database.url", legacy_url)?
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    fn no_environment() -> Environment {
        Environment::with_prefix("QUESTOES_API_TEST_UNSET").separator("__")
    }

    #[test]
    fn defaults_apply_when_only_url_is_given() {
        let settings = layered(
            None,
            no_environment(),
            Some("postgres://localhost/questoes".to_owned()),
        )
        .unwrap();

        assert_eq!(settings.application.host, "0.0.0.0");
        assert_eq!(settings.application.port, 3000);
        assert_eq!(settings.application.author, "Arthur Porto");
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.database.acquire_timeout(), Duration::from_secs(30));
        assert!(settings.compat.wrap_single_question);
        assert!(settings.compat.health_always_ok);
        assert_eq!(
            settings.database.url.expose_secret(),
            "postgres://localhost/questoes"
        );
    }

    #[test]
    fn missing_url_is_an_error() {
        let result = layered(None, no_environment(), None);
        assert!(result.is_err());
    }

    #[test]
    fn file_values_are_overridden_by_legacy_url() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[application]
port = 8081

[database]
url = "postgres://from-file/db"
max_connections = 2

[compat]
wrap_single_question = false
health_always_ok = false
"#
        )
        .unwrap();

        let settings = layered(
            Some(file.path()),
            no_environment(),
            Some("postgres://from-env/db".to_owned()),
        )
        .unwrap();

        assert_eq!(settings.application.port, 8081);
        assert_eq!(settings.database.max_connections, 2);
        assert!(!settings.compat.wrap_single_question);
        assert!(!settings.compat.health_always_ok);
        assert_eq!(settings.database.url.expose_secret(), "postgres://from-env/db");
    }

    #[test]
    fn explicit_file_must_exist() {
        let result = layered(
            Some(Path::new("/nonexistent/questoes-api.toml")),
            no_environment(),
            Some("postgres://localhost/questoes".to_owned()),
        );
        assert!(result.is_err());
    }
}
