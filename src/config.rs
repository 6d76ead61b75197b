use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed to call the API with credentials; empty allows any.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    #[serde(default = "default_session_expires_in")]
    pub expires_in: i64, // seconds
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    /// Base URL objects are publicly served from, without trailing slash.
    pub public_base_url: String,
    #[serde(default)]
    pub force_path_style: bool,
    #[serde(default = "default_playback_expires_in")]
    pub playback_url_expires_in: u64, // seconds
    #[serde(default = "default_upload_expires_in")]
    pub upload_url_expires_in: u64, // seconds
}

const DEFAULT_SESSION_SECRET: &str = "change-me-in-production";

fn default_session_expires_in() -> i64 {
    30 * 24 * 3600
}

fn default_cookie_name() -> String {
    "session_token".to_string()
}

fn default_playback_expires_in() -> u64 {
    900
}

fn default_upload_expires_in() -> u64 {
    3600
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_list(name: &str) -> Option<Vec<String>> {
    get_env(name).map(|v| {
        v.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // without a config file everything comes from the environment
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::from_toml_str(&config_str)
                .with_context(|| format!("failed to parse config file {config_path}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env()?,
            Err(e) => {
                return Err(anyhow!(e).context(format!("cannot read config file {config_path}")));
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    fn from_env() -> anyhow::Result<Self> {
        let database_url = get_env("DATABASE_URL")
            .context("DATABASE_URL is not set and no config.toml was found")?;

        Ok(Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8080u16),
                allowed_origins: get_env_list("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
            },
            session: SessionConfig {
                secret: get_env("SESSION_SECRET")
                    .unwrap_or_else(|| DEFAULT_SESSION_SECRET.to_string()),
                expires_in: get_env_parse("SESSION_EXPIRES_IN", default_session_expires_in()),
                cookie_name: get_env("SESSION_COOKIE_NAME").unwrap_or_else(default_cookie_name),
            },
            storage: StorageConfig {
                bucket: get_env("S3_BUCKET").unwrap_or_default(),
                region: get_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                endpoint: get_env("S3_ENDPOINT"),
                access_key: get_env("S3_ACCESS_KEY").unwrap_or_default(),
                secret_key: get_env("S3_SECRET_KEY").unwrap_or_default(),
                public_base_url: get_env("S3_PUBLIC_BASE_URL").unwrap_or_default(),
                force_path_style: get_env_parse("S3_FORCE_PATH_STYLE", false),
                playback_url_expires_in: get_env_parse(
                    "S3_PLAYBACK_URL_EXPIRES_IN",
                    default_playback_expires_in(),
                ),
                upload_url_expires_in: get_env_parse(
                    "S3_UPLOAD_URL_EXPIRES_IN",
                    default_upload_expires_in(),
                ),
            },
        })
    }

    /// Settings still at values that are unsafe outside local development.
    pub fn insecure_defaults(&self) -> Vec<&'static str> {
        let mut found = Vec::new();
        if self.server.allowed_origins.is_empty() {
            found.push("no CORS origins configured; every origin may send credentialed requests");
        }
        if self.session.secret == DEFAULT_SESSION_SECRET {
            found.push("SESSION_SECRET is not set; sessions are signed with the built-in secret");
        }
        found
    }

    // environment wins over the file
    fn apply_env_overrides(&mut self) {
        if let Some(v) = get_env("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(p) = get_env("SERVER_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = p;
        }
        if let Some(origins) = get_env_list("CORS_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins;
        }
        if let Some(v) = get_env("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(mc) = get_env("DB_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
            self.database.max_connections = mc;
        }
        if let Some(v) = get_env("SESSION_SECRET") {
            self.session.secret = v;
        }
        if let Some(n) = get_env("SESSION_EXPIRES_IN").and_then(|v| v.parse().ok()) {
            self.session.expires_in = n;
        }
        if let Some(v) = get_env("SESSION_COOKIE_NAME") {
            self.session.cookie_name = v;
        }
        if let Some(v) = get_env("S3_BUCKET") {
            self.storage.bucket = v;
        }
        if let Some(v) = get_env("S3_REGION") {
            self.storage.region = v;
        }
        if let Some(v) = get_env("S3_ENDPOINT") {
            self.storage.endpoint = Some(v);
        }
        if let Some(v) = get_env("S3_ACCESS_KEY") {
            self.storage.access_key = v;
        }
        if let Some(v) = get_env("S3_SECRET_KEY") {
            self.storage.secret_key = v;
        }
        if let Some(v) = get_env("S3_PUBLIC_BASE_URL") {
            self.storage.public_base_url = v;
        }
        if let Some(b) = get_env("S3_FORCE_PATH_STYLE").and_then(|v| v.parse().ok()) {
            self.storage.force_path_style = b;
        }
        if let Some(n) = get_env("S3_PLAYBACK_URL_EXPIRES_IN").and_then(|v| v.parse().ok()) {
            self.storage.playback_url_expires_in = n;
        }
        if let Some(n) = get_env("S3_UPLOAD_URL_EXPIRES_IN").and_then(|v| v.parse().ok()) {
            self.storage.upload_url_expires_in = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_and_fills_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [database]
            url = "postgres://localhost/learnhub"
            max_connections = 5

            [session]
            secret = "s3cret"

            [storage]
            bucket = "course-videos"
            region = "ap-south-1"
            access_key = "AK"
            secret_key = "SK"
            public_base_url = "https://cdn.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert!(config.server.allowed_origins.is_empty());
        assert_eq!(config.session.cookie_name, "session_token");
        assert_eq!(config.session.expires_in, 30 * 24 * 3600);
        assert_eq!(config.storage.playback_url_expires_in, 900);
        assert_eq!(config.storage.upload_url_expires_in, 3600);
        assert!(config.storage.endpoint.is_none());
        assert!(!config.storage.force_path_style);
    }

    #[test]
    fn flags_open_cors_and_built_in_secret() {
        let mut config = Config::from_toml_str(&format!(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            url = "postgres://localhost/learnhub"
            max_connections = 1

            [session]
            secret = "{DEFAULT_SESSION_SECRET}"

            [storage]
            bucket = "course-videos"
            region = "ap-south-1"
            access_key = "AK"
            secret_key = "SK"
            public_base_url = "https://cdn.example.com"
            "#
        ))
        .unwrap();
        assert_eq!(config.insecure_defaults().len(), 2);

        config.server.allowed_origins = vec!["https://learn.example.com".to_string()];
        config.session.secret = "rotated".to_string();
        assert!(config.insecure_defaults().is_empty());
    }

    #[test]
    fn rejects_missing_sections() {
        assert!(Config::from_toml_str("[server]\nhost = \"x\"\nport = 1\n").is_err());
    }
}
