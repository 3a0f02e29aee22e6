/*
 * Responsibility
 * - Read environment variables (.env via dotenvy): port, route prefix, signing secret, CORS
 * - Validate values (missing or invalid settings abort startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    /// Prefix every resource route is nested under, e.g. `/api/v1`.
    pub api_prefix: String,

    pub jwt_secret: String,
    pub access_token_ttl_seconds: u64,
    pub access_token_leeway_seconds: u64,
}

// Keep the secret out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("api_prefix", &self.api_prefix)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("access_token_leeway_seconds", &self.access_token_leeway_seconds)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let api_prefix = normalize_prefix(
            &std::env::var("API_URL").unwrap_or_else(|_| "/api/v1".to_string()),
        )
        .ok_or(ConfigError::Invalid("API_URL"))?;

        // `SECRET` is the name older deployments used.
        let jwt_secret = std::env::var("JWT_SECRET")
            .or_else(|_| std::env::var("SECRET"))
            .map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let access_token_ttl_seconds = std::env::var("ACCESS_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(86_400); // 1 day

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            api_prefix,
            jwt_secret,
            access_token_ttl_seconds,
            access_token_leeway_seconds,
        })
    }
}

/// `api/v1/` -> `/api/v1`. Returns `None` for an empty prefix.
fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("/{trimmed}"))
}

#[cfg(test)]
impl Config {
    /// Test configuration that never touches the process environment.
    pub fn for_tests(secret: &str) -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            app_env: AppEnv::Development,
            cors_allowed_origins: Vec::new(),
            api_prefix: "/api/v1".to_string(),
            jwt_secret: secret.to_string(),
            access_token_ttl_seconds: 3600,
            access_token_leeway_seconds: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix("api/v1/").as_deref(), Some("/api/v1"));
        assert_eq!(normalize_prefix("/api/v1").as_deref(), Some("/api/v1"));
        assert_eq!(normalize_prefix(" / "), None);
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = Config::for_tests("super-secret-value");
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-value"));
    }
}
