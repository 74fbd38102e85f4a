/*
 * Responsibility
 * - 環境変数や .env の読み込み (CLERK_SECRET_KEY, CORS 許可, PORT など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CLERK_API_URL: &str = "https://api.clerk.com/v1";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_IDENTITY_TIMEOUT_SECONDS: u64 = 10;
const MAX_IDENTITY_TIMEOUT_SECONDS: u64 = 300;
// Headroom on top of the two authority calls for routing, serialization and slow clients.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
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

pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub clerk_secret_key: String,
    pub clerk_api_url: Url,
    pub identity_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the secret key
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("clerk_api_url", &self.clerk_api_url.as_str())
            .field("identity_timeout", &self.identity_timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Upper bound for a whole request.
    ///
    /// A request makes at most two sequential authority calls (verify, then
    /// get_user), each bounded by `identity_timeout`, so an unreachable
    /// authority is always reported by the gate/handler and never by the
    /// outer timeout.
    pub fn request_timeout(&self) -> Duration {
        self.identity_timeout * 2 + REQUEST_TIMEOUT_SLACK
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (process env in production).
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        // Credentials are allowed, so a wildcard origin is never acceptable.
        if cors_allowed_origins.iter().any(|o| o == "*") {
            return Err(ConfigError::Invalid("CORS_ALLOWED_ORIGINS"));
        }

        let clerk_secret_key = var("CLERK_SECRET_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("CLERK_SECRET_KEY"))?;

        let clerk_api_url = var("CLERK_API_URL")
            .unwrap_or_else(|| DEFAULT_CLERK_API_URL.to_string());
        let clerk_api_url =
            Url::parse(clerk_api_url.trim()).map_err(|_| ConfigError::Invalid("CLERK_API_URL"))?;
        if clerk_api_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid("CLERK_API_URL"));
        }

        let identity_timeout_seconds = match var("IDENTITY_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|v| (1..=MAX_IDENTITY_TIMEOUT_SECONDS).contains(v))
                .ok_or(ConfigError::Invalid("IDENTITY_TIMEOUT_SECONDS"))?,
            None => DEFAULT_IDENTITY_TIMEOUT_SECONDS,
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            clerk_secret_key,
            clerk_api_url,
            identity_timeout: Duration::from_secs(identity_timeout_seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[("CLERK_SECRET_KEY", "sk_test_123")]).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.clerk_api_url.as_str(), "https://api.clerk.com/v1");
        assert_eq!(config.identity_timeout, Duration::from_secs(10));
        assert_eq!(config.clerk_secret_key, "sk_test_123");
    }

    #[test]
    fn missing_secret_fails_startup() {
        assert_eq!(
            load(&[]).unwrap_err(),
            ConfigError::Missing("CLERK_SECRET_KEY")
        );
        assert_eq!(
            load(&[("CLERK_SECRET_KEY", "   ")]).unwrap_err(),
            ConfigError::Missing("CLERK_SECRET_KEY")
        );
    }

    #[test]
    fn invalid_values_name_the_key() {
        let base = ("CLERK_SECRET_KEY", "sk");

        assert_eq!(
            load(&[base, ("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid("PORT")
        );
        assert_eq!(
            load(&[base, ("IDENTITY_TIMEOUT_SECONDS", "0")]).unwrap_err(),
            ConfigError::Invalid("IDENTITY_TIMEOUT_SECONDS")
        );
        assert_eq!(
            load(&[base, ("IDENTITY_TIMEOUT_SECONDS", "301")]).unwrap_err(),
            ConfigError::Invalid("IDENTITY_TIMEOUT_SECONDS")
        );
        assert_eq!(
            load(&[base, ("CLERK_API_URL", "not a url")]).unwrap_err(),
            ConfigError::Invalid("CLERK_API_URL")
        );
        assert_eq!(
            load(&[base, ("CORS_ALLOWED_ORIGINS", "http://a.test, *")]).unwrap_err(),
            ConfigError::Invalid("CORS_ALLOWED_ORIGINS")
        );
    }

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        let config = load(&[
            ("CLERK_SECRET_KEY", "sk"),
            ("CORS_ALLOWED_ORIGINS", " https://a.test ,, https://b.test "),
            ("APP_ENV", "PROD"),
        ])
        .unwrap();

        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.test", "https://b.test"]
        );
        assert!(config.app_env.is_production());
    }

    #[test]
    fn request_timeout_covers_both_authority_calls() {
        let config = load(&[
            ("CLERK_SECRET_KEY", "sk"),
            ("IDENTITY_TIMEOUT_SECONDS", "60"),
        ])
        .unwrap();

        assert!(config.request_timeout() > config.identity_timeout * 2);
        assert_eq!(config.request_timeout(), Duration::from_secs(125));
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = load(&[("CLERK_SECRET_KEY", "sk_live_very_secret")]).unwrap();
        let printed = format!("{config:?}");

        assert!(!printed.contains("sk_live_very_secret"));
    }
}
