/*
 * Responsibility
 * - load settings from the environment (.env is honoured in development)
 * - validate them once at start-up; a missing or broken value stops the process
 * - hand explicit sub-configs to the services that need them (no globals)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

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

/// Token verification settings.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print the secret
        f.debug_struct("AuthConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct GeoConfig {
    pub table_path: Option<PathBuf>,
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,

    // bcrypt work factor for new passwords
    pub password_hash_cost: u32,

    pub auth: AuthConfig,
    pub geo: GeoConfig,
    pub http: HttpConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // database_url carries credentials
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("sqids_min_length", &self.sqids_min_length)
            .field("password_hash_cost", &self.password_hash_cost)
            .field("auth", &self.auth)
            .field("geo", &self.geo)
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

fn env_parse<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(None),
    }
}

fn env_optional(key: &'static str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = env_parse("PORT")?.unwrap_or(5000);
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url =
            env_optional("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections = env_parse("DATABASE_MAX_CONNECTIONS")?.unwrap_or(5);

        let sqids_min_length = env_parse("SQIDS_MIN_LENGTH")?.unwrap_or(10);
        let sqids_alphabet = env_optional("SQIDS_ALPHABET").unwrap_or_else(|| {
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()
        });

        let password_hash_cost = env_parse("BCRYPT_COST")?.unwrap_or(bcrypt::DEFAULT_COST);
        if !(4..=31).contains(&password_hash_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST"));
        }

        let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let auth = AuthConfig {
            jwt_secret,
            issuer: env_optional("AUTH_ISSUER"),
            audience: env_optional("AUTH_AUDIENCE"),
            leeway_seconds: env_parse("ACCESS_TOKEN_LEEWAY_SECONDS")?.unwrap_or(60),
        };

        let geo = GeoConfig {
            table_path: env_optional("GEOIP_TABLE_PATH").map(PathBuf::from),
            trust_forwarded_for: env_parse("TRUST_FORWARDED_FOR")?.unwrap_or(false),
        };

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let http = HttpConfig {
            request_timeout: Duration::from_secs(
                env_parse("REQUEST_TIMEOUT_SECONDS")?.unwrap_or(30),
            ),
            body_limit_bytes: env_parse("REQUEST_BODY_LIMIT_BYTES")?.unwrap_or(1024 * 1024),
            cors_allowed_origins,
        };

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            sqids_min_length,
            sqids_alphabet,
            password_hash_cost,
            auth,
            geo,
            http,
        })
    }
}
