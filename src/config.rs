use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub max_body_size: usize,
    pub log_level: String,
    pub token_ttl: Duration,
    pub hash: HashConfig,
    pub paging: PageConfig,
    pub login_throttle: ThrottleConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Argon2id cost factor.
#[derive(Debug, Clone, Copy)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageConfig {
    pub default_count: u32,
    pub max_count: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            default_count: 20,
            max_count: 100,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThrottleConfig {
    pub max_failures: u32,
    pub window: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_failures: 5,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl Config {
    /// Load `.env` (or `prod.env` when `PROD` is set) into the process environment.
    pub fn load_dotenv() {
        if std::env::var_os("PROD").is_some() {
            let _ = dotenvy::from_filename("prod.env");
        } else {
            let _ = dotenvy::dotenv();
        }
    }

    pub fn from_env() -> Result<Self, String> {
        let store = match env_or("LOGSCOPE_STORE", "postgres").as_str() {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => return Err(format!("Invalid LOGSCOPE_STORE: {other}")),
        };

        let database_url = match store {
            StoreBackend::Postgres => Some(env_required("DATABASE_URL")?),
            StoreBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("LOGSCOPE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid LOGSCOPE_HOST: {e}"))?;

        let port: u16 = env_parse("LOGSCOPE_PORT", "3000")?;

        let cors_origins: Vec<String> = env_or("LOGSCOPE_CORS_ORIGINS", "http://localhost:4200")
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                axum::http::HeaderValue::from_str(s)
                    .map(|_| s.to_string())
                    .map_err(|e| format!("Invalid LOGSCOPE_CORS_ORIGINS entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let max_body_size: usize = env_parse("LOGSCOPE_MAX_BODY_SIZE", "1048576")?;
        let log_level = env_or("LOGSCOPE_LOG_LEVEL", "info");
        let token_ttl = Duration::from_secs(env_parse("LOGSCOPE_TOKEN_TTL_SECS", "3600")?);

        let hash = HashConfig {
            memory_kib: env_parse("LOGSCOPE_HASH_MEMORY_KIB", "19456")?,
            iterations: env_parse("LOGSCOPE_HASH_ITERATIONS", "2")?,
            parallelism: env_parse("LOGSCOPE_HASH_PARALLELISM", "1")?,
        };

        let paging = PageConfig {
            default_count: env_parse("LOGSCOPE_DEFAULT_PAGE_SIZE", "20")?,
            max_count: env_parse("LOGSCOPE_MAX_PAGE_SIZE", "100")?,
        };
        if paging.default_count == 0 || paging.max_count < paging.default_count {
            return Err(format!(
                "Invalid page sizes: default {} must be positive and not exceed max {}",
                paging.default_count, paging.max_count
            ));
        }

        let login_throttle = ThrottleConfig {
            max_failures: env_parse("LOGSCOPE_LOGIN_MAX_FAILURES", "5")?,
            window: Duration::from_secs(env_parse("LOGSCOPE_LOGIN_WINDOW_SECS", "900")?),
        };

        Ok(Config {
            store,
            database_url,
            jwt_secret,
            host,
            port,
            cors_origins,
            max_body_size,
            log_level,
            token_ttl,
            hash,
            paging,
            login_throttle,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_or(key, default)
        .parse()
        .map_err(|e| format!("Invalid {key}: {e}"))
}
