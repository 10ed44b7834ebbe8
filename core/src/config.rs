use anyhow::{Context, bail};
use chrono_tz::Tz;
use envconfig::Envconfig;
use url::Url;

pub const DEFAULT_TOUR_API_BASE_URL: &str = "https://apis.data.go.kr/B551011/KorService1";
pub const MAX_TOUR_API_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, Envconfig)]
pub struct ServerConfig {
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: log::Level,
}

#[derive(Debug, Clone, Envconfig)]
pub struct DatabaseConfig {
    #[envconfig(from = "DATABASE_URL")]
    pub url: String,

    #[envconfig(from = "DATABASE_MAX_CONNECTIONS", default = "10")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Envconfig)]
pub struct RedisConfig {
    #[envconfig(from = "REDIS_URL", default = "redis://127.0.0.1:6379")]
    pub url: String,

    #[envconfig(from = "REDIS_KEY_PREFIX", default = "dateplan")]
    pub key_prefix: String,
}

#[derive(Debug, Clone, Envconfig)]
pub struct AuthConfig {
    #[envconfig(from = "JWT_HMAC_SECRET")]
    pub jwt_hmac_secret: String,

    #[envconfig(from = "JWT_ISSUER", default = "dateplan")]
    pub jwt_issuer: String,

    #[envconfig(from = "ACCESS_TTL_SECS", default = "1800")]
    pub access_ttl_secs: u64,

    #[envconfig(from = "REFRESH_TTL_SECS", default = "1209600")]
    pub refresh_ttl_secs: u64,
}

#[derive(Debug, Clone, Envconfig)]
pub struct TourApiConfig {
    #[envconfig(from = "TOUR_API_BASE_URL", default = "https://apis.data.go.kr/B551011/KorService1")]
    pub base_url: String,

    /// Decoded form of the data.go.kr service key. The client url-encodes it.
    #[envconfig(from = "TOUR_API_SERVICE_KEY")]
    pub service_key: String,

    #[envconfig(from = "TOUR_API_PAGE_SIZE", default = "100")]
    pub page_size: u32,

    #[envconfig(from = "TOUR_API_MOBILE_OS", default = "ETC")]
    pub mobile_os: String,

    #[envconfig(from = "TOUR_API_MOBILE_APP", default = "dateplan")]
    pub mobile_app: String,

    #[envconfig(from = "TOUR_API_TIMEOUT_SECS", default = "10")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Envconfig)]
pub struct SyncConfig {
    /// Six-field cron expression (with seconds), evaluated in `timezone`.
    #[envconfig(from = "REGION_SYNC_CRON", default = "0 0 4 * * *")]
    pub cron: String,

    #[envconfig(from = "REGION_SYNC_TIMEZONE", default = "Asia/Seoul")]
    pub timezone: String,
}

impl SyncConfig {
    pub fn tz(&self) -> anyhow::Result<Tz> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("REGION_SYNC_TIMEZONE is not a valid IANA zone: {e}"))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_config: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub tour_api: TourApiConfig,
    pub sync: SyncConfig,
}

impl AppConfig {
    pub fn fetch() -> anyhow::Result<Self> {
        let server_config =
            ServerConfig::init_from_env().context("Failed to load server config")?;
        let database = DatabaseConfig::init_from_env().context("Failed to load database config")?;
        let redis = RedisConfig::init_from_env().context("Failed to load redis config")?;
        let auth = AuthConfig::init_from_env().context("Failed to load auth config")?;
        let tour_api = TourApiConfig::init_from_env().context("Failed to load tour api config")?;
        let sync = SyncConfig::init_from_env().context("Failed to load sync config")?;

        let cfg = Self {
            server_config,
            database,
            redis,
            auth,
            tour_api,
            sync,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_database_url(&self.database.url)?;
        validate_auth(&self.auth)?;
        validate_tour_api(&self.tour_api)?;
        self.sync.tz()?;
        Ok(())
    }
}

fn validate_database_url(dsn: &str) -> anyhow::Result<()> {
    let trimmed = dsn.trim();
    if trimmed.is_empty() {
        bail!("DATABASE_URL must be set");
    }

    let parsed = Url::parse(trimmed).context("DATABASE_URL is not a valid URL")?;
    match parsed.scheme() {
        "postgres" | "postgresql" | "sqlite" => Ok(()),
        other => bail!("DATABASE_URL must use postgres/postgresql/sqlite scheme, got {other}"),
    }
}

fn validate_auth(cfg: &AuthConfig) -> anyhow::Result<()> {
    if cfg.jwt_hmac_secret.trim().is_empty() {
        bail!("JWT_HMAC_SECRET must not be empty");
    }
    if cfg.access_ttl_secs == 0 || cfg.refresh_ttl_secs == 0 {
        bail!("ACCESS_TTL_SECS and REFRESH_TTL_SECS must be greater than 0");
    }
    if cfg.refresh_ttl_secs <= cfg.access_ttl_secs {
        bail!("REFRESH_TTL_SECS must be longer than ACCESS_TTL_SECS");
    }
    Ok(())
}

fn validate_tour_api(cfg: &TourApiConfig) -> anyhow::Result<()> {
    Url::parse(cfg.base_url.trim()).context("TOUR_API_BASE_URL is not a valid URL")?;
    if cfg.service_key.trim().is_empty() {
        bail!("TOUR_API_SERVICE_KEY must be set");
    }
    if cfg.page_size == 0 || cfg.page_size > MAX_TOUR_API_PAGE_SIZE {
        bail!("TOUR_API_PAGE_SIZE must be between 1 and {MAX_TOUR_API_PAGE_SIZE}");
    }
    Ok(())
}
