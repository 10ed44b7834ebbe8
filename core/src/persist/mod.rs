use crate::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;

pub mod mapper;
pub mod repo;

/// `sub_code` carried by the row that describes a top-level region itself.
pub const TOP_LEVEL_SUB_CODE: &str = "0";

#[derive(Clone)]
pub struct PersistCtx {
    pub db: Arc<DatabaseConnection>,
}

/// One catalog entry, keyed by `(main_code, sub_code)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct RegionCode {
    pub main_code: String,
    pub sub_code: String,
    pub name: String,
}

impl RegionCode {
    pub fn top_level(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            main_code: code.into(),
            sub_code: TOP_LEVEL_SUB_CODE.to_string(),
            name: name.into(),
        }
    }

    pub fn sub_region(
        main_code: impl Into<String>,
        sub_code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            main_code: main_code.into(),
            sub_code: sub_code.into(),
            name: name.into(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.sub_code == TOP_LEVEL_SUB_CODE
    }
}

pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub couple_id: Option<String>,
}

impl PersistCtx {
    pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        let mut options = ConnectOptions::new(cfg.url.clone());
        options
            .max_connections(cfg.max_connections.max(1))
            .connect_timeout(Duration::from_secs(5))
            .sqlx_logging(false);
        let db = Database::connect(options).await?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Inject an existing `DatabaseConnection`.
    pub fn from_conn(conn: DatabaseConnection) -> Self {
        Self { db: Arc::new(conn) }
    }
}
