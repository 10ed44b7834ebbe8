use std::sync::Arc;

use crate::{
    config::{AppConfig, ServerConfig},
    persist::PersistCtx,
    scheduler::TaskScheduler,
    service::{AuthService, RegionSyncTask, RegionSynchronizer, TokenManager},
    session::RedisSessionStore,
    tour_api::TourApiClient,
};
use env_logger::Env;
use log::info;
use migration::{Migrator, MigratorTrait};

fn load_config() -> anyhow::Result<AppConfig> {
    dotenv::dotenv()
        .map_err(|err| {
            eprintln!(".env file error: {err}");
            err
        })
        .ok();

    AppConfig::fetch()
}

/// Long-lived handles built at startup.
pub struct Services {
    pub auth: AuthService,
    pub regions: RegionSynchronizer,
}

pub async fn build_services(app_config: &AppConfig) -> anyhow::Result<Services> {
    let persist = PersistCtx::connect(&app_config.database).await?;
    Migrator::up(persist.db.as_ref(), None).await?;
    info!("database migrations applied");

    let sessions = Arc::new(RedisSessionStore::connect(&app_config.redis).await?);
    let tokens = TokenManager::new(app_config.auth.clone(), sessions);
    let auth = AuthService::new(persist.clone(), tokens);

    let tour_api = Arc::new(TourApiClient::new(app_config.tour_api.clone())?);
    let regions = RegionSynchronizer::new(persist, tour_api);

    Ok(Services { auth, regions })
}

pub async fn bootstrap() -> anyhow::Result<()> {
    let app_config = load_config()?;

    let ServerConfig { log_level } = app_config.server_config.clone();
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level.as_str())).init();

    let services = build_services(&app_config).await?;

    let mut scheduler = TaskScheduler::new().await?;
    scheduler
        .add_task(Arc::new(RegionSyncTask::new(
            services.regions.clone(),
            app_config.sync.cron.clone(),
            app_config.sync.tz()?,
        )))
        .await?;
    scheduler.start().await?;
    info!(
        "region sync scheduled at '{}' ({})",
        app_config.sync.cron, app_config.sync.timezone
    );

    shutdown_signal().await;
    info!("shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for ctrl-c: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => log::error!("failed to listen for SIGTERM: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
