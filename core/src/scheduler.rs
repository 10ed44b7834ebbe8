pub use async_trait::async_trait;
use chrono_tz::Tz;
use log::{error, info};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

#[async_trait]
pub trait Task: Send + Sync + 'static {
    fn cron_pattern(&self) -> String;

    /// Zone the cron pattern is evaluated in.
    fn timezone(&self) -> Tz {
        Tz::UTC
    }

    async fn run(&self) -> anyhow::Result<()>;
}

pub struct TaskScheduler {
    scheduler: JobScheduler,
}

impl Drop for TaskScheduler {
    fn drop(&mut self) {
        let mut scheduler = self.scheduler.clone();
        tokio::spawn(async move {
            if let Err(e) = scheduler.shutdown().await {
                error!("Failed to shutdown task scheduler: {e}");
            }
        });
    }
}

impl TaskScheduler {
    pub async fn new() -> anyhow::Result<Self> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self { scheduler })
    }

    pub async fn add_task(&mut self, task: Arc<dyn Task>) -> anyhow::Result<()> {
        let pattern = task.cron_pattern();
        let tz = task.timezone();
        let job = Job::new_async_tz(pattern.as_str(), tz, move |_id, _lock| {
            let task = task.clone();
            Box::pin(async move {
                if let Err(e) = task.run().await {
                    error!("Failed to run task: {e}");
                }
            })
        })?;
        self.scheduler.add(job).await?;
        info!("scheduled task at '{pattern}' ({tz})");

        Ok(())
    }

    pub async fn start(&self) -> anyhow::Result<()> {
        self.scheduler.start().await?;
        Ok(())
    }
}
