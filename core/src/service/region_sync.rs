use crate::error::ServiceResult;
use crate::persist::{PersistCtx, RegionCode, mapper, repo};
use crate::scheduler::Task;
use crate::tour_api::AreaCodeApi;
use async_trait::async_trait;
use chrono_tz::Tz;
use log::{error, info};
use std::sync::Arc;

/// Mirrors the TourAPI region hierarchy into the local `RegionCode` table.
#[derive(Clone)]
pub struct RegionSynchronizer {
    persist: PersistCtx,
    api: Arc<dyn AreaCodeApi>,
}

impl RegionSynchronizer {
    pub fn new(persist: PersistCtx, api: Arc<dyn AreaCodeApi>) -> Self {
        Self { persist, api }
    }

    /// Fetches the full hierarchy, then writes it in a single transaction.
    /// Nothing is written unless every request succeeded.
    pub async fn sync(&self) -> ServiceResult<Vec<RegionCode>> {
        let rows = self.fetch_all().await?;
        let written = repo::upsert_region_codes(&self.persist, &rows).await?;
        info!(
            "region sync stored {written} codes ({} top-level)",
            rows.iter().filter(|r| r.is_top_level()).count()
        );
        Ok(rows)
    }

    async fn fetch_all(&self) -> ServiceResult<Vec<RegionCode>> {
        let top_level = self.api.area_codes(None).await?;
        let mut rows: Vec<RegionCode> = top_level
            .iter()
            .map(|area| RegionCode::top_level(&area.code, &area.name))
            .collect();

        for area in &top_level {
            let subs = self.api.area_codes(Some(&area.code)).await?;
            rows.extend(
                subs.into_iter()
                    .map(|sub| RegionCode::sub_region(&area.code, sub.code, sub.name)),
            );
        }
        Ok(rows)
    }

    pub async fn list_regions(&self, main_code: Option<&str>) -> ServiceResult<Vec<RegionCode>> {
        let main_code = main_code.map(str::trim).filter(|c| !c.is_empty());
        let rows = repo::list_region_codes(&self.persist, main_code).await?;
        Ok(rows.into_iter().map(mapper::region_model_to_record).collect())
    }
}

pub struct RegionSyncTask {
    sync: RegionSynchronizer,
    cron: String,
    tz: Tz,
}

impl RegionSyncTask {
    pub fn new(sync: RegionSynchronizer, cron: impl Into<String>, tz: Tz) -> Self {
        Self {
            sync,
            cron: cron.into(),
            tz,
        }
    }
}

#[async_trait]
impl Task for RegionSyncTask {
    fn cron_pattern(&self) -> String {
        self.cron.clone()
    }

    fn timezone(&self) -> Tz {
        self.tz
    }

    async fn run(&self) -> anyhow::Result<()> {
        let rows = self.sync.sync().await.inspect_err(|e| {
            error!("region sync failed, keeping previous catalog: {e}");
        })?;
        info!("region sync finished with {} rows", rows.len());
        Ok(())
    }
}
