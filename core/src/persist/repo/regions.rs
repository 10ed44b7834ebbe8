use crate::error::PersistDbError;
use crate::persist::{PersistCtx, RegionCode};
use entities::region_code;
use log::debug;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::BTreeMap;

use super::common::now;

const UPSERT_CHUNK_SIZE: usize = 500;

/// Inserts or overwrites every row in one transaction. Rows sharing a
/// `(main_code, sub_code)` key collapse to the last occurrence. Returns the
/// number of distinct keys written.
pub async fn upsert_region_codes(
    ctx: &PersistCtx,
    rows: &[RegionCode],
) -> Result<u64, PersistDbError> {
    let mut distinct: BTreeMap<(&str, &str), &RegionCode> = BTreeMap::new();
    for row in rows {
        distinct.insert((row.main_code.as_str(), row.sub_code.as_str()), row);
    }
    if distinct.is_empty() {
        return Ok(0);
    }

    let now = now();
    let models: Vec<region_code::ActiveModel> = distinct
        .values()
        .map(|row| region_code::ActiveModel {
            main_code: Set(row.main_code.clone()),
            sub_code: Set(row.sub_code.clone()),
            name: Set(row.name.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .collect();
    let written = models.len() as u64;
    debug!("upserting {written} region codes");

    ctx.db
        .transaction::<_, u64, PersistDbError>(|txn| {
            Box::pin(async move {
                for chunk in models.chunks(UPSERT_CHUNK_SIZE) {
                    region_code::Entity::insert_many(chunk.to_vec())
                        .on_conflict(
                            OnConflict::columns([
                                region_code::Column::MainCode,
                                region_code::Column::SubCode,
                            ])
                            .update_columns([
                                region_code::Column::Name,
                                region_code::Column::MainCode,
                                region_code::Column::SubCode,
                                region_code::Column::UpdatedAt,
                            ])
                            .to_owned(),
                        )
                        .exec_without_returning(txn)
                        .await?;
                }
                Ok(written)
            })
        })
        .await
        .map_err(PersistDbError::from)
}

pub async fn list_region_codes(
    ctx: &PersistCtx,
    main_code: Option<&str>,
) -> Result<Vec<region_code::Model>, PersistDbError> {
    let mut query = region_code::Entity::find();
    if let Some(main_code) = main_code {
        query = query.filter(region_code::Column::MainCode.eq(main_code));
    }
    let rows = query
        .order_by_asc(region_code::Column::MainCode)
        .order_by_asc(region_code::Column::SubCode)
        .all(ctx.db.as_ref())
        .await?;
    Ok(rows)
}

pub async fn count_region_codes(ctx: &PersistCtx) -> Result<u64, PersistDbError> {
    let count = region_code::Entity::find().count(ctx.db.as_ref()).await?;
    Ok(count)
}
