use std::sync::Arc;

use dateplan_core::{
    error::{ExternalServiceError, ServiceError},
    persist::{RegionCode, repo},
    service::RegionSynchronizer,
};
use sea_orm::ConnectionTrait;
use test_log::test;

mod support;
use support::{MockTourApi, SERVICE_KEY, setup_db, tour_api_client};

fn seoul_and_busan(mock: &MockTourApi) {
    mock.region("1", "서울", &[("1", "강남구"), ("2", "강동구")])
        .region("6", "부산", &[("1", "강서구"), ("2", "금정구")]);
}

async fn synchronizer(mock: &MockTourApi) -> anyhow::Result<RegionSynchronizer> {
    let base_url = mock.spawn().await?;
    let ctx = setup_db().await?;
    Ok(RegionSynchronizer::new(ctx, Arc::new(tour_api_client(&base_url)?)))
}

#[test(tokio::test)]
async fn two_regions_with_two_subs_yield_six_rows() -> anyhow::Result<()> {
    let mock = MockTourApi::new();
    seoul_and_busan(&mock);
    let sync = synchronizer(&mock).await?;

    let rows = sync.sync().await?;
    assert_eq!(rows.len(), 6);
    assert_eq!(rows.iter().filter(|r| r.is_top_level()).count(), 2);
    assert!(rows.contains(&RegionCode::sub_region("6", "2", "금정구")));

    let stored = sync.list_regions(None).await?;
    assert_eq!(stored.len(), 6);
    assert_eq!(stored[0], RegionCode::top_level("1", "서울"));
    assert_eq!(stored.iter().filter(|r| r.sub_code == "0").count(), 2);

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|q| {
        q.get("serviceKey").map(String::as_str) == Some(SERVICE_KEY)
            && q.get("_type").map(String::as_str) == Some("json")
            && q.get("pageNo").map(String::as_str) == Some("1")
    }));
    assert!(requests[0].get("areaCode").is_none());
    assert_eq!(requests[1].get("areaCode").map(String::as_str), Some("1"));
    assert_eq!(requests[2].get("areaCode").map(String::as_str), Some("6"));
    Ok(())
}

#[test(tokio::test)]
async fn unregistered_key_is_invalid_credentials() -> anyhow::Result<()> {
    let mock = MockTourApi::new();
    seoul_and_busan(&mock);
    mock.reject_with_reason("30");
    let sync = synchronizer(&mock).await?;

    let err = sync.sync().await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::External(ExternalServiceError::InvalidCredentials)
    ));
    assert!(sync.list_regions(None).await?.is_empty());
    Ok(())
}

#[test(tokio::test)]
async fn other_gateway_errors_are_unknown() -> anyhow::Result<()> {
    let mock = MockTourApi::new();
    mock.reject_with_reason("22");
    let sync = synchronizer(&mock).await?;

    let err = sync.sync().await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::External(ExternalServiceError::Unknown(_))
    ));
    Ok(())
}

#[test(tokio::test)]
async fn resync_updates_only_renamed_row() -> anyhow::Result<()> {
    let mock = MockTourApi::new();
    seoul_and_busan(&mock);
    let sync = synchronizer(&mock).await?;

    sync.sync().await?;
    let before = sync.list_regions(None).await?;

    mock.rename_sub("6", "1", "강서구청");
    sync.sync().await?;
    let after = sync.list_regions(None).await?;

    assert_eq!(after.len(), before.len());
    let changed: Vec<_> = before
        .iter()
        .zip(after.iter())
        .filter(|(b, a)| b != a)
        .collect();
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].1, &RegionCode::sub_region("6", "1", "강서구청"));
    Ok(())
}

#[test(tokio::test)]
async fn failed_fetch_leaves_catalog_untouched() -> anyhow::Result<()> {
    let mock = MockTourApi::new();
    seoul_and_busan(&mock);
    let sync = synchronizer(&mock).await?;
    sync.sync().await?;

    mock.rename_sub("1", "1", "renamed");
    mock.fail_sub_regions_of("6");
    let err = sync.sync().await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::External(ExternalServiceError::Unknown(_))
    ));

    let seoul = sync.list_regions(Some("1")).await?;
    assert_eq!(seoul[1], RegionCode::sub_region("1", "1", "강남구"));
    Ok(())
}

#[test(tokio::test)]
async fn region_without_subs_keeps_top_level_row() -> anyhow::Result<()> {
    let mock = MockTourApi::new();
    mock.region("39", "제주도", &[]).region("8", "세종시", &[("1", "세종시")]);
    let sync = synchronizer(&mock).await?;

    let rows = sync.sync().await?;
    assert_eq!(rows.len(), 3);
    assert_eq!(sync.list_regions(Some("39")).await?, vec![RegionCode::top_level("39", "제주도")]);
    assert_eq!(sync.list_regions(Some("8")).await?.len(), 2);
    assert!(sync.list_regions(Some("99")).await?.is_empty());
    Ok(())
}

#[test(tokio::test)]
async fn upsert_failure_rolls_back_whole_batch() -> anyhow::Result<()> {
    let ctx = setup_db().await?;
    ctx.db
        .execute_unprepared(
            "CREATE TRIGGER reject_region BEFORE INSERT ON \"RegionCode\" \
             WHEN NEW.name = 'reject' BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .await?;

    let mut rows: Vec<RegionCode> = (0..700)
        .map(|i| RegionCode::sub_region("1", i.to_string(), format!("area {i}")))
        .collect();
    rows.push(RegionCode::sub_region("2", "0", "reject"));

    assert!(repo::upsert_region_codes(&ctx, &rows).await.is_err());
    assert_eq!(repo::count_region_codes(&ctx).await?, 0);
    Ok(())
}

#[test(tokio::test)]
async fn duplicate_keys_in_batch_collapse_to_last() -> anyhow::Result<()> {
    let ctx = setup_db().await?;
    let rows = vec![
        RegionCode::top_level("1", "old"),
        RegionCode::top_level("1", "new"),
    ];
    assert_eq!(repo::upsert_region_codes(&ctx, &rows).await?, 1);

    let stored = repo::list_region_codes(&ctx, None).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "new");
    assert_eq!(repo::upsert_region_codes(&ctx, &[]).await?, 0);
    Ok(())
}
