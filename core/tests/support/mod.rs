#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use dateplan_core::{
    config::{AuthConfig, TourApiConfig},
    persist::PersistCtx,
    tour_api::TourApiClient,
};
use migration::{Migrator, MigratorTrait};
use parking_lot::Mutex;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};

pub async fn setup_db() -> anyhow::Result<PersistCtx> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(PersistCtx::from_conn(db))
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_hmac_secret: "integration-secret".into(),
        jwt_issuer: "dateplan-test".into(),
        access_ttl_secs: 60,
        refresh_ttl_secs: 600,
    }
}

pub const SERVICE_KEY: &str = "test-service-key";

pub fn tour_api_client(base_url: &str) -> anyhow::Result<TourApiClient> {
    TourApiClient::new(TourApiConfig {
        base_url: base_url.to_string(),
        service_key: SERVICE_KEY.into(),
        page_size: 100,
        mobile_os: "ETC".into(),
        mobile_app: "dateplan".into(),
        timeout_secs: 5,
    })
}

#[derive(Default)]
struct MockState {
    regions: Vec<(String, String)>,
    subs: HashMap<String, Vec<(String, String)>>,
    xml_reason: Option<String>,
    failing_parent: Option<String>,
    requests: Vec<HashMap<String, String>>,
}

/// In-process stand-in for the TourAPI `areaCode1` endpoint.
#[derive(Clone, Default)]
pub struct MockTourApi {
    state: Arc<Mutex<MockState>>,
}

impl MockTourApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self, code: &str, name: &str, subs: &[(&str, &str)]) -> &Self {
        let mut state = self.state.lock();
        state.regions.push((code.into(), name.into()));
        state.subs.insert(
            code.into(),
            subs.iter().map(|(c, n)| (c.to_string(), n.to_string())).collect(),
        );
        self
    }

    pub fn rename_sub(&self, main: &str, sub: &str, name: &str) {
        let mut state = self.state.lock();
        if let Some(entry) = state
            .subs
            .get_mut(main)
            .and_then(|subs| subs.iter_mut().find(|(code, _)| code == sub))
        {
            entry.1 = name.to_string();
        }
    }

    pub fn reject_with_reason(&self, reason: &str) {
        self.state.lock().xml_reason = Some(reason.to_string());
    }

    pub fn fail_sub_regions_of(&self, main: &str) {
        self.state.lock().failing_parent = Some(main.to_string());
    }

    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.state.lock().requests.clone()
    }

    /// Serves on an ephemeral port and returns the base URL.
    pub async fn spawn(&self) -> anyhow::Result<String> {
        let app = Router::new()
            .route("/areaCode1", get(area_code1))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("mock tour api stopped: {e}");
            }
        });
        Ok(format!("http://{addr}"))
    }
}

async fn area_code1(
    State(mock): State<MockTourApi>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = mock.state.lock();
    state.requests.push(params.clone());

    if let Some(reason) = state.xml_reason.clone() {
        return (
            [(header::CONTENT_TYPE, "text/xml;charset=UTF-8")],
            xml_error(&reason),
        )
            .into_response();
    }

    let rows = match params.get("areaCode") {
        None => state.regions.clone(),
        Some(parent) if state.failing_parent.as_deref() == Some(parent.as_str()) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "upstream unavailable").into_response();
        }
        Some(parent) => state.subs.get(parent).cloned().unwrap_or_default(),
    };
    Json(envelope(&rows)).into_response()
}

fn envelope(rows: &[(String, String)]) -> Value {
    let items = match rows {
        [] => json!(""),
        [(code, name)] => json!({ "item": { "rnum": 1, "code": code, "name": name } }),
        many => {
            let item: Vec<Value> = many
                .iter()
                .enumerate()
                .map(|(i, (code, name))| match code.parse::<i64>() {
                    Ok(n) => json!({ "rnum": i + 1, "code": n, "name": name }),
                    Err(_) => json!({ "rnum": i + 1, "code": code, "name": name }),
                })
                .collect();
            json!({ "item": item })
        }
    };
    json!({
        "response": {
            "header": { "resultCode": "0000", "resultMsg": "OK" },
            "body": {
                "items": items,
                "numOfRows": 100,
                "pageNo": 1,
                "totalCount": rows.len()
            }
        }
    })
}

fn xml_error(reason: &str) -> String {
    format!(
        "<OpenAPI_ServiceResponse>\
         <cmmMsgHeader>\
         <errMsg>SERVICE ERROR</errMsg>\
         <returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg>\
         <returnReasonCode>{reason}</returnReasonCode>\
         </cmmMsgHeader>\
         </OpenAPI_ServiceResponse>"
    )
}
