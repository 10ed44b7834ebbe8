//! Client for the Korea Tourism Organization open API (TourAPI).

use crate::config::TourApiConfig;
use crate::error::ExternalServiceError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub mod model;

pub use model::AreaCode;
use model::{
    ApiEnvelope, REASON_SERVICE_KEY_NOT_REGISTERED, RESULT_CODE_OK, XmlErrorEnvelope,
};

const AREA_CODE_PATH: &str = "areaCode1";

/// Source of the two-level region hierarchy.
#[async_trait]
pub trait AreaCodeApi: Send + Sync {
    /// Top-level regions when `parent` is `None`, otherwise the sub-regions of `parent`.
    async fn area_codes(&self, parent: Option<&str>) -> Result<Vec<AreaCode>, ExternalServiceError>;
}

#[derive(Clone)]
pub struct TourApiClient {
    client: Client,
    endpoint: String,
    cfg: TourApiConfig,
}

impl TourApiClient {
    pub fn new(cfg: TourApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()?;
        let endpoint = format!("{}/{AREA_CODE_PATH}", cfg.base_url.trim().trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            cfg,
        })
    }

    fn query(&self, parent: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("serviceKey", self.cfg.service_key.clone()),
            ("numOfRows", self.cfg.page_size.to_string()),
            ("pageNo", "1".to_string()),
            ("MobileOS", self.cfg.mobile_os.clone()),
            ("MobileApp", self.cfg.mobile_app.clone()),
            ("_type", "json".to_string()),
        ];
        if let Some(parent) = parent {
            params.push(("areaCode", parent.to_string()));
        }
        params
    }
}

#[async_trait]
impl AreaCodeApi for TourApiClient {
    async fn area_codes(&self, parent: Option<&str>) -> Result<Vec<AreaCode>, ExternalServiceError> {
        debug!("fetching area codes (parent={parent:?})");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query(parent))
            .send()
            .await
            .map_err(|e| ExternalServiceError::Unknown(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExternalServiceError::Unknown(format!("failed to read body: {e}")))?;

        decode_response(status, &body)
    }
}

/// Classifies a raw `areaCode1` response.
pub fn decode_response(status: StatusCode, body: &str) -> Result<Vec<AreaCode>, ExternalServiceError> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('<') {
        return Err(classify_xml_error(trimmed));
    }
    if status != StatusCode::OK {
        return Err(ExternalServiceError::Unknown(format!("unexpected status {status}")));
    }

    let envelope: ApiEnvelope = serde_json::from_str(trimmed)
        .map_err(|e| ExternalServiceError::Unknown(format!("undecodable body: {e}")))?;
    let header = &envelope.response.header;
    if header.result_code != RESULT_CODE_OK {
        return Err(ExternalServiceError::Unknown(format!(
            "result code {}: {}",
            header.result_code, header.result_msg
        )));
    }
    Ok(envelope.into_area_codes())
}

fn classify_xml_error(body: &str) -> ExternalServiceError {
    let header = match quick_xml::de::from_str::<XmlErrorEnvelope>(body) {
        Ok(envelope) => envelope.header,
        Err(e) => return ExternalServiceError::Unknown(format!("unrecognised xml body: {e}")),
    };
    if header.return_reason_code.trim() == REASON_SERVICE_KEY_NOT_REGISTERED {
        warn!("tour api rejected the service key: {}", header.return_auth_msg);
        return ExternalServiceError::InvalidCredentials;
    }
    ExternalServiceError::Unknown(format!(
        "reason {}: {} {}",
        header.return_reason_code, header.err_msg, header.return_auth_msg
    ))
}
