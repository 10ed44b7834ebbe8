//! Wire shapes of the `areaCode1` endpoint.
//!
//! Successful calls return a JSON envelope. Gateway-level failures (bad
//! service key, quota, unknown endpoint) come back as an XML document even
//! when `_type=json` was requested.

use serde::Deserialize;

pub const RESULT_CODE_OK: &str = "0000";
pub const REASON_SERVICE_KEY_NOT_REGISTERED: &str = "30";

/// One entry of the region hierarchy as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaCode {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub response: ApiResponse,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub header: ApiHeader,
    #[serde(default)]
    pub body: Option<ApiBody>,
}

#[derive(Debug, Deserialize)]
pub struct ApiHeader {
    #[serde(rename = "resultCode")]
    pub result_code: String,
    #[serde(rename = "resultMsg", default)]
    pub result_msg: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiBody {
    #[serde(default)]
    pub items: Option<ApiItems>,
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<u64>,
}

/// `items` is `""` when the query matched nothing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiItems {
    Empty(String),
    Present {
        #[serde(default)]
        item: OneOrMany<AreaCodeItem>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AreaCodeItem {
    pub code: CodeValue,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CodeValue {
    Text(String),
    Number(i64),
}

impl CodeValue {
    pub fn into_string(self) -> String {
        match self {
            CodeValue::Text(s) => s.trim().to_string(),
            CodeValue::Number(n) => n.to_string(),
        }
    }
}

impl ApiEnvelope {
    pub fn into_area_codes(self) -> Vec<AreaCode> {
        let items = match self.response.body.and_then(|body| body.items) {
            Some(ApiItems::Present { item }) => item.into_vec(),
            Some(ApiItems::Empty(_)) | None => Vec::new(),
        };
        items
            .into_iter()
            .map(|item| AreaCode {
                code: item.code.into_string(),
                name: item.name,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename = "OpenAPI_ServiceResponse")]
pub struct XmlErrorEnvelope {
    #[serde(rename = "cmmMsgHeader")]
    pub header: CmmMsgHeader,
}

#[derive(Debug, Default, Deserialize)]
pub struct CmmMsgHeader {
    #[serde(rename = "errMsg", default)]
    pub err_msg: String,
    #[serde(rename = "returnAuthMsg", default)]
    pub return_auth_msg: String,
    #[serde(rename = "returnReasonCode", default)]
    pub return_reason_code: String,
}
