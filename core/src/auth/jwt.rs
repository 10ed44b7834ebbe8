use crate::config::AuthConfig;
use crate::error::{AuthError, ServiceError, ServiceResult};
use anyhow::anyhow;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::constants::{TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};

/// Claim set shared by access and refresh tokens; `typ` tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub couple_id: Option<String>,
    pub role: String,
    pub typ: String,
    pub iss: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

impl TokenClaims {
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.exp as u64
    }
}

/// Who a token pair is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: String,
    pub couple_id: Option<String>,
    pub role: String,
}

impl From<&TokenClaims> for TokenSubject {
    fn from(claims: &TokenClaims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            couple_id: claims.couple_id.clone(),
            role: claims.role.clone(),
        }
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        let secret = secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

pub fn issue_token(
    cfg: &AuthConfig,
    keys: &JwtKeys,
    subject: &TokenSubject,
    typ: &str,
    now: u64,
) -> ServiceResult<String> {
    let ttl = match typ {
        TOKEN_TYPE_ACCESS => cfg.access_ttl_secs,
        TOKEN_TYPE_REFRESH => cfg.refresh_ttl_secs,
        other => return Err(ServiceError::Other(anyhow!("unknown token type {other}"))),
    };
    let exp = now
        .checked_add(ttl)
        .ok_or_else(|| ServiceError::Other(anyhow!("{typ} token exp overflow")))?;

    let claims = TokenClaims {
        sub: subject.user_id.clone(),
        couple_id: subject.couple_id.clone(),
        role: subject.role.clone(),
        typ: typ.to_string(),
        iss: cfg.jwt_issuer.clone(),
        iat: to_usize(now, "iat")?,
        exp: to_usize(exp, "exp")?,
        jti: Uuid::new_v4().to_string(),
    };

    encode_claims(keys, &claims)
}

pub fn encode_claims(keys: &JwtKeys, claims: &TokenClaims) -> ServiceResult<String> {
    let header = Header::new(Algorithm::HS256);
    jsonwebtoken::encode(&header, claims, &keys.encoding)
        .map_err(|err| ServiceError::Other(anyhow!("failed to issue jwt: {err}")))
}

/// Verifies the signature and claim shape only. Expiry is left to the caller.
pub fn decode_ignoring_expiry(
    cfg: &AuthConfig,
    keys: &JwtKeys,
    token: &str,
    expected_typ: &str,
) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(std::slice::from_ref(&cfg.jwt_issuer));
    validation.validate_exp = false;
    validation.validate_nbf = false;

    decode_with(keys, token, &validation, expected_typ)
}

/// Full validation: signature, issuer and expiry with no leeway.
pub fn validate_token(
    cfg: &AuthConfig,
    keys: &JwtKeys,
    token: &str,
    expected_typ: &str,
) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(std::slice::from_ref(&cfg.jwt_issuer));
    validation.validate_exp = true;
    validation.leeway = 0;

    decode_with(keys, token, &validation, expected_typ)
}

fn decode_with(
    keys: &JwtKeys,
    token: &str,
    validation: &Validation,
    expected_typ: &str,
) -> Result<TokenClaims, AuthError> {
    let data = jsonwebtoken::decode::<TokenClaims>(token, &keys.decoding, validation)
        .map_err(|_| AuthError::InvalidToken)?;

    if data.claims.typ != expected_typ || data.claims.sub.trim().is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(data.claims)
}

fn to_usize(value: u64, label: &str) -> ServiceResult<usize> {
    usize::try_from(value)
        .map_err(|_| ServiceError::Other(anyhow!("jwt claim {label} does not fit into usize")))
}
