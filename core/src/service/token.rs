use crate::auth::access::AccessContext;
use crate::auth::constants::{TOKEN_TYPE_ACCESS, TOKEN_TYPE_BEARER, TOKEN_TYPE_REFRESH};
use crate::auth::jwt::{self, JwtKeys, TokenSubject};
use crate::auth::utils::{hash_refresh_token, strip_bearer_prefix};
use crate::config::AuthConfig;
use crate::error::{AuthError, ServiceResult};
use crate::session::SessionStore;
use crate::util::unix_now;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Access/refresh pair handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthRefreshRequest {
    pub access_token: String,
    pub refresh_token: String,
}

struct Inner {
    cfg: AuthConfig,
    keys: JwtKeys,
    store: Arc<dyn SessionStore>,
}

/// Issues, validates and rotates token pairs.
///
/// At most one refresh token per user is trusted at a time: the store keeps the
/// digest of the last one issued and every new pair overwrites it.
#[derive(Clone)]
pub struct TokenManager {
    inner: Arc<Inner>,
}

impl TokenManager {
    pub fn new(cfg: AuthConfig, store: Arc<dyn SessionStore>) -> Self {
        let keys = JwtKeys::from_secret(&cfg.jwt_hmac_secret);
        Self {
            inner: Arc::new(Inner { cfg, keys, store }),
        }
    }

    pub async fn issue_pair(&self, subject: &TokenSubject) -> ServiceResult<AuthTokenPair> {
        self.issue_pair_at(subject, unix_now()).await
    }

    pub async fn issue_pair_at(
        &self,
        subject: &TokenSubject,
        now: u64,
    ) -> ServiceResult<AuthTokenPair> {
        let cfg = &self.inner.cfg;
        let keys = &self.inner.keys;
        let access_token = jwt::issue_token(cfg, keys, subject, TOKEN_TYPE_ACCESS, now)?;
        let refresh_token = jwt::issue_token(cfg, keys, subject, TOKEN_TYPE_REFRESH, now)?;

        self.inner
            .store
            .set(
                &subject.user_id,
                &hash_refresh_token(&refresh_token),
                Duration::from_secs(cfg.refresh_ttl_secs),
            )
            .await?;

        Ok(AuthTokenPair {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: cfg.access_ttl_secs,
        })
    }

    pub async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> ServiceResult<AuthTokenPair> {
        self.refresh_at(access_token, refresh_token, unix_now()).await
    }

    /// Rotates the pair when the access token has expired and the refresh token
    /// is still live and matches the stored digest.
    pub async fn refresh_at(
        &self,
        access_token: &str,
        refresh_token: &str,
        now: u64,
    ) -> ServiceResult<AuthTokenPair> {
        let cfg = &self.inner.cfg;
        let keys = &self.inner.keys;
        let access_raw = strip_bearer_prefix(access_token);
        let refresh_raw = strip_bearer_prefix(refresh_token);

        let access = jwt::decode_ignoring_expiry(cfg, keys, access_raw, TOKEN_TYPE_ACCESS)?;
        let refresh = jwt::decode_ignoring_expiry(cfg, keys, refresh_raw, TOKEN_TYPE_REFRESH)?;

        let access_expired = access.is_expired_at(now);
        let refresh_expired = refresh.is_expired_at(now);

        if !access_expired {
            debug!("refresh requested for live access token of {}", access.sub);
            return Err(AuthError::WrongApproach.into());
        }
        if refresh_expired {
            return Err(AuthError::BothExpired.into());
        }

        let user_id = access.sub.as_str();
        match self.inner.store.get(user_id).await? {
            Some(stored) if stored == hash_refresh_token(refresh_raw) => {
                let pair = self
                    .issue_pair_at(&TokenSubject::from(&access), now)
                    .await?;
                info!("rotated token pair for user {user_id}");
                Ok(pair)
            }
            Some(_) => {
                warn!("refresh token mismatch for user {user_id}");
                Err(AuthError::TokenMismatch.into())
            }
            None => {
                self.inner.store.delete(user_id).await?;
                warn!("no active session for user {user_id}");
                Err(AuthError::TokenMismatch.into())
            }
        }
    }

    /// Full access-token validation for protected calls.
    pub fn authenticate(&self, access_token: &str) -> ServiceResult<AccessContext> {
        let claims = jwt::validate_token(
            &self.inner.cfg,
            &self.inner.keys,
            strip_bearer_prefix(access_token),
            TOKEN_TYPE_ACCESS,
        )?;
        Ok(AccessContext::from(claims))
    }

    /// Drops the stored refresh digest. Returns whether a session existed.
    pub async fn invalidate(&self, user_id: &str) -> ServiceResult<bool> {
        let removed = self.inner.store.delete(user_id).await?;
        Ok(removed)
    }
}
