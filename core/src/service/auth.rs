use crate::auth::access::AccessContext;
use crate::auth::constants::ROLE_USER;
use crate::auth::jwt::TokenSubject;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::utils::{normalize_email, validate_role};
use crate::error::{AuthError, ServiceResult};
use crate::persist::{NewUser, PersistCtx, mapper, repo};
use crate::service::token::{AuthRefreshRequest, AuthTokenPair, TokenManager};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub couple_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub role: String,
    pub couple_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub revoked: bool,
}

/// Account entry points in front of the token manager.
#[derive(Clone)]
pub struct AuthService {
    persist: PersistCtx,
    tokens: TokenManager,
}

impl AuthService {
    pub fn new(persist: PersistCtx, tokens: TokenManager) -> Self {
        Self { persist, tokens }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub async fn register(&self, req: RegisterRequest) -> ServiceResult<UserProfile> {
        let email = normalize_email(&req.email)?;
        let role = validate_role(req.role.as_deref().unwrap_or(ROLE_USER))?;
        let password_hash = hash_password(&req.password)?;
        let couple_id = req
            .couple_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        let row = repo::insert_user(
            &self.persist,
            NewUser {
                email,
                password_hash,
                role,
                couple_id,
            },
        )
        .await?;
        info!("registered user {}", row.id);
        Ok(mapper::user_model_to_profile(row))
    }

    pub async fn login(&self, req: LoginRequest) -> ServiceResult<AuthTokenPair> {
        let email = normalize_email(&req.email).map_err(|_| AuthError::InvalidLogin)?;
        let Some(user) = repo::find_user_by_email(&self.persist, &email).await? else {
            return Err(AuthError::InvalidLogin.into());
        };
        if !verify_password(&req.password, &user.password_hash)? {
            return Err(AuthError::InvalidLogin.into());
        }

        let subject = TokenSubject {
            user_id: user.id,
            couple_id: user.couple_id,
            role: user.role,
        };
        self.tokens.issue_pair(&subject).await
    }

    pub async fn refresh(&self, req: AuthRefreshRequest) -> ServiceResult<AuthTokenPair> {
        self.tokens
            .refresh(&req.access_token, &req.refresh_token)
            .await
    }

    pub async fn logout(&self, access_token: &str) -> ServiceResult<LogoutResponse> {
        let ctx = self.tokens.authenticate(access_token)?;
        let revoked = self.tokens.invalidate(&ctx.user_id).await?;
        info!("user {} logged out (session existed: {revoked})", ctx.user_id);
        Ok(LogoutResponse { revoked })
    }

    pub async fn profile(&self, ctx: &AccessContext) -> ServiceResult<UserProfile> {
        let row = repo::get_user(&self.persist, &ctx.user_id).await?;
        Ok(mapper::user_model_to_profile(row))
    }
}
