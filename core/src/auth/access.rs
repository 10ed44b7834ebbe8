use super::constants::ROLE_ADMIN;
use super::jwt::TokenClaims;
use crate::error::{AuthError, ServiceError, ServiceResult};

/// Identity attached to a request after its access token was validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessContext {
    pub user_id: String,
    pub couple_id: Option<String>,
    pub role: String,
}

impl From<TokenClaims> for AccessContext {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            couple_id: claims.couple_id,
            role: claims.role,
        }
    }
}

pub fn require_admin_role(auth: &AccessContext) -> ServiceResult<()> {
    if !auth.role.trim().eq_ignore_ascii_case(ROLE_ADMIN) {
        return Err(ServiceError::Auth(AuthError::InvalidToken));
    }
    Ok(())
}

/// Returns the couple the caller belongs to, or rejects unlinked accounts.
pub fn require_couple(auth: &AccessContext) -> ServiceResult<&str> {
    auth.couple_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ServiceError::InvalidParams("account is not linked to a couple".into()))
}
