use super::constants::{BEARER_PREFIX, ROLES_ALLOWED};
use crate::error::{ServiceError, ServiceResult};
use sha2::{Digest, Sha256};

/// Strips one leading `Bearer ` (any case) and surrounding whitespace.
pub fn strip_bearer_prefix(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.get(..BEARER_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(BEARER_PREFIX) => {
            trimmed[BEARER_PREFIX.len()..].trim()
        }
        _ => trimmed,
    }
}

pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn normalize_email(raw: &str) -> ServiceResult<String> {
    let email = raw.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !valid {
        return Err(ServiceError::InvalidParams("invalid email".into()));
    }
    Ok(email)
}

pub fn validate_role(role: &str) -> ServiceResult<String> {
    let role = role.trim().to_lowercase();
    if !ROLES_ALLOWED.contains(&role.as_str()) {
        return Err(ServiceError::InvalidParams(format!("unknown role {role}")));
    }
    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bearer_prefix_case_insensitively() {
        assert_eq!(strip_bearer_prefix("Bearer abc.def"), "abc.def");
        assert_eq!(strip_bearer_prefix("  bearer   abc.def "), "abc.def");
        assert_eq!(strip_bearer_prefix("abc.def"), "abc.def");
        assert_eq!(strip_bearer_prefix("Bear"), "Bear");
    }

    #[test]
    fn refresh_hash_is_stable_hex() {
        let a = hash_refresh_token("token");
        assert_eq!(a.len(), 64);
        assert_eq!(a, hash_refresh_token("token"));
        assert_ne!(a, hash_refresh_token("token2"));
    }

    #[test]
    fn emails_are_lowercased_and_checked() {
        assert_eq!(normalize_email(" Me@Example.COM ").unwrap(), "me@example.com");
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
    }

    #[test]
    fn roles_are_restricted() {
        assert_eq!(validate_role("ADMIN").unwrap(), "admin");
        assert!(validate_role("root").is_err());
    }
}
