use std::sync::Arc;

use dateplan_core::{
    error::{AuthError, ServiceError},
    service::{
        AuthRefreshRequest, AuthService, TokenManager,
        auth::{LoginRequest, RegisterRequest},
    },
    session::MemorySessionStore,
};
use test_log::test;

mod support;
use support::{auth_config, setup_db};

async fn service() -> anyhow::Result<(AuthService, Arc<MemorySessionStore>)> {
    let ctx = setup_db().await?;
    let store = Arc::new(MemorySessionStore::new());
    let tokens = TokenManager::new(auth_config(), store.clone());
    Ok((AuthService::new(ctx, tokens), store))
}

fn register(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        password: password.into(),
        role: None,
        couple_id: Some("couple-1".into()),
    }
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: password.into(),
    }
}

#[test(tokio::test)]
async fn login_issues_pair_that_authenticates() -> anyhow::Result<()> {
    let (auth, store) = service().await?;
    let profile = auth.register(register("Hana@Example.com", "long-enough")).await?;
    assert_eq!(profile.email, "hana@example.com");
    assert_eq!(profile.role, "user");

    let pair = auth.login(login("hana@example.com", "long-enough")).await?;
    assert_eq!(pair.token_type, "Bearer");
    assert_eq!(pair.expires_in, 60);
    assert!(store.contains(&profile.id));

    let ctx = auth.tokens().authenticate(&pair.access_token)?;
    assert_eq!(ctx.user_id, profile.id);
    assert_eq!(ctx.couple_id.as_deref(), Some("couple-1"));
    assert_eq!(auth.profile(&ctx).await?, profile);
    Ok(())
}

#[test(tokio::test)]
async fn wrong_password_and_unknown_email_are_invalid_login() -> anyhow::Result<()> {
    let (auth, store) = service().await?;
    auth.register(register("jun@example.com", "long-enough")).await?;

    for attempt in [
        login("jun@example.com", "wrong-password"),
        login("nobody@example.com", "long-enough"),
        login("not-an-email", "long-enough"),
    ] {
        let err = auth.login(attempt).await.unwrap_err();
        assert_eq!(err.auth_kind(), Some(AuthError::InvalidLogin));
        assert!(err.is_unauthorized());
    }
    assert!(store.is_empty());
    Ok(())
}

#[test(tokio::test)]
async fn duplicate_email_is_conflict() -> anyhow::Result<()> {
    let (auth, _) = service().await?;
    auth.register(register("dup@example.com", "long-enough")).await?;

    let err = auth
        .register(register("DUP@example.com", "another-one"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    Ok(())
}

#[test(tokio::test)]
async fn short_password_is_rejected() -> anyhow::Result<()> {
    let (auth, _) = service().await?;
    let err = auth
        .register(register("short@example.com", "short"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidParams(_)));
    Ok(())
}

#[test(tokio::test)]
async fn refresh_with_live_access_token_is_wrong_approach() -> anyhow::Result<()> {
    let (auth, _) = service().await?;
    auth.register(register("mina@example.com", "long-enough")).await?;
    let pair = auth.login(login("mina@example.com", "long-enough")).await?;

    let err = auth
        .refresh(AuthRefreshRequest {
            access_token: pair.access_token.clone(),
            refresh_token: format!("Bearer {}", pair.refresh_token),
        })
        .await
        .unwrap_err();
    assert_eq!(err.auth_kind(), Some(AuthError::WrongApproach));
    Ok(())
}

#[test(tokio::test)]
async fn logout_drops_session() -> anyhow::Result<()> {
    let (auth, store) = service().await?;
    let profile = auth.register(register("seo@example.com", "long-enough")).await?;
    let pair = auth.login(login("seo@example.com", "long-enough")).await?;

    let out = auth.logout(&format!("Bearer {}", pair.access_token)).await?;
    assert!(out.revoked);
    assert!(!store.contains(&profile.id));

    let again = auth.logout(&pair.access_token).await?;
    assert!(!again.revoked);

    let err = auth.logout("garbage").await.unwrap_err();
    assert_eq!(err.auth_kind(), Some(AuthError::InvalidToken));
    Ok(())
}
