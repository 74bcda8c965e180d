//! Login, register, logout, and startup verification against a stub backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use easybuy_core::Role;
use easybuy_integration_tests::TestBackend;
use easybuy_storefront::storage::MemoryStorage;
use easybuy_storefront::{
    ApiError, AuthPhase, ClientConfig, Destination, RegisterForm, RouteDecision, StoreContext,
};

#[tokio::test]
async fn login_establishes_session_and_routes_by_role() {
    let backend = TestBackend::start().await;
    backend.mount_login_success("tok-123", "Admin").await;
    let ctx = backend.context().await;

    let user = ctx.auth().login("shopper@example.com", "hunter2").await.unwrap();

    // Mixed-case role from the wire is normalized once
    assert_eq!(user.role, Role::Admin);
    assert!(ctx.session().snapshot().is_authenticated());
    assert_eq!(
        ctx.routing().post_login(&user, ctx.session()),
        Destination::AdminDashboard
    );
}

#[tokio::test]
async fn login_as_customer_lands_on_dashboard() {
    let backend = TestBackend::start().await;
    backend.mount_login_success("tok-123", "user").await;
    let ctx = backend.context().await;

    let user = ctx.auth().login("shopper@example.com", "hunter2").await.unwrap();

    assert_eq!(user.role, Role::Customer);
    assert_eq!(
        ctx.routing().post_login(&user, ctx.session()),
        Destination::Dashboard
    );
}

#[tokio::test]
async fn login_sends_credentials_as_json() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({
            "email": "shopper@example.com",
            "password": "hunter2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-123",
            "user": TestBackend::user_json("user"),
        })))
        .expect(1)
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    ctx.auth().login("shopper@example.com", "hunter2").await.unwrap();
}

#[tokio::test]
async fn login_with_wrong_password_is_invalid_credentials() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let err = ctx
        .auth()
        .login("shopper@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredentials));
    assert!(!ctx.session().snapshot().is_authenticated());
}

#[tokio::test]
async fn login_surfaces_server_errors() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let err = ctx
        .auth()
        .login("shopper@example.com", "pw")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 500 }));
}

#[tokio::test]
async fn login_with_unreachable_backend_is_a_network_error() {
    // Nothing listens on this port
    let config = ClientConfig::new("http://127.0.0.1:9".parse().unwrap());
    let ctx = StoreContext::init_with_storage(config, Arc::new(MemoryStorage::new()))
        .await
        .unwrap();

    let err = ctx
        .auth()
        .login("shopper@example.com", "pw")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn register_with_mismatched_confirmation_never_hits_the_network() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let err = ctx
        .auth()
        .register(RegisterForm {
            name: "New Shopper".into(),
            email: "new@example.com".into(),
            password: "pw-one".into(),
            confirm_password: "pw-two".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    // expect(0) is verified when the mock server drops
}

#[tokio::test]
async fn register_success_behaves_like_login() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "name": "New Shopper",
            "email": "new@example.com",
            "password": "pw",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-reg",
            "user": TestBackend::user_json("user"),
        })))
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let user = ctx
        .auth()
        .register(RegisterForm {
            name: "New Shopper".into(),
            email: "new@example.com".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
        })
        .await
        .unwrap();

    assert_eq!(user.role, Role::Customer);
    assert!(ctx.session().snapshot().is_authenticated());
}

#[tokio::test]
async fn restart_with_valid_token_restores_the_session() {
    let backend = TestBackend::start().await;
    backend.mount_login_success("tok-123", "user").await;
    backend.mount_verify_ok("user").await;

    let storage = Arc::new(MemoryStorage::new());
    {
        let ctx = backend.context_with_storage(storage.clone()).await;
        ctx.auth().login("shopper@example.com", "pw").await.unwrap();
    }

    // "Reload": fresh context over the same storage runs verification
    let ctx = backend.context_with_storage(storage).await;
    let snapshot = ctx.session().snapshot();
    assert_eq!(snapshot.phase, AuthPhase::Authenticated);
    assert!(snapshot.is_authenticated());
}

#[tokio::test]
async fn restart_with_rejected_token_resolves_anonymous() {
    let backend = TestBackend::start().await;
    backend.mount_login_success("tok-stale", "user").await;
    backend.mount_verify_rejection().await;

    let storage = Arc::new(MemoryStorage::new());
    {
        let ctx = backend.context_with_storage(storage.clone()).await;
        ctx.auth().login("shopper@example.com", "pw").await.unwrap();
    }

    let ctx = backend.context_with_storage(storage.clone()).await;
    let snapshot = ctx.session().snapshot();
    assert_eq!(snapshot.phase, AuthPhase::Anonymous);
    assert!(snapshot.user.is_none(), "no stale logged-in state");
    drop(ctx);

    // The dead credentials were scrubbed: another restart does not even
    // call verify
    let quiet = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&quiet.server)
        .await;
    let ctx = quiet.context_with_storage(storage).await;
    assert_eq!(ctx.session().snapshot().phase, AuthPhase::Anonymous);
}

#[tokio::test]
async fn logout_clears_persisted_state_and_gates_admin_routes() {
    let backend = TestBackend::start().await;
    backend.mount_login_success("tok-123", "Admin").await;
    let ctx = backend.context().await;

    ctx.auth().login("admin@example.com", "pw").await.unwrap();
    assert_eq!(
        ctx.routing().decide("/admin", ctx.session()),
        RouteDecision::Allow
    );

    assert_eq!(ctx.auth().logout(), Destination::Landing);
    assert!(!ctx.session().snapshot().is_authenticated());
    assert_eq!(
        ctx.routing().decide("/admin", ctx.session()),
        RouteDecision::Redirect(Destination::Landing)
    );

    // idempotent
    assert_eq!(ctx.auth().logout(), Destination::Landing);
}

#[tokio::test]
async fn any_401_forces_a_logout() {
    let backend = TestBackend::start().await;
    backend.mount_login_success("tok-123", "user").await;
    Mock::given(method("GET"))
        .and(path("/api/product"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    ctx.auth().login("shopper@example.com", "pw").await.unwrap();
    assert!(ctx.session().snapshot().is_authenticated());

    // A plain catalog call comes back 401; the interceptor tears the
    // session down centrally
    let err = ctx.api().list_products().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert!(!ctx.session().snapshot().is_authenticated());
    assert_eq!(
        ctx.routing().decide("/dashboard", ctx.session()),
        RouteDecision::Redirect(Destination::Login)
    );
}

#[tokio::test]
async fn denied_path_is_resumed_after_login() {
    let backend = TestBackend::start().await;
    backend.mount_login_success("tok-123", "user").await;
    let ctx = backend.context().await;

    // Anonymous visitor hits a protected page
    assert_eq!(
        ctx.routing().decide("/orders/42", ctx.session()),
        RouteDecision::Redirect(Destination::Login)
    );

    let user = ctx.auth().login("shopper@example.com", "pw").await.unwrap();
    assert_eq!(
        ctx.routing().post_login(&user, ctx.session()),
        Destination::Resume("/orders/42".to_owned())
    );
    // consumed after one redirect cycle
    assert_eq!(
        ctx.routing().post_login(&user, ctx.session()),
        Destination::Dashboard
    );
}
