use anyhow::Result;
use quizdesk::{
    api::{ApiError, ApiRequest, Gateway, GatewayConfig},
    features::{announcements, auth, quizzes},
    navigation::Navigator,
    store::{CredentialKey, CredentialStore, MemoryStore},
};
use serde_json::json;
use std::{
    net::TcpListener,
    sync::{Arc, Mutex, OnceLock},
    time::Duration,
};
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const REFRESH_PATH: &str = "/api/auth/refresh-token";

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn routes(&self) -> Vec<String> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route.to_string());
        }
    }
}

/// Records, at the moment the session ends, whether the refresh slot is still
/// held and whether a refresh token is still stored.
#[derive(Default)]
struct ObservingNavigator {
    gateway: OnceLock<Gateway>,
    seen: Mutex<Vec<(bool, bool)>>,
}

impl Navigator for ObservingNavigator {
    fn navigate(&self, _route: &str) {
        if let Some(gateway) = self.gateway.get() {
            let refreshing = gateway.is_refreshing();
            let refresh_token_stored = gateway
                .store()
                .get(CredentialKey::RefreshToken)
                .ok()
                .flatten()
                .is_some();
            if let Ok(mut seen) = self.seen.lock() {
                seen.push((refreshing, refresh_token_stored));
            }
        }
    }
}

struct Harness {
    server: MockServer,
    store: Arc<MemoryStore>,
    navigator: Arc<RecordingNavigator>,
    gateway: Gateway,
}

async fn harness(access_token: Option<&str>, refresh_token: Option<&str>) -> Result<Harness> {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryStore::new());
    let navigator = Arc::new(RecordingNavigator::default());

    if let Some(token) = access_token {
        store.set(CredentialKey::AccessToken, token)?;
    }
    if let Some(token) = refresh_token {
        store.set(CredentialKey::RefreshToken, token)?;
    }
    store.set(
        CredentialKey::User,
        r#"{"_id":"u1","name":"Ada","email":"ada@example.com"}"#,
    )?;

    let gateway = Gateway::new(
        &GatewayConfig::new(format!("{}/api", server.uri())),
        store.clone(),
        navigator.clone(),
    )?;

    Ok(Harness {
        server,
        store,
        navigator,
        gateway,
    })
}

fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"}))
}

#[tokio::test]
async fn attaches_stored_access_token() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let h = harness(Some("tok1"), Some("ref1")).await?;

    Mock::given(method("GET"))
        .and(path("/api/quizzes"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&h.server)
        .await;

    let list = quizzes::list_quizzes(&h.gateway).await?;
    assert!(list.is_empty());
    Ok(())
}

#[tokio::test]
async fn auth_endpoint_failure_is_not_refreshed() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let h = harness(Some("tok1"), Some("ref1")).await?;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let request = auth::types::LoginRequest {
        email: "ada@example.com".to_string(),
        password: "wrong-password".to_string(),
    };
    let err = auth::login(&h.gateway, &request).await.err();

    match err {
        Some(ApiError::Http { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(
        h.store.get(CredentialKey::AccessToken)?.as_deref(),
        Some("tok1")
    );
    assert!(h.navigator.routes().is_empty());
    Ok(())
}

#[tokio::test]
async fn signup_and_register_failures_are_not_refreshed() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let h = harness(Some("tok1"), Some("ref1")).await?;

    for endpoint in ["/api/auth/signup", "/api/auth/register"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(unauthorized())
            .expect(1)
            .mount(&h.server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let request = auth::types::SignupRequest {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        password: "hunter22".to_string(),
    };
    let err = auth::signup(&h.gateway, &request).await.err();
    assert!(matches!(err, Some(ApiError::Http { status: 401, .. })));

    let register = ApiRequest::post("/auth/register").json(&json!({"email": "ada@example.com"}))?;
    let err = h.gateway.send(register).await.err();
    assert!(matches!(err, Some(ApiError::Http { status: 401, .. })));

    assert_eq!(
        h.store.get(CredentialKey::RefreshToken)?.as_deref(),
        Some("ref1")
    );
    assert!(h.navigator.routes().is_empty());
    Ok(())
}

#[tokio::test]
async fn session_is_cleared_before_refresh_slot_is_released() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let store = Arc::new(MemoryStore::new());
    store.set(CredentialKey::AccessToken, "tok1")?;
    store.set(CredentialKey::RefreshToken, "ref1")?;

    let navigator = Arc::new(ObservingNavigator::default());
    let gateway = Gateway::new(
        &GatewayConfig::new(format!("{}/api", server.uri())),
        store.clone(),
        navigator.clone(),
    )?;
    let _ = navigator.gateway.set(gateway.clone());

    Mock::given(method("GET"))
        .and(path("/api/quizzes"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = quizzes::list_quizzes(&gateway).await.err();
    assert!(matches!(err, Some(ApiError::RefreshFailed(_))));

    let seen = navigator.seen.lock().map(|s| s.clone()).unwrap_or_default();
    // navigated while still holding the slot, with the refresh token gone
    assert_eq!(seen, vec![(true, false)]);
    assert!(!gateway.is_refreshing());
    assert!(store.is_empty());
    Ok(())
}

#[tokio::test]
async fn non_401_failure_passes_through() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let h = harness(Some("tok1"), Some("ref1")).await?;

    Mock::given(method("GET"))
        .and(path("/api/announcements"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = announcements::list_announcements(&h.gateway).await.err();
    assert!(matches!(err, Some(ApiError::Http { status: 500, .. })));
    Ok(())
}

#[tokio::test]
async fn concurrent_401s_share_one_refresh() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let h = harness(Some("tok1"), Some("ref1")).await?;

    for resource in ["/api/quizzes", "/api/announcements"] {
        Mock::given(method("GET"))
            .and(path(resource))
            .and(header("authorization", "Bearer tok1"))
            .respond_with(unauthorized())
            .expect(1)
            .mount(&h.server)
            .await;
        Mock::given(method("GET"))
            .and(path(resource))
            .and(header("authorization", "Bearer tok2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&h.server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .and(body_json(json!({"refreshToken": "ref1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"accessToken": "tok2"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let (quiz_list, announcement_list) = tokio::join!(
        quizzes::list_quizzes(&h.gateway),
        announcements::list_announcements(&h.gateway)
    );

    assert!(quiz_list?.is_empty());
    assert!(announcement_list?.is_empty());
    assert_eq!(
        h.store.get(CredentialKey::AccessToken)?.as_deref(),
        Some("tok2")
    );
    assert_eq!(
        h.store.get(CredentialKey::RefreshToken)?.as_deref(),
        Some("ref1")
    );
    assert!(!h.gateway.is_refreshing());
    assert!(h.navigator.routes().is_empty());
    Ok(())
}

#[tokio::test]
async fn replayed_call_is_not_retried_again() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let h = harness(Some("tok1"), Some("ref1")).await?;

    Mock::given(method("GET"))
        .and(path("/api/quizzes"))
        .respond_with(unauthorized())
        .expect(2)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "tok2"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = quizzes::list_quizzes(&h.gateway).await.err();
    assert!(matches!(err, Some(ApiError::Http { status: 401, .. })));
    assert_eq!(
        h.store.get(CredentialKey::AccessToken)?.as_deref(),
        Some("tok2")
    );
    assert!(h.navigator.routes().is_empty());
    Ok(())
}

#[tokio::test]
async fn each_expiry_gets_its_own_refresh() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let h = harness(Some("tok1"), Some("ref1")).await?;

    Mock::given(method("DELETE"))
        .and(path("/api/quizzes/q1"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/quizzes/q1"))
        .and(header("authorization", "Bearer tok2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/announcements/a1"))
        .and(header("authorization", "Bearer tok2"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/announcements/a1"))
        .and(header("authorization", "Bearer tok3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "tok2"})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "tok3"})))
        .expect(1)
        .mount(&h.server)
        .await;

    h.gateway.send(ApiRequest::delete("/quizzes/q1")).await?;
    announcements::delete_announcement(&h.gateway, "a1").await?;

    assert_eq!(
        h.store.get(CredentialKey::AccessToken)?.as_deref(),
        Some("tok3")
    );
    assert!(!h.gateway.is_refreshing());
    Ok(())
}

#[tokio::test]
async fn failed_refresh_ends_session_for_every_caller() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let h = harness(Some("tok1"), Some("ref1")).await?;

    for resource in ["/api/quizzes", "/api/announcements"] {
        Mock::given(method("GET"))
            .and(path(resource))
            .respond_with(unauthorized())
            .expect(1)
            .mount(&h.server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"message": "Invalid refresh token"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let (quiz_list, announcement_list) = tokio::join!(
        quizzes::list_quizzes(&h.gateway),
        announcements::list_announcements(&h.gateway)
    );

    for err in [quiz_list.err(), announcement_list.err()] {
        match err {
            Some(ApiError::RefreshFailed(source)) => {
                assert!(matches!(*source, ApiError::Http { status: 403, .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
    assert!(h.store.is_empty());
    assert_eq!(h.navigator.routes(), vec!["/".to_string()]);
    assert!(!h.gateway.is_refreshing());
    Ok(())
}

#[tokio::test]
async fn missing_refresh_token_ends_session_without_calling_api() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let h = harness(Some("tok1"), None).await?;

    Mock::given(method("GET"))
        .and(path("/api/quizzes"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = quizzes::list_quizzes(&h.gateway).await.err();
    assert!(matches!(err, Some(ApiError::RefreshTokenMissing)));
    assert!(err.is_some_and(|e| e.is_session_ended()));
    assert!(h.store.is_empty());
    assert_eq!(h.navigator.routes(), vec!["/".to_string()]);
    Ok(())
}

#[tokio::test]
async fn empty_access_token_in_refresh_response_fails() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let h = harness(Some("tok1"), Some("ref1")).await?;

    Mock::given(method("GET"))
        .and(path("/api/quizzes"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": ""})))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = quizzes::list_quizzes(&h.gateway).await.err();
    match err {
        Some(ApiError::RefreshFailed(source)) => {
            assert!(matches!(*source, ApiError::Parse(_)));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(h.store.is_empty());
    Ok(())
}
