//! Integration tests for profile sync: full replacement, stale retention
//! on transient failure, conflict reporting and auth teardown.

use std::sync::Arc;

use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orbita::api::ApiClient;
use orbita::auth::{Session, TokenStore};
use orbita::onboarding::{
    Field, GateDecision, OnboardingProfile, ProfileStore, ProfileSync, Route, SyncError, gate,
};

fn me_body(specialization_id: Option<u64>) -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "email": "student@example.com",
        "full_name": "Test Student",
        "is_active": true,
        "specialization_id": specialization_id,
        "minor_ids": [12]
    })
}

struct Rig {
    _dir: tempfile::TempDir,
    client: ApiClient,
    profile: Arc<ProfileStore>,
    sync: ProfileSync,
    store: Arc<TokenStore>,
}

fn rig(server: &MockServer) -> Rig {
    let dir = tempdir().unwrap();
    let store = Arc::new(TokenStore::open(dir.path().join("tokens.json")).unwrap());
    store.set(Session::new("tok-1", "ref-1")).unwrap();

    let client = ApiClient::new(server.uri(), Arc::clone(&store));
    let profile = Arc::new(ProfileStore::new());

    // Mirror the application wiring: teardown resets the profile.
    let expired_profile = Arc::clone(&profile);
    client.on_session_expired(move || expired_profile.reset());

    let sync = ProfileSync::new(Arc::clone(&profile));
    Rig {
        _dir: dir,
        client,
        profile,
        sync,
        store,
    }
}

async fn mount_history(server: &MockServer, entries: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/minors/my/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries))
        .mount(server)
        .await;
}

/// Sync resolves the selected minor from the history, not just any
/// assigned minor, and the complete profile gates to the dashboard.
#[tokio::test]
async fn test_sync_resolves_selected_minor() {
    let server = MockServer::start().await;
    let rig = rig(&server);

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body(Some(5))))
        .mount(&server)
        .await;
    mount_history(
        &server,
        serde_json::json!([
            { "minor_id": 3, "status": "archived" },
            { "minor_id": 12, "status": "selected", "selected_at": "2026-02-01T10:00:00Z" }
        ]),
    )
    .await;

    let profile = rig.sync.sync(&rig.client).await.unwrap();
    assert_eq!(profile.verified, Field::Value(true));
    assert_eq!(profile.specialty, Field::Value(5));
    assert_eq!(profile.minor, Field::Value(12));
    assert_eq!(gate::decide(&profile), GateDecision::Target(Route::Dashboard));
}

/// Syncing twice against an unchanged server profile is idempotent.
#[tokio::test]
async fn test_sync_is_idempotent() {
    let server = MockServer::start().await;
    let rig = rig(&server);

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body(Some(5))))
        .expect(2)
        .mount(&server)
        .await;
    mount_history(
        &server,
        serde_json::json!([{ "minor_id": 12, "status": "selected" }]),
    )
    .await;

    let first = rig.sync.sync(&rig.client).await.unwrap();
    let second = rig.sync.sync(&rig.client).await.unwrap();
    assert_eq!(first, second);
}

/// A missing specialization routes to the specialty step even when a
/// minor somehow exists already.
#[tokio::test]
async fn test_sync_without_specialty_gates_to_specialty_step() {
    let server = MockServer::start().await;
    let rig = rig(&server);

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body(None)))
        .mount(&server)
        .await;
    mount_history(&server, serde_json::json!([])).await;

    let profile = rig.sync.sync(&rig.client).await.unwrap();
    assert_eq!(profile.specialty, Field::Unset);
    assert_eq!(profile.minor, Field::Unset);
    assert_eq!(
        gate::decide(&profile),
        GateDecision::Target(Route::SpecialtyStep)
    );
}

/// More than one "selected" entry is an invariant violation: reported as
/// an error, the minor field keeps its prior value, the rest of the
/// profile is still applied.
#[tokio::test]
async fn test_conflicting_selection_reported_not_resolved() {
    let server = MockServer::start().await;
    let rig = rig(&server);
    rig.profile.set(OnboardingProfile {
        verified: Field::Value(true),
        specialty: Field::Value(5),
        minor: Field::Value(7),
    });

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body(Some(9))))
        .mount(&server)
        .await;
    mount_history(
        &server,
        serde_json::json!([
            { "minor_id": 12, "status": "selected" },
            { "minor_id": 13, "status": "selected" }
        ]),
    )
    .await;

    let err = rig.sync.sync(&rig.client).await.unwrap_err();
    assert_eq!(err, SyncError::ConflictingSelection { count: 2 });

    let profile = rig.profile.get();
    assert_eq!(profile.specialty, Field::Value(9), "me fields still applied");
    assert_eq!(profile.minor, Field::Value(7), "minor untouched");
}

/// A transient fetch failure retains prior values instead of bouncing the
/// session back to step one.
#[tokio::test]
async fn test_transient_failure_retains_prior_profile() {
    let server = MockServer::start().await;
    let rig = rig(&server);
    let prior = OnboardingProfile {
        verified: Field::Value(true),
        specialty: Field::Value(5),
        minor: Field::Value(12),
    };
    rig.profile.set(prior);

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = rig.sync.sync(&rig.client).await.unwrap_err();
    assert!(matches!(err, SyncError::Fetch { .. }), "got {:?}", err);
    assert_eq!(rig.profile.get(), prior);
}

/// An authorization failure during sync goes through pipeline teardown:
/// session cleared and the profile reset to unauthenticated.
#[tokio::test]
async fn test_auth_failure_during_sync_tears_down() {
    let server = MockServer::start().await;
    let rig = rig(&server);
    rig.profile.set(OnboardingProfile {
        verified: Field::Value(true),
        specialty: Field::Value(5),
        minor: Field::Value(12),
    });

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = rig.sync.sync(&rig.client).await.unwrap_err();
    assert!(matches!(err, SyncError::Session(_)), "got {:?}", err);

    assert_eq!(rig.store.get(), Session::default());
    assert_eq!(rig.profile.get(), OnboardingProfile::unauthenticated());
}
