use std::sync::Arc;

use aim_core::model::{CourseId, ModuleId, ProgressRecord, Session, User, UserId};
use aim_core::time::fixed_now;
use mockito::{Matcher, Server};
use storage::remote::{RemoteConfig, RemoteProgressRepository};
use storage::repository::{
    InMemoryRepository, ProgressRepository, SessionStore, StoredSessionToken, TokenSource,
};
use storage::StorageError;

fn record() -> ProgressRecord {
    ProgressRecord::new(
        UserId::new("u1"),
        CourseId::new("c1"),
        ModuleId::new("m1-2"),
        fixed_now(),
    )
}

async fn signed_in_tokens() -> Arc<dyn TokenSource> {
    let sessions = Arc::new(InMemoryRepository::new());
    let user = User::new(UserId::new("u1"), Some("a@example.com".into()), None);
    sessions
        .save_session(&Session::new(user, "user-token"))
        .await
        .unwrap();
    Arc::new(StoredSessionToken(sessions))
}

#[tokio::test]
async fn upsert_targets_composite_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/user_progress")
        .match_query(Matcher::UrlEncoded(
            "on_conflict".into(),
            "user_id,course_id,module_id".into(),
        ))
        .match_header("apikey", "anon")
        .match_header("authorization", "Bearer user-token")
        .match_header("prefer", Matcher::Regex("resolution=merge-duplicates".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "user_id": "u1",
            "course_id": "c1",
            "module_id": "m1-2",
        })))
        .with_status(201)
        .create_async()
        .await;

    let repo = RemoteProgressRepository::new(
        RemoteConfig::new(server.url(), "anon"),
        signed_in_tokens().await,
    );
    repo.record_completion(&record()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn read_filters_by_user_and_falls_back_to_anon_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/user_progress")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "course_id,module_id,completed_at".into()),
            Matcher::UrlEncoded("user_id".into(), "eq.u1".into()),
        ]))
        .match_header("authorization", "Bearer anon")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"course_id":"c1","module_id":"m1-1","completed_at":"2023-11-14T22:13:20+00:00"},
                {"course_id":"c2","module_id":"m2-1","completed_at":null}
            ]"#,
        )
        .create_async()
        .await;

    let repo = RemoteProgressRepository::new(
        RemoteConfig::new(server.url(), "anon"),
        Arc::new(StoredSessionToken(Arc::new(InMemoryRepository::new()))),
    );
    let records = repo.list_for_user(&UserId::new("u1")).await.unwrap();
    mock.assert_async().await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].completed_at, fixed_now());
    assert_eq!(records[1].course_id.as_str(), "c2");
    assert!(records.iter().all(|r| r.user_id.as_str() == "u1"));
}

#[tokio::test]
async fn error_status_maps_to_remote_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message":"JWT expired"}"#)
        .create_async()
        .await;

    let repo = RemoteProgressRepository::new(
        RemoteConfig::new(server.url(), "anon"),
        signed_in_tokens().await,
    );
    let err = repo.list_for_user(&UserId::new("u1")).await.unwrap_err();
    match err {
        StorageError::Remote { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("JWT expired"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
