mod common;

use axum_test::TestServer;
use chrono::{Duration, Utc};
use common::InMemoryLinkRepository;
use link_shortener::application::services::LinkService;
use link_shortener::domain::click_event::ClickEvent;
use link_shortener::domain::click_worker::run_click_worker;
use link_shortener::state::AppState;
use link_shortener::utils::code_generator::RandomCodeGenerator;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_redirect_success() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("abc12", "https://example.com/target", None);
    let (state, _rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_router(state)).unwrap();

    let response = server.get("/abc12").await;

    assert_eq!(response.status_code(), 307);
    let location = response.header("location");
    assert_eq!(location, "https://example.com/target");
}

#[tokio::test]
async fn test_shorten_then_redirect_round_trip() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (state, _rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_router(state)).unwrap();

    let target = "https://example.com/some/path?q=rust&page=2";
    let created = server
        .post("/api/v1/shorten")
        .json(&json!({ "url": target }))
        .await;
    assert_eq!(created.status_code(), 201);

    let code = created.json::<serde_json::Value>()["short_code"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server.get(&format!("/{code}")).await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), target);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (state, _rx) = common::create_test_state(repo.clone());
    let server = TestServer::new(common::test_router(state)).unwrap();

    let response = server.get("/zzzzz").await;

    response.assert_status_not_found();
    assert!(response.json::<serde_json::Value>()["error"].is_string());
    assert_eq!(repo.lookups(), 1);
}

#[tokio::test]
async fn test_redirect_wrong_length_skips_store() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (state, _rx) = common::create_test_state(repo.clone());
    let server = TestServer::new(common::test_router(state)).unwrap();

    for path in ["/ab", "/abcd", "/abcdef", "/toolongcode"] {
        let response = server.get(path).await;
        response.assert_status_not_found();
        assert!(response.json::<serde_json::Value>()["error"].is_string());
    }

    assert_eq!(repo.lookups(), 0);
}

#[tokio::test]
async fn test_redirect_expired_link() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert(
        "old01",
        "https://example.com/old",
        Some(Utc::now() - Duration::seconds(1)),
    );
    let (state, mut rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_router(state)).unwrap();

    let response = server.get("/old01").await;

    assert_eq!(response.status_code(), 410);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"], "link expired");
    assert_eq!(json["originalUrl"], "https://example.com/old");
    assert!(response.headers().get("location").is_none());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_not_yet_expired_link() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert(
        "new01",
        "https://example.com/new",
        Some(Utc::now() + Duration::seconds(3600)),
    );
    let (state, _rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_router(state)).unwrap();

    let response = server.get("/new01").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/new");
}

#[tokio::test]
async fn test_redirect_storage_failure() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.fail_all();
    let (state, _rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_router(state)).unwrap();

    let response = server.get("/abc12").await;

    assert_eq!(response.status_code(), 500);
    assert!(response.json::<serde_json::Value>()["error"].is_string());
}

#[tokio::test]
async fn test_redirect_queues_click() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let link = repo.insert("click", "https://example.com", None);
    let (state, mut rx) = common::create_test_state(repo);
    let server = TestServer::new(common::test_router(state)).unwrap();

    let response = server.get("/click").await;
    assert_eq!(response.status_code(), 307);

    let event = rx.try_recv().unwrap();
    assert_eq!(event, ClickEvent::new(link.id, "click"));
}

#[tokio::test]
async fn test_redirect_succeeds_when_click_queue_closed() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("click", "https://example.com", None);
    let (state, rx) = common::create_test_state(repo);
    drop(rx);
    let server = TestServer::new(common::test_router(state)).unwrap();

    let response = server.get("/click").await;

    assert_eq!(response.status_code(), 307);
}

#[tokio::test]
async fn test_redirect_succeeds_when_click_queue_full() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("click", "https://example.com", None);

    let (tx, _rx) = mpsc::channel(1);
    let service = Arc::new(LinkService::new(
        repo,
        Arc::new(RandomCodeGenerator),
        common::BASE_URL,
    ));
    let server = TestServer::new(common::test_router(AppState::new(service, tx))).unwrap();

    for _ in 0..3 {
        let response = server.get("/click").await;
        assert_eq!(response.status_code(), 307);
    }
}

#[tokio::test]
async fn test_redirects_are_counted_by_worker() {
    const CLICKS: i64 = 25;

    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("count", "https://example.com", None);

    let (tx, rx) = mpsc::channel(1000);
    let worker = tokio::spawn(run_click_worker(rx, repo.clone(), 4));

    let service = Arc::new(LinkService::new(
        repo.clone(),
        Arc::new(RandomCodeGenerator),
        common::BASE_URL,
    ));
    let server = TestServer::new(common::test_router(AppState::new(service, tx))).unwrap();

    for _ in 0..CLICKS {
        let response = server.get("/count").await;
        assert_eq!(response.status_code(), 307);
    }

    let counted = common::eventually(|| repo.get("count").unwrap().click_count == CLICKS).await;
    assert!(counted, "expected {CLICKS} clicks");

    worker.abort();
}

#[tokio::test]
async fn test_concurrent_clicks_are_not_lost() {
    const CLICKS: i64 = 200;

    let repo = Arc::new(InMemoryLinkRepository::new());
    let link = repo.insert("busy1", "https://example.com", None);

    let (tx, rx) = mpsc::channel(1000);
    let worker = tokio::spawn(run_click_worker(rx, repo.clone(), 8));

    let mut senders = Vec::new();
    for _ in 0..CLICKS {
        let tx = tx.clone();
        senders.push(tokio::spawn(async move {
            tx.send(ClickEvent::new(link.id, "busy1")).await.unwrap();
        }));
    }
    drop(tx);

    for sender in senders {
        sender.await.unwrap();
    }
    worker.await.unwrap();

    assert_eq!(repo.get("busy1").unwrap().click_count, CLICKS);
}

#[tokio::test]
async fn test_concurrent_creates_yield_unique_codes() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let service = Arc::new(LinkService::new(
        repo.clone(),
        Arc::new(RandomCodeGenerator),
        common::BASE_URL,
    ));

    let mut tasks = Vec::new();
    for i in 0..100 {
        let service = service.clone();
        tasks.push(tokio::spawn(async move {
            service
                .create_short_link(&format!("https://example.com/{i}"), None)
                .await
                .unwrap()
                .short_code
        }));
    }

    let mut codes = HashSet::new();
    for task in tasks {
        codes.insert(task.await.unwrap());
    }

    assert_eq!(codes.len(), 100);
    assert_eq!(repo.len(), 100);
}
