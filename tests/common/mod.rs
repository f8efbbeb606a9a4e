#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::routing::{get, post};
use chrono::{DateTime, Utc};
use link_shortener::api::handlers::{health_handler, redirect_handler, shorten_handler};
use link_shortener::application::services::LinkService;
use link_shortener::domain::click_event::ClickEvent;
use link_shortener::domain::entities::{Link, NewLink};
use link_shortener::domain::repositories::{LinkRepository, StoreError};
use link_shortener::state::AppState;
use link_shortener::utils::code_generator::{CodeGenError, CodeGenerator, RandomCodeGenerator};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "http://localhost:8080";

/// In-memory [`LinkRepository`] with a unique index on the short code.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<HashMap<String, Link>>,
    next_id: AtomicI64,
    lookups: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail with a storage error.
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Number of `find_by_code` calls seen so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    pub fn get(&self, code: &str) -> Option<Link> {
        self.links.lock().unwrap().get(code).cloned()
    }

    /// Inserts a link directly, bypassing allocation.
    pub fn insert(&self, code: &str, url: &str, expires_at: Option<DateTime<Utc>>) -> Link {
        let now = Utc::now();
        let link = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            short_code: code.to_string(),
            original_url: url.to_string(),
            created_at: now,
            updated_at: now,
            expires_at,
            click_count: 0,
        };
        self.links
            .lock()
            .unwrap()
            .insert(code.to_string(), link.clone());
        link
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::storage("store unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        self.check()?;
        let mut links = self.links.lock().unwrap();
        if links.contains_key(&new_link.short_code) {
            return Err(StoreError::Conflict);
        }

        let now = Utc::now();
        let link = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            short_code: new_link.short_code.clone(),
            original_url: new_link.original_url,
            created_at: now,
            updated_at: now,
            expires_at: new_link.expires_at,
            click_count: 0,
        };
        links.insert(new_link.short_code, link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Link, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.links
            .lock()
            .unwrap()
            .get(code)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), StoreError> {
        self.check()?;
        let mut links = self.links.lock().unwrap();
        if let Some(link) = links.values_mut().find(|link| link.id == id) {
            link.click_count += 1;
        }
        Ok(())
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

/// Generator replaying a fixed list of codes, then falling back to random ones.
pub struct ScriptedCodeGenerator {
    codes: Mutex<VecDeque<String>>,
}

impl ScriptedCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
        }
    }
}

impl CodeGenerator for ScriptedCodeGenerator {
    fn generate(&self) -> Result<String, CodeGenError> {
        match self.codes.lock().unwrap().pop_front() {
            Some(code) => Ok(code),
            None => RandomCodeGenerator.generate(),
        }
    }
}

pub fn create_test_state_with(
    repo: Arc<InMemoryLinkRepository>,
    generator: Arc<dyn CodeGenerator>,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(100);
    let link_service = Arc::new(LinkService::new(repo, generator, BASE_URL));

    (AppState::new(link_service, tx), rx)
}

pub fn create_test_state(
    repo: Arc<InMemoryLinkRepository>,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    create_test_state_with(repo, Arc::new(RandomCodeGenerator))
}

/// Router with the same routes as the production app, minus the middleware.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .route("/api/v1/shorten", post(shorten_handler))
        .with_state(state)
}

/// Polls `condition` until it holds or two seconds pass.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
