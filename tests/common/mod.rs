//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use async_trait::async_trait;
use conduit::pages::{app, App, Services};
use conduit::program::Runtime;
use conduit::remote::{
    ApiRequest, ApiResponse, Article, KeyValueStore, MemoryStore, Method, Profile, RemoteClient,
    Session, Transport, TransportError, Viewer, AUTH_TOKEN_KEY,
};
use conduit::routing::{Location, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// A scripted answer of [`MockTransport`].
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, Value),
    /// No response at all.
    Network,
}

/// Transport answering from a script keyed by method and path.
///
/// Replies for a route are consumed in order; the last one repeats.
/// Unscripted routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<HashMap<(&'static str, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: Method, path: &str, reply: Reply) {
        self.script
            .lock()
            .entry((method.as_str(), path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn ok(&self, method: Method, path: &str, body: Value) {
        self.reply(method, path, Reply::Status(200, body));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    /// Requests sent to `path` with any method.
    pub fn calls(&self, path: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.path == path).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let key = (request.method.as_str(), request.path.clone());
        self.requests.lock().push(request);
        let reply = {
            let mut script = self.script.lock();
            match script.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        match reply {
            Some(Reply::Status(status, payload)) => Ok(ApiResponse { status, payload }),
            Some(Reply::Network) => Err(TransportError::Connection("connection refused".into())),
            None => Ok(ApiResponse {
                status: 404,
                payload: json!({}),
            }),
        }
    }
}

pub fn viewer(username: &str) -> Viewer {
    Viewer {
        email: format!("{username}@example.com"),
        token: format!("token-{username}"),
        username: username.to_string(),
        bio: None,
        image: None,
    }
}

pub fn user_body(username: &str) -> Value {
    json!({ "user": viewer(username) })
}

pub fn article(slug: &str, author: &str) -> Article {
    Article {
        slug: slug.to_string(),
        title: format!("Title of {slug}"),
        description: "about".to_string(),
        body: "text".to_string(),
        created_at: "2024-01-02T03:04:05.000Z".to_string(),
        updated_at: "2024-01-02T03:04:05.000Z".to_string(),
        author: Profile {
            username: author.to_string(),
            ..Profile::default()
        },
        ..Article::default()
    }
}

pub fn article_body(slug: &str, author: &str) -> Value {
    json!({ "article": article(slug, author) })
}

/// Everything a test needs to drive the application.
pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryStore>,
    pub remote: RemoteClient,
    pub router: Router,
}

impl Harness {
    pub fn new(fragment: &str) -> Self {
        Self::with_store(fragment, MemoryStore::new())
    }

    /// Starts with `token` already persisted.
    pub fn signed_in(fragment: &str, token: &str) -> Self {
        Self::with_store(fragment, MemoryStore::with_entry(AUTH_TOKEN_KEY, token))
    }

    fn with_store(fragment: &str, store: MemoryStore) -> Self {
        let transport = MockTransport::new();
        let store = Arc::new(store);
        let session = Session::new(store.clone());
        let remote = RemoteClient::new(transport.clone(), session);
        Self {
            transport,
            store,
            remote,
            router: Router::new(Location::new(fragment)),
        }
    }

    pub fn services(&self) -> Services {
        Services::new(self.remote.clone(), self.router.clone(), 10)
    }

    pub fn start(&self) -> Runtime<App> {
        Runtime::start(app(self.services()))
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(AUTH_TOKEN_KEY).unwrap()
    }
}

/// Processes messages until nothing is queued or in flight, with a bound.
pub async fn settle(runtime: &mut Runtime<App>) {
    tokio::time::timeout(Duration::from_secs(5), runtime.settle())
        .await
        .expect("runtime did not settle");
}

/// Like [`settle`], but also waits for work started outside effects,
/// such as the viewer fetch triggered by a subscription.
pub async fn settle_all(runtime: &mut Runtime<App>) {
    for _ in 0..5 {
        settle(runtime).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    settle(runtime).await;
}

/// Executes `effect` to completion and returns every message it dispatched.
pub async fn run_effect<M: conduit::program::Message>(
    effect: conduit::program::Effect<M>,
) -> Vec<M> {
    use conduit::program::{Dispatch, Effect};

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut pending = vec![effect];
    while let Some(effect) = pending.pop() {
        match effect {
            Effect::None => {}
            Effect::Message(msg) => seen.lock().push(msg),
            Effect::Task(task) => {
                let sink = Arc::clone(&seen);
                task(Dispatch::new(move |msg| sink.lock().push(msg))).await;
            }
            Effect::Batch(effects) => pending.extend(effects.into_iter().rev()),
        }
    }
    let mut seen = seen.lock();
    std::mem::take(&mut *seen)
}

/// Executes an effect expected to dispatch exactly one message.
pub async fn run_one<M: conduit::program::Message>(effect: conduit::program::Effect<M>) -> M {
    let mut messages = run_effect(effect).await;
    assert_eq!(messages.len(), 1, "expected exactly one message");
    messages.remove(0)
}

/// Number of the first control whose rendered line contains `needle`.
pub fn control(view: &conduit::view::Node, needle: &str) -> usize {
    view.render()
        .lines()
        .filter(|line| line.contains(needle))
        .find_map(|line| {
            let rest = line.trim_start().strip_prefix('[')?;
            let (number, _) = rest.split_once(']')?;
            number.parse().ok()
        })
        .unwrap_or_else(|| panic!("no control matching {needle:?} in:\n{}", view.render()))
}

/// Types `text` into the field labelled `needle`.
pub fn type_into(runtime: &Runtime<App>, router: &Router, needle: &str, text: &str) {
    use conduit::shell::{apply, Command};
    let view = runtime.view();
    let n = control(&view, needle);
    apply(Command::Type(n, text.to_string()), &view, router).unwrap();
}

/// Clicks the control labelled `needle`.
pub fn click(runtime: &Runtime<App>, router: &Router, needle: &str) {
    use conduit::shell::{apply, Command};
    let view = runtime.view();
    let n = control(&view, needle);
    apply(Command::Click(n), &view, router).unwrap();
}
