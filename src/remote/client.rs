//! The API client.
//!
//! Each operation builds a request and returns an [`Effect`] that, when run,
//! sends it, normalizes the response and dispatches the typed result.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{json, Value};

use crate::program::{Effect, Message, Subscription, SubscriptionHandle};
use crate::remote::result::{decode, normalize, ErrorKind, RemoteError, RemoteResult};
use crate::remote::session::Session;
use crate::remote::transport::{ApiRequest, Transport};
use crate::remote::types::{
    Article, ArticleDraft, ArticleEnvelope, ArticleList, ArticleQuery, Comment, CommentEnvelope,
    CommentsEnvelope, Credentials, Profile, ProfileEnvelope, Registration, TagsEnvelope,
    UserEnvelope, Viewer, ViewerUpdate,
};

const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Remote data client. Sole writer of the shared [`Session`].
#[derive(Clone)]
pub struct RemoteClient {
    transport: Arc<dyn Transport>,
    session: Session,
}

impl RemoteClient {
    pub fn new(transport: Arc<dyn Transport>, session: Session) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Sends `request` with the token stored at this moment and classifies
    /// the outcome.
    async fn execute(&self, mut request: ApiRequest) -> RemoteResult<Value> {
        request.token = self.session.token();
        let method = request.method.as_str();
        let path = request.path.clone();
        tracing::debug!(method, path = %path, authenticated = request.token.is_some(), "API request");

        match self.transport.send(request).await {
            Ok(response) => {
                tracing::debug!(method, path = %path, status = response.status, "API response");
                normalize(response.status, response.payload)
            }
            Err(err) => {
                tracing::warn!(method, path = %path, error = %err, "API request failed");
                Err(RemoteError::new(ErrorKind::NetworkError))
            }
        }
    }

    fn call<T, F>(&self, request: ApiRequest, transform: F) -> Effect<RemoteResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(Value) -> RemoteResult<T> + Send + 'static,
    {
        let client = self.clone();
        Effect::future(async move { client.execute(request).await.and_then(transform) })
    }

    // Authentication

    pub fn sign_in(&self, credentials: Credentials) -> Effect<RemoteResult<Viewer>> {
        let session = self.session.clone();
        let request = ApiRequest::post("/users/login").body(json!({ "user": credentials }));
        self.call(request, move |payload| {
            let viewer = decode::<UserEnvelope>(payload)?.user;
            session.sign_in(viewer.clone());
            Ok(viewer)
        })
    }

    pub fn sign_up(&self, registration: Registration) -> Effect<RemoteResult<Viewer>> {
        let session = self.session.clone();
        let request = ApiRequest::post("/users").body(json!({ "user": registration }));
        self.call(request, move |payload| {
            let viewer = decode::<UserEnvelope>(payload)?.user;
            session.sign_in(viewer.clone());
            Ok(viewer)
        })
    }

    /// Clears the token and the viewer. Dispatches nothing.
    ///
    /// A store failure is logged by the session and leaves the viewer
    /// signed in.
    pub fn sign_out<M: Message>(&self) -> Effect<M> {
        let session = self.session.clone();
        Effect::task(move |_| async move {
            let _ = session.sign_out();
        })
    }

    // Viewer

    pub fn get_viewer(&self) -> Effect<RemoteResult<Viewer>> {
        let client = self.clone();
        Effect::future(async move { client.load_viewer().await })
    }

    /// Fetches the viewer and publishes it to the session.
    ///
    /// An `unauthorized` answer means the stored token is stale; it is
    /// cleared so token and viewer stay consistent. Either outcome is
    /// dropped if the viewer signed in or out while the request was out.
    pub async fn load_viewer(&self) -> RemoteResult<Viewer> {
        let epoch = self.session.epoch();
        let result = self
            .execute(ApiRequest::get("/user"))
            .await
            .and_then(decode::<UserEnvelope>)
            .map(|envelope| envelope.user);
        match &result {
            Ok(viewer) => {
                self.session.refresh_viewer(epoch, viewer.clone());
            }
            Err(err) if err.kind() == ErrorKind::Unauthorized => {
                tracing::info!("Stored token rejected, signing out");
                let _ = self.session.expire(epoch);
            }
            Err(_) => {}
        }
        result
    }

    /// Emits the current viewer on activation and on every change.
    ///
    /// With a token but no cached viewer, activation also starts a viewer
    /// fetch whose result only matters through the session.
    pub fn watch_viewer(&self) -> Subscription<Option<Viewer>> {
        let client = self.clone();
        Subscription::new(move |dispatch| {
            let session = client.session.clone();
            let id = session.listen(dispatch.clone());
            let current = session.viewer();
            let should_load = current.is_none() && session.token().is_some();
            dispatch.send(current);
            if should_load {
                tokio::spawn(async move {
                    let _ = client.load_viewer().await;
                });
            }
            SubscriptionHandle::new(move || session.unlisten(id))
        })
    }

    pub fn update_viewer(&self, update: ViewerUpdate) -> Effect<RemoteResult<Viewer>> {
        let session = self.session.clone();
        let epoch = session.epoch();
        let request = ApiRequest::put("/user").body(json!({ "user": update }));
        self.call(request, move |payload| {
            let viewer = decode::<UserEnvelope>(payload)?.user;
            session.refresh_viewer(epoch, viewer.clone());
            Ok(viewer)
        })
    }

    // Users

    pub fn get_user(&self, username: &str) -> Effect<RemoteResult<Profile>> {
        let request = ApiRequest::get(format!("/profiles/{}", segment(username)));
        self.call(request, |payload| decode::<ProfileEnvelope>(payload).map(|e| e.profile))
    }

    pub fn follow_user(&self, username: &str) -> Effect<RemoteResult<Profile>> {
        let request = ApiRequest::post(format!("/profiles/{}/follow", segment(username)));
        self.call(request, |payload| decode::<ProfileEnvelope>(payload).map(|e| e.profile))
    }

    pub fn unfollow_user(&self, username: &str) -> Effect<RemoteResult<Profile>> {
        let request = ApiRequest::delete(format!("/profiles/{}/follow", segment(username)));
        self.call(request, |payload| decode::<ProfileEnvelope>(payload).map(|e| e.profile))
    }

    // Articles

    pub fn get_article(&self, slug: &str) -> Effect<RemoteResult<Article>> {
        let request = ApiRequest::get(format!("/articles/{}", segment(slug)));
        self.call(request, |payload| decode::<ArticleEnvelope>(payload).map(|e| e.article))
    }

    pub fn get_articles(&self, query: &ArticleQuery) -> Effect<RemoteResult<ArticleList>> {
        let request = ApiRequest::get("/articles").query(query.pairs());
        self.call(request, decode::<ArticleList>)
    }

    pub fn get_feed_articles(&self, query: &ArticleQuery) -> Effect<RemoteResult<ArticleList>> {
        let request = ApiRequest::get("/articles/feed").query(query.pairs());
        self.call(request, decode::<ArticleList>)
    }

    pub fn create_article(&self, draft: ArticleDraft) -> Effect<RemoteResult<Article>> {
        let request = ApiRequest::post("/articles").body(json!({ "article": draft }));
        self.call(request, |payload| decode::<ArticleEnvelope>(payload).map(|e| e.article))
    }

    pub fn update_article(&self, slug: &str, draft: ArticleDraft) -> Effect<RemoteResult<Article>> {
        let request =
            ApiRequest::put(format!("/articles/{}", segment(slug))).body(json!({ "article": draft }));
        self.call(request, |payload| decode::<ArticleEnvelope>(payload).map(|e| e.article))
    }

    pub fn delete_article(&self, slug: &str) -> Effect<RemoteResult<()>> {
        let request = ApiRequest::delete(format!("/articles/{}", segment(slug)));
        self.call(request, |_| Ok(()))
    }

    pub fn favorite_article(&self, slug: &str) -> Effect<RemoteResult<Article>> {
        let request = ApiRequest::post(format!("/articles/{}/favorite", segment(slug)));
        self.call(request, |payload| decode::<ArticleEnvelope>(payload).map(|e| e.article))
    }

    pub fn unfavorite_article(&self, slug: &str) -> Effect<RemoteResult<Article>> {
        let request = ApiRequest::delete(format!("/articles/{}/favorite", segment(slug)));
        self.call(request, |payload| decode::<ArticleEnvelope>(payload).map(|e| e.article))
    }

    // Comments

    pub fn get_article_comments(&self, slug: &str) -> Effect<RemoteResult<Vec<Comment>>> {
        let request = ApiRequest::get(format!("/articles/{}/comments", segment(slug)));
        self.call(request, |payload| decode::<CommentsEnvelope>(payload).map(|e| e.comments))
    }

    pub fn create_article_comment(&self, slug: &str, body: &str) -> Effect<RemoteResult<Comment>> {
        let request = ApiRequest::post(format!("/articles/{}/comments", segment(slug)))
            .body(json!({ "comment": { "body": body } }));
        self.call(request, |payload| decode::<CommentEnvelope>(payload).map(|e| e.comment))
    }

    pub fn delete_article_comment(&self, slug: &str, comment_id: u64) -> Effect<RemoteResult<()>> {
        let request = ApiRequest::delete(format!("/articles/{}/comments/{}", segment(slug), comment_id));
        self.call(request, |_| Ok(()))
    }

    // Tags

    pub fn get_tags(&self) -> Effect<RemoteResult<Vec<String>>> {
        self.call(ApiRequest::get("/tags"), |payload| {
            decode::<TagsEnvelope>(payload).map(|e| e.tags)
        })
    }
}
