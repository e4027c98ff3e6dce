//! Remote data access: transport, normalization, session and API client.

mod client;
mod result;
mod session;
mod store;
mod transport;
mod types;

pub use client::RemoteClient;
pub use result::{decode, normalize, ErrorKind, FieldErrors, RemoteError, RemoteResult};
pub use session::Session;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, AUTH_TOKEN_KEY};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport, TransportError};
pub use types::{
    Article, ArticleDraft, ArticleList, ArticleQuery, Comment, Credentials, Profile, Registration,
    Viewer, ViewerUpdate,
};
