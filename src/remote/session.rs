//! Shared viewer identity.
//!
//! The auth token and the current viewer are the only state shared between
//! concurrently active programs. The remote client is the only writer;
//! readers register listeners through `watch_viewer`.
//!
//! Every sign-in and sign-out advances the session's epoch. A viewer fetched
//! under an older epoch was fetched for a token that is no longer stored,
//! and is not published.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::program::{Dispatch, Message};
use crate::remote::store::{KeyValueStore, StoreError, AUTH_TOKEN_KEY};
use crate::remote::types::Viewer;

impl Message for Option<Viewer> {}

struct ViewerListener {
    id: u64,
    dispatch: Dispatch<Option<Viewer>>,
}

struct SessionInner {
    store: Arc<dyn KeyValueStore>,
    /// Guards the epoch as well; both change together.
    viewer: RwLock<Option<Viewer>>,
    epoch: AtomicU64,
    listeners: Mutex<Vec<ViewerListener>>,
    next_listener: AtomicU64,
}

/// Token storage plus the cached viewer, with change notification.
///
/// Cloning shares the same session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                store,
                viewer: RwLock::new(None),
                epoch: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(1),
            }),
        }
    }

    /// Stored bearer token. Storage failures read as signed out.
    pub fn token(&self) -> Option<String> {
        match self.inner.store.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read auth token");
                None
            }
        }
    }

    pub fn viewer(&self) -> Option<Viewer> {
        self.inner.viewer.read().clone()
    }

    /// Current sign-in epoch.
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::Acquire)
    }

    /// Persists the viewer's token and publishes the viewer.
    pub fn sign_in(&self, viewer: Viewer) {
        {
            let mut current = self.inner.viewer.write();
            if let Err(err) = self.inner.store.set(AUTH_TOKEN_KEY, &viewer.token) {
                tracing::warn!(error = %err, "Failed to persist auth token");
            }
            self.inner.epoch.fetch_add(1, Ordering::AcqRel);
            *current = Some(viewer.clone());
        }
        tracing::info!(username = %viewer.username, "Signed in");
        self.notify(Some(viewer));
    }

    /// Clears the token and the viewer together.
    ///
    /// If the token cannot be removed, nothing changes and the error is
    /// returned.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.clear(None).map(|_| ())
    }

    /// Signs out unless a sign-in or sign-out happened after `epoch`.
    /// Returns whether the session was cleared.
    pub fn expire(&self, epoch: u64) -> Result<bool, StoreError> {
        self.clear(Some(epoch))
    }

    fn clear(&self, epoch: Option<u64>) -> Result<bool, StoreError> {
        {
            let mut current = self.inner.viewer.write();
            if epoch.is_some_and(|e| e != self.inner.epoch.load(Ordering::Acquire)) {
                return Ok(false);
            }
            if let Err(err) = self.inner.store.remove(AUTH_TOKEN_KEY) {
                tracing::warn!(error = %err, "Failed to remove auth token, staying signed in");
                return Err(err);
            }
            self.inner.epoch.fetch_add(1, Ordering::AcqRel);
            *current = None;
        }
        tracing::info!("Signed out");
        self.notify(None);
        Ok(true)
    }

    /// Publishes a freshly fetched viewer unless a sign-in or sign-out
    /// happened after `epoch`. Returns whether it was published.
    pub fn refresh_viewer(&self, epoch: u64, viewer: Viewer) -> bool {
        {
            let mut current = self.inner.viewer.write();
            if self.inner.epoch.load(Ordering::Acquire) != epoch {
                tracing::debug!(username = %viewer.username, "Dropping viewer fetched before the last sign-in change");
                return false;
            }
            *current = Some(viewer.clone());
        }
        self.notify(Some(viewer));
        true
    }

    fn notify(&self, viewer: Option<Viewer>) {
        let targets: Vec<_> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|l| l.dispatch.clone())
            .collect();
        for dispatch in targets {
            dispatch.send(viewer.clone());
        }
    }

    /// Registers `dispatch` for viewer changes. Returns the listener id.
    pub fn listen(&self, dispatch: Dispatch<Option<Viewer>>) -> u64 {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push(ViewerListener { id, dispatch });
        id
    }

    pub fn unlisten(&self, id: u64) {
        self.inner.listeners.lock().retain(|l| l.id != id);
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}
