//! The address representation and the router built on it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::route::{format, parse, Route};
use crate::program::{Dispatch, Effect, Message, Subscription, SubscriptionHandle};

struct LocationInner {
    fragment: RwLock<String>,
    listeners: Mutex<Vec<(u64, Dispatch<Route>)>>,
    next_listener: AtomicU64,
}

/// The current in-app fragment, shared by everything that reads or changes
/// the address.
#[derive(Clone)]
pub struct Location {
    inner: Arc<LocationInner>,
}

impl Location {
    /// Starts at `initial`; an empty fragment becomes `/`.
    pub fn new(initial: &str) -> Self {
        let initial = initial.strip_prefix('#').unwrap_or(initial);
        let fragment = if initial.is_empty() { "/" } else { initial };
        Self {
            inner: Arc::new(LocationInner {
                fragment: RwLock::new(fragment.to_string()),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(1),
            }),
        }
    }

    pub fn fragment(&self) -> String {
        self.inner.fragment.read().clone()
    }

    /// Changes the fragment. Listeners hear about actual changes only.
    pub fn set(&self, fragment: &str) {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let fragment = if fragment.is_empty() { "/" } else { fragment };
        {
            let mut current = self.inner.fragment.write();
            if *current == fragment {
                return;
            }
            *current = fragment.to_string();
        }
        tracing::debug!(fragment, "Location changed");

        let route = parse(fragment);
        let listeners: Vec<_> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, dispatch)| dispatch.clone())
            .collect();
        for dispatch in listeners {
            dispatch.send(route.clone());
        }
    }

    fn listen(&self, dispatch: Dispatch<Route>) -> u64 {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, dispatch));
        id
    }

    fn unlisten(&self, id: u64) {
        self.inner.listeners.lock().retain(|(listener, _)| *listener != id);
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("/")
    }
}

/// Maps the location to routes and back.
#[derive(Clone, Default)]
pub struct Router {
    location: Location,
}

impl Router {
    pub fn new(location: Location) -> Self {
        Self { location }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn current(&self) -> Route {
        parse(&self.location.fragment())
    }

    /// Link target for `route`, in `#/...` form.
    pub fn href(route: &Route) -> String {
        format!("#{}", format(route))
    }

    /// Effect that moves the location to `route`. Dispatches nothing itself;
    /// watchers receive the new route.
    pub fn navigate<M: Message>(&self, route: Route) -> Effect<M> {
        let location = self.location.clone();
        Effect::task(move |_| async move { location.set(&format(&route)) })
    }

    /// Emits the current route on activation, then every change.
    pub fn watch_route(&self) -> Subscription<Route> {
        let location = self.location.clone();
        Subscription::new(move |dispatch| {
            let id = location.listen(dispatch.clone());
            dispatch.send(parse(&location.fragment()));
            SubscriptionHandle::new(move || location.unlisten(id))
        })
    }
}
