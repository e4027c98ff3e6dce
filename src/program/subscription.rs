use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::dispatch::Dispatch;
use super::message::Message;

type Start<M> = Box<dyn FnOnce(Dispatch<M>) -> SubscriptionHandle + Send>;

/// A long-lived message source tied to external state.
///
/// Constructing a subscription has no side effects. The source only starts
/// when the runtime activates it, and stops when its handle is cancelled.
pub struct Subscription<M> {
    start: Start<M>,
}

impl<M: Message> Subscription<M> {
    pub fn new(start: impl FnOnce(Dispatch<M>) -> SubscriptionHandle + Send + 'static) -> Self {
        Self {
            start: Box::new(start),
        }
    }

    /// Starts delivering messages to `dispatch`.
    pub fn activate(self, dispatch: Dispatch<M>) -> SubscriptionHandle {
        (self.start)(dispatch)
    }

    pub fn map<N: Message>(self, f: impl Fn(M) -> N + Send + Sync + 'static) -> Subscription<N> {
        let start = self.start;
        Subscription::new(move |dispatch: Dispatch<N>| start(dispatch.map(f)))
    }
}

impl<M> fmt::Debug for Subscription<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription(..)")
    }
}

/// Cancellation handle for an active subscription.
///
/// Dropping the handle does not cancel; cancellation is always explicit.
pub struct SubscriptionHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle for a source with nothing to tear down.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Named subscription sources of a program.
///
/// The runtime diffs the key set after every update: keys that disappear
/// are cancelled, keys that appear are activated, and keys present on both
/// sides keep running untouched.
pub struct Subscriptions<M> {
    entries: BTreeMap<String, Subscription<M>>,
}

impl<M: Message> Subscriptions<M> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, subscription: Subscription<M>) -> Self {
        self.insert(key, subscription);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, subscription: Subscription<M>) {
        self.entries.insert(key.into(), subscription);
    }

    pub fn extend(&mut self, other: Subscriptions<M>) {
        self.entries.extend(other.entries);
    }

    /// Prepends `prefix` to every key.
    pub fn prefixed(self, prefix: &str) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|(key, sub)| (format!("{prefix}{key}"), sub))
                .collect(),
        }
    }

    pub fn map<N: Message>(self, f: impl Fn(M) -> N + Send + Sync + 'static) -> Subscriptions<N> {
        let f = Arc::new(f);
        Subscriptions {
            entries: self
                .entries
                .into_iter()
                .map(|(key, sub)| {
                    let f = Arc::clone(&f);
                    (key, sub.map(move |msg| f(msg)))
                })
                .collect(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M: Message> Default for Subscriptions<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> IntoIterator for Subscriptions<M> {
    type Item = (String, Subscription<M>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Subscription<M>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
