use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::dispatch::Dispatch;
use super::message::Message;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

type Task<M> = Box<dyn FnOnce(Dispatch<M>) -> BoxFuture<()> + Send>;

/// Description of side effects produced by `init` or `update`.
///
/// Effects are inert values. The runtime executes them after the reducer
/// returns and feeds any resulting messages back through the queue.
pub enum Effect<M> {
    /// Nothing to do.
    None,
    /// Enqueue a message behind whatever is already pending.
    Message(M),
    /// Async work that may dispatch zero or more messages.
    Task(Task<M>),
    /// Several effects with no ordering guarantee between them.
    Batch(Vec<Effect<M>>),
}

impl<M: Message> Effect<M> {
    pub fn none() -> Self {
        Effect::None
    }

    pub fn message(msg: M) -> Self {
        Effect::Message(msg)
    }

    /// Async work given a dispatch handle.
    pub fn task<F, Fut>(f: F) -> Self
    where
        F: FnOnce(Dispatch<M>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Effect::Task(Box::new(move |dispatch| Box::pin(f(dispatch))))
    }

    /// Runs `future` and dispatches its output.
    pub fn future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = M> + Send + 'static,
    {
        Self::task(move |dispatch| async move { dispatch.send(future.await) })
    }

    /// Batches effects, dropping empty ones. A single survivor is returned
    /// unwrapped.
    pub fn batch(effects: impl IntoIterator<Item = Effect<M>>) -> Self {
        let mut effects: Vec<_> = effects.into_iter().filter(|e| !e.is_none()).collect();
        match effects.len() {
            0 => Effect::None,
            1 => effects.remove(0),
            _ => Effect::Batch(effects),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }

    /// Converts every message this effect will dispatch.
    pub fn map<N: Message>(self, f: impl Fn(M) -> N + Send + Sync + 'static) -> Effect<N> {
        self.map_shared(Arc::new(f))
    }

    fn map_shared<N: Message>(self, f: Arc<dyn Fn(M) -> N + Send + Sync>) -> Effect<N> {
        match self {
            Effect::None => Effect::None,
            Effect::Message(msg) => Effect::Message(f(msg)),
            Effect::Task(task) => Effect::Task(Box::new(move |dispatch: Dispatch<N>| {
                task(dispatch.map(move |msg| f(msg)))
            })),
            Effect::Batch(effects) => Effect::Batch(
                effects
                    .into_iter()
                    .map(|effect| effect.map_shared(Arc::clone(&f)))
                    .collect(),
            ),
        }
    }
}

impl<M> Default for Effect<M> {
    fn default() -> Self {
        Effect::None
    }
}

impl<M: fmt::Debug> fmt::Debug for Effect<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => f.write_str("None"),
            Effect::Message(msg) => f.debug_tuple("Message").field(msg).finish(),
            Effect::Task(_) => f.write_str("Task(..)"),
            Effect::Batch(effects) => f.debug_tuple("Batch").field(effects).finish(),
        }
    }
}
