use std::fmt;
use std::sync::Arc;

use super::message::Message;

/// Handler attached to an interactive view control. Receives the control's
/// input text (empty for buttons).
pub type Callback = Arc<dyn Fn(String) + Send + Sync>;

/// Handle used to feed messages back into a running program.
///
/// Cloning is cheap. Mapping produces a dispatch for a child message type,
/// which is how composed programs tag messages with their origin.
pub struct Dispatch<M> {
    sink: Arc<dyn Fn(M) + Send + Sync>,
}

impl<M: Message> Dispatch<M> {
    pub fn new(sink: impl Fn(M) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    pub fn send(&self, msg: M) {
        (self.sink)(msg)
    }

    /// Dispatch for messages of type `N`, converted with `f` before delivery.
    pub fn map<N: Message>(&self, f: impl Fn(N) -> M + Send + Sync + 'static) -> Dispatch<N> {
        let sink = Arc::clone(&self.sink);
        Dispatch::new(move |msg| sink(f(msg)))
    }

    /// Callback that sends a fixed message whenever it fires.
    pub fn trigger(&self, msg: M) -> Callback
    where
        M: Clone + Sync,
    {
        let dispatch = self.clone();
        Arc::new(move |_| dispatch.send(msg.clone()))
    }

    /// Callback that builds a message from the control's input text.
    pub fn input(&self, f: impl Fn(String) -> M + Send + Sync + 'static) -> Callback {
        let dispatch = self.clone();
        Arc::new(move |text| dispatch.send(f(text)))
    }
}

impl<M> Clone for Dispatch<M> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<M> fmt::Debug for Dispatch<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatch(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Outer {
        Inner(u32),
    }
    impl Message for Outer {}
    impl Message for u32 {}

    #[test]
    fn map_converts_before_delivery() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let outer = Dispatch::new(move |msg: Outer| sink.lock().push(msg));
        let inner = outer.map(Outer::Inner);

        inner.send(7);
        inner.send(8);

        assert_eq!(*seen.lock(), vec![Outer::Inner(7), Outer::Inner(8)]);
    }

    #[test]
    fn trigger_resends_same_message() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let dispatch = Dispatch::new(move |msg: Outer| sink.lock().push(msg));
        let callback = dispatch.trigger(Outer::Inner(1));

        callback(String::new());
        callback("ignored".to_string());

        assert_eq!(seen.lock().len(), 2);
    }
}
