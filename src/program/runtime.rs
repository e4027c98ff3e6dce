//! The dispatch loop.

use std::collections::BTreeMap;

use tokio::sync::mpsc::{self, error::TryRecvError};

use super::dispatch::Dispatch;
use super::effect::Effect;
use super::program::Program;
use super::subscription::SubscriptionHandle;

enum Envelope<M> {
    Msg(M),
    /// A spawned effect task finished.
    EffectDone,
}

/// Reports an effect task's completion when dropped, so a panicking task
/// still leaves the in-flight count.
struct EffectDone<M>(mpsc::UnboundedSender<Envelope<M>>);

impl<M> Drop for EffectDone<M> {
    fn drop(&mut self) {
        let _ = self.0.send(Envelope::EffectDone);
    }
}

/// Owns a program's state and drives it.
///
/// Messages are processed one at a time in arrival order. After each
/// `update` the runtime reconciles subscriptions by key (cancelling removed
/// ones exactly once, activating new ones) and then executes the returned
/// effect. Effect tasks are spawned on the current tokio runtime.
pub struct Runtime<P: Program> {
    program: P,
    state: Option<P::State>,
    sender: mpsc::UnboundedSender<Envelope<P::Msg>>,
    receiver: mpsc::UnboundedReceiver<Envelope<P::Msg>>,
    active: BTreeMap<String, SubscriptionHandle>,
    in_flight: usize,
}

impl<P: Program> Runtime<P> {
    /// Runs `init`, starts subscriptions and executes the init effect.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(program: P) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (state, effect) = program.init();
        let mut runtime = Self {
            program,
            state: Some(state),
            sender,
            receiver,
            active: BTreeMap::new(),
            in_flight: 0,
        };
        runtime.reconcile();
        runtime.execute(effect);
        runtime
    }

    /// Handle that enqueues messages for this runtime.
    pub fn dispatcher(&self) -> Dispatch<P::Msg> {
        let sender = self.sender.clone();
        Dispatch::new(move |msg| {
            if sender.send(Envelope::Msg(msg)).is_err() {
                tracing::trace!("Message dropped (runtime gone)");
            }
        })
    }

    /// Enqueues `msg` behind any pending messages.
    pub fn dispatch(&self, msg: P::Msg) {
        let _ = self.sender.send(Envelope::Msg(msg));
    }

    pub fn state(&self) -> &P::State {
        self.state.as_ref().expect("runtime state present between updates")
    }

    pub fn program(&self) -> &P {
        &self.program
    }

    pub fn view(&self) -> P::View {
        self.program.view(self.state(), &self.dispatcher())
    }

    /// Number of effect tasks that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Keys of the currently active subscriptions.
    pub fn active_subscriptions(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    /// Processes everything already queued without waiting.
    /// Returns the number of messages processed.
    pub fn process_queued(&mut self) -> usize {
        let mut processed = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) => {
                    if self.handle(envelope) {
                        processed += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return processed,
            }
        }
    }

    /// Waits for the next queue entry and handles it.
    /// Returns true if it was a message (rather than an effect completion).
    pub async fn next(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(envelope) => self.handle(envelope),
            None => false,
        }
    }

    /// Processes messages until the queue is empty and no effect is in flight.
    ///
    /// Work started outside of effects (for example by a subscription) is not
    /// tracked; messages it dispatches later are picked up by the next call.
    pub async fn settle(&mut self) {
        loop {
            self.process_queued();
            if self.in_flight == 0 {
                return;
            }
            self.next().await;
        }
    }

    /// Cancels every active subscription. Pending effects are abandoned.
    pub fn shutdown(mut self) {
        for (key, handle) in std::mem::take(&mut self.active) {
            tracing::trace!(key = %key, "Cancelling subscription");
            handle.cancel();
        }
    }

    fn handle(&mut self, envelope: Envelope<P::Msg>) -> bool {
        match envelope {
            Envelope::Msg(msg) => {
                self.update(msg);
                true
            }
            Envelope::EffectDone => {
                self.in_flight = self.in_flight.saturating_sub(1);
                false
            }
        }
    }

    fn update(&mut self, msg: P::Msg) {
        let Some(state) = self.state.take() else {
            return;
        };
        let (state, effect) = self.program.update(msg, state);
        self.state = Some(state);
        self.reconcile();
        self.execute(effect);
    }

    fn reconcile(&mut self) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let wanted = self.program.subscriptions(state);

        let stale: Vec<String> = self
            .active
            .keys()
            .filter(|key| !wanted.contains(key))
            .cloned()
            .collect();
        for key in stale {
            if let Some(handle) = self.active.remove(&key) {
                tracing::trace!(key = %key, "Cancelling subscription");
                handle.cancel();
            }
        }

        let dispatch = self.dispatcher();
        for (key, subscription) in wanted {
            if self.active.contains_key(&key) {
                continue;
            }
            tracing::trace!(key = %key, "Activating subscription");
            let handle = subscription.activate(dispatch.clone());
            self.active.insert(key, handle);
        }
    }

    fn execute(&mut self, effect: Effect<P::Msg>) {
        match effect {
            Effect::None => {}
            Effect::Message(msg) => self.dispatch(msg),
            Effect::Task(task) => {
                self.in_flight += 1;
                let dispatch = self.dispatcher();
                let done = EffectDone(self.sender.clone());
                tokio::spawn(async move {
                    let _done = done;
                    task(dispatch).await;
                });
            }
            Effect::Batch(effects) => {
                for effect in effects {
                    self.execute(effect);
                }
            }
        }
    }
}
