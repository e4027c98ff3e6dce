//! Type-erased programs for heterogeneous composition.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use super::dispatch::Dispatch;
use super::effect::Effect;
use super::message::Message;
use super::program::Program;
use super::subscription::Subscriptions;

pub type AnyState = Box<dyn Any + Send>;
pub type AnyMsg = Box<dyn Any + Send>;

impl Message for AnyMsg {}

trait ErasedProgram<V>: Send + Sync {
    fn name(&self) -> &'static str;
    fn init(&self) -> (AnyState, Effect<AnyMsg>);
    fn update(&self, msg: AnyMsg, state: AnyState) -> (AnyState, Effect<AnyMsg>);
    fn subscriptions(&self, state: &AnyState) -> Subscriptions<AnyMsg>;
    fn view(&self, state: &AnyState, dispatch: &Dispatch<AnyMsg>) -> V;
}

struct Erased<P>(P);

fn erase<M: Message>(msg: M) -> AnyMsg {
    Box::new(msg)
}

impl<P> ErasedProgram<P::View> for Erased<P>
where
    P: Program,
    P::View: Default,
{
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn init(&self) -> (AnyState, Effect<AnyMsg>) {
        let (state, effect) = self.0.init();
        (Box::new(state), effect.map(erase))
    }

    fn update(&self, msg: AnyMsg, state: AnyState) -> (AnyState, Effect<AnyMsg>) {
        let state = match state.downcast::<P::State>() {
            Ok(state) => *state,
            Err(state) => {
                tracing::warn!(program = self.0.name(), "State type mismatch, ignoring message");
                return (state, Effect::none());
            }
        };
        match msg.downcast::<P::Msg>() {
            Ok(msg) => {
                let (state, effect) = self.0.update(*msg, state);
                (Box::new(state), effect.map(erase))
            }
            Err(_) => {
                tracing::trace!(program = self.0.name(), "Dropping message of foreign type");
                (Box::new(state), Effect::none())
            }
        }
    }

    fn subscriptions(&self, state: &AnyState) -> Subscriptions<AnyMsg> {
        match state.downcast_ref::<P::State>() {
            Some(state) => self.0.subscriptions(state).map(erase),
            None => Subscriptions::new(),
        }
    }

    fn view(&self, state: &AnyState, dispatch: &Dispatch<AnyMsg>) -> P::View {
        match state.downcast_ref::<P::State>() {
            Some(state) => self.0.view(state, &dispatch.map(erase)),
            None => P::View::default(),
        }
    }
}

/// A program with erased state and message types.
///
/// Used wherever programs of different concrete types must sit side by side:
/// batched siblings and the router-driven switcher.
pub struct BoxedProgram<V> {
    inner: Arc<dyn ErasedProgram<V>>,
}

/// Erases `program` so it can be composed with programs of other types.
pub fn boxed<P>(program: P) -> BoxedProgram<P::View>
where
    P: Program,
    P::View: Default + 'static,
{
    BoxedProgram {
        inner: Arc::new(Erased(program)),
    }
}

impl<V> Clone for BoxedProgram<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: 'static> Program for BoxedProgram<V> {
    type State = AnyState;
    type Msg = AnyMsg;
    type View = V;

    fn init(&self) -> (AnyState, Effect<AnyMsg>) {
        self.inner.init()
    }

    fn update(&self, msg: AnyMsg, state: AnyState) -> (AnyState, Effect<AnyMsg>) {
        self.inner.update(msg, state)
    }

    fn subscriptions(&self, state: &AnyState) -> Subscriptions<AnyMsg> {
        self.inner.subscriptions(state)
    }

    fn view(&self, state: &AnyState, dispatch: &Dispatch<AnyMsg>) -> V {
        self.inner.view(state, dispatch)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Program with no state, no messages and an empty view.
pub struct Placeholder<V>(PhantomData<fn() -> V>);

impl<V> Placeholder<V> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<V> Default for Placeholder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Default + 'static> Program for Placeholder<V> {
    type State = ();
    type Msg = ();
    type View = V;

    fn init(&self) -> ((), Effect<()>) {
        ((), Effect::none())
    }

    fn update(&self, _msg: (), state: ()) -> ((), Effect<()>) {
        (state, Effect::none())
    }

    fn view(&self, _state: &(), _dispatch: &Dispatch<()>) -> V {
        V::default()
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}
