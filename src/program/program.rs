//! The program abstraction.

use super::dispatch::Dispatch;
use super::effect::Effect;
use super::message::Message;
use super::subscription::Subscriptions;

/// An isolated state machine: init, reducer, subscriptions, view.
///
/// `update` is the only place where state transitions happen. It must be a
/// pure function of `(msg, state)`: all I/O is described by the returned
/// [`Effect`] and executed by the runtime.
pub trait Program: Send + Sync + 'static {
    /// Program state, owned by the runtime between calls.
    type State: Send + 'static;

    /// Messages this program handles.
    type Msg: Message;

    /// Displayable output produced by `view`.
    type View;

    /// Initial state and the effect to run on mount.
    fn init(&self) -> (Self::State, Effect<Self::Msg>);

    /// Process a message and return the new state.
    fn update(&self, msg: Self::Msg, state: Self::State) -> (Self::State, Effect<Self::Msg>);

    /// Named message sources that should be active for `state`.
    fn subscriptions(&self, _state: &Self::State) -> Subscriptions<Self::Msg> {
        Subscriptions::new()
    }

    fn view(&self, state: &Self::State, dispatch: &Dispatch<Self::Msg>) -> Self::View;

    /// Identifies the program's kind in logs and when switching.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
