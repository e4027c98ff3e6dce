//! The error-wrapping decorator.

use std::fmt;
use std::sync::Arc;

use super::views::{error_overlay, simple_page};
use super::{dismiss_errors, HasErrors};
use crate::program::{Callback, Dispatch, Effect, Message, Program, Subscriptions};
use crate::view::Node;

/// Messages of a wrapped program: the reserved dismiss, or the program's own.
pub enum ErrorsMsg<M> {
    Dismiss,
    Inner(M),
}

impl<M: Message> Message for ErrorsMsg<M> {}

impl<M: fmt::Debug> fmt::Debug for ErrorsMsg<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorsMsg::Dismiss => f.write_str("Dismiss"),
            ErrorsMsg::Inner(msg) => f.debug_tuple("Inner").field(msg).finish(),
        }
    }
}

/// Adds failure display and the dismiss message to a program.
///
/// The wrapped reducer records failures through
/// [`handle_error`](super::handle_error); this wrapper handles `Dismiss`
/// before delegating and decides what the view shows.
pub struct WithErrors<P> {
    inner: P,
}

pub fn with_errors<P>(program: P) -> WithErrors<P> {
    WithErrors { inner: program }
}

impl<P> WithErrors<P> {
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P> Program for WithErrors<P>
where
    P: Program<View = Node>,
    P::State: HasErrors,
{
    type State = P::State;
    type Msg = ErrorsMsg<P::Msg>;
    type View = Node;

    fn init(&self) -> (Self::State, Effect<Self::Msg>) {
        let (state, effect) = self.inner.init();
        (state, effect.map(ErrorsMsg::Inner))
    }

    fn update(&self, msg: Self::Msg, mut state: Self::State) -> (Self::State, Effect<Self::Msg>) {
        match msg {
            ErrorsMsg::Dismiss => {
                dismiss_errors(&mut state);
                (state, Effect::none())
            }
            ErrorsMsg::Inner(msg) => {
                let (state, effect) = self.inner.update(msg, state);
                (state, effect.map(ErrorsMsg::Inner))
            }
        }
    }

    fn subscriptions(&self, state: &Self::State) -> Subscriptions<Self::Msg> {
        self.inner.subscriptions(state).map(ErrorsMsg::Inner)
    }

    fn view(&self, state: &Self::State, dispatch: &Dispatch<Self::Msg>) -> Node {
        let errors = state.errors();
        if let Some(failure) = &errors.failure {
            return simple_page(failure);
        }
        let dismiss = dispatch.clone();
        let on_dismiss: Callback = Arc::new(move |_| dismiss.send(ErrorsMsg::Dismiss));
        Node::Fragment(vec![
            error_overlay(&errors.messages, on_dismiss),
            self.inner.view(state, &dispatch.map(ErrorsMsg::Inner)),
        ])
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
