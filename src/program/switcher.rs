//! Router-driven program mounting.

use std::fmt;
use std::sync::Arc;

use super::boxed::{AnyMsg, AnyState, BoxedProgram};
use super::dispatch::Dispatch;
use super::effect::Effect;
use super::message::Message;
use super::program::Program;
use super::subscription::{Subscription, Subscriptions};

const ROUTE_KEY: &str = "route";

/// Messages of the switcher.
///
/// Page messages are tagged with the mount generation they belong to, so
/// results of effects started by a torn-down page are discarded.
pub enum SwitcherMsg<R> {
    /// Route-change notification.
    Route(R),
    /// Second half of a switch: runs the pending program's init.
    Mount { generation: u64 },
    /// Message for the mounted page.
    Page { generation: u64, msg: AnyMsg },
}

impl<R: Message> Message for SwitcherMsg<R> {}

impl<R: fmt::Debug> fmt::Debug for SwitcherMsg<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitcherMsg::Route(route) => f.debug_tuple("Route").field(route).finish(),
            SwitcherMsg::Mount { generation } => f
                .debug_struct("Mount")
                .field("generation", generation)
                .finish(),
            SwitcherMsg::Page { generation, .. } => f
                .debug_struct("Page")
                .field("generation", generation)
                .finish_non_exhaustive(),
        }
    }
}

enum Mounted<V> {
    /// Nothing selected yet.
    Idle,
    /// Selected but not initialized. The previous page is already gone.
    Pending(BoxedProgram<V>),
    Active {
        program: BoxedProgram<V>,
        state: AnyState,
    },
}

/// State of the switcher: the current route and the mounted page.
pub struct SwitcherState<R, V> {
    route: Option<R>,
    generation: u64,
    mounted: Mounted<V>,
}

impl<R, V: 'static> SwitcherState<R, V> {
    /// Last route received, if any.
    pub fn route(&self) -> Option<&R> {
        self.route.as_ref()
    }

    /// Incremented on every route change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Name of the mounted program, once its init has run.
    pub fn mounted_name(&self) -> Option<&'static str> {
        match &self.mounted {
            Mounted::Active { program, .. } => Some(program.name()),
            Mounted::Idle | Mounted::Pending(_) => None,
        }
    }

    /// State of the mounted page, if it has type `T`.
    pub fn page<T: 'static>(&self) -> Option<&T> {
        match &self.mounted {
            Mounted::Active { state, .. } => state.downcast_ref::<T>(),
            Mounted::Idle | Mounted::Pending(_) => None,
        }
    }
}

/// Mounts exactly one program, chosen from the current route.
///
/// Every route notification tears down the mounted program and mounts the
/// selected one, even when both have the same kind: parameters are never
/// updated in place. Teardown happens in two steps so that the old
/// program's subscriptions are cancelled before the new program's `init`
/// runs: the route message leaves the new program pending, and a queued
/// `Mount` message initializes it.
pub struct Switcher<R, V> {
    watch: Arc<dyn Fn() -> Subscription<R> + Send + Sync>,
    select: Arc<dyn Fn(&R) -> BoxedProgram<V> + Send + Sync>,
}

impl<R, V> Switcher<R, V> {
    /// `watch` builds the route source; `select` builds the program for a route.
    pub fn new(
        watch: impl Fn() -> Subscription<R> + Send + Sync + 'static,
        select: impl Fn(&R) -> BoxedProgram<V> + Send + Sync + 'static,
    ) -> Self {
        Self {
            watch: Arc::new(watch),
            select: Arc::new(select),
        }
    }
}

impl<R, V> Program for Switcher<R, V>
where
    R: Message + fmt::Debug,
    V: Default + 'static,
{
    type State = SwitcherState<R, V>;
    type Msg = SwitcherMsg<R>;
    type View = V;

    fn init(&self) -> (Self::State, Effect<Self::Msg>) {
        let state = SwitcherState {
            route: None,
            generation: 0,
            mounted: Mounted::Idle,
        };
        (state, Effect::none())
    }

    fn update(&self, msg: Self::Msg, mut state: Self::State) -> (Self::State, Effect<Self::Msg>) {
        match msg {
            SwitcherMsg::Route(route) => {
                let program = (self.select)(&route);
                tracing::debug!(route = ?route, program = program.name(), "Route changed");
                state.generation += 1;
                state.route = Some(route);
                state.mounted = Mounted::Pending(program);
                let generation = state.generation;
                (state, Effect::message(SwitcherMsg::Mount { generation }))
            }
            SwitcherMsg::Mount { generation } => {
                if generation != state.generation {
                    return (state, Effect::none());
                }
                match std::mem::replace(&mut state.mounted, Mounted::Idle) {
                    Mounted::Pending(program) => {
                        tracing::info!(program = program.name(), generation, "Mounting program");
                        let (page_state, effect) = program.init();
                        state.mounted = Mounted::Active {
                            program,
                            state: page_state,
                        };
                        (state, effect.map(page_tag(generation)))
                    }
                    other => {
                        state.mounted = other;
                        (state, Effect::none())
                    }
                }
            }
            SwitcherMsg::Page { generation, msg } => {
                if generation != state.generation {
                    tracing::trace!(generation, current = state.generation, "Dropping stale page message");
                    return (state, Effect::none());
                }
                match std::mem::replace(&mut state.mounted, Mounted::Idle) {
                    Mounted::Active {
                        program,
                        state: page_state,
                    } => {
                        let (page_state, effect) = program.update(msg, page_state);
                        state.mounted = Mounted::Active {
                            program,
                            state: page_state,
                        };
                        (state, effect.map(page_tag(generation)))
                    }
                    other => {
                        state.mounted = other;
                        (state, Effect::none())
                    }
                }
            }
        }
    }

    fn subscriptions(&self, state: &Self::State) -> Subscriptions<Self::Msg> {
        let mut subs = Subscriptions::new().with(ROUTE_KEY, (self.watch)().map(SwitcherMsg::Route));
        if let Mounted::Active {
            program,
            state: page_state,
        } = &state.mounted
        {
            let generation = state.generation;
            subs.extend(
                program
                    .subscriptions(page_state)
                    .map(page_tag(generation))
                    .prefixed(&format!("page/{generation}/")),
            );
        }
        subs
    }

    fn view(&self, state: &Self::State, dispatch: &Dispatch<Self::Msg>) -> V {
        match &state.mounted {
            Mounted::Active {
                program,
                state: page_state,
            } => program.view(page_state, &dispatch.map(page_tag(state.generation))),
            Mounted::Idle | Mounted::Pending(_) => V::default(),
        }
    }

    fn name(&self) -> &'static str {
        "switcher"
    }
}

fn page_tag<R: Message>(
    generation: u64,
) -> impl Fn(AnyMsg) -> SwitcherMsg<R> + Send + Sync + 'static {
    move |msg| SwitcherMsg::Page { generation, msg }
}
