//! The always-on navigation header.

use super::Services;
use crate::program::{Dispatch, Effect, Message, Program, Subscriptions};
use crate::remote::Viewer;
use crate::routing::{Route, Router};
use crate::view::Node;

#[derive(Debug, Clone, Default)]
pub struct HeaderState {
    pub route: Option<Route>,
    pub viewer: Option<Viewer>,
}

#[derive(Debug, Clone)]
pub enum HeaderMsg {
    SetRoute(Route),
    SetViewer(Option<Viewer>),
}

impl Message for HeaderMsg {}

pub struct Header {
    services: Services,
}

impl Header {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

fn nav_link(label: impl Into<String>, route: Route, current: Option<&Route>) -> Node {
    let active = current.is_some_and(|c| c.is_same_kind(&route));
    Node::link(label, Router::href(&route)).active(active)
}

impl Program for Header {
    type State = HeaderState;
    type Msg = HeaderMsg;
    type View = Node;

    fn init(&self) -> (HeaderState, Effect<HeaderMsg>) {
        (HeaderState::default(), Effect::none())
    }

    fn update(&self, msg: HeaderMsg, mut state: HeaderState) -> (HeaderState, Effect<HeaderMsg>) {
        match msg {
            HeaderMsg::SetRoute(route) => state.route = Some(route),
            HeaderMsg::SetViewer(viewer) => state.viewer = viewer,
        }
        (state, Effect::none())
    }

    fn subscriptions(&self, _state: &HeaderState) -> Subscriptions<HeaderMsg> {
        Subscriptions::new()
            .with("route", self.services.router.watch_route().map(HeaderMsg::SetRoute))
            .with("viewer", self.services.remote.watch_viewer().map(HeaderMsg::SetViewer))
    }

    fn view(&self, state: &HeaderState, _dispatch: &Dispatch<HeaderMsg>) -> Node {
        let current = state.route.as_ref();
        let links = match &state.viewer {
            Some(viewer) => vec![
                nav_link("Home", Route::Home, current),
                nav_link("New Post", Route::ArticleCreate, current),
                nav_link("Settings", Route::Settings, current),
                nav_link(
                    viewer.username.clone(),
                    Route::Profile {
                        username: viewer.username.clone(),
                    },
                    current,
                ),
                nav_link("Sign out", Route::Logout, current),
            ],
            None => vec![
                nav_link("Home", Route::Home, current),
                nav_link("Sign in", Route::Login, current),
                nav_link("Sign up", Route::Register, current),
            ],
        };
        let mut children = vec![Node::link("conduit", Router::href(&Route::Home))];
        children.extend(links);
        Node::section("nav", children)
    }

    fn name(&self) -> &'static str {
        "header"
    }
}
