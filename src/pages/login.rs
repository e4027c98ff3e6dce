//! Sign-in form.

use super::Services;
use crate::errors::{handle_error, validation_errors, ErrorState, Failure, HasErrors};
use crate::program::{Dispatch, Effect, Message, Program, Subscriptions};
use crate::remote::{Credentials, RemoteResult, Viewer};
use crate::routing::{Route, Router};
use crate::view::Node;

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub is_signing_in: bool,
    pub errors: ErrorState,
}

impl HasErrors for LoginState {
    fn errors(&self) -> &ErrorState {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorState {
        &mut self.errors
    }
}

#[derive(Debug, Clone)]
pub enum LoginMsg {
    SetEmail(String),
    SetPassword(String),
    SetViewer(Option<Viewer>),
    SignIn,
    SignedIn(RemoteResult<Viewer>),
}

impl Message for LoginMsg {}

pub struct LoginPage {
    services: Services,
}

impl LoginPage {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

impl Program for LoginPage {
    type State = LoginState;
    type Msg = LoginMsg;
    type View = Node;

    fn init(&self) -> (LoginState, Effect<LoginMsg>) {
        (LoginState::default(), Effect::none())
    }

    fn update(&self, msg: LoginMsg, mut state: LoginState) -> (LoginState, Effect<LoginMsg>) {
        let effect = match msg {
            LoginMsg::SetEmail(email) => {
                state.email = email;
                Effect::none()
            }
            LoginMsg::SetPassword(password) => {
                state.password = password;
                Effect::none()
            }
            LoginMsg::SetViewer(Some(viewer)) => self.services.router.navigate(Route::Profile {
                username: viewer.username,
            }),
            LoginMsg::SetViewer(None) => Effect::none(),
            LoginMsg::SignIn => {
                state.is_signing_in = true;
                let credentials = Credentials {
                    email: state.email.clone(),
                    password: state.password.clone(),
                };
                self.services.remote.sign_in(credentials).map(LoginMsg::SignedIn)
            }
            LoginMsg::SignedIn(result) => {
                state.is_signing_in = false;
                state.errors.validation = None;
                if let Err(err) = result {
                    handle_error(&mut state, &err, Failure::Action("sign in"));
                }
                Effect::none()
            }
        };
        (state, effect)
    }

    fn subscriptions(&self, _state: &LoginState) -> Subscriptions<LoginMsg> {
        Subscriptions::new().with(
            "viewer",
            self.services.remote.watch_viewer().map(LoginMsg::SetViewer),
        )
    }

    fn view(&self, state: &LoginState, dispatch: &Dispatch<LoginMsg>) -> Node {
        let busy = state.is_signing_in;
        Node::section(
            "auth",
            vec![
                Node::heading("Sign in"),
                Node::link("Need an account?", Router::href(&Route::Register)),
                validation_errors(state.errors.validation.as_ref()),
                Node::field("Email", state.email.clone(), dispatch.input(LoginMsg::SetEmail))
                    .disabled(busy),
                Node::field("Password", state.password.clone(), dispatch.input(LoginMsg::SetPassword))
                    .secret()
                    .disabled(busy),
                Node::button("Sign in", dispatch.trigger(LoginMsg::SignIn)).disabled(busy),
            ],
        )
    }

    fn name(&self) -> &'static str {
        "login"
    }
}
