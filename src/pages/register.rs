//! Sign-up form.

use super::Services;
use crate::errors::{handle_error, validation_errors, ErrorState, Failure, HasErrors};
use crate::program::{Dispatch, Effect, Message, Program, Subscriptions};
use crate::remote::{Registration, RemoteResult, Viewer};
use crate::routing::{Route, Router};
use crate::view::Node;

#[derive(Debug, Clone, Default)]
pub struct RegisterState {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_signing_up: bool,
    pub errors: ErrorState,
}

impl HasErrors for RegisterState {
    fn errors(&self) -> &ErrorState {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorState {
        &mut self.errors
    }
}

#[derive(Debug, Clone)]
pub enum RegisterMsg {
    SetUsername(String),
    SetEmail(String),
    SetPassword(String),
    SetViewer(Option<Viewer>),
    SignUp,
    SignedUp(RemoteResult<Viewer>),
}

impl Message for RegisterMsg {}

pub struct RegisterPage {
    services: Services,
}

impl RegisterPage {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

impl Program for RegisterPage {
    type State = RegisterState;
    type Msg = RegisterMsg;
    type View = Node;

    fn init(&self) -> (RegisterState, Effect<RegisterMsg>) {
        (RegisterState::default(), Effect::none())
    }

    fn update(&self, msg: RegisterMsg, mut state: RegisterState) -> (RegisterState, Effect<RegisterMsg>) {
        let effect = match msg {
            RegisterMsg::SetUsername(username) => {
                state.username = username;
                Effect::none()
            }
            RegisterMsg::SetEmail(email) => {
                state.email = email;
                Effect::none()
            }
            RegisterMsg::SetPassword(password) => {
                state.password = password;
                Effect::none()
            }
            RegisterMsg::SetViewer(Some(viewer)) => self.services.router.navigate(Route::Profile {
                username: viewer.username,
            }),
            RegisterMsg::SetViewer(None) => Effect::none(),
            RegisterMsg::SignUp => {
                state.is_signing_up = true;
                let registration = Registration {
                    email: state.email.clone(),
                    password: state.password.clone(),
                    username: state.username.clone(),
                };
                self.services.remote.sign_up(registration).map(RegisterMsg::SignedUp)
            }
            RegisterMsg::SignedUp(result) => {
                state.is_signing_up = false;
                state.errors.validation = None;
                if let Err(err) = result {
                    handle_error(&mut state, &err, Failure::Action("sign up"));
                }
                Effect::none()
            }
        };
        (state, effect)
    }

    fn subscriptions(&self, _state: &RegisterState) -> Subscriptions<RegisterMsg> {
        Subscriptions::new().with(
            "viewer",
            self.services.remote.watch_viewer().map(RegisterMsg::SetViewer),
        )
    }

    fn view(&self, state: &RegisterState, dispatch: &Dispatch<RegisterMsg>) -> Node {
        let busy = state.is_signing_up;
        Node::section(
            "auth",
            vec![
                Node::heading("Sign up"),
                Node::link("Have an account?", Router::href(&Route::Login)),
                validation_errors(state.errors.validation.as_ref()),
                Node::field("Your Name", state.username.clone(), dispatch.input(RegisterMsg::SetUsername))
                    .disabled(busy),
                Node::field("Email", state.email.clone(), dispatch.input(RegisterMsg::SetEmail))
                    .disabled(busy),
                Node::field("Password", state.password.clone(), dispatch.input(RegisterMsg::SetPassword))
                    .secret()
                    .disabled(busy),
                Node::button("Sign up", dispatch.trigger(RegisterMsg::SignUp)).disabled(busy),
            ],
        )
    }

    fn name(&self) -> &'static str {
        "register"
    }
}
