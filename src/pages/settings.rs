//! Viewer settings.

use super::Services;
use crate::errors::{authentication_guard, handle_error, validation_errors, ErrorState, Failure, HasErrors};
use crate::program::{Dispatch, Effect, Message, Program, Subscriptions};
use crate::remote::{RemoteResult, Viewer, ViewerUpdate};
use crate::routing::{Route, Router};
use crate::view::Node;

#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    pub viewer: Option<Viewer>,
    pub username: String,
    /// New password; empty leaves the password unchanged.
    pub password: String,
    pub email: String,
    pub image: String,
    pub bio: String,
    pub is_saving: bool,
    pub errors: ErrorState,
}

impl HasErrors for SettingsState {
    fn errors(&self) -> &ErrorState {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorState {
        &mut self.errors
    }
}

impl SettingsState {
    fn fill(&mut self, viewer: Option<&Viewer>) {
        let viewer = viewer.cloned().unwrap_or_default();
        self.username = viewer.username;
        self.password.clear();
        self.email = viewer.email;
        self.image = viewer.image.unwrap_or_default();
        self.bio = viewer.bio.unwrap_or_default();
    }

    pub fn viewer_update(&self) -> ViewerUpdate {
        ViewerUpdate {
            username: self.username.clone(),
            email: self.email.clone(),
            bio: self.bio.clone(),
            image: self.image.clone(),
            password: Some(self.password.clone()).filter(|p| !p.is_empty()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SettingsMsg {
    SetUsername(String),
    SetPassword(String),
    SetEmail(String),
    SetImage(String),
    SetBio(String),
    SetViewer(Option<Viewer>),
    SaveSettings,
    SavedSettings(RemoteResult<Viewer>),
}

impl Message for SettingsMsg {}

pub struct SettingsPage {
    services: Services,
}

impl SettingsPage {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    fn form(&self, state: &SettingsState, dispatch: &Dispatch<SettingsMsg>) -> Node {
        let saving = state.is_saving;
        Node::section(
            "settings",
            vec![
                Node::heading("Your Settings"),
                validation_errors(state.errors.validation.as_ref()),
                Node::field("URL of profile picture", state.image.clone(), dispatch.input(SettingsMsg::SetImage))
                    .disabled(saving),
                Node::field("Your Name", state.username.clone(), dispatch.input(SettingsMsg::SetUsername))
                    .disabled(saving),
                Node::field("Short bio about you", state.bio.clone(), dispatch.input(SettingsMsg::SetBio))
                    .multiline()
                    .disabled(saving),
                Node::field("Email", state.email.clone(), dispatch.input(SettingsMsg::SetEmail))
                    .disabled(saving),
                Node::field("Password", state.password.clone(), dispatch.input(SettingsMsg::SetPassword))
                    .secret()
                    .disabled(saving),
                Node::button("Update Settings", dispatch.trigger(SettingsMsg::SaveSettings))
                    .disabled(saving),
                Node::link("Or click here to logout.", Router::href(&Route::Logout)),
            ],
        )
    }
}

impl Program for SettingsPage {
    type State = SettingsState;
    type Msg = SettingsMsg;
    type View = Node;

    fn init(&self) -> (SettingsState, Effect<SettingsMsg>) {
        (SettingsState::default(), Effect::none())
    }

    fn update(&self, msg: SettingsMsg, mut state: SettingsState) -> (SettingsState, Effect<SettingsMsg>) {
        match msg {
            SettingsMsg::SetUsername(username) => state.username = username,
            SettingsMsg::SetPassword(password) => state.password = password,
            SettingsMsg::SetEmail(email) => state.email = email,
            SettingsMsg::SetImage(image) => state.image = image,
            SettingsMsg::SetBio(bio) => state.bio = bio,
            SettingsMsg::SetViewer(viewer) => {
                state.fill(viewer.as_ref());
                state.viewer = viewer;
            }
            SettingsMsg::SaveSettings => {
                state.is_saving = true;
                let effect = self
                    .services
                    .remote
                    .update_viewer(state.viewer_update())
                    .map(SettingsMsg::SavedSettings);
                return (state, effect);
            }
            SettingsMsg::SavedSettings(Ok(_)) => {
                state.is_saving = false;
                state.errors.validation = None;
            }
            SettingsMsg::SavedSettings(Err(err)) => {
                state.is_saving = false;
                handle_error(&mut state, &err, Failure::Action("update your settings"));
            }
        }
        (state, Effect::none())
    }

    fn subscriptions(&self, _state: &SettingsState) -> Subscriptions<SettingsMsg> {
        Subscriptions::new().with(
            "viewer",
            self.services.remote.watch_viewer().map(SettingsMsg::SetViewer),
        )
    }

    fn view(&self, state: &SettingsState, dispatch: &Dispatch<SettingsMsg>) -> Node {
        authentication_guard(state.viewer.is_some(), "settings", None, || self.form(state, dispatch))
    }

    fn name(&self) -> &'static str {
        "settings"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_is_omitted() {
        let mut state = SettingsState::default();
        state.fill(Some(&Viewer {
            username: "jake".into(),
            email: "jake@jake.jake".into(),
            bio: Some("I work at statefarm".into()),
            ..Viewer::default()
        }));
        let update = state.viewer_update();
        assert_eq!(update.password, None);
        assert_eq!(update.bio, "I work at statefarm");
        assert_eq!(update.image, "");

        state.password = "hunter2".into();
        assert_eq!(state.viewer_update().password.as_deref(), Some("hunter2"));
    }
}
