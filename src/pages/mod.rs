//! The application's page programs and their composition.

mod app;
mod article;
mod editor;
mod header;
mod home;
mod login;
mod logout;
mod not_found;
mod profile;
mod register;
mod settings;
mod shared;

pub use app::{app, footer, header_state, page_state, select_page, switcher_state, App};
pub use article::{ArticleMsg, ArticlePage, ArticleState};
pub use editor::{EditorMsg, EditorPage, EditorState};
pub use header::{Header, HeaderMsg, HeaderState};
pub use home::{HomeMsg, HomePage, HomeState, HomeTab};
pub use login::{LoginMsg, LoginPage, LoginState};
pub use logout::LogoutPage;
pub use not_found::NotFoundPage;
pub use profile::{ProfileMsg, ProfilePage, ProfileState, ProfileTab};
pub use register::{RegisterMsg, RegisterPage, RegisterState};
pub use settings::{SettingsMsg, SettingsPage, SettingsState};

use crate::remote::RemoteClient;
use crate::routing::Router;

/// What every page is built from.
#[derive(Clone)]
pub struct Services {
    pub remote: RemoteClient,
    pub router: Router,
    /// Articles per page on paginated lists.
    pub page_size: u32,
}

impl Services {
    pub fn new(remote: RemoteClient, router: Router, page_size: u32) -> Self {
        Self {
            remote,
            router,
            page_size: page_size.max(1),
        }
    }
}
