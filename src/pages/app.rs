//! The whole application: header and routed page, plus the footer.

use super::article::ArticlePage;
use super::editor::EditorPage;
use super::header::{Header, HeaderState};
use super::home::HomePage;
use super::login::LoginPage;
use super::logout::LogoutPage;
use super::not_found::NotFoundPage;
use super::profile::{ProfilePage, ProfileTab};
use super::register::RegisterPage;
use super::settings::SettingsPage;
use super::Services;
use crate::errors::with_errors;
use crate::program::{boxed, AnyState, Batch, BoxedProgram, Switcher, SwitcherState};
use crate::routing::{Route, Router};
use crate::view::Node;

/// The composed application program.
pub type App = Batch<Node, Node>;

const HEADER: usize = 0;
const PAGE: usize = 1;

/// Builds the program mounted for `route`.
pub fn select_page(services: &Services, route: &Route) -> BoxedProgram<Node> {
    let services = services.clone();
    match route {
        Route::Home => boxed(with_errors(HomePage::new(services))),
        Route::Login => boxed(with_errors(LoginPage::new(services))),
        Route::Logout => boxed(LogoutPage::new(services)),
        Route::Register => boxed(with_errors(RegisterPage::new(services))),
        Route::Settings => boxed(with_errors(SettingsPage::new(services))),
        Route::ArticleCreate => boxed(with_errors(EditorPage::new(services, None))),
        Route::ArticleEdit { article_slug } => {
            boxed(with_errors(EditorPage::new(services, Some(article_slug.clone()))))
        }
        Route::ArticleView { article_slug } => {
            boxed(with_errors(ArticlePage::new(services, article_slug.clone())))
        }
        Route::Profile { username } => {
            boxed(with_errors(ProfilePage::new(services, username.clone(), ProfileTab::Authored)))
        }
        Route::ProfileFavorites { username } => {
            boxed(with_errors(ProfilePage::new(services, username.clone(), ProfileTab::Favorited)))
        }
        Route::NotFound => boxed(NotFoundPage),
    }
}

pub fn footer() -> Node {
    Node::section(
        "footer",
        vec![
            Node::link("conduit", Router::href(&Route::Home)),
            Node::text("An interactive learning project from Thinkster. Code & design licensed under MIT."),
        ],
    )
}

/// Header and routed page running side by side, rendered above the footer.
pub fn app(services: Services) -> App {
    let router = services.router.clone();
    let pages = services.clone();
    let switcher = Switcher::new(
        move || router.watch_route(),
        move |route: &Route| select_page(&pages, route),
    );
    Batch::new(
        vec![boxed(Header::new(services)), boxed(switcher)],
        |mut views: Vec<Node>| {
            views.push(footer());
            Node::Fragment(views)
        },
    )
}

pub fn header_state(states: &[AnyState]) -> Option<&HeaderState> {
    states.get(HEADER)?.downcast_ref()
}

pub fn switcher_state(states: &[AnyState]) -> Option<&SwitcherState<Route, Node>> {
    states.get(PAGE)?.downcast_ref()
}

/// State of the mounted page, if it has type `T`.
pub fn page_state<T: 'static>(states: &[AnyState]) -> Option<&T> {
    switcher_state(states)?.page::<T>()
}
