//! A user's profile with their authored or favorited articles.

use super::shared::{article_list, pagination, replace_article, tab_list, Tab};
use super::Services;
use crate::errors::{handle_error, ErrorState, Failure, HasErrors};
use crate::program::{Dispatch, Effect, Message, Program, Subscriptions};
use crate::remote::{Article, ArticleList, ArticleQuery, Profile, RemoteResult, Viewer};
use crate::view::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileTab {
    #[default]
    Authored,
    Favorited,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub viewer: Option<Viewer>,
    pub user: Option<Profile>,
    pub tab: ProfileTab,
    pub page_index: u32,
    pub article_count: u64,
    pub articles: Vec<Article>,
    pub errors: ErrorState,
}

impl HasErrors for ProfileState {
    fn errors(&self) -> &ErrorState {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorState {
        &mut self.errors
    }
}

#[derive(Debug, Clone)]
pub enum ProfileMsg {
    SelectAuthored,
    SelectFavorited,
    SetViewer(Option<Viewer>),
    SetUser(RemoteResult<Profile>),
    SetArticles(RemoteResult<ArticleList>),
    SetPageIndex(u32),
    FavoriteArticle(String),
    FavoritedArticle(RemoteResult<Article>),
    FollowUser,
    FollowedUser(RemoteResult<Profile>),
}

impl Message for ProfileMsg {}

pub struct ProfilePage {
    services: Services,
    username: String,
    initial_tab: ProfileTab,
}

impl ProfilePage {
    pub fn new(services: Services, username: impl Into<String>, tab: ProfileTab) -> Self {
        Self {
            services,
            username: username.into(),
            initial_tab: tab,
        }
    }

    fn fetch(&self, state: &ProfileState) -> Effect<ProfileMsg> {
        let query = ArticleQuery::page(state.page_index, self.services.page_size);
        let query = match state.tab {
            ProfileTab::Authored => query.with_author(self.username.clone()),
            ProfileTab::Favorited => query.with_favorited(self.username.clone()),
        };
        self.services
            .remote
            .get_articles(&query)
            .map(ProfileMsg::SetArticles)
    }

    fn select(&self, mut state: ProfileState, tab: ProfileTab) -> (ProfileState, Effect<ProfileMsg>) {
        state.tab = tab;
        state.page_index = 0;
        let effect = self.fetch(&state);
        (state, effect)
    }

    fn banner(&self, state: &ProfileState, user: &Profile, dispatch: &Dispatch<ProfileMsg>) -> Node {
        let mut children = vec![Node::heading(user.username.clone())];
        if let Some(bio) = &user.bio {
            children.push(Node::text(bio.clone()));
        }
        let is_own = state
            .viewer
            .as_ref()
            .is_some_and(|v| v.username == user.username);
        if !is_own {
            let label = if user.following { "Unfollow" } else { "Follow" };
            children.push(Node::button(
                format!("{label} {}", user.username),
                dispatch.trigger(ProfileMsg::FollowUser),
            ));
        }
        Node::section("user-info", children)
    }
}

impl Program for ProfilePage {
    type State = ProfileState;
    type Msg = ProfileMsg;
    type View = Node;

    fn init(&self) -> (ProfileState, Effect<ProfileMsg>) {
        let state = ProfileState {
            tab: self.initial_tab,
            ..ProfileState::default()
        };
        let effect = self
            .services
            .remote
            .get_user(&self.username)
            .map(ProfileMsg::SetUser);
        (state, effect)
    }

    fn update(&self, msg: ProfileMsg, mut state: ProfileState) -> (ProfileState, Effect<ProfileMsg>) {
        let remote = &self.services.remote;
        let effect = match msg {
            ProfileMsg::SelectAuthored => return self.select(state, ProfileTab::Authored),
            ProfileMsg::SelectFavorited => return self.select(state, ProfileTab::Favorited),
            ProfileMsg::SetViewer(viewer) => {
                state.viewer = viewer;
                Effect::none()
            }
            ProfileMsg::SetUser(Ok(user)) => {
                state.user = Some(user);
                self.fetch(&state)
            }
            ProfileMsg::SetUser(Err(err)) => {
                handle_error(&mut state, &err, Failure::Page("profile"));
                Effect::none()
            }
            ProfileMsg::SetArticles(Ok(list)) => {
                state.articles = list.articles;
                state.article_count = list.articles_count;
                Effect::none()
            }
            ProfileMsg::SetArticles(Err(err)) => {
                handle_error(&mut state, &err, Failure::Action("load articles"));
                Effect::none()
            }
            ProfileMsg::SetPageIndex(page_index) => {
                state.page_index = page_index;
                self.fetch(&state)
            }
            ProfileMsg::FavoriteArticle(slug) => {
                match state.articles.iter().find(|a| a.slug == slug) {
                    Some(article) if article.favorited => remote
                        .unfavorite_article(&slug)
                        .map(ProfileMsg::FavoritedArticle),
                    Some(_) => remote
                        .favorite_article(&slug)
                        .map(ProfileMsg::FavoritedArticle),
                    None => Effect::none(),
                }
            }
            ProfileMsg::FavoritedArticle(Ok(article)) => {
                replace_article(&mut state.articles, article);
                Effect::none()
            }
            ProfileMsg::FavoritedArticle(Err(err)) => {
                handle_error(&mut state, &err, Failure::Action("favorite"));
                Effect::none()
            }
            ProfileMsg::FollowUser => {
                let following = state.user.as_ref().is_some_and(|u| u.following);
                let effect = if following {
                    remote.unfollow_user(&self.username)
                } else {
                    remote.follow_user(&self.username)
                };
                effect.map(ProfileMsg::FollowedUser)
            }
            ProfileMsg::FollowedUser(Ok(user)) => {
                state.user = Some(user);
                Effect::none()
            }
            ProfileMsg::FollowedUser(Err(err)) => {
                handle_error(&mut state, &err, Failure::Action("follow"));
                Effect::none()
            }
        };
        (state, effect)
    }

    fn subscriptions(&self, _state: &ProfileState) -> Subscriptions<ProfileMsg> {
        Subscriptions::new().with(
            "viewer",
            self.services.remote.watch_viewer().map(ProfileMsg::SetViewer),
        )
    }

    fn view(&self, state: &ProfileState, dispatch: &Dispatch<ProfileMsg>) -> Node {
        let Some(user) = &state.user else {
            return Node::Empty;
        };
        let tabs = vec![
            Tab {
                label: "My Articles".to_string(),
                active: state.tab == ProfileTab::Authored,
                on_press: dispatch.trigger(ProfileMsg::SelectAuthored),
            },
            Tab {
                label: "Favorited Articles".to_string(),
                active: state.tab == ProfileTab::Favorited,
                on_press: dispatch.trigger(ProfileMsg::SelectFavorited),
            },
        ];
        Node::section(
            "profile",
            vec![
                self.banner(state, user, dispatch),
                tab_list(tabs),
                article_list(&state.articles, dispatch, ProfileMsg::FavoriteArticle),
                pagination(
                    state.article_count,
                    self.services.page_size,
                    state.page_index,
                    dispatch,
                    ProfileMsg::SetPageIndex,
                ),
            ],
        )
    }

    fn name(&self) -> &'static str {
        "profile"
    }
}
