//! Home: global, personal and tag feeds with popular tags.

use super::shared::{article_list, pagination, replace_article, tab_list, Tab};
use super::Services;
use crate::errors::{handle_error, ErrorState, Failure, HasErrors};
use crate::program::{Dispatch, Effect, Message, Program, Subscriptions};
use crate::remote::{Article, ArticleList, ArticleQuery, RemoteResult, Viewer};
use crate::view::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeTab {
    Global,
    Feed,
    Tag(String),
}

#[derive(Debug, Clone)]
pub struct HomeState {
    pub viewer: Option<Viewer>,
    pub tab: HomeTab,
    pub tags: Vec<String>,
    pub page_index: u32,
    pub article_count: u64,
    pub articles: Vec<Article>,
    pub errors: ErrorState,
}

impl HasErrors for HomeState {
    fn errors(&self) -> &ErrorState {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorState {
        &mut self.errors
    }
}

#[derive(Debug, Clone)]
pub enum HomeMsg {
    SelectTag(String),
    SelectFeed,
    SelectGlobal,
    SetTags(RemoteResult<Vec<String>>),
    SetViewer(Option<Viewer>),
    SetArticles(RemoteResult<ArticleList>),
    SetPageIndex(u32),
    FavoriteArticle(String),
    FavoritedArticle(RemoteResult<Article>),
}

impl Message for HomeMsg {}

pub struct HomePage {
    services: Services,
}

impl HomePage {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    fn fetch(&self, state: &HomeState) -> Effect<HomeMsg> {
        let query = ArticleQuery::page(state.page_index, self.services.page_size);
        let remote = &self.services.remote;
        let effect = match &state.tab {
            HomeTab::Global => remote.get_articles(&query),
            HomeTab::Feed => remote.get_feed_articles(&query),
            HomeTab::Tag(tag) => remote.get_articles(&query.with_tag(tag.clone())),
        };
        effect.map(HomeMsg::SetArticles)
    }

    fn select(&self, mut state: HomeState, tab: HomeTab) -> (HomeState, Effect<HomeMsg>) {
        state.tab = tab;
        state.page_index = 0;
        let effect = self.fetch(&state);
        (state, effect)
    }
}

impl Program for HomePage {
    type State = HomeState;
    type Msg = HomeMsg;
    type View = Node;

    fn init(&self) -> (HomeState, Effect<HomeMsg>) {
        let state = HomeState {
            viewer: None,
            tab: HomeTab::Global,
            tags: Vec::new(),
            page_index: 0,
            article_count: 0,
            articles: Vec::new(),
            errors: ErrorState::default(),
        };
        let effect = Effect::batch([
            self.services.remote.get_tags().map(HomeMsg::SetTags),
            self.fetch(&state),
        ]);
        (state, effect)
    }

    fn update(&self, msg: HomeMsg, mut state: HomeState) -> (HomeState, Effect<HomeMsg>) {
        match msg {
            HomeMsg::SelectTag(tag) => return self.select(state, HomeTab::Tag(tag)),
            HomeMsg::SelectFeed => return self.select(state, HomeTab::Feed),
            HomeMsg::SelectGlobal => return self.select(state, HomeTab::Global),
            HomeMsg::SetTags(Ok(tags)) => state.tags = tags,
            HomeMsg::SetTags(Err(err)) => {
                handle_error(&mut state, &err, Failure::Action("load tags"))
            }
            HomeMsg::SetViewer(viewer) => state.viewer = viewer,
            HomeMsg::SetArticles(Ok(list)) => {
                state.articles = list.articles;
                state.article_count = list.articles_count;
            }
            HomeMsg::SetArticles(Err(err)) => {
                handle_error(&mut state, &err, Failure::Action("load articles"))
            }
            HomeMsg::SetPageIndex(page_index) => {
                state.page_index = page_index;
                let effect = self.fetch(&state);
                return (state, effect);
            }
            HomeMsg::FavoriteArticle(slug) => {
                let Some(article) = state.articles.iter().find(|a| a.slug == slug) else {
                    return (state, Effect::none());
                };
                let remote = &self.services.remote;
                let effect = if article.favorited {
                    remote.unfavorite_article(&slug)
                } else {
                    remote.favorite_article(&slug)
                };
                return (state, effect.map(HomeMsg::FavoritedArticle));
            }
            HomeMsg::FavoritedArticle(Ok(article)) => replace_article(&mut state.articles, article),
            HomeMsg::FavoritedArticle(Err(err)) => {
                handle_error(&mut state, &err, Failure::Action("favorite"))
            }
        }
        (state, Effect::none())
    }

    fn subscriptions(&self, _state: &HomeState) -> Subscriptions<HomeMsg> {
        Subscriptions::new().with("viewer", self.services.remote.watch_viewer().map(HomeMsg::SetViewer))
    }

    fn view(&self, state: &HomeState, dispatch: &Dispatch<HomeMsg>) -> Node {
        let mut tabs = Vec::new();
        if state.viewer.is_some() {
            tabs.push(Tab {
                label: "Your Feed".to_string(),
                active: state.tab == HomeTab::Feed,
                on_press: dispatch.trigger(HomeMsg::SelectFeed),
            });
        }
        tabs.push(Tab {
            label: "Global Feed".to_string(),
            active: state.tab == HomeTab::Global,
            on_press: dispatch.trigger(HomeMsg::SelectGlobal),
        });
        if let HomeTab::Tag(tag) = &state.tab {
            tabs.push(Tab {
                label: format!("#{tag}"),
                active: true,
                on_press: dispatch.trigger(HomeMsg::SelectTag(tag.clone())),
            });
        }

        let mut sidebar = Vec::new();
        if !state.tags.is_empty() {
            sidebar.push(Node::text("Popular Tags"));
            sidebar.extend(
                state
                    .tags
                    .iter()
                    .map(|tag| Node::button(tag.clone(), dispatch.trigger(HomeMsg::SelectTag(tag.clone())))),
            );
        }

        Node::section(
            "home",
            vec![
                Node::heading("conduit"),
                Node::text("A place to share your knowledge."),
                tab_list(tabs),
                article_list(&state.articles, dispatch, HomeMsg::FavoriteArticle),
                pagination(
                    state.article_count,
                    self.services.page_size,
                    state.page_index,
                    dispatch,
                    HomeMsg::SetPageIndex,
                ),
                Node::section("sidebar", sidebar),
            ],
        )
    }

    fn name(&self) -> &'static str {
        "home"
    }
}
