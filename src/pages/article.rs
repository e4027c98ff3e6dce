//! A single article with its comments.

use super::shared::{date, profile_link};
use super::Services;
use crate::errors::{handle_error, ErrorState, Failure, HasErrors};
use crate::program::{Dispatch, Effect, Message, Program, Subscriptions};
use crate::remote::{Article, Comment, Profile, RemoteResult, Viewer};
use crate::routing::{Route, Router};
use crate::view::Node;

#[derive(Debug, Clone, Default)]
pub struct ArticleState {
    pub viewer: Option<Viewer>,
    pub article: Option<Article>,
    pub comments: Vec<Comment>,
    /// Draft of a new comment.
    pub comment: String,
    pub errors: ErrorState,
}

impl HasErrors for ArticleState {
    fn errors(&self) -> &ErrorState {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorState {
        &mut self.errors
    }
}

impl ArticleState {
    fn viewer_is(&self, username: &str) -> bool {
        self.viewer.as_ref().is_some_and(|v| v.username == username)
    }
}

#[derive(Debug, Clone)]
pub enum ArticleMsg {
    SetViewer(Option<Viewer>),
    SetArticle(RemoteResult<Article>),
    SetArticleComments(RemoteResult<Vec<Comment>>),
    FavoriteArticle,
    FavoritedArticle(RemoteResult<Article>),
    DeleteArticle,
    DeletedArticle(RemoteResult<()>),
    FollowUser,
    FollowedUser(RemoteResult<Profile>),
    SetComment(String),
    SaveComment,
    SavedComment(RemoteResult<Comment>),
    DeleteComment(u64),
    DeletedComment { comment_id: u64, result: RemoteResult<()> },
}

impl Message for ArticleMsg {}

pub struct ArticlePage {
    services: Services,
    slug: String,
}

impl ArticlePage {
    pub fn new(services: Services, slug: impl Into<String>) -> Self {
        Self {
            services,
            slug: slug.into(),
        }
    }

    fn meta(&self, state: &ArticleState, article: &Article, dispatch: &Dispatch<ArticleMsg>) -> Node {
        let author = &article.author;
        let mut children = vec![profile_link(author), Node::text(date(&article.created_at))];
        if state.viewer_is(&author.username) {
            children.push(Node::link(
                "Edit Article",
                Router::href(&Route::ArticleEdit {
                    article_slug: article.slug.clone(),
                }),
            ));
            children.push(Node::button("Delete Article", dispatch.trigger(ArticleMsg::DeleteArticle)));
        } else {
            let follow = if author.following { "Unfollow" } else { "Follow" };
            let favorite = if article.favorited { "Unfavorite" } else { "Favorite" };
            children.push(Node::button(
                format!("{follow} {}", author.username),
                dispatch.trigger(ArticleMsg::FollowUser),
            ));
            children.push(Node::button(
                format!("{favorite} Article ({})", article.favorites_count),
                dispatch.trigger(ArticleMsg::FavoriteArticle),
            ));
        }
        Node::section("article-meta", children)
    }

    fn comment_form(&self, state: &ArticleState, dispatch: &Dispatch<ArticleMsg>) -> Node {
        if state.viewer.is_none() {
            return Node::Fragment(vec![
                Node::link("Sign in", Router::href(&Route::Login)),
                Node::link("sign up", Router::href(&Route::Register)),
                Node::text("to add comments on this article."),
            ]);
        }
        Node::section(
            "comment-form",
            vec![
                Node::field(
                    "Write a comment...",
                    state.comment.clone(),
                    dispatch.input(ArticleMsg::SetComment),
                )
                .multiline(),
                Node::button("Post Comment", dispatch.trigger(ArticleMsg::SaveComment)),
            ],
        )
    }

    fn comment(&self, state: &ArticleState, comment: &Comment, dispatch: &Dispatch<ArticleMsg>) -> Node {
        let mut children = vec![
            Node::text(comment.body.clone()),
            profile_link(&comment.author),
            Node::text(date(&comment.created_at)),
        ];
        if state.viewer_is(&comment.author.username) {
            children.push(Node::button(
                "Delete",
                dispatch.trigger(ArticleMsg::DeleteComment(comment.id)),
            ));
        }
        Node::section("comment", children)
    }
}

impl Program for ArticlePage {
    type State = ArticleState;
    type Msg = ArticleMsg;
    type View = Node;

    fn init(&self) -> (ArticleState, Effect<ArticleMsg>) {
        let remote = &self.services.remote;
        let effect = Effect::batch([
            remote.get_article(&self.slug).map(ArticleMsg::SetArticle),
            remote
                .get_article_comments(&self.slug)
                .map(ArticleMsg::SetArticleComments),
        ]);
        (ArticleState::default(), effect)
    }

    fn update(&self, msg: ArticleMsg, mut state: ArticleState) -> (ArticleState, Effect<ArticleMsg>) {
        let remote = &self.services.remote;
        let effect = match msg {
            ArticleMsg::SetViewer(viewer) => {
                state.viewer = viewer;
                Effect::none()
            }
            ArticleMsg::SetArticle(Ok(article)) => {
                state.article = Some(article);
                Effect::none()
            }
            ArticleMsg::SetArticle(Err(err)) => {
                handle_error(&mut state, &err, Failure::Page("article"));
                Effect::none()
            }
            ArticleMsg::SetArticleComments(Ok(comments)) => {
                state.comments = comments;
                Effect::none()
            }
            ArticleMsg::SetArticleComments(Err(err)) => {
                handle_error(&mut state, &err, Failure::Action("load article comments"));
                Effect::none()
            }
            ArticleMsg::FavoriteArticle => match &state.article {
                Some(article) if article.favorited => remote
                    .unfavorite_article(&self.slug)
                    .map(ArticleMsg::FavoritedArticle),
                Some(_) => remote
                    .favorite_article(&self.slug)
                    .map(ArticleMsg::FavoritedArticle),
                None => Effect::none(),
            },
            ArticleMsg::FavoritedArticle(Ok(article)) => {
                state.article = Some(article);
                Effect::none()
            }
            ArticleMsg::FavoritedArticle(Err(err)) => {
                handle_error(&mut state, &err, Failure::Action("favorite"));
                Effect::none()
            }
            ArticleMsg::DeleteArticle => remote
                .delete_article(&self.slug)
                .map(ArticleMsg::DeletedArticle),
            ArticleMsg::DeletedArticle(Ok(())) => self.services.router.navigate(Route::Home),
            ArticleMsg::DeletedArticle(Err(err)) => {
                handle_error(&mut state, &err, Failure::Action("delete"));
                Effect::none()
            }
            ArticleMsg::FollowUser => match &state.article {
                Some(article) if article.author.following => remote
                    .unfollow_user(&article.author.username)
                    .map(ArticleMsg::FollowedUser),
                Some(article) => remote
                    .follow_user(&article.author.username)
                    .map(ArticleMsg::FollowedUser),
                None => Effect::none(),
            },
            ArticleMsg::FollowedUser(Ok(author)) => {
                if let Some(article) = state.article.as_mut() {
                    article.author = author;
                }
                Effect::none()
            }
            ArticleMsg::FollowedUser(Err(err)) => {
                handle_error(&mut state, &err, Failure::Action("follow"));
                Effect::none()
            }
            ArticleMsg::SetComment(comment) => {
                state.comment = comment;
                Effect::none()
            }
            ArticleMsg::SaveComment => remote
                .create_article_comment(&self.slug, &state.comment)
                .map(ArticleMsg::SavedComment),
            ArticleMsg::SavedComment(Ok(comment)) => {
                state.comment.clear();
                state.comments.insert(0, comment);
                Effect::none()
            }
            ArticleMsg::SavedComment(Err(err)) => {
                handle_error(&mut state, &err, Failure::Action("comment"));
                Effect::none()
            }
            ArticleMsg::DeleteComment(comment_id) => remote
                .delete_article_comment(&self.slug, comment_id)
                .map(move |result| ArticleMsg::DeletedComment { comment_id, result }),
            ArticleMsg::DeletedComment {
                comment_id,
                result: Ok(()),
            } => {
                state.comments.retain(|c| c.id != comment_id);
                Effect::none()
            }
            ArticleMsg::DeletedComment { result: Err(err), .. } => {
                handle_error(&mut state, &err, Failure::Action("delete"));
                Effect::none()
            }
        };
        (state, effect)
    }

    fn subscriptions(&self, _state: &ArticleState) -> Subscriptions<ArticleMsg> {
        Subscriptions::new().with(
            "viewer",
            self.services.remote.watch_viewer().map(ArticleMsg::SetViewer),
        )
    }

    fn view(&self, state: &ArticleState, dispatch: &Dispatch<ArticleMsg>) -> Node {
        let Some(article) = &state.article else {
            return Node::Empty;
        };
        let mut children = vec![
            Node::heading(article.title.clone()),
            self.meta(state, article, dispatch),
            Node::text(article.body.clone()),
            Node::text(article.tag_list.join(" ")),
            self.comment_form(state, dispatch),
        ];
        children.extend(state.comments.iter().map(|c| self.comment(state, c, dispatch)));
        Node::section("article", children)
    }

    fn name(&self) -> &'static str {
        "article"
    }
}
