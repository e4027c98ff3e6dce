//! Article editor, for new articles and existing ones.

use super::Services;
use crate::errors::{authentication_guard, handle_error, validation_errors, ErrorState, Failure, HasErrors};
use crate::program::{Dispatch, Effect, Message, Program, Subscriptions};
use crate::remote::{Article, ArticleDraft, ErrorKind, RemoteError, RemoteResult, Viewer};
use crate::routing::Route;
use crate::view::Node;

#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub is_creating: bool,
    pub viewer: Option<Viewer>,
    pub title: String,
    pub description: String,
    pub body: String,
    /// Space-separated tags as typed.
    pub tags: String,
    pub is_saving: bool,
    pub errors: ErrorState,
}

impl HasErrors for EditorState {
    fn errors(&self) -> &ErrorState {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorState {
        &mut self.errors
    }
}

impl EditorState {
    fn fill(&mut self, article: &Article) {
        self.title = article.title.clone();
        self.description = article.description.clone();
        self.body = article.body.clone();
        self.tags = article.tag_list.join(" ");
    }

    pub fn draft(&self) -> ArticleDraft {
        ArticleDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            body: self.body.clone(),
            tag_list: tag_list(&self.tags),
        }
    }
}

/// Splits typed tags on whitespace, dropping empties.
pub fn tag_list(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

#[derive(Debug, Clone)]
pub enum EditorMsg {
    SetTitle(String),
    SetDescription(String),
    SetBody(String),
    SetTags(String),
    SetViewer(Option<Viewer>),
    SetArticle(RemoteResult<Article>),
    SaveArticle,
    SavedArticle(RemoteResult<Article>),
}

impl Message for EditorMsg {}

pub struct EditorPage {
    services: Services,
    slug: Option<String>,
}

impl EditorPage {
    /// `slug` selects the article to edit; `None` creates a new one.
    pub fn new(services: Services, slug: Option<String>) -> Self {
        Self { services, slug }
    }

    fn form(&self, state: &EditorState, dispatch: &Dispatch<EditorMsg>) -> Node {
        let label = if state.is_creating {
            "Publish Article"
        } else {
            "Update Article"
        };
        Node::section(
            "editor",
            vec![
                validation_errors(state.errors.validation.as_ref()),
                Node::field("Article title", state.title.clone(), dispatch.input(EditorMsg::SetTitle))
                    .disabled(state.is_saving),
                Node::field(
                    "What's this article about?",
                    state.description.clone(),
                    dispatch.input(EditorMsg::SetDescription),
                )
                .disabled(state.is_saving),
                Node::field(
                    "Write your article (in markdown)",
                    state.body.clone(),
                    dispatch.input(EditorMsg::SetBody),
                )
                .multiline()
                .disabled(state.is_saving),
                Node::field("Enter tags", state.tags.clone(), dispatch.input(EditorMsg::SetTags))
                    .disabled(state.is_saving),
                Node::button(label, dispatch.trigger(EditorMsg::SaveArticle)).disabled(state.is_saving),
            ],
        )
    }
}

impl Program for EditorPage {
    type State = EditorState;
    type Msg = EditorMsg;
    type View = Node;

    fn init(&self) -> (EditorState, Effect<EditorMsg>) {
        let state = EditorState {
            is_creating: self.slug.is_none(),
            ..EditorState::default()
        };
        let effect = match &self.slug {
            Some(slug) => self.services.remote.get_article(slug).map(EditorMsg::SetArticle),
            None => Effect::none(),
        };
        (state, effect)
    }

    fn update(&self, msg: EditorMsg, mut state: EditorState) -> (EditorState, Effect<EditorMsg>) {
        let effect = match msg {
            EditorMsg::SetTitle(title) => {
                state.title = title;
                Effect::none()
            }
            EditorMsg::SetDescription(description) => {
                state.description = description;
                Effect::none()
            }
            EditorMsg::SetBody(body) => {
                state.body = body;
                Effect::none()
            }
            EditorMsg::SetTags(tags) => {
                state.tags = tags;
                Effect::none()
            }
            EditorMsg::SetViewer(viewer) => {
                state.viewer = viewer;
                Effect::none()
            }
            EditorMsg::SetArticle(Ok(article)) => {
                state.fill(&article);
                Effect::none()
            }
            EditorMsg::SetArticle(Err(err)) => {
                handle_error(&mut state, &err, Failure::Page("article"));
                Effect::none()
            }
            EditorMsg::SaveArticle => {
                state.is_saving = true;
                let remote = &self.services.remote;
                let save = match &self.slug {
                    Some(slug) => remote.update_article(slug, state.draft()),
                    None => remote.create_article(state.draft()),
                };
                save.map(EditorMsg::SavedArticle)
            }
            EditorMsg::SavedArticle(Ok(article)) if article.slug.is_empty() => {
                state.is_saving = false;
                let err = RemoteError::new(ErrorKind::ServerError);
                handle_error(&mut state, &err, Failure::Action("save the article"));
                Effect::none()
            }
            EditorMsg::SavedArticle(Ok(article)) => {
                state.is_saving = false;
                state.errors.validation = None;
                self.services.router.navigate(Route::ArticleEdit {
                    article_slug: article.slug,
                })
            }
            EditorMsg::SavedArticle(Err(err)) => {
                state.is_saving = false;
                handle_error(&mut state, &err, Failure::Action("save the article"));
                Effect::none()
            }
        };
        (state, effect)
    }

    fn subscriptions(&self, _state: &EditorState) -> Subscriptions<EditorMsg> {
        Subscriptions::new().with(
            "viewer",
            self.services.remote.watch_viewer().map(EditorMsg::SetViewer),
        )
    }

    fn view(&self, state: &EditorState, dispatch: &Dispatch<EditorMsg>) -> Node {
        authentication_guard(state.viewer.is_some(), "editor", Some("write an article"), || {
            self.form(state, dispatch)
        })
    }

    fn name(&self) -> &'static str {
        "editor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_split_on_whitespace() {
        assert_eq!(tag_list("  rust  async\tweb "), vec!["rust", "async", "web"]);
        assert!(tag_list("   ").is_empty());
    }
}
