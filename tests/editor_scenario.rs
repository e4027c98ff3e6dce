//! Writing an article end to end.

mod common;

use common::*;
use conduit::pages::{page_state, EditorState};
use conduit::remote::{FieldErrors, Method};
use conduit::routing::Route;
use serde_json::json;

fn signed_in_editor(fragment: &str) -> Harness {
    let h = Harness::signed_in(fragment, "token-jake");
    h.transport.ok(Method::Get, "/user", user_body("jake"));
    h
}

#[tokio::test]
async fn blank_title_shows_inline_error_without_banner() {
    let h = signed_in_editor("/editor");
    h.transport.reply(
        Method::Post,
        "/articles",
        Reply::Status(422, json!({ "errors": { "title": ["can't be blank"] } })),
    );

    let mut runtime = h.start();
    settle_all(&mut runtime).await;
    type_into(&runtime, &h.router, "What's this article about?", "nothing");
    settle(&mut runtime).await;

    click(&runtime, &h.router, "(Publish Article)");
    settle_all(&mut runtime).await;

    let editor = page_state::<EditorState>(runtime.state()).unwrap();
    let mut expected = FieldErrors::new();
    expected.insert("title".into(), vec!["can't be blank".into()]);
    assert_eq!(editor.errors.validation, Some(expected));
    assert!(editor.errors.messages.is_empty());
    assert!(editor.errors.failure.is_none());
    assert!(!editor.is_saving);
    assert_eq!(editor.description, "nothing");

    let text = runtime.view().render();
    assert!(text.contains("title can't be blank"), "{text}");
    assert!(!text.contains("(Dismiss)"));

    let sent = h
        .transport
        .requests()
        .into_iter()
        .find(|r| r.path == "/articles")
        .unwrap();
    assert_eq!(sent.token.as_deref(), Some("token-jake"));
    assert_eq!(
        sent.body,
        Some(json!({ "article": { "title": "", "description": "nothing", "body": "", "tagList": [] } }))
    );
}

#[tokio::test]
async fn published_article_opens_in_the_editor() {
    let h = signed_in_editor("/editor");
    h.transport.ok(Method::Post, "/articles", article_body("my-post", "jake"));
    h.transport.ok(Method::Get, "/articles/my-post", article_body("my-post", "jake"));

    let mut runtime = h.start();
    settle_all(&mut runtime).await;
    type_into(&runtime, &h.router, "Article title", "Title of my-post");
    type_into(&runtime, &h.router, "Enter tags", " rust  web ");
    settle(&mut runtime).await;

    click(&runtime, &h.router, "(Publish Article)");
    settle_all(&mut runtime).await;

    assert_eq!(
        h.router.current(),
        Route::ArticleEdit {
            article_slug: "my-post".into()
        }
    );
    let editor = page_state::<EditorState>(runtime.state()).unwrap();
    assert!(!editor.is_creating);
    assert_eq!(editor.title, "Title of my-post");
    assert!(runtime.view().render().contains("(Update Article)"));

    let sent = h.transport.requests().into_iter().find(|r| r.path == "/articles").unwrap();
    assert_eq!(sent.body.unwrap()["article"]["tagList"], json!(["rust", "web"]));
}

#[tokio::test]
async fn saved_article_without_slug_stays_on_the_form() {
    let h = signed_in_editor("/editor");
    h.transport.ok(Method::Post, "/articles", article_body("", "jake"));

    let mut runtime = h.start();
    settle_all(&mut runtime).await;
    type_into(&runtime, &h.router, "Article title", "Untitled");
    settle(&mut runtime).await;

    click(&runtime, &h.router, "(Publish Article)");
    settle_all(&mut runtime).await;

    assert_eq!(h.router.current(), Route::ArticleCreate);
    let editor = page_state::<EditorState>(runtime.state()).unwrap();
    assert!(!editor.is_saving);
    assert_eq!(editor.title, "Untitled");
    let text = runtime.view().render();
    assert!(
        text.contains("There was a server issue. Please try to save the article again."),
        "{text}"
    );
}

#[tokio::test]
async fn server_failure_on_save_shows_dismissible_banner() {
    let h = signed_in_editor("/editor");
    h.transport.reply(Method::Post, "/articles", Reply::Status(500, json!({})));

    let mut runtime = h.start();
    settle_all(&mut runtime).await;
    click(&runtime, &h.router, "(Publish Article)");
    settle_all(&mut runtime).await;

    let text = runtime.view().render();
    assert!(
        text.contains("There was a server issue. Please try to save the article again."),
        "{text}"
    );

    click(&runtime, &h.router, "(Dismiss)");
    settle(&mut runtime).await;

    let editor = page_state::<EditorState>(runtime.state()).unwrap();
    assert!(editor.errors.messages.is_empty());
    assert!(!runtime.view().render().contains("server issue"));
}

#[tokio::test]
async fn editor_requires_sign_in() {
    let h = Harness::new("/editor");
    let mut runtime = h.start();
    settle_all(&mut runtime).await;

    let text = runtime.view().render();
    assert!(text.contains("# Error loading editor"), "{text}");
    assert!(text.contains("You must be signed in to write an article."));
    assert_eq!(h.transport.requests().len(), 0);
}
