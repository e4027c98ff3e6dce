//! Shared failure views.

use crate::program::Callback;
use crate::remote::FieldErrors;
use crate::view::Node;

use super::PageFailure;

/// A page holding only a title and a description.
pub fn simple_page(failure: &PageFailure) -> Node {
    Node::section(
        "main",
        vec![
            Node::heading(failure.title.clone()),
            Node::text(failure.description.clone()),
        ],
    )
}

/// Banner messages with a dismiss control; empty when there are none.
pub fn error_overlay(messages: &[String], on_dismiss: Callback) -> Node {
    if messages.is_empty() {
        return Node::Empty;
    }
    let mut children: Vec<Node> = messages.iter().map(|m| Node::text(m.clone())).collect();
    children.push(Node::button("Dismiss", on_dismiss));
    Node::section("error-messages", children)
}

/// One `"<field> <message>"` line per field error.
pub fn validation_errors(fields: Option<&FieldErrors>) -> Node {
    let lines: Vec<Node> = fields
        .into_iter()
        .flatten()
        .flat_map(|(field, messages)| messages.iter().map(move |m| Node::text(format!("{field} {m}"))))
        .collect();
    if lines.is_empty() {
        Node::Empty
    } else {
        Node::section("error-messages", lines)
    }
}

/// Renders `content` for signed-in users, a sign-in notice otherwise.
pub fn authentication_guard(
    is_authenticated: bool,
    page_name: &str,
    page_action: Option<&str>,
    content: impl FnOnce() -> Node,
) -> Node {
    if is_authenticated {
        return content();
    }
    simple_page(&PageFailure {
        title: format!("Error loading {page_name}"),
        description: format!(
            "You must be signed in to {}.",
            page_action.unwrap_or("view this page")
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_lines_join_field_and_message() {
        let mut fields = FieldErrors::new();
        fields.insert("email".into(), vec!["is invalid".into(), "can't be blank".into()]);
        fields.insert("password".into(), vec!["is too short".into()]);

        let text = validation_errors(Some(&fields)).render();

        assert_eq!(
            text.lines().skip(1).map(str::trim).collect::<Vec<_>>(),
            vec!["email is invalid", "email can't be blank", "password is too short"]
        );
        assert!(validation_errors(None).is_empty());
    }

    #[test]
    fn guard_blocks_signed_out_viewers() {
        let text = authentication_guard(false, "settings", None, || Node::text("form")).render();
        assert!(text.contains("# Error loading settings"));
        assert!(text.contains("You must be signed in to view this page."));

        let text =
            authentication_guard(false, "editor", Some("write an article"), || Node::text("form"))
                .render();
        assert!(text.contains("You must be signed in to write an article."));

        let text = authentication_guard(true, "settings", None, || Node::text("form")).render();
        assert_eq!(text.trim(), "form");
    }
}
