//! Page-level and action-level failure handling shared by every page.

mod decorator;
mod views;

pub use decorator::{with_errors, ErrorsMsg, WithErrors};
pub use views::{authentication_guard, error_overlay, simple_page, validation_errors};

use crate::remote::{ErrorKind, FieldErrors, RemoteError};

/// Title and description of a full-page failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub title: String,
    pub description: String,
}

/// Failure state carried by every page wrapped in [`WithErrors`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    /// Replaces the whole page when set.
    pub failure: Option<PageFailure>,
    /// Dismissible banner messages, most recent first.
    pub messages: Vec<String>,
    /// Inline form errors from an `invalid` response.
    pub validation: Option<FieldErrors>,
}

/// Access to the [`ErrorState`] embedded in a page state.
pub trait HasErrors {
    fn errors(&self) -> &ErrorState;
    fn errors_mut(&mut self) -> &mut ErrorState;
}

impl HasErrors for ErrorState {
    fn errors(&self) -> &ErrorState {
        self
    }

    fn errors_mut(&mut self) -> &mut ErrorState {
        self
    }
}

/// How a failed result surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure<'a> {
    /// Loading the named page failed; the page is replaced.
    Page(&'a str),
    /// The named user action failed; the page stays.
    Action(&'a str),
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn page_failure(kind: ErrorKind, page_name: &str) -> PageFailure {
    match kind {
        ErrorKind::NotFound => PageFailure {
            title: capitalize(&format!("{page_name} was not found")),
            description: "That's all we know".to_string(),
        },
        _ => PageFailure {
            title: format!("Error loading {page_name}"),
            description: format!("{page_name} is currently unavailable"),
        },
    }
}

pub fn action_message(kind: ErrorKind, action: &str) -> String {
    match kind {
        ErrorKind::Forbidden => format!("You do not have permission to {action}."),
        ErrorKind::ServerError => format!("There was a server issue. Please try to {action} again."),
        ErrorKind::Unauthorized => {
            format!("You are currently signed out. You must sign in to {action}.")
        }
        _ => format!("Something went wrong trying to {action}. Please try again."),
    }
}

/// Records `error` on `state` as a page-level or action-level failure.
///
/// Action-level `invalid` errors store their field errors for inline
/// display; any other kind prepends a banner message.
pub fn handle_error<S: HasErrors>(state: &mut S, error: &RemoteError, failure: Failure<'_>) {
    let errors = state.errors_mut();
    match failure {
        Failure::Page(page_name) => {
            errors.failure = Some(page_failure(error.kind(), page_name));
        }
        Failure::Action(_) if error.kind() == ErrorKind::Invalid => {
            errors.validation = Some(error.field_errors().cloned().unwrap_or_default());
        }
        Failure::Action(action) => {
            errors.messages.insert(0, action_message(error.kind(), action));
        }
    }
}

/// Clears banner messages and field errors. The page failure stays.
pub fn dismiss_errors<S: HasErrors>(state: &mut S) {
    let errors = state.errors_mut();
    errors.messages.clear();
    errors.validation = None;
}
