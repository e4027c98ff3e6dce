//! Displayable output of programs.
//!
//! A small tree of text and interactive controls. Controls carry the
//! callbacks that dispatch messages, so a driver can operate the view
//! without knowing any program's message type.

use std::fmt::{self, Write as _};

use crate::program::Callback;

/// One element of a view.
#[derive(Clone, Default)]
pub enum Node {
    #[default]
    Empty,
    Text(String),
    Heading(String),
    /// Grouping with a label that names its role, e.g. `nav` or `article`.
    Section { label: String, children: Vec<Node> },
    Link { label: String, href: String, active: bool },
    Button { label: String, disabled: bool, on_press: Callback },
    Field {
        placeholder: String,
        value: String,
        secret: bool,
        multiline: bool,
        disabled: bool,
        on_input: Callback,
    },
    Fragment(Vec<Node>),
}

/// An interactive control, in render order.
#[derive(Clone)]
pub enum Control {
    Link { href: String },
    Button { disabled: bool, on_press: Callback },
    Field { disabled: bool, on_input: Callback },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Node::Heading(text.into())
    }

    pub fn section(label: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Section {
            label: label.into(),
            children,
        }
    }

    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Node::Link {
            label: label.into(),
            href: href.into(),
            active: false,
        }
    }

    pub fn button(label: impl Into<String>, on_press: Callback) -> Self {
        Node::Button {
            label: label.into(),
            disabled: false,
            on_press,
        }
    }

    pub fn field(placeholder: impl Into<String>, value: impl Into<String>, on_input: Callback) -> Self {
        Node::Field {
            placeholder: placeholder.into(),
            value: value.into(),
            secret: false,
            multiline: false,
            disabled: false,
            on_input,
        }
    }

    /// Marks a link active. Other nodes are unchanged.
    pub fn active(mut self, is_active: bool) -> Self {
        if let Node::Link { active, .. } = &mut self {
            *active = is_active;
        }
        self
    }

    /// Disables a button or field. Other nodes are unchanged.
    pub fn disabled(mut self, is_disabled: bool) -> Self {
        match &mut self {
            Node::Button { disabled, .. } | Node::Field { disabled, .. } => *disabled = is_disabled,
            _ => {}
        }
        self
    }

    pub fn secret(mut self) -> Self {
        if let Node::Field { secret, .. } = &mut self {
            *secret = true;
        }
        self
    }

    pub fn multiline(mut self) -> Self {
        if let Node::Field { multiline, .. } = &mut self {
            *multiline = true;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Node::Empty => true,
            Node::Fragment(children) => children.iter().all(Node::is_empty),
            _ => false,
        }
    }

    /// Interactive controls, numbered from 1 in [`Node::render`].
    pub fn controls(&self) -> Vec<Control> {
        let mut out = Vec::new();
        self.collect_controls(&mut out);
        out
    }

    fn collect_controls(&self, out: &mut Vec<Control>) {
        match self {
            Node::Link { href, .. } => out.push(Control::Link { href: href.clone() }),
            Node::Button {
                disabled, on_press, ..
            } => out.push(Control::Button {
                disabled: *disabled,
                on_press: on_press.clone(),
            }),
            Node::Field {
                disabled, on_input, ..
            } => out.push(Control::Field {
                disabled: *disabled,
                on_input: on_input.clone(),
            }),
            Node::Section { children, .. } | Node::Fragment(children) => {
                for child in children {
                    child.collect_controls(out);
                }
            }
            Node::Empty | Node::Text(_) | Node::Heading(_) => {}
        }
    }

    /// Plain-text rendering with numbered controls.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut counter = 0;
        self.render_into(&mut out, 0, &mut counter);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize, counter: &mut usize) {
        let indent = "  ".repeat(depth);
        match self {
            Node::Empty => {}
            Node::Text(text) => {
                for line in text.lines() {
                    let _ = writeln!(out, "{indent}{line}");
                }
            }
            Node::Heading(text) => {
                let _ = writeln!(out, "{indent}# {text}");
            }
            Node::Section { label, children } => {
                let _ = writeln!(out, "{indent}[{label}]");
                for child in children {
                    child.render_into(out, depth + 1, counter);
                }
            }
            Node::Link { label, href, active } => {
                *counter += 1;
                let marker = if *active { " *" } else { "" };
                let _ = writeln!(out, "{indent}[{counter}] {label} <{href}>{marker}");
            }
            Node::Button {
                label, disabled, ..
            } => {
                *counter += 1;
                let state = if *disabled { " (disabled)" } else { "" };
                let _ = writeln!(out, "{indent}[{counter}] ({label}){state}");
            }
            Node::Field {
                placeholder,
                value,
                secret,
                multiline,
                disabled,
                ..
            } => {
                *counter += 1;
                let shown = if *secret {
                    "*".repeat(value.chars().count())
                } else {
                    value.clone()
                };
                let kind = if *multiline { "textarea" } else { "input" };
                let state = if *disabled { " (disabled)" } else { "" };
                let _ = writeln!(out, "{indent}[{counter}] {kind} {placeholder}: {shown}{state}");
            }
            Node::Fragment(children) => {
                for child in children {
                    child.render_into(out, depth, counter);
                }
            }
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Empty => f.write_str("Empty"),
            Node::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Node::Heading(text) => f.debug_tuple("Heading").field(text).finish(),
            Node::Section { label, children } => f
                .debug_struct("Section")
                .field("label", label)
                .field("children", children)
                .finish(),
            Node::Link { label, href, active } => f
                .debug_struct("Link")
                .field("label", label)
                .field("href", href)
                .field("active", active)
                .finish(),
            Node::Button {
                label, disabled, ..
            } => f
                .debug_struct("Button")
                .field("label", label)
                .field("disabled", disabled)
                .finish_non_exhaustive(),
            Node::Field {
                placeholder, value, ..
            } => f
                .debug_struct("Field")
                .field("placeholder", placeholder)
                .field("value", value)
                .finish_non_exhaustive(),
            Node::Fragment(children) => f.debug_tuple("Fragment").field(children).finish(),
        }
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Link { href } => f.debug_struct("Link").field("href", href).finish(),
            Control::Button { disabled, .. } => f
                .debug_struct("Button")
                .field("disabled", disabled)
                .finish_non_exhaustive(),
            Control::Field { disabled, .. } => f
                .debug_struct("Field")
                .field("disabled", disabled)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn controls_follow_render_numbering() {
        let pressed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&pressed);
        let view = Node::Fragment(vec![
            Node::heading("conduit"),
            Node::section(
                "nav",
                vec![Node::link("Home", "#/").active(true), Node::link("Sign in", "#/login")],
            ),
            Node::button("Save", Arc::new(move |_| sink.lock().push("save"))),
        ]);

        let text = view.render();
        assert!(text.contains("[1] Home <#/> *"));
        assert!(text.contains("[2] Sign in <#/login>"));
        assert!(text.contains("[3] (Save)"));

        let controls = view.controls();
        assert_eq!(controls.len(), 3);
        let Control::Button { on_press, .. } = &controls[2] else {
            panic!("expected button");
        };
        on_press(String::new());
        assert_eq!(*pressed.lock(), vec!["save"]);
    }

    #[test]
    fn secret_fields_are_masked() {
        let view = Node::field("Password", "hunter2", Arc::new(|_: String| {})).secret();
        assert!(view.render().contains("input Password: *******"));
    }

    #[test]
    fn fragments_of_empties_are_empty() {
        assert!(Node::Fragment(vec![Node::Empty, Node::Fragment(vec![])]).is_empty());
        assert!(!Node::text("x").is_empty());
    }
}
