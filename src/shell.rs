//! Line-oriented driver for the application.
//!
//! Reads commands, operates the rendered view's controls or the location,
//! and prints the view once the runtime has settled.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::pages::App;
use crate::program::Runtime;
use crate::routing::Router;
use crate::view::{Control, Node};

/// Longest wait for outstanding requests before printing the view.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

const HELP: &str = "commands: go <fragment> | click <n> | type <n> <text> | show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Change the location, like editing the address bar.
    Go(String),
    /// Follow a link or press a button.
    Click(usize),
    /// Replace a field's text.
    Type(usize, String),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("Missing argument for '{0}'")]
    MissingArgument(&'static str),

    #[error("Invalid control number '{0}'")]
    InvalidIndex(String),

    #[error("No control [{0}]")]
    NoSuchControl(usize),

    #[error("Control [{0}] is disabled")]
    Disabled(usize),

    #[error("Control [{0}] does not take text")]
    NotAField(usize),

    #[error("Control [{0}] is a field; use 'type'")]
    NotClickable(usize),
}

fn index(arg: Option<&str>, command: &'static str) -> Result<usize, ShellError> {
    let arg = arg.ok_or(ShellError::MissingArgument(command))?;
    arg.parse()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ShellError::InvalidIndex(arg.to_string()))
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, ShellError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim_start())),
            None => (line, None),
        };
        match name {
            "go" => rest
                .filter(|r| !r.is_empty())
                .map(|r| Command::Go(r.trim().to_string()))
                .ok_or(ShellError::MissingArgument("go")),
            "click" => Ok(Command::Click(index(rest.map(str::trim), "click")?)),
            "type" => {
                let rest = rest.ok_or(ShellError::MissingArgument("type"))?;
                let (n, text) = rest.split_once(' ').unwrap_or((rest, ""));
                Ok(Command::Type(index(Some(n), "type")?, text.to_string()))
            }
            "show" | "" => Ok(Command::Show),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ShellError::Unknown(other.to_string())),
        }
    }
}

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Render,
    Help,
    Quit,
}

/// Applies `command` to `view` or the router's location.
pub fn apply(command: Command, view: &Node, router: &Router) -> Result<Outcome, ShellError> {
    let control = |n: usize| {
        view.controls()
            .into_iter()
            .nth(n - 1)
            .ok_or(ShellError::NoSuchControl(n))
    };
    match command {
        Command::Go(fragment) => router.location().set(&fragment),
        Command::Click(n) => match control(n)? {
            Control::Link { href } => router.location().set(&href),
            Control::Button { disabled: true, .. } => return Err(ShellError::Disabled(n)),
            Control::Button { on_press, .. } => on_press(String::new()),
            Control::Field { .. } => return Err(ShellError::NotClickable(n)),
        },
        Command::Type(n, text) => match control(n)? {
            Control::Field { disabled: true, .. } => return Err(ShellError::Disabled(n)),
            Control::Field { on_input, .. } => on_input(text),
            _ => return Err(ShellError::NotAField(n)),
        },
        Command::Show => {}
        Command::Help => return Ok(Outcome::Help),
        Command::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Render)
}

/// Owns the application runtime and talks to the user.
pub struct Shell {
    runtime: Runtime<App>,
    router: Router,
}

impl Shell {
    pub fn new(runtime: Runtime<App>, router: Router) -> Self {
        Self { runtime, router }
    }

    async fn settle(&mut self) {
        if tokio::time::timeout(SETTLE_TIMEOUT, self.runtime.settle())
            .await
            .is_err()
        {
            tracing::debug!(in_flight = self.runtime.in_flight(), "Showing view before requests finished");
        }
    }

    async fn render<W: AsyncWrite + Unpin>(&self, output: &mut W) -> std::io::Result<()> {
        let text = self.runtime.view().render();
        output.write_all(text.as_bytes()).await?;
        output.write_all(b"> ").await?;
        output.flush().await
    }

    /// Runs until `quit` or end of input.
    ///
    /// Messages from effects and subscriptions are processed while waiting
    /// for input.
    pub async fn run<R, W>(mut self, input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        self.settle().await;
        self.render(&mut output).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    let view = self.runtime.view();
                    let outcome = Command::parse(&line)
                        .and_then(|command| apply(command, &view, &self.router));
                    match outcome {
                        Ok(Outcome::Quit) => break,
                        Ok(Outcome::Help) => {
                            output.write_all(format!("{HELP}\n").as_bytes()).await?;
                        }
                        Ok(Outcome::Render) => {}
                        Err(err) => {
                            output.write_all(format!("error: {err}\n").as_bytes()).await?;
                        }
                    }
                    self.settle().await;
                    self.render(&mut output).await?;
                }
                _ = self.runtime.next() => {
                    self.runtime.process_queued();
                }
            }
        }

        self.runtime.shutdown();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Location, Route};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("go /login"), Ok(Command::Go("/login".into())));
        assert_eq!(Command::parse(" click 3 "), Ok(Command::Click(3)));
        assert_eq!(
            Command::parse("type 2 hello world"),
            Ok(Command::Type(2, "hello world".into()))
        );
        assert_eq!(Command::parse("type 2"), Ok(Command::Type(2, String::new())));
        assert_eq!(Command::parse(""), Ok(Command::Show));
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(Command::parse("fly"), Err(ShellError::Unknown("fly".into())));
        assert_eq!(Command::parse("go"), Err(ShellError::MissingArgument("go")));
        assert_eq!(Command::parse("click 0"), Err(ShellError::InvalidIndex("0".into())));
        assert_eq!(Command::parse("click x"), Err(ShellError::InvalidIndex("x".into())));
    }

    #[test]
    fn operates_controls() {
        let router = Router::new(Location::new("/"));
        let typed = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&typed);
        let view = Node::Fragment(vec![
            Node::link("Sign in", "#/login"),
            Node::field("Email", "", Arc::new(move |text: String| *sink.lock() = text)),
            Node::button("Save", Arc::new(|_: String| {})).disabled(true),
        ]);

        assert_eq!(apply(Command::Type(2, "a@b.c".into()), &view, &router), Ok(Outcome::Render));
        assert_eq!(*typed.lock(), "a@b.c");

        assert_eq!(apply(Command::Click(3), &view, &router), Err(ShellError::Disabled(3)));
        assert_eq!(apply(Command::Click(2), &view, &router), Err(ShellError::NotClickable(2)));
        assert_eq!(apply(Command::Type(1, "x".into()), &view, &router), Err(ShellError::NotAField(1)));
        assert_eq!(apply(Command::Click(9), &view, &router), Err(ShellError::NoSuchControl(9)));

        apply(Command::Click(1), &view, &router).unwrap();
        assert_eq!(router.current(), Route::Login);
    }
}
