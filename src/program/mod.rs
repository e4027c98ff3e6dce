//! Program composition primitives.
//!
//! A program is an isolated state machine with unidirectional data flow:
//!
//! ```text
//! Message ──→ update ──→ (State, Effect) ──→ view
//!    ↑                        │
//!    └──── Runtime executes ──┘
//! ```
//!
//! - **Program**: init, pure `update`, optional subscriptions, view
//! - **Effect**: description of async work that later dispatches messages
//! - **Subscription**: long-lived message source with explicit cancel
//! - **Batch** / **Switcher**: composition of programs
//! - **Runtime**: the dispatch loop that owns state and runs effects

mod batch;
mod boxed;
mod dispatch;
mod effect;
mod message;
mod program;
mod runtime;
mod subscription;
mod switcher;

pub use batch::{Batch, BatchMsg};
pub use boxed::{boxed, AnyMsg, AnyState, BoxedProgram, Placeholder};
pub use dispatch::{Callback, Dispatch};
pub use effect::{BoxFuture, Effect};
pub use message::Message;
pub use program::Program;
pub use runtime::Runtime;
pub use subscription::{Subscription, SubscriptionHandle, Subscriptions};
pub use switcher::{Switcher, SwitcherMsg, SwitcherState};
