//! Fragment-based routing.

mod route;
mod router;

pub use route::{format, parse, Route};
pub use router::{Location, Router};
