pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod pages;
pub mod program;
pub mod remote;
pub mod routing;
pub mod shell;
pub mod view;
