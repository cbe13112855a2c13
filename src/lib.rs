//! NiFi Align
//!
//! Command line front end that lays out the child process groups of a NiFi
//! flow in a grid. The traversal lives in `nifi-align-core`, the REST
//! adapter in `nifi-align-client`.

#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use app::run;
pub use cli::Cli;
pub use config::AppConfig;
pub use error::{AppError, AppResult, EXIT_FAILURE};
