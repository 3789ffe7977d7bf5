//! sgtcs - request and retrieve host certificates from the TCS service
//!
//! The binary is a thin wrapper; everything it does lives here so the
//! integration tests can drive commands directly.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;

pub use cli::{Cli, Command, GlobalOptions};
pub use commands::{Outcome, run};
pub use config::{Context, Settings};
pub use error::CliError;
pub use logger::init_logger;
