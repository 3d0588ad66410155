//! Script-driven front end for Rastra.
//!
//! Parses the line-oriented command language in [`command`], keeps named
//! images in a [`Session`], and reports failures as `error: <message>` lines.

pub mod command;
pub mod config;
mod error;
pub mod session;

pub use command::Command;
pub use config::{CliConfig, ConfigError};
pub use error::CommandError;
pub use session::{MAX_RUN_DEPTH, Session};
