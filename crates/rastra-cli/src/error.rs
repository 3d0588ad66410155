use rastra_codec::CodecError;
use rastra_core::RastraError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{command} takes {expected} arguments, got {found}")]
    Arity {
        command: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid {what}: {value:?}")]
    BadNumber { what: &'static str, value: String },
    #[error("no image named {0:?}")]
    UnknownImage(String),
    #[error("scripts nested deeper than {0} levels")]
    RunDepth(usize),
    #[error("script stopped after a failing command")]
    Aborted,
    #[error(transparent)]
    Core(#[from] RastraError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
