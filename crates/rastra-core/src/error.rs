/// Validation failures raised by channel and image transforms.
///
/// Every variant is a deterministic input error; nothing here is retried or
/// recovered internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RastraError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("pixel ({y}, {x}) is outside a {height}x{width} channel")]
    OutOfBounds {
        y: usize,
        x: usize,
        height: usize,
        width: usize,
    },
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

impl RastraError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }
}

pub type Result<T, E = RastraError> = std::result::Result<T, E>;
