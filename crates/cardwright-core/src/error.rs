use thiserror::Error;

/// Errors raised by the shared plumbing.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Cannot install tracing subscriber: {0}")]
    TracingInit(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
