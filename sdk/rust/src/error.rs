use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay could not be reached.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The relay answered with an error status.
    #[error("relay returned {status}: {message}")]
    Relay { status: u16, message: String },

    #[error("connection attempt cancelled")]
    Cancelled,

    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Connectivity problems, as opposed to errors reported by the relay.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
