use std::io;

use thiserror::Error;

/// Failure to open a connection for a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenError {
    #[error("Could not open address")]
    Resolve,
    #[error("{0}")]
    Socket(String),
}

/// Terminal failure of a transfer. The display text is what the user sees in
/// place of the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Could not open address")]
    Resolve,
    #[error("Timeout")]
    ConnectTimeout,
    #[error("{0}")]
    Socket(String),
    #[error("{0}")]
    Write(String),
    #[error("{0}")]
    Read(String),
    #[error("could not open file for writing: {0}")]
    FileOpen(String),
    #[error("could not write file: {0}")]
    FileWrite(String),
}

impl From<OpenError> for TransferError {
    fn from(err: OpenError) -> Self {
        match err {
            OpenError::Resolve => TransferError::Resolve,
            OpenError::Socket(text) => TransferError::Socket(text),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to create poller: {0}")]
    Poll(#[source] io::Error),
    #[error("failed to spawn poller thread: {0}")]
    Spawn(#[source] io::Error),
}
