use std::path::PathBuf;

use bytes::Bytes;

use crate::persist::part_path;
use crate::TransferError;

pub use ferret_core::RequestId;

/// Where the bytes of a transfer go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferMode {
    /// Every received chunk becomes a `Data` message.
    StreamToQueue,
    /// Bytes are written to `tmp_path` and renamed to `local_path` on success.
    SaveToFile { local_path: PathBuf, tmp_path: PathBuf },
}

impl TransferMode {
    pub fn save_to(local_path: impl Into<PathBuf>) -> Self {
        let local_path = local_path.into();
        let tmp_path = part_path(&local_path);
        TransferMode::SaveToFile {
            local_path,
            tmp_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub request_id: RequestId,
    pub url: String,
    pub mode: TransferMode,
}

impl TransferRequest {
    pub fn stream(request_id: RequestId, url: impl Into<String>) -> Self {
        Self {
            request_id,
            url: url.into(),
            mode: TransferMode::StreamToQueue,
        }
    }

    pub fn save(request_id: RequestId, url: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            request_id,
            url: url.into(),
            mode: TransferMode::save_to(local_path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferState {
    Start,
    Connecting,
    SendingRequest,
    Receiving,
    Finished,
    Failed(TransferError),
}

impl TransferState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferState::Finished | TransferState::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Data(Bytes),
    Error(String),
    Finished,
}

/// One event from the poller thread to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub request_id: RequestId,
    pub kind: MessageKind,
}

impl Message {
    pub fn data(request_id: RequestId, bytes: Bytes) -> Self {
        Self {
            request_id,
            kind: MessageKind::Data(bytes),
        }
    }

    pub fn error(request_id: RequestId, text: impl Into<String>) -> Self {
        Self {
            request_id,
            kind: MessageKind::Error(text.into()),
        }
    }

    pub fn finished(request_id: RequestId) -> Self {
        Self {
            request_id,
            kind: MessageKind::Finished,
        }
    }
}
