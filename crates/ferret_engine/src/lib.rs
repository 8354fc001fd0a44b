//! Ferret engine: non-blocking transfers multiplexed on one poller thread.
mod connector;
mod engine;
mod error;
mod persist;
mod poller;
mod queue;
mod settings;
mod transfer;
mod types;

pub use connector::{Connector, TcpConnector};
pub use engine::EngineHandle;
pub use error::{EngineError, OpenError, TransferError};
pub use persist::{commit_part, create_part_file, ensure_output_dir, part_path, PersistError};
pub use poller::Poller;
pub use queue::MessageQueue;
pub use settings::EngineSettings;
pub use types::{
    Message, MessageKind, RequestId, TransferMode, TransferRequest, TransferState,
};
