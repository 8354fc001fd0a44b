use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use ferret_logging::ferret_error;

use crate::connector::{Connector, TcpConnector};
use crate::poller::Poller;
use crate::{EngineError, EngineSettings, Message, MessageQueue, RequestId, TransferRequest};

/// Owns the poller thread. Requests go in over a channel; results come back
/// only through the shared [`MessageQueue`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<TransferRequest>,
    queue: MessageQueue,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        Self::with_connector(settings, Box::new(TcpConnector))
    }

    pub fn with_connector(
        settings: EngineSettings,
        connector: Box<dyn Connector>,
    ) -> Result<Self, EngineError> {
        let queue = MessageQueue::new();
        let mut poller =
            Poller::with_connector(queue.clone(), settings, connector).map_err(EngineError::Poll)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let worker = thread::Builder::new()
            .name("ferret-poller".to_string())
            .spawn(move || poller.run(&cmd_rx, &thread_stop))
            .map_err(EngineError::Spawn)?;

        Ok(Self {
            cmd_tx,
            queue,
            stop,
            worker: Some(worker),
        })
    }

    /// Streams `url` into the queue as messages tagged with `request_id`.
    pub fn fetch(&self, request_id: RequestId, url: impl Into<String>) {
        self.submit(TransferRequest::stream(request_id, url));
    }

    /// Saves `url` to `local_path` through `<local_path>.part`.
    pub fn download(&self, request_id: RequestId, url: impl Into<String>, local_path: PathBuf) {
        self.submit(TransferRequest::save(request_id, url, local_path));
    }

    pub fn submit(&self, request: TransferRequest) {
        if self.cmd_tx.send(request).is_err() {
            ferret_error!("Poller thread is gone; request dropped");
        }
    }

    /// Everything the poller has produced since the last drain, oldest first.
    pub fn drain(&self) -> Vec<Message> {
        self.queue.pop_all()
    }

    /// Stops the poller between cycles and waits for its thread.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                ferret_error!("Poller thread panicked");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
