//! Per-request state machine driving one socket from connect to close.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use bytes::Bytes;
use ferret_core::Address;
use ferret_logging::{ferret_debug, ferret_error, ferret_info, ferret_trace, ferret_warn};
use mio::event::Event;
use mio::net::TcpStream;
use mio::{Interest, Registry, Token};

use crate::connector::Connector;
use crate::persist::{commit_part, create_part_file};
use crate::{Message, MessageQueue, TransferError, TransferMode, TransferRequest, TransferState};

/// What a transfer needs from the poller for one step.
pub(crate) struct DriveContext<'a> {
    pub(crate) registry: &'a Registry,
    pub(crate) connector: &'a dyn Connector,
    pub(crate) buffer: &'a mut [u8],
    pub(crate) now: Instant,
}

enum Sink {
    Queue,
    File {
        local_path: PathBuf,
        tmp_path: PathBuf,
        file: Option<BufWriter<File>>,
    },
}

pub(crate) struct Transfer {
    request: TransferRequest,
    token: Token,
    state: TransferState,
    stream: Option<TcpStream>,
    sink: Sink,
    queue: MessageQueue,
    request_line: Vec<u8>,
    sent: usize,
    started_at: Instant,
    connect_timeout: Duration,
    // Edge-triggered readiness: set by events, cleared on WouldBlock.
    readable: bool,
    writable: bool,
}

impl Transfer {
    pub(crate) fn new(
        request: TransferRequest,
        token: Token,
        queue: MessageQueue,
        connect_timeout: Duration,
        now: Instant,
    ) -> Self {
        let sink = match &request.mode {
            TransferMode::StreamToQueue => Sink::Queue,
            TransferMode::SaveToFile {
                local_path,
                tmp_path,
            } => Sink::File {
                local_path: local_path.clone(),
                tmp_path: tmp_path.clone(),
                file: None,
            },
        };
        Self {
            request,
            token,
            state: TransferState::Start,
            stream: None,
            sink,
            queue,
            request_line: Vec::new(),
            sent: 0,
            started_at: now,
            connect_timeout,
            readable: false,
            writable: false,
        }
    }

    pub(crate) fn state(&self) -> &TransferState {
        &self.state
    }

    pub(crate) fn has_socket(&self) -> bool {
        self.stream.is_some()
    }

    pub(crate) fn mark_ready(&mut self, event: &Event) {
        if event.is_readable() || event.is_read_closed() || event.is_error() {
            self.readable = true;
        }
        if event.is_writable() || event.is_write_closed() || event.is_error() {
            self.writable = true;
        }
    }

    /// Whether the current state can make progress in this cycle.
    pub(crate) fn wants_drive(&self, now: Instant) -> bool {
        match self.state {
            TransferState::Start => true,
            TransferState::Connecting => {
                self.writable || now.duration_since(self.started_at) >= self.connect_timeout
            }
            TransferState::SendingRequest => self.writable,
            TransferState::Receiving => self.readable,
            TransferState::Finished | TransferState::Failed(_) => true,
        }
    }

    /// Advances the state machine by at most one step.
    pub(crate) fn drive(&mut self, ctx: &mut DriveContext<'_>) {
        let step = match self.state {
            TransferState::Start => self.start(ctx),
            TransferState::Connecting => self.check_connect(ctx.now),
            TransferState::SendingRequest => self.send_request(),
            TransferState::Receiving => self.receive(ctx.buffer),
            TransferState::Finished | TransferState::Failed(_) => Ok(()),
        };
        if let Err(err) = step {
            ferret_warn!(
                "Request {} ({}) failed: {}",
                self.request.request_id,
                self.request.url,
                err
            );
            self.state = TransferState::Failed(err);
        }
    }

    fn start(&mut self, ctx: &mut DriveContext<'_>) -> Result<(), TransferError> {
        self.started_at = ctx.now;
        if let Sink::File {
            local_path,
            tmp_path,
            file,
        } = &mut self.sink
        {
            ferret_info!("Downloading {} to {}", self.request.url, local_path.display());
            let created =
                create_part_file(tmp_path).map_err(|err| TransferError::FileOpen(err.to_string()))?;
            *file = Some(BufWriter::new(created));
        }

        let address = Address::parse(&self.request.url)
            .map_err(|err| TransferError::InvalidAddress(err.to_string()))?;
        self.request_line = address.request_line();

        let mut stream = ctx.connector.open(&address.host, &address.port)?;
        ctx.registry
            .register(&mut stream, self.token, Interest::READABLE | Interest::WRITABLE)
            .map_err(|err| TransferError::Socket(err.to_string()))?;
        self.stream = Some(stream);
        self.state = TransferState::Connecting;
        ferret_debug!(
            "Request {} connecting to {}:{}",
            self.request.request_id,
            address.host,
            address.port
        );
        Ok(())
    }

    fn check_connect(&mut self, now: Instant) -> Result<(), TransferError> {
        if self.writable {
            let stream = self.stream.as_ref().ok_or_else(socket_gone)?;
            if let Some(err) = stream.take_error().map_err(socket_error)? {
                return Err(socket_error(err));
            }
            match stream.peer_addr() {
                Ok(_) => {
                    ferret_trace!("Request {} connected", self.request.request_id);
                    self.state = TransferState::SendingRequest;
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::NotConnected => self.writable = false,
                Err(err) => return Err(socket_error(err)),
            }
        }

        if now.duration_since(self.started_at) >= self.connect_timeout {
            return Err(TransferError::ConnectTimeout);
        }
        Ok(())
    }

    fn send_request(&mut self) -> Result<(), TransferError> {
        let stream = self.stream.as_mut().ok_or_else(socket_gone)?;
        while self.sent < self.request_line.len() {
            match stream.write(&self.request_line[self.sent..]) {
                Ok(0) => return Err(TransferError::Write("connection closed".into())),
                Ok(n) => self.sent += n,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    self.writable = false;
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(TransferError::Write(err.to_string())),
            }
        }
        ferret_trace!(
            "Request {} sent {} bytes",
            self.request.request_id,
            self.request_line.len()
        );
        self.state = TransferState::Receiving;
        Ok(())
    }

    /// One bounded read per call; the buffer is shared with every transfer.
    fn receive(&mut self, buffer: &mut [u8]) -> Result<(), TransferError> {
        let stream = self.stream.as_mut().ok_or_else(socket_gone)?;
        let read = stream.read(buffer);
        match read {
            Ok(0) => {
                ferret_debug!("Request {} reached end of stream", self.request.request_id);
                self.state = TransferState::Finished;
                Ok(())
            }
            Ok(n) => self.deliver(&buffer[..n]),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                self.readable = false;
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(()),
            Err(err) => Err(TransferError::Read(err.to_string())),
        }
    }

    fn deliver(&mut self, bytes: &[u8]) -> Result<(), TransferError> {
        ferret_trace!("Request {} received {} bytes", self.request.request_id, bytes.len());
        match &mut self.sink {
            Sink::Queue => {
                self.queue.push(Message::data(
                    self.request.request_id,
                    Bytes::copy_from_slice(bytes),
                ));
                Ok(())
            }
            Sink::File {
                file: Some(file), ..
            } => file
                .write_all(bytes)
                .map_err(|err| TransferError::FileWrite(err.to_string())),
            Sink::File { file: None, .. } => {
                Err(TransferError::FileWrite("file is not open".into()))
            }
        }
    }

    /// Closes the socket and runs the side effects of the terminal state.
    /// The poller calls this exactly once per transfer.
    pub(crate) fn finalize(&mut self, registry: &Registry) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(err) = registry.deregister(&mut stream) {
                ferret_debug!("Deregistering request {} failed: {}", self.request.request_id, err);
            }
        }

        let request_id = self.request.request_id;
        match (&self.state, &mut self.sink) {
            (TransferState::Finished, Sink::Queue) => self.queue.push(Message::finished(request_id)),
            (TransferState::Failed(err), Sink::Queue) => {
                self.queue.push(Message::error(request_id, err.to_string()))
            }
            (
                TransferState::Finished,
                Sink::File {
                    local_path,
                    tmp_path,
                    file,
                },
            ) => {
                if let Some(mut file) = file.take() {
                    if let Err(err) = file.flush() {
                        ferret_error!("Downloading {} failed: {}", local_path.display(), err);
                        return;
                    }
                }
                match commit_part(tmp_path, local_path) {
                    Ok(()) => ferret_info!("Download finished: {}", local_path.display()),
                    Err(err) => ferret_error!(
                        "Failed to rename {} to {}: {}",
                        tmp_path.display(),
                        local_path.display(),
                        err
                    ),
                }
            }
            (TransferState::Failed(err), Sink::File { local_path, file, .. }) => {
                file.take();
                ferret_warn!("Downloading {} failed: {}", local_path.display(), err);
            }
            _ => {}
        }
    }
}

fn socket_gone() -> TransferError {
    TransferError::Socket("socket is closed".into())
}

fn socket_error(err: io::Error) -> TransferError {
    TransferError::Socket(err.to_string())
}
