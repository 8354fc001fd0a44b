//! Single-threaded readiness loop over every live transfer.

use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Instant;

use ferret_logging::{ferret_debug, ferret_error, ferret_info};
use mio::{Events, Poll, Token};

use crate::connector::{Connector, TcpConnector};
use crate::transfer::{DriveContext, Transfer};
use crate::{EngineSettings, MessageQueue, TransferRequest};

const EVENT_CAPACITY: usize = 256;

/// Owns all transfers and their sockets. Only the poller touches a transfer;
/// results leave through the [`MessageQueue`].
pub struct Poller {
    poll: Poll,
    events: Events,
    transfers: BTreeMap<Token, Transfer>,
    next_token: usize,
    connector: Box<dyn Connector>,
    queue: MessageQueue,
    settings: EngineSettings,
    buffer: Vec<u8>,
}

impl Poller {
    pub fn new(queue: MessageQueue, settings: EngineSettings) -> io::Result<Self> {
        Self::with_connector(queue, settings, Box::new(TcpConnector))
    }

    pub fn with_connector(
        queue: MessageQueue,
        settings: EngineSettings,
        connector: Box<dyn Connector>,
    ) -> io::Result<Self> {
        Ok(Self {
            poll: Poll::new()?,
            events: Events::with_capacity(EVENT_CAPACITY),
            transfers: BTreeMap::new(),
            next_token: 0,
            connector,
            queue,
            buffer: vec![0; settings.buffer_size.max(1)],
            settings,
        })
    }

    pub fn submit(&mut self, request: TransferRequest) {
        let token = Token(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        ferret_info!("Request {} queued: {}", request.request_id, request.url);
        let transfer = Transfer::new(
            request,
            token,
            self.queue.clone(),
            self.settings.connect_timeout,
            Instant::now(),
        );
        self.transfers.insert(token, transfer);
    }

    pub fn live_transfers(&self) -> usize {
        self.transfers.len()
    }

    /// One cycle: wait briefly for readiness, drive every transfer that can
    /// progress exactly once, then retire the ones that ended.
    pub fn run_once(&mut self) -> io::Result<()> {
        if self.transfers.is_empty() {
            return Ok(());
        }

        self.events.clear();
        if self.transfers.values().any(Transfer::has_socket) {
            match self.poll.poll(&mut self.events, Some(self.settings.poll_timeout)) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        for event in self.events.iter() {
            if let Some(transfer) = self.transfers.get_mut(&event.token()) {
                transfer.mark_ready(event);
            }
        }

        let now = Instant::now();
        let registry = self.poll.registry();
        let mut ctx = DriveContext {
            registry,
            connector: self.connector.as_ref(),
            buffer: &mut self.buffer,
            now,
        };
        let mut retired = Vec::new();
        for (token, transfer) in self.transfers.iter_mut() {
            if !transfer.wants_drive(now) {
                continue;
            }
            transfer.drive(&mut ctx);
            if transfer.state().is_terminal() {
                transfer.finalize(registry);
                retired.push(*token);
            }
        }
        for token in retired {
            self.transfers.remove(&token);
        }
        Ok(())
    }

    /// Runs cycles until `stop` is set, taking new requests from `inbox`
    /// between cycles.
    pub fn run(&mut self, inbox: &Receiver<TransferRequest>, stop: &AtomicBool) {
        ferret_debug!("Poller started");
        while !stop.load(Ordering::Acquire) {
            if self.transfers.is_empty() {
                match inbox.recv_timeout(self.settings.idle_wait) {
                    Ok(request) => self.submit(request),
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            while let Ok(request) = inbox.try_recv() {
                self.submit(request);
            }
            if let Err(err) = self.run_once() {
                ferret_error!("Readiness wait failed: {}", err);
            }
        }
        ferret_debug!(
            "Poller stopped with {} live transfers",
            self.transfers.len()
        );
    }
}
