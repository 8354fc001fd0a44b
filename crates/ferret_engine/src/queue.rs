use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::Message;

/// FIFO of messages from the poller thread to the consumer.
///
/// Clones share the same queue. The lock is held only while a message is
/// appended or removed.
#[derive(Debug, Clone, Default)]
pub struct MessageQueue {
    inner: Arc<Mutex<VecDeque<Message>>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: Message) {
        self.lock().push_back(message);
    }

    pub fn pop(&self) -> Option<Message> {
        self.lock().pop_front()
    }

    /// Removes and returns everything queued so far, oldest first.
    pub fn pop_all(&self) -> Vec<Message> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        // A panicking producer cannot leave a VecDeque half-updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
