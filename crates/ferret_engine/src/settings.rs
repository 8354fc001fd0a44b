use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// A transfer still connecting after this long fails with `Timeout`.
    pub connect_timeout: Duration,
    /// Size of the single read buffer shared by all transfers.
    pub buffer_size: usize,
    /// Upper bound on one readiness wait.
    pub poll_timeout: Duration,
    /// How long the poller thread waits for new requests when nothing is live.
    pub idle_wait: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            buffer_size: 0x10_0000,
            poll_timeout: Duration::from_micros(50),
            idle_wait: Duration::from_millis(10),
        }
    }
}
