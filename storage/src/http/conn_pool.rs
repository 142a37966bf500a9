use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::http::curl_handle::{CurlHandle, CurlOption};
use crate::http::curl_request::lock;
use crate::http::Error;

#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    /// Sends libcurl's verbose output to the `tracing` debug level.
    pub enable_http_tracing: bool,
}

impl ConnectionOptions {
    fn apply(&self, handle: &mut CurlHandle) -> Result<(), Error> {
        if let Some(t) = self.timeout {
            handle.set_option(CurlOption::TimeoutMs, t)?;
        }
        if let Some(t) = self.connect_timeout {
            handle.set_option(CurlOption::ConnectTimeoutMs, t)?;
        }
        // libcurl must not use signals for timeouts in a multi-threaded process
        handle.set_option(CurlOption::NoSignal, true)?;
        if self.enable_http_tracing {
            handle.enable_logging(true)?;
        }
        Ok(())
    }
}

const MAX_IDLE_HANDLES: usize = 4;

/// The transport of one logical client: an endpoint plus the options every handle gets.
///
/// Handles of completed requests are kept idle, so the connections libcurl caches in them are
/// reused by later requests.
#[derive(Debug)]
pub struct Channel {
    endpoint: String,
    options: ConnectionOptions,
    idle: Mutex<Vec<CurlHandle>>,
}

impl Channel {
    fn new(endpoint: String, options: ConnectionOptions) -> Self {
        Self {
            endpoint,
            options,
            idle: Mutex::new(Vec::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// An idle handle, or a new one, configured with this channel's options.
    pub fn handle(&self) -> Result<CurlHandle, Error> {
        let mut handle = lock(&self.idle).pop().unwrap_or_default();
        self.options.apply(&mut handle)?;
        Ok(handle)
    }

    /// Returns the handle of a completed request. Handles beyond the idle limit are dropped.
    pub fn release(&self, mut handle: CurlHandle) {
        handle.reset_session();
        let mut idle = lock(&self.idle);
        if idle.len() < MAX_IDLE_HANDLES {
            idle.push(handle);
        }
    }

    pub fn idle_handles(&self) -> usize {
        lock(&self.idle).len()
    }
}

#[derive(Debug)]
struct AtomicRing<T>
where
    T: Debug,
{
    index: AtomicUsize,
    values: Vec<Arc<T>>,
}

impl<T> AtomicRing<T>
where
    T: Debug,
{
    fn next(&self) -> Arc<T> {
        let current = self.index.fetch_add(1, Ordering::SeqCst);
        self.values[current % self.values.len()].clone()
    }
}

/// Hands out `size` channels round-robin. Channels are created on first use and cached until
/// [`ConnectionPool::reset`].
#[derive(Debug)]
pub struct ConnectionPool {
    size: usize,
    endpoint: String,
    options: ConnectionOptions,
    inner: Mutex<Option<Arc<AtomicRing<Channel>>>>,
}

impl ConnectionPool {
    pub fn new(size: usize, endpoint: impl Into<String>, options: ConnectionOptions) -> Self {
        Self {
            size: size.max(1),
            endpoint: endpoint.into(),
            options,
            inner: Mutex::new(None),
        }
    }

    pub fn num(&self) -> usize {
        self.size
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn channel(&self) -> Arc<Channel> {
        let ring = {
            let mut inner = lock(&self.inner);
            inner
                .get_or_insert_with(|| {
                    tracing::trace!("creating {} channels for {}", self.size, self.endpoint);
                    Arc::new(AtomicRing {
                        index: AtomicUsize::new(0),
                        values: (0..self.size)
                            .map(|_| Arc::new(Channel::new(self.endpoint.clone(), self.options.clone())))
                            .collect(),
                    })
                })
                .clone()
        };
        ring.next()
    }

    /// Drops the cached channels. Channels already handed out stay usable.
    pub fn reset(&self) {
        lock(&self.inner).take();
    }
}
