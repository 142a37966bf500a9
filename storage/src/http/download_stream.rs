use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};

use bytes::BytesMut;
use curl::easy::WriteError;

use crate::http::curl_handle::PauseMask;
use crate::http::curl_multi::MultiDriver;
use crate::http::curl_request::{lock, CurlRequest, ResponseHeaders};
use crate::http::error::ErrorResponse;
use crate::http::Error;

#[derive(Default)]
struct DownloadState {
    buffer: BytesMut,
    headers: ResponseHeaders,
    high_water_mark: usize,
    cancelled: bool,
}

impl DownloadState {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.headers.status_code())
    }

    fn receive(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        if self.cancelled {
            // a short count aborts the transfer
            return Ok(0);
        }
        // error bodies are always collected in full
        if self.is_success() && self.buffer.len() >= self.high_water_mark {
            return Err(WriteError::Pause);
        }
        self.buffer.extend_from_slice(data);
        Ok(data.len())
    }
}

/// Reads an object's media as it arrives.
///
/// The transfer pauses whenever the internal buffer holds the configured number of bytes and
/// resumes as the caller drains it. Non-2xx responses surface as errors from `read`, with the
/// service's error document as the message.
pub struct ObjectReadStream {
    driver: MultiDriver,
    state: Arc<Mutex<DownloadState>>,
    finished: bool,
    failure: Option<ErrorResponse>,
}

impl ObjectReadStream {
    pub(crate) fn start(request: CurlRequest, buffer_size: usize) -> Result<Self, Error> {
        let mut handle = request.into_streaming_handle(false)?;
        let state = Arc::new(Mutex::new(DownloadState {
            high_water_mark: buffer_size.max(1),
            ..Default::default()
        }));
        {
            let state = state.clone();
            handle.set_writer_callback(move |data| lock(&state).receive(data));
        }
        {
            let state = state.clone();
            handle.set_header_callback(move |line| {
                lock(&state).headers.add_line(line);
                true
            });
        }
        Ok(Self {
            driver: MultiDriver::start(handle)?,
            state,
            finished: false,
            failure: None,
        })
    }

    /// The HTTP status, `0` until the response starts arriving.
    pub fn status_code(&self) -> u32 {
        lock(&self.state).headers.status_code()
    }

    /// Response headers received so far, keyed by lower-cased name.
    pub fn headers(&self) -> BTreeMap<String, String> {
        lock(&self.state).headers.map().clone()
    }

    pub fn etag(&self) -> Option<String> {
        self.header("etag")
    }

    /// The object generation reported by the service.
    pub fn generation(&self) -> Option<i64> {
        self.header("x-goog-generation").and_then(|v| v.parse().ok())
    }

    pub fn metageneration(&self) -> Option<i64> {
        self.header("x-goog-metageneration").and_then(|v| v.parse().ok())
    }

    fn header(&self, name: &str) -> Option<String> {
        lock(&self.state).headers.map().get(name).cloned()
    }

    /// Waits until the response headers are available. Returns the status code.
    pub fn wait_for_headers(&mut self) -> Result<u32, Error> {
        let state = self.state.clone();
        self.driver.pump(|| {
            let state = lock(&state);
            state.headers.status_code() != 0 && !state.buffer.is_empty()
        })?;
        self.check_failure()?;
        Ok(self.status_code())
    }

    /// Stops the download. Data not yet read is discarded.
    pub fn close(mut self) -> Result<(), Error> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if self.driver.is_done() {
            self.driver.finish("close")?;
            return Ok(());
        }
        // unpausing would hand the held data to the writer, which fails the transfer
        lock(&self.state).cancelled = true;
        self.driver.abort("close")
    }

    /// Completes a failed transfer and returns the service error, on every call after the failure.
    fn check_failure(&mut self) -> Result<(), Error> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone().into());
        }
        let failed = {
            let state = lock(&self.state);
            state.headers.status_code() != 0 && !state.is_success()
        };
        if !failed || self.finished {
            return Ok(());
        }
        self.finished = true;
        self.driver.resume(PauseMask::CONT)?;
        self.driver.finish("read")?;
        self.fail()
    }

    fn fail(&mut self) -> Result<(), Error> {
        let mut state = lock(&self.state);
        let body = state.buffer.split();
        let error = ErrorResponse::from_http_response(state.headers.status_code(), &body);
        tracing::debug!("download failed: {}", error);
        self.failure = Some(error.clone());
        Err(error.into())
    }

    fn complete(&mut self) -> Result<(), Error> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.driver.finish("read")?;
        let success = lock(&self.state).is_success();
        if !success {
            return self.fail();
        }
        Ok(())
    }

    fn read_buffered(&mut self, out: &mut [u8]) -> Result<usize, Error> {
        loop {
            self.check_failure()?;
            {
                let mut state = lock(&self.state);
                if !state.buffer.is_empty() {
                    let n = out.len().min(state.buffer.len());
                    let chunk = state.buffer.split_to(n);
                    out[..n].copy_from_slice(&chunk);
                    return Ok(n);
                }
            }
            if self.driver.is_done() || self.finished {
                self.complete()?;
                return Ok(0);
            }
            self.driver.resume(PauseMask::CONT)?;
            let state = self.state.clone();
            self.driver.pump(|| !lock(&state).buffer.is_empty())?;
        }
    }
}

impl io::Read for ObjectReadStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.read_buffered(buf).map_err(io::Error::other)
    }
}
