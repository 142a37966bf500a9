use std::io;
use std::sync::{Arc, Mutex};

use bytes::BytesMut;
use curl::easy::ReadError;

use crate::http::curl_handle::PauseMask;
use crate::http::curl_multi::MultiDriver;
use crate::http::curl_request::{lock, CurlRequest, HttpResponse, ResponseHeaders};
use crate::http::error::ErrorResponse;
use crate::http::objects::ObjectMetadata;
use crate::http::Error;

#[derive(Default)]
struct UploadState {
    pending: BytesMut,
    closing: bool,
    response: Vec<u8>,
    headers: ResponseHeaders,
}

impl UploadState {
    fn produce(&mut self, out: &mut [u8]) -> Result<usize, ReadError> {
        if self.pending.is_empty() {
            // 0 ends the chunked body
            return if self.closing { Ok(0) } else { Err(ReadError::Pause) };
        }
        let n = out.len().min(self.pending.len());
        let chunk = self.pending.split_to(n);
        out[..n].copy_from_slice(&chunk);
        Ok(n)
    }
}

/// Writes an object's media with a chunked request.
///
/// Written bytes are buffered and pushed to the transport once the buffer holds the configured
/// number of bytes, on `flush`, and on `close`. The object is only committed by
/// [`ObjectWriteStream::close`], which returns the new object's metadata.
pub struct ObjectWriteStream {
    driver: MultiDriver,
    state: Arc<Mutex<UploadState>>,
    buffer_size: usize,
}

impl ObjectWriteStream {
    pub(crate) fn start(request: CurlRequest, buffer_size: usize) -> Result<Self, Error> {
        let mut handle = request.into_streaming_handle(true)?;
        let state = Arc::new(Mutex::new(UploadState::default()));
        {
            let state = state.clone();
            handle.set_reader_callback(move |out| lock(&state).produce(out));
        }
        {
            let state = state.clone();
            handle.set_writer_callback(move |data| {
                lock(&state).response.extend_from_slice(data);
                Ok(data.len())
            });
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
            buffer_size: buffer_size.max(1),
        })
    }

    /// Hands all pending bytes to the transport. Stops early if the service already answered.
    fn push_pending(&mut self) -> Result<(), Error> {
        if lock(&self.state).pending.is_empty() {
            return Ok(());
        }
        self.driver.resume(PauseMask::CONT)?;
        let state = self.state.clone();
        self.driver.pump(|| lock(&state).pending.is_empty())
    }

    /// The error for a transfer the service ended before the body was complete.
    fn ended_early(&self) -> Error {
        let state = lock(&self.state);
        let status_code = state.headers.status_code();
        if status_code != 0 && !(200..300).contains(&status_code) {
            let error = ErrorResponse::from_http_response(status_code, &state.response);
            tracing::debug!("upload failed: {}", error);
            return error.into();
        }
        Error::transfer("write", "the transfer ended before the upload was closed")
    }

    /// Ends the body, waits for the service response and returns the object metadata.
    pub fn close(mut self) -> Result<ObjectMetadata, Error> {
        self.push_pending()?;
        lock(&self.state).closing = true;
        self.driver.resume(PauseMask::CONT)?;
        self.driver.finish("close")?;
        let (status_code, payload, headers) = {
            let mut state = lock(&self.state);
            let headers = std::mem::take(&mut state.headers);
            (headers.status_code(), std::mem::take(&mut state.response), headers.into_map())
        };
        let response = HttpResponse {
            status_code,
            payload,
            headers,
        }
        .check_status()?;
        response.parse_json()
    }
}

impl io::Write for ObjectWriteStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.driver.is_done() {
            return Err(io::Error::other(self.ended_early()));
        }
        let pending = {
            let mut state = lock(&self.state);
            state.pending.extend_from_slice(buf);
            state.pending.len()
        };
        if pending >= self.buffer_size {
            self.push_pending().map_err(io::Error::other)?;
            if self.driver.is_done() && !lock(&self.state).pending.is_empty() {
                return Err(io::Error::other(self.ended_early()));
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.push_pending().map_err(io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produce_pauses_until_closing() {
        let mut state = UploadState::default();
        let mut out = [0u8; 4];
        assert!(matches!(state.produce(&mut out), Err(ReadError::Pause)));
        state.pending.extend_from_slice(b"abcdef");
        assert_eq!(state.produce(&mut out).unwrap(), 4);
        assert_eq!(&out, b"abcd");
        assert_eq!(state.produce(&mut out).unwrap(), 2);
        assert_eq!(&out[..2], b"ef");
        state.closing = true;
        assert_eq!(state.produce(&mut out).unwrap(), 0);
    }
}
