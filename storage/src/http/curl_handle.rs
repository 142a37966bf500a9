//! A thin wrapper around a libcurl easy handle.

use std::any::type_name;
use std::fmt;
use std::time::Duration;

use curl::easy::{Easy2, Handler, InfoType, List, ReadError, WriteError};
use once_cell::sync::Lazy;

use crate::http::Error;

static CURL_GLOBAL_INIT: Lazy<()> = Lazy::new(|| {
    curl::init();
    tracing::debug!("libcurl initialized: {}", curl::Version::get().version());
});

/// Produces upload bytes. `Err(ReadError::Pause)` pauses the send direction.
pub type ReaderCallback = Box<dyn FnMut(&mut [u8]) -> Result<usize, ReadError> + Send>;
/// Consumes download bytes. `Err(WriteError::Pause)` pauses the receive direction and leaves the
/// data unconsumed, a short count aborts the transfer.
pub type WriterCallback = Box<dyn FnMut(&[u8]) -> Result<usize, WriteError> + Send>;
/// Receives one raw header line at a time, returning `false` aborts the transfer.
pub type HeaderCallback = Box<dyn FnMut(&[u8]) -> bool + Send>;

/// Directions to pause with [`CurlHandle::easy_pause`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PauseMask(u8);

impl PauseMask {
    /// Resume both directions.
    pub const CONT: PauseMask = PauseMask(0);
    pub const RECV: PauseMask = PauseMask(1);
    pub const SEND: PauseMask = PauseMask(4);
    pub const ALL: PauseMask = PauseMask(5);

    pub fn pauses_recv(&self) -> bool {
        self.0 & Self::RECV.0 != 0
    }

    pub fn pauses_send(&self) -> bool {
        self.0 & Self::SEND.0 != 0
    }
}

/// Transfer options understood by [`CurlHandle::set_option`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CurlOption {
    Url,
    CustomRequest,
    UserAgent,
    HttpHeader,
    Upload,
    NoBody,
    PostFields,
    InFileSize,
    Verbose,
    TimeoutMs,
    ConnectTimeoutMs,
    FollowLocation,
    NoSignal,
}

/// A parameter for [`CurlHandle::set_option`].
pub enum OptionValue<'a> {
    Long(i64),
    Str(&'a str),
    Bytes(&'a [u8]),
    Headers(List),
}

impl OptionValue<'_> {
    fn render(&self) -> String {
        match self {
            OptionValue::Long(v) => v.to_string(),
            OptionValue::Str(v) => v.to_string(),
            OptionValue::Bytes(v) => format!("pointer=<{} bytes>", v.len()),
            OptionValue::Headers(_) => format!("complex-type=<{}>", type_name::<List>()),
        }
    }
}

impl From<i64> for OptionValue<'_> {
    fn from(v: i64) -> Self {
        OptionValue::Long(v)
    }
}

impl From<u64> for OptionValue<'_> {
    fn from(v: u64) -> Self {
        OptionValue::Long(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<bool> for OptionValue<'_> {
    fn from(v: bool) -> Self {
        OptionValue::Long(v as i64)
    }
}

impl From<Duration> for OptionValue<'_> {
    fn from(v: Duration) -> Self {
        OptionValue::Long(i64::try_from(v.as_millis()).unwrap_or(i64::MAX))
    }
}

impl<'a> From<&'a str> for OptionValue<'a> {
    fn from(v: &'a str) -> Self {
        OptionValue::Str(v)
    }
}

impl<'a> From<&'a [u8]> for OptionValue<'a> {
    fn from(v: &'a [u8]) -> Self {
        OptionValue::Bytes(v)
    }
}

impl From<List> for OptionValue<'_> {
    fn from(v: List) -> Self {
        OptionValue::Headers(v)
    }
}

/// The callbacks installed on every handle.
///
/// A direction paused through [`PauseMask`] answers libcurl with the pause sentinel without
/// touching the user callback. The `*_held` flags remember whether libcurl actually got a pause
/// sentinel, so resuming only unpauses directions libcurl considers paused.
#[derive(Default)]
pub struct Callbacks {
    reader: Option<ReaderCallback>,
    writer: Option<WriterCallback>,
    header: Option<HeaderCallback>,
    recv_paused: bool,
    send_paused: bool,
    recv_held: bool,
    send_held: bool,
    debug_buffer: String,
}

impl Callbacks {
    /// Applies `mask`, returning the directions that need an explicit unpause as `(recv, send)`.
    pub(crate) fn apply_pause(&mut self, mask: PauseMask) -> (bool, bool) {
        self.recv_paused = mask.pauses_recv();
        self.send_paused = mask.pauses_send();
        let recv = !self.recv_paused && std::mem::take(&mut self.recv_held);
        let send = !self.send_paused && std::mem::take(&mut self.send_held);
        (recv, send)
    }

    fn reset(&mut self) {
        self.reader = None;
        self.writer = None;
        self.header = None;
        self.recv_paused = false;
        self.send_paused = false;
        self.recv_held = false;
        self.send_held = false;
    }

    fn take_debug(&mut self) -> String {
        std::mem::take(&mut self.debug_buffer)
    }
}

impl Handler for Callbacks {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        if self.recv_paused {
            self.recv_held = true;
            return Err(WriteError::Pause);
        }
        let result = match self.writer.as_mut() {
            Some(writer) => writer(data),
            None => Ok(data.len()),
        };
        if matches!(result, Err(WriteError::Pause)) {
            self.recv_held = true;
        }
        result
    }

    fn read(&mut self, data: &mut [u8]) -> Result<usize, ReadError> {
        if self.send_paused {
            self.send_held = true;
            return Err(ReadError::Pause);
        }
        let result = match self.reader.as_mut() {
            Some(reader) => reader(data),
            None => Ok(0),
        };
        if matches!(result, Err(ReadError::Pause)) {
            self.send_held = true;
        }
        result
    }

    fn header(&mut self, data: &[u8]) -> bool {
        match self.header.as_mut() {
            Some(header) => header(data),
            None => true,
        }
    }

    fn debug(&mut self, kind: InfoType, data: &[u8]) {
        let prefix = match kind {
            InfoType::Text => "== curl: ",
            InfoType::HeaderIn => "<< ",
            InfoType::HeaderOut => ">> ",
            _ => return,
        };
        self.debug_buffer.push_str(prefix);
        self.debug_buffer.push_str(&String::from_utf8_lossy(data));
    }
}

impl Drop for Callbacks {
    fn drop(&mut self) {
        if !self.debug_buffer.is_empty() {
            tracing::debug!("{}", self.debug_buffer);
        }
    }
}

/// Owns one libcurl easy session and its callbacks.
///
/// A handle is used by one request at a time. [`CurlHandle::take`] moves the session out, leaving
/// a fresh one behind, and neither side keeps the callbacks installed before the move.
pub struct CurlHandle {
    easy: Easy2<Callbacks>,
}

impl fmt::Debug for CurlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurlHandle")
            .field("has_reader_callback", &self.has_reader_callback())
            .field("has_writer_callback", &self.has_writer_callback())
            .field("has_header_callback", &self.has_header_callback())
            .finish()
    }
}

impl Default for CurlHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CurlHandle {
    pub fn new() -> Self {
        Lazy::force(&CURL_GLOBAL_INIT);
        Self {
            easy: Easy2::new(Callbacks::default()),
        }
    }

    pub(crate) fn from_easy(easy: Easy2<Callbacks>) -> Self {
        Self { easy }
    }

    pub(crate) fn into_easy(self) -> Easy2<Callbacks> {
        self.easy
    }

    /// Moves the session out of `self`. `self` gets a new session and both have no callbacks.
    pub fn take(&mut self) -> CurlHandle {
        let mut moved = std::mem::take(self);
        moved.easy.get_mut().reset();
        moved
    }

    /// Clears the options and callbacks of a finished transfer. Open connections stay cached in
    /// the session.
    pub(crate) fn reset_session(&mut self) {
        self.flush_debug("reset_session");
        self.easy.reset();
        self.easy.get_mut().reset();
    }

    pub fn set_reader_callback(
        &mut self,
        callback: impl FnMut(&mut [u8]) -> Result<usize, ReadError> + Send + 'static,
    ) {
        self.easy.get_mut().reader = Some(Box::new(callback));
    }

    pub fn set_writer_callback(&mut self, callback: impl FnMut(&[u8]) -> Result<usize, WriteError> + Send + 'static) {
        self.easy.get_mut().writer = Some(Box::new(callback));
    }

    pub fn set_header_callback(&mut self, callback: impl FnMut(&[u8]) -> bool + Send + 'static) {
        self.easy.get_mut().header = Some(Box::new(callback));
    }

    pub fn reset_reader_callback(&mut self) {
        self.easy.get_mut().reader = None;
    }

    pub fn reset_writer_callback(&mut self) {
        self.easy.get_mut().writer = None;
    }

    pub fn reset_header_callback(&mut self) {
        self.easy.get_mut().header = None;
    }

    pub fn has_reader_callback(&self) -> bool {
        self.easy.get_ref().reader.is_some()
    }

    pub fn has_writer_callback(&self) -> bool {
        self.easy.get_ref().writer.is_some()
    }

    pub fn has_header_callback(&self) -> bool {
        self.easy.get_ref().header.is_some()
    }

    /// Applies a transfer option. A value of the wrong kind for `option` is rejected.
    pub fn set_option<'a>(&mut self, option: CurlOption, value: impl Into<OptionValue<'a>>) -> Result<(), Error> {
        let value = value.into();
        let rendered = value.render();
        let result = match (option, value) {
            (CurlOption::Url, OptionValue::Str(v)) => self.easy.url(v),
            (CurlOption::CustomRequest, OptionValue::Str(v)) => self.easy.custom_request(v),
            (CurlOption::UserAgent, OptionValue::Str(v)) => self.easy.useragent(v),
            (CurlOption::HttpHeader, OptionValue::Headers(v)) => self.easy.http_headers(v),
            (CurlOption::Upload, OptionValue::Long(v)) => self.easy.upload(v != 0),
            (CurlOption::NoBody, OptionValue::Long(v)) => self.easy.nobody(v != 0),
            (CurlOption::PostFields, OptionValue::Bytes(v)) => self.easy.post_fields_copy(v),
            (CurlOption::InFileSize, OptionValue::Long(v)) if v >= 0 => self.easy.in_filesize(v as u64),
            (CurlOption::Verbose, OptionValue::Long(v)) => self.easy.verbose(v != 0),
            (CurlOption::TimeoutMs, OptionValue::Long(v)) if v >= 0 => {
                self.easy.timeout(Duration::from_millis(v as u64))
            }
            (CurlOption::ConnectTimeoutMs, OptionValue::Long(v)) if v >= 0 => {
                self.easy.connect_timeout(Duration::from_millis(v as u64))
            }
            (CurlOption::FollowLocation, OptionValue::Long(v)) => self.easy.follow_location(v != 0),
            (CurlOption::NoSignal, OptionValue::Long(v)) => self.easy.signal(v == 0),
            _ => {
                return Err(Error::SetOption {
                    option,
                    value: rendered,
                    message: "unsupported parameter for this option".to_string(),
                })
            }
        };
        result.map_err(|e| Error::SetOption {
            option,
            value: rendered,
            message: e.to_string(),
        })
    }

    /// Runs the configured transfer to completion on the calling thread.
    pub fn easy_perform(&mut self) -> Result<(), Error> {
        self.easy.perform().map_err(|e| Error::transport("easy_perform", e))
    }

    /// The status code of the last response. Fails if no response was received.
    pub fn get_response_code(&mut self) -> Result<u32, Error> {
        let code = self
            .easy
            .response_code()
            .map_err(|e| Error::transport("get_response_code", e))?;
        if code == 0 {
            return Err(Error::transfer("get_response_code", "no response received"));
        }
        Ok(code)
    }

    /// Pauses or resumes the directions in `mask`. [`PauseMask::CONT`] resumes both.
    pub fn easy_pause(&mut self, mask: PauseMask) -> Result<(), Error> {
        let (recv, send) = self.easy.get_mut().apply_pause(mask);
        if recv {
            self.easy.unpause_write().map_err(|e| Error::transport("easy_pause", e))?;
        }
        if send {
            self.easy.unpause_read().map_err(|e| Error::transport("easy_pause", e))?;
        }
        Ok(())
    }

    /// URL-encodes `value` for use in a query string.
    pub fn make_escaped_string(&mut self, value: &str) -> String {
        self.easy.url_encode(value.as_bytes())
    }

    /// Turns libcurl's verbose output on or off. The output is collected and written to the
    /// `tracing` debug level by [`CurlHandle::flush_debug`].
    pub fn enable_logging(&mut self, enabled: bool) -> Result<(), Error> {
        self.set_option(CurlOption::Verbose, enabled)
    }

    /// Emits the collected verbose output, labelled with `site`.
    pub fn flush_debug(&mut self, site: &str) {
        let text = self.easy.get_mut().take_debug();
        if !text.is_empty() {
            tracing::debug!(site, "{}", text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::Code;

    #[ctor::ctor]
    fn init() {
        let _ = tracing_subscriber::fmt().try_init();
    }

    #[test]
    fn take_detaches_callbacks() {
        let mut source = CurlHandle::new();
        source.set_writer_callback(|data| Ok(data.len()));
        source.set_header_callback(|_| true);
        source.set_reader_callback(|_| Ok(0));
        let moved = source.take();
        assert!(!source.has_writer_callback());
        assert!(!source.has_header_callback());
        assert!(!source.has_reader_callback());
        assert!(!moved.has_writer_callback());
        assert!(!moved.has_header_callback());
        assert!(!moved.has_reader_callback());
    }

    #[test]
    fn set_option_rejects_mismatched_kinds() {
        let mut handle = CurlHandle::new();
        let err = handle.set_option(CurlOption::Url, true).unwrap_err();
        assert_eq!(err.code(), Code::Unknown);
        assert!(err.to_string().contains("Url"));

        let err = handle.set_option(CurlOption::Verbose, List::new()).unwrap_err();
        assert!(err.to_string().contains("complex-type=<"), "{err}");

        handle.set_option(CurlOption::Url, "http://127.0.0.1:1/").unwrap();
        handle.set_option(CurlOption::TimeoutMs, Duration::from_secs(5)).unwrap();
    }

    #[test]
    fn escaped_string() {
        let mut handle = CurlHandle::new();
        assert_eq!(handle.make_escaped_string("a b/c&d"), "a%20b%2Fc%26d");
    }

    #[test]
    fn response_code_without_transfer() {
        let mut handle = CurlHandle::new();
        assert_eq!(handle.get_response_code().unwrap_err().code(), Code::Unknown);
    }

    #[test]
    fn pause_mask_tracks_held_directions() {
        let mut callbacks = Callbacks::default();
        assert_eq!(callbacks.apply_pause(PauseMask::ALL), (false, false));
        assert!(matches!(callbacks.write(b"abc"), Err(WriteError::Pause)));
        assert!(matches!(callbacks.read(&mut [0u8; 4]), Err(ReadError::Pause)));
        assert_eq!(callbacks.apply_pause(PauseMask::SEND), (true, false));
        assert_eq!(callbacks.apply_pause(PauseMask::CONT), (false, true));
        assert_eq!(callbacks.write(b"abc").unwrap(), 3);
    }

    #[test]
    fn connect_failure_is_unavailable() {
        let mut handle = CurlHandle::new();
        // port 1 is never listening on the loopback interface
        handle.set_option(CurlOption::Url, "http://127.0.0.1:1/").unwrap();
        handle.enable_logging(true).unwrap();
        let err = handle.easy_perform().unwrap_err();
        handle.flush_debug("connect_failure_is_unavailable");
        assert_eq!(err.code(), Code::Unavailable);
    }
}
