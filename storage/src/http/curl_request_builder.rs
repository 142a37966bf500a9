use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::{CurlRequest, Method};
use crate::http::download_stream::ObjectReadStream;
use crate::http::options::RequestOptions;
use crate::http::upload_stream::ObjectWriteStream;
use crate::http::Error;

/// Buffer sizes used when requests are executed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TransferSettings {
    /// Request bodies up to this size are handed to libcurl in one piece.
    pub maximum_simple_upload_size: usize,
    /// Downloads pause once this many bytes are waiting to be read.
    pub download_buffer_size: usize,
    /// Uploads push buffered bytes to the transport once this many are pending.
    pub upload_buffer_size: usize,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            maximum_simple_upload_size: 8 * 1024 * 1024,
            download_buffer_size: 2 * 1024 * 1024,
            upload_buffer_size: 2 * 1024 * 1024,
        }
    }
}

/// Accumulates the method, URL, query parameters and headers of one request.
///
/// Query values are escaped with the handle's own encoder. The first parameter is introduced
/// with `?` and the rest with `&`, including URLs that already carry a query string.
pub struct CurlRequestBuilder {
    handle: CurlHandle,
    method: Method,
    url: String,
    query_separator: char,
    headers: Vec<String>,
    user_agent: String,
    settings: TransferSettings,
}

impl CurlRequestBuilder {
    pub fn new(base_url: impl Into<String>, handle: CurlHandle) -> Self {
        let url = base_url.into();
        let query_separator = if url.contains('?') { '&' } else { '?' };
        Self {
            handle,
            method: Method::Get,
            url,
            query_separator,
            headers: vec![],
            user_agent: String::new(),
            settings: TransferSettings::default(),
        }
    }

    pub fn set_method(&mut self, method: Method) -> &mut Self {
        self.method = method;
        self
    }

    pub fn add_header(&mut self, header: impl Into<String>) -> &mut Self {
        self.headers.push(header.into());
        self
    }

    /// Appends `key=value` to the URL, escaping both parts.
    pub fn add_query_parameter(&mut self, key: &str, value: &str) -> &mut Self {
        let key = self.handle.make_escaped_string(key);
        let value = self.handle.make_escaped_string(value);
        self.url.push(self.query_separator);
        self.url.push_str(&key);
        self.url.push('=');
        self.url.push_str(&value);
        self.query_separator = '&';
        self
    }

    pub fn add_user_agent_prefix(&mut self, prefix: &str) -> &mut Self {
        if !prefix.is_empty() {
            self.user_agent = if self.user_agent.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix} {}", self.user_agent)
            };
        }
        self
    }

    pub fn set_transfer_settings(&mut self, settings: TransferSettings) -> &mut Self {
        self.settings = settings;
        self
    }

    /// Adds every option of `options`: query options to the URL, header options as headers.
    pub fn add_options(&mut self, options: &RequestOptions) -> &mut Self {
        options.apply_query(self);
        options.apply_headers(self);
        self
    }

    pub fn has_header(&self, name: &str) -> bool {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.headers.iter().any(|h| h.to_ascii_lowercase().starts_with(&prefix))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn build_request(self, payload: impl Into<Vec<u8>>) -> CurlRequest {
        CurlRequest {
            handle: self.handle,
            method: self.method,
            url: self.url,
            headers: self.headers,
            user_agent: self.user_agent,
            payload: payload.into(),
            in_memory_limit: self.settings.maximum_simple_upload_size,
        }
    }

    /// Starts a streaming download of the response body.
    pub fn build_download_request(self) -> Result<ObjectReadStream, Error> {
        let buffer_size = self.settings.download_buffer_size;
        ObjectReadStream::start(self.into_request(), buffer_size)
    }

    /// Starts a chunked upload whose body is written through the returned stream.
    pub fn build_upload_request(mut self) -> Result<ObjectWriteStream, Error> {
        self.add_header("Transfer-Encoding: chunked");
        let buffer_size = self.settings.upload_buffer_size;
        ObjectWriteStream::start(self.into_request(), buffer_size)
    }

    fn into_request(self) -> CurlRequest {
        self.build_request(Vec::new())
    }
}
