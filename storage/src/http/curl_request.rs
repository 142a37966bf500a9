use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use curl::easy::{List, ReadError};
use serde::de::DeserializeOwned;

use crate::http::curl_handle::{CurlHandle, CurlOption};
use crate::http::error::ErrorResponse;
use crate::http::{parse_json_object, Error};

/// HTTP methods used by the JSON API.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Response headers collected from the header callback. Names are lower-cased, repeated
/// headers are joined with `", "`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ResponseHeaders {
    status_code: u32,
    headers: BTreeMap<String, String>,
}

impl ResponseHeaders {
    /// Consumes one raw header line. A status line starts a new response, so headers from
    /// interim responses are dropped.
    pub(crate) fn add_line(&mut self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches(['\r', '\n']);
        if line.starts_with("HTTP/") {
            self.headers.clear();
            self.status_code = line
                .split_whitespace()
                .nth(1)
                .and_then(|code| code.parse().ok())
                .unwrap_or_default();
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            self.headers
                .entry(name)
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
    }

    /// The status of the final response, `0` before the status line arrives.
    pub(crate) fn status_code(&self) -> u32 {
        self.status_code
    }

    pub(crate) fn into_map(self) -> BTreeMap<String, String> {
        self.headers
    }

    pub(crate) fn map(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

/// A fully buffered HTTP response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u32,
    pub payload: Vec<u8>,
    /// Lower-cased header names.
    pub headers: BTreeMap<String, String>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn payload_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// Turns non-2xx responses into errors.
    pub(crate) fn check_status(self) -> Result<Self, Error> {
        if (200..300).contains(&self.status_code) {
            Ok(self)
        } else {
            Err(ErrorResponse::from_http_response(self.status_code, &self.payload).into())
        }
    }

    /// Parses the payload as a JSON object.
    pub(crate) fn parse_json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        parse_json_object(&self.payload_str())
    }
}

/// A request ready to run on a [`CurlHandle`], created by
/// [`crate::http::curl_request_builder::CurlRequestBuilder::build_request`].
pub struct CurlRequest {
    pub(crate) handle: CurlHandle,
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) headers: Vec<String>,
    pub(crate) user_agent: String,
    pub(crate) payload: Vec<u8>,
    /// Payloads up to this size are copied into libcurl, larger ones are streamed from a reader.
    pub(crate) in_memory_limit: usize,
}

impl CurlRequest {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Runs the request and buffers the complete response. Non-2xx statuses are returned as
    /// responses, not errors.
    pub fn make_request(self) -> Result<HttpResponse, Error> {
        self.make_request_keeping_handle().map(|(response, _)| response)
    }

    /// Like [`CurlRequest::make_request`], also handing back the session of a completed
    /// transfer so its connections serve later requests.
    pub(crate) fn make_request_keeping_handle(self) -> Result<(HttpResponse, CurlHandle), Error> {
        let CurlRequest {
            mut handle,
            method,
            url,
            headers,
            user_agent,
            payload,
            in_memory_limit,
        } = self;

        let has_body = !payload.is_empty() || matches!(method, Method::Post | Method::Put | Method::Patch);
        let list = configure(&mut handle, method, &url, &user_agent, &headers, has_body)?;
        if has_body {
            if payload.len() <= in_memory_limit {
                handle.set_option(CurlOption::PostFields, payload.as_slice())?;
            } else {
                handle.set_option(CurlOption::Upload, true)?;
                handle.set_option(CurlOption::InFileSize, payload.len() as u64)?;
                let mut reader = Cursor::new(payload);
                handle.set_reader_callback(move |buf| reader.read(buf).map_err(|_| ReadError::Abort));
            }
        }
        handle.set_option(CurlOption::HttpHeader, list)?;

        let body = Arc::new(Mutex::new(Vec::new()));
        let response_headers = Arc::new(Mutex::new(ResponseHeaders::default()));
        {
            let body = body.clone();
            handle.set_writer_callback(move |data| {
                lock(&body).extend_from_slice(data);
                Ok(data.len())
            });
        }
        {
            let response_headers = response_headers.clone();
            handle.set_header_callback(move |line| {
                lock(&response_headers).add_line(line);
                true
            });
        }

        tracing::trace!("{} {}", method.as_str(), url);
        let result = handle.easy_perform();
        handle.flush_debug("make_request");
        handle.reset_reader_callback();
        handle.reset_writer_callback();
        handle.reset_header_callback();
        result?;

        let status_code = handle.get_response_code()?;
        let payload = std::mem::take(&mut *lock(&body));
        let headers = std::mem::take(&mut *lock(&response_headers)).into_map();
        tracing::trace!("{} {} -> {}", method.as_str(), url, status_code);
        let response = HttpResponse {
            status_code,
            payload,
            headers,
        };
        Ok((response, handle))
    }

    /// Applies URL, method, user agent and headers, leaving callbacks to the caller. Streaming
    /// uploads send a chunked body produced by a reader callback.
    pub(crate) fn into_streaming_handle(self, upload: bool) -> Result<CurlHandle, Error> {
        let CurlRequest {
            mut handle,
            method,
            url,
            headers,
            user_agent,
            ..
        } = self;
        let list = configure(&mut handle, method, &url, &user_agent, &headers, upload)?;
        if upload {
            handle.set_option(CurlOption::Upload, true)?;
        }
        handle.set_option(CurlOption::HttpHeader, list)?;
        tracing::trace!("{} {} (streaming)", method.as_str(), url);
        Ok(handle)
    }
}

fn configure(
    handle: &mut CurlHandle,
    method: Method,
    url: &str,
    user_agent: &str,
    headers: &[String],
    has_body: bool,
) -> Result<List, Error> {
    handle.set_option(CurlOption::Url, url)?;
    handle.set_option(CurlOption::CustomRequest, method.as_str())?;
    if !user_agent.is_empty() {
        handle.set_option(CurlOption::UserAgent, user_agent)?;
    }
    let mut list = List::new();
    for header in headers {
        list.append(header).map_err(|e| Error::transport("append_header", e))?;
    }
    if has_body {
        // no 100-continue round trip
        list.append("Expect:").map_err(|e| Error::transport("append_header", e))?;
    }
    Ok(list)
}
