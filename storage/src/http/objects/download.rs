use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// A byte range of an object, sent as the `Range` header.
///
/// `Range(Some(a), Some(b))` reads the inclusive bytes `a..=b`, `Range(Some(a), None)` reads from
/// `a` to the end and `Range(None, Some(n))` reads the last `n` bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Range(pub Option<u64>, pub Option<u64>);

impl Range {
    pub fn header_value(&self) -> String {
        match (self.0, self.1) {
            (Some(from), Some(to)) => format!("bytes={from}-{to}"),
            (Some(from), None) => format!("bytes={from}-"),
            (None, Some(last)) => format!("bytes=-{last}"),
            (None, None) => String::new(),
        }
    }
}

/// Reads the contents of an object.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ReadObjectRequest {
    bucket_name: String,
    object_name: String,
    options: RequestOptions,
}

impl ReadObjectRequest {
    pub fn new(bucket_name: impl Into<String>, object_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }
}

impl_request_options!(ReadObjectRequest);

impl fmt::Display for ReadObjectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ReadObjectRequest={{bucket_name={}, object_name={}",
            self.bucket_name, self.object_name
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &ReadObjectRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}/o/{}", base_url, req.bucket_name.escape(), req.object_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.add_query_parameter("alt", "media").add_options(&req.options);
    builder
}
