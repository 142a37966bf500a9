use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Deletes an empty bucket.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DeleteBucketRequest {
    bucket_name: String,
    options: RequestOptions,
}

impl DeleteBucketRequest {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }
}

impl_request_options!(DeleteBucketRequest);

impl fmt::Display for DeleteBucketRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeleteBucketRequest={{bucket_name={}", self.bucket_name)?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &DeleteBucketRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}", base_url, req.bucket_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Delete).add_options(&req.options);
    builder
}
