use std::fmt;

use crate::http::buckets::BucketMetadata;
use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Replaces all the writable metadata of a bucket. The bucket is named by `metadata`.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct UpdateBucketRequest {
    metadata: BucketMetadata,
    options: RequestOptions,
}

impl UpdateBucketRequest {
    pub fn new(metadata: BucketMetadata) -> Self {
        Self {
            metadata,
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        self.metadata.name()
    }

    pub fn metadata(&self) -> &BucketMetadata {
        &self.metadata
    }

    pub fn payload(&self) -> String {
        self.metadata.to_json_string()
    }
}

impl_request_options!(UpdateBucketRequest);

impl fmt::Display for UpdateBucketRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UpdateBucketRequest={")?;
        write!(f, "metadata={}", self.metadata)?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &UpdateBucketRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}", base_url, req.metadata.name().escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Put).add_options(&req.options);
    builder
}
