use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Reads the metadata of an object.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct GetObjectMetadataRequest {
    bucket_name: String,
    object_name: String,
    options: RequestOptions,
}

impl GetObjectMetadataRequest {
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

impl_request_options!(GetObjectMetadataRequest);

impl fmt::Display for GetObjectMetadataRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GetObjectMetadataRequest={{bucket_name={}, object_name={}",
            self.bucket_name, self.object_name
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &GetObjectMetadataRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}/o/{}", base_url, req.bucket_name.escape(), req.object_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.add_options(&req.options);
    builder
}
