use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Reads the metadata of a bucket.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct GetBucketMetadataRequest {
    bucket_name: String,
    options: RequestOptions,
}

impl GetBucketMetadataRequest {
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

impl_request_options!(GetBucketMetadataRequest);

impl fmt::Display for GetBucketMetadataRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GetBucketMetadataRequest={{bucket_name={}", self.bucket_name)?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &GetBucketMetadataRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}", base_url, req.bucket_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.add_options(&req.options);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::options::{Projection, RequestOption};

    #[test]
    fn options_reach_the_url() {
        let mut request = GetBucketMetadataRequest::new("my-bucket");
        request.set_multiple_options([
            RequestOption::IfMetagenerationNotMatch(3),
            RequestOption::Projection(Projection::Full),
            RequestOption::IfMetagenerationNotMatch(5),
        ]);
        assert_eq!(
            request.to_string(),
            "GetBucketMetadataRequest={bucket_name=my-bucket, ifMetagenerationNotMatch=5, projection=full}"
        );
        let builder = build("http://localhost", CurlHandle::new(), &request);
        assert_eq!(
            builder.url(),
            "http://localhost/b/my-bucket?ifMetagenerationNotMatch=5&projection=full"
        );
    }
}
