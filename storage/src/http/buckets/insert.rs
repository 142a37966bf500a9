use std::fmt;

use crate::http::buckets::BucketMetadata;
use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Error;

/// Creates a bucket in a project.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CreateBucketRequest {
    project_id: String,
    metadata: BucketMetadata,
    options: RequestOptions,
}

impl CreateBucketRequest {
    pub fn new(project_id: impl Into<String>, metadata: BucketMetadata) -> Self {
        Self {
            project_id: project_id.into(),
            metadata,
            options: RequestOptions::default(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn metadata(&self) -> &BucketMetadata {
        &self.metadata
    }

    pub fn payload(&self) -> String {
        self.metadata.to_json_string()
    }
}

impl_request_options!(CreateBucketRequest);

impl fmt::Display for CreateBucketRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CreateBucketRequest={{project_id={}", self.project_id)?;
        self.options.dump(f)?;
        write!(f, ", metadata={}}}", self.metadata)
    }
}

pub(crate) fn build(
    base_url: &str,
    handle: CurlHandle,
    req: &CreateBucketRequest,
) -> Result<CurlRequestBuilder, Error> {
    if req.metadata.name().is_empty() {
        return Err(Error::InvalidArgument("a new bucket needs a name".to_string()));
    }
    let mut builder = CurlRequestBuilder::new(format!("{base_url}/b"), handle);
    builder
        .set_method(Method::Post)
        .add_query_parameter("project", &req.project_id)
        .add_options(&req.options);
    Ok(builder)
}
