use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct GetDefaultObjectAclRequest {
    bucket_name: String,
    entity: String,
    options: RequestOptions,
}

impl GetDefaultObjectAclRequest {
    pub fn new(bucket_name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            entity: entity.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }
}

impl_request_options!(GetDefaultObjectAclRequest);

impl fmt::Display for GetDefaultObjectAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GetDefaultObjectAclRequest={{bucket_name={}, entity={}",
            self.bucket_name, self.entity
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &GetDefaultObjectAclRequest) -> CurlRequestBuilder {
    let url = format!(
        "{}/b/{}/defaultObjectAcl/{}",
        base_url,
        req.bucket_name.escape(),
        req.entity.escape()
    );
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.add_options(&req.options);
    builder
}
