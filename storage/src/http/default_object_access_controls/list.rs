use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::object_access_controls::ObjectAccessControl;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Lists the default object access controls of a bucket.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ListDefaultObjectAclRequest {
    bucket_name: String,
    options: RequestOptions,
}

impl ListDefaultObjectAclRequest {
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

impl_request_options!(ListDefaultObjectAclRequest);

impl fmt::Display for ListDefaultObjectAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListDefaultObjectAclRequest={{bucket_name={}", self.bucket_name)?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, Debug)]
pub struct ListDefaultObjectAclResponse {
    #[serde(default)]
    pub items: Vec<ObjectAccessControl>,
}

impl fmt::Display for ListDefaultObjectAclResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ListDefaultObjectAclResponse={items=[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &ListDefaultObjectAclRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}/defaultObjectAcl", base_url, req.bucket_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.add_options(&req.options);
    builder
}
