use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::object_access_controls::ObjectAccessControl;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Lists the access controls of an object.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ListObjectAclRequest {
    bucket_name: String,
    object_name: String,
    options: RequestOptions,
}

impl ListObjectAclRequest {
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

impl_request_options!(ListObjectAclRequest);

impl fmt::Display for ListObjectAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ListObjectAclRequest={{bucket_name={}, object_name={}",
            self.bucket_name, self.object_name
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

/// The access controls of an object.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, Debug)]
pub struct ListObjectAclResponse {
    #[serde(default)]
    pub items: Vec<ObjectAccessControl>,
}

impl fmt::Display for ListObjectAclResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ListObjectAclResponse={items=[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &ListObjectAclRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}/o/{}/acl", base_url, req.bucket_name.escape(), req.object_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.add_options(&req.options);
    builder
}
