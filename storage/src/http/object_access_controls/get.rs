use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Reads one access control of an object.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct GetObjectAclRequest {
    bucket_name: String,
    object_name: String,
    entity: String,
    options: RequestOptions,
}

impl GetObjectAclRequest {
    pub fn new(bucket_name: impl Into<String>, object_name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            entity: entity.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }
}

impl_request_options!(GetObjectAclRequest);

impl fmt::Display for GetObjectAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GetObjectAclRequest={{bucket_name={}, object_name={}, entity={}",
            self.bucket_name, self.object_name, self.entity
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &GetObjectAclRequest) -> CurlRequestBuilder {
    let url = format!(
        "{}/b/{}/o/{}/acl/{}",
        base_url,
        req.bucket_name.escape(),
        req.object_name.escape(),
        req.entity.escape()
    );
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.add_options(&req.options);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_are_escaped() {
        let request = GetObjectAclRequest::new("my-bucket", "dir/a b?c", "user-joe@example.com");
        let builder = build("https://storage.example.com/storage/v1", CurlHandle::new(), &request);
        assert_eq!(
            builder.url(),
            "https://storage.example.com/storage/v1/b/my-bucket/o/dir%2Fa%20b%3Fc/acl/user-joe%40example.com"
        );
    }
}
