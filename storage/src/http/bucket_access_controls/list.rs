use std::fmt;

use crate::http::bucket_access_controls::BucketAccessControl;
use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Lists the access controls of a bucket.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ListBucketAclRequest {
    bucket_name: String,
    options: RequestOptions,
}

impl ListBucketAclRequest {
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

impl_request_options!(ListBucketAclRequest);

impl fmt::Display for ListBucketAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListBucketAclRequest={{bucket_name={}", self.bucket_name)?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

/// The access controls of a bucket.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, Debug)]
pub struct ListBucketAclResponse {
    #[serde(default)]
    pub items: Vec<BucketAccessControl>,
}

impl fmt::Display for ListBucketAclResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ListBucketAclResponse={items=[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &ListBucketAclRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}/acl", base_url, req.bucket_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.add_options(&req.options);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_display() {
        let response: ListBucketAclResponse = serde_json::from_str(
            r#"{"kind": "storage#bucketAccessControls", "items": [
                {"bucket": "foo-bar", "entity": "user-qux", "role": "OWNER"},
                {"bucket": "foo-bar", "entity": "allUsers", "role": "READER"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(response.items.len(), 2);
        let text = response.to_string();
        assert!(text.starts_with("ListBucketAclResponse={items=[BucketAccessControl={"));
        assert!(text.contains("entity=user-qux"));
        assert!(text.contains("entity=allUsers"));
        assert!(text.ends_with("]}"));
    }

    #[test]
    fn empty_response() {
        let response: ListBucketAclResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
        assert_eq!(response.to_string(), "ListBucketAclResponse={items=[]}");
    }
}
