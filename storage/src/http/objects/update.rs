use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::objects::ObjectMetadata;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Replaces all the writable metadata of an object.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct UpdateObjectRequest {
    bucket_name: String,
    object_name: String,
    metadata: ObjectMetadata,
    options: RequestOptions,
}

impl UpdateObjectRequest {
    pub fn new(bucket_name: impl Into<String>, object_name: impl Into<String>, metadata: ObjectMetadata) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            metadata,
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn metadata(&self) -> &ObjectMetadata {
        &self.metadata
    }

    pub fn payload(&self) -> String {
        self.metadata.to_json_string()
    }
}

impl_request_options!(UpdateObjectRequest);

impl fmt::Display for UpdateObjectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UpdateObjectRequest={{bucket_name={}, object_name={}, metadata={}",
            self.bucket_name, self.object_name, self.metadata
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &UpdateObjectRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}/o/{}", base_url, req.bucket_name.escape(), req.object_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Put).add_options(&req.options);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_writable_fields() {
        let mut metadata = ObjectMetadata::default();
        metadata.set_content_type("text/plain").upsert_metadata("k", "v");
        let request = UpdateObjectRequest::new("b", "o", metadata);
        let payload: serde_json::Value = serde_json::from_str(&request.payload()).unwrap();
        assert_eq!(payload, serde_json::json!({"contentType": "text/plain", "metadata": {"k": "v"}}));
        let builder = build("http://localhost", CurlHandle::new(), &request);
        assert_eq!(builder.url(), "http://localhost/b/b/o/o");
    }
}
