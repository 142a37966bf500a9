use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::object_access_controls::ObjectAccessControl;
use crate::http::objects::ObjectMetadata;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::patch_builder::PatchBuilder;
use crate::http::Escape;

/// Builds the body of an object metadata patch.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ObjectMetadataPatchBuilder {
    impl_: PatchBuilder,
    metadata: PatchBuilder,
    metadata_reset: bool,
}

impl ObjectMetadataPatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_acl(mut self, acl: Vec<ObjectAccessControl>) -> Self {
        if acl.is_empty() {
            return self.delete_acl();
        }
        self.impl_.set_serialized("acl", &acl);
        self
    }

    pub fn delete_acl(mut self) -> Self {
        self.impl_.remove_field("acl");
        self
    }

    pub fn set_cache_control(mut self, value: &str) -> Self {
        self.impl_.set_field("cacheControl", value);
        self
    }

    pub fn delete_cache_control(mut self) -> Self {
        self.impl_.remove_field("cacheControl");
        self
    }

    pub fn set_content_disposition(mut self, value: &str) -> Self {
        self.impl_.set_field("contentDisposition", value);
        self
    }

    pub fn delete_content_disposition(mut self) -> Self {
        self.impl_.remove_field("contentDisposition");
        self
    }

    pub fn set_content_encoding(mut self, value: &str) -> Self {
        self.impl_.set_field("contentEncoding", value);
        self
    }

    pub fn delete_content_encoding(mut self) -> Self {
        self.impl_.remove_field("contentEncoding");
        self
    }

    pub fn set_content_language(mut self, value: &str) -> Self {
        self.impl_.set_field("contentLanguage", value);
        self
    }

    pub fn delete_content_language(mut self) -> Self {
        self.impl_.remove_field("contentLanguage");
        self
    }

    pub fn set_content_type(mut self, value: &str) -> Self {
        self.impl_.set_field("contentType", value);
        self
    }

    pub fn delete_content_type(mut self) -> Self {
        self.impl_.remove_field("contentType");
        self
    }

    pub fn set_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.set_field(key, value);
        self
    }

    pub fn delete_metadata(mut self, key: &str) -> Self {
        self.metadata.remove_field(key);
        self
    }

    /// Removes all the user metadata. Entries set after this call replace the removal.
    pub fn reset_metadata(mut self) -> Self {
        self.metadata = PatchBuilder::new();
        self.metadata_reset = true;
        self
    }

    pub fn build_patch(&self) -> String {
        let mut patch = self.impl_.clone();
        if self.metadata.is_empty() {
            if self.metadata_reset {
                patch.remove_field("metadata");
            }
        } else {
            patch.add_sub_patch("metadata", self.metadata.clone());
        }
        patch.to_json_string()
    }
}

/// Modifies some of the metadata of an object.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PatchObjectRequest {
    bucket_name: String,
    object_name: String,
    payload: String,
    options: RequestOptions,
}

impl PatchObjectRequest {
    pub fn from_diff(
        bucket_name: impl Into<String>,
        object_name: impl Into<String>,
        original: &ObjectMetadata,
        updated: &ObjectMetadata,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            payload: PatchBuilder::diff(original, updated).to_json_string(),
            options: RequestOptions::default(),
        }
    }

    pub fn new(
        bucket_name: impl Into<String>,
        object_name: impl Into<String>,
        patch: &ObjectMetadataPatchBuilder,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            payload: patch.build_patch(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl_request_options!(PatchObjectRequest);

impl fmt::Display for PatchObjectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PatchObjectRequest={{bucket_name={}, object_name={}",
            self.bucket_name, self.object_name
        )?;
        self.options.dump(f)?;
        write!(f, ", payload={}}}", self.payload)
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &PatchObjectRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}/o/{}", base_url, req.bucket_name.escape(), req.object_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Patch).add_options(&req.options);
    builder
}
