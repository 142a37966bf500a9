use std::fmt;

use crate::http::bucket_access_controls::BucketAccessControl;
use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::patch_builder::PatchBuilder;
use crate::http::Escape;

/// Builds the body of a bucket ACL patch.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct BucketAccessControlPatchBuilder {
    impl_: PatchBuilder,
}

impl BucketAccessControlPatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_entity(mut self, entity: &str) -> Self {
        self.impl_.set_field("entity", entity);
        self
    }

    pub fn delete_entity(mut self) -> Self {
        self.impl_.remove_field("entity");
        self
    }

    pub fn set_role(mut self, role: &str) -> Self {
        self.impl_.set_field("role", role);
        self
    }

    pub fn delete_role(mut self) -> Self {
        self.impl_.remove_field("role");
        self
    }

    pub fn build_patch(&self) -> String {
        self.impl_.to_json_string()
    }
}

/// Modifies some fields of a bucket access control.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PatchBucketAclRequest {
    bucket_name: String,
    entity: String,
    payload: String,
    options: RequestOptions,
}

impl PatchBucketAclRequest {
    pub fn from_diff(
        bucket_name: impl Into<String>,
        entity: impl Into<String>,
        original: &BucketAccessControl,
        updated: &BucketAccessControl,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            entity: entity.into(),
            payload: PatchBuilder::diff(original, updated).to_json_string(),
            options: RequestOptions::default(),
        }
    }

    pub fn new(
        bucket_name: impl Into<String>,
        entity: impl Into<String>,
        patch: &BucketAccessControlPatchBuilder,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            entity: entity.into(),
            payload: patch.build_patch(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl_request_options!(PatchBucketAclRequest);

impl fmt::Display for PatchBucketAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PatchBucketAclRequest={{bucket_name={}, entity={}",
            self.bucket_name, self.entity
        )?;
        self.options.dump(f)?;
        write!(f, ", payload={}}}", self.payload)
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &PatchBucketAclRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}/acl/{}", base_url, req.bucket_name.escape(), req.entity.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Patch).add_options(&req.options);
    builder
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn diff() {
        let original = BucketAccessControl::default()
            .with_entity("user-test-user")
            .with_role(BucketAccessControl::ROLE_OWNER);
        let updated = original.clone().with_role(BucketAccessControl::ROLE_WRITER);
        let request = PatchBucketAclRequest::from_diff("b", "user-test-user", &original, &updated);
        let payload: Value = serde_json::from_str(request.payload()).unwrap();
        assert_eq!(payload, json!({"role": "WRITER"}));
    }

    #[test]
    fn explicit() {
        let builder = BucketAccessControlPatchBuilder::new().set_entity("allUsers").delete_role();
        let request = PatchBucketAclRequest::new("b", "user-test-user", &builder);
        let payload: Value = serde_json::from_str(request.payload()).unwrap();
        assert_eq!(payload, json!({"entity": "allUsers", "role": null}));
        let builder = build("http://localhost", CurlHandle::new(), &request);
        assert_eq!(builder.url(), "http://localhost/b/b/acl/user-test-user");
    }
}
