use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::object_access_controls::ObjectAccessControl;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::patch_builder::PatchBuilder;
use crate::http::Escape;

/// Builds the body of an object ACL patch.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ObjectAccessControlPatchBuilder {
    impl_: PatchBuilder,
}

impl ObjectAccessControlPatchBuilder {
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

/// Modifies some fields of an object access control.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PatchObjectAclRequest {
    bucket_name: String,
    object_name: String,
    entity: String,
    payload: String,
    options: RequestOptions,
}

impl PatchObjectAclRequest {
    /// A patch computed from the differences between `original` and `updated`.
    pub fn from_diff(
        bucket_name: impl Into<String>,
        object_name: impl Into<String>,
        entity: impl Into<String>,
        original: &ObjectAccessControl,
        updated: &ObjectAccessControl,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            entity: entity.into(),
            payload: PatchBuilder::diff(original, updated).to_json_string(),
            options: RequestOptions::default(),
        }
    }

    pub fn new(
        bucket_name: impl Into<String>,
        object_name: impl Into<String>,
        entity: impl Into<String>,
        patch: &ObjectAccessControlPatchBuilder,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            entity: entity.into(),
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

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl_request_options!(PatchObjectAclRequest);

impl fmt::Display for PatchObjectAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PatchObjectAclRequest={{bucket_name={}, object_name={}, entity={}",
            self.bucket_name, self.object_name, self.entity
        )?;
        self.options.dump(f)?;
        write!(f, ", payload={}}}", self.payload)
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &PatchObjectAclRequest) -> CurlRequestBuilder {
    let url = format!(
        "{}/b/{}/o/{}/acl/{}",
        base_url,
        req.bucket_name.escape(),
        req.object_name.escape(),
        req.entity.escape()
    );
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Patch).add_options(&req.options);
    builder
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::http::options::RequestOption;

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn diff_changes_role_only() {
        let original = ObjectAccessControl::parse_from_string(
            r#"{"bucket": "b", "object": "o", "entity": "user-test-user", "role": "OWNER", "etag": "XYZ="}"#,
        )
        .unwrap();
        let updated = original.clone().with_role("READER");
        let request = PatchObjectAclRequest::from_diff("b", "o", "user-test-user", &original, &updated);
        assert_eq!(parse(request.payload()), json!({"role": "READER"}));
    }

    #[test]
    fn diff_of_identical_values_is_empty() {
        let acl = ObjectAccessControl::default().with_entity("allUsers");
        let request = PatchObjectAclRequest::from_diff("b", "o", "allUsers", &acl, &acl);
        assert_eq!(parse(request.payload()), json!({}));
    }

    #[test]
    fn explicit_patch() {
        let builder = ObjectAccessControlPatchBuilder::new().set_role("READER").delete_entity();
        let request = PatchObjectAclRequest::new("b", "o", "user-test-user", &builder);
        assert_eq!(parse(request.payload()), json!({"role": "READER", "entity": null}));
    }

    #[test]
    fn display() {
        let builder = ObjectAccessControlPatchBuilder::new().set_role("READER");
        let request = PatchObjectAclRequest::new("my-bucket", "my-object", "user-testuser", &builder)
            .with_option(RequestOption::Generation(7));
        let text = request.to_string();
        assert!(text.contains("bucket_name=my-bucket"));
        assert!(text.contains("object_name=my-object"));
        assert!(text.contains("entity=user-testuser"));
        assert!(text.contains("generation=7"));
        assert!(text.contains(r#""role":"READER""#));
    }
}
