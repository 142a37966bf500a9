use std::fmt;

use crate::http::bucket_access_controls::BucketAccessControl;
use crate::http::buckets::{
    BucketBilling, BucketEncryption, BucketLifecycle, BucketLogging, BucketMetadata, BucketVersioning, BucketWebsite,
    CorsEntry,
};
use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::object_access_controls::ObjectAccessControl;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::patch_builder::PatchBuilder;
use crate::http::Escape;

/// Builds the body of a bucket metadata patch.
///
/// Each `set_*` call sends the new value of a field, each `delete_*` call asks the service to
/// remove it. Fields never mentioned keep their current value. Setting an empty list is the
/// same as deleting the field.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct BucketMetadataPatchBuilder {
    impl_: PatchBuilder,
    labels: PatchBuilder,
    labels_reset: bool,
}

impl BucketMetadataPatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_acl(mut self, acl: Vec<BucketAccessControl>) -> Self {
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

    pub fn set_billing(mut self, billing: &BucketBilling) -> Self {
        self.impl_.set_serialized("billing", billing);
        self
    }

    pub fn delete_billing(mut self) -> Self {
        self.impl_.remove_field("billing");
        self
    }

    pub fn set_cors(mut self, cors: Vec<CorsEntry>) -> Self {
        if cors.is_empty() {
            return self.delete_cors();
        }
        self.impl_.set_serialized("cors", &cors);
        self
    }

    pub fn delete_cors(mut self) -> Self {
        self.impl_.remove_field("cors");
        self
    }

    pub fn set_default_acl(mut self, acl: Vec<ObjectAccessControl>) -> Self {
        if acl.is_empty() {
            return self.delete_default_acl();
        }
        self.impl_.set_serialized("defaultObjectAcl", &acl);
        self
    }

    pub fn delete_default_acl(mut self) -> Self {
        self.impl_.remove_field("defaultObjectAcl");
        self
    }

    pub fn set_encryption(mut self, encryption: &BucketEncryption) -> Self {
        self.impl_.set_serialized("encryption", encryption);
        self
    }

    pub fn delete_encryption(mut self) -> Self {
        self.impl_.remove_field("encryption");
        self
    }

    pub fn set_label(mut self, key: &str, value: &str) -> Self {
        self.labels.set_field(key, value);
        self
    }

    pub fn delete_label(mut self, key: &str) -> Self {
        self.labels.remove_field(key);
        self
    }

    /// Removes all the labels. Labels set after this call replace the removal in the patch.
    pub fn reset_labels(mut self) -> Self {
        self.labels = PatchBuilder::new();
        self.labels_reset = true;
        self
    }

    pub fn set_lifecycle(mut self, lifecycle: &BucketLifecycle) -> Self {
        self.impl_.set_serialized("lifecycle", lifecycle);
        self
    }

    pub fn delete_lifecycle(mut self) -> Self {
        self.impl_.remove_field("lifecycle");
        self
    }

    pub fn set_logging(mut self, logging: &BucketLogging) -> Self {
        self.impl_.set_serialized("logging", logging);
        self
    }

    pub fn delete_logging(mut self) -> Self {
        self.impl_.remove_field("logging");
        self
    }

    pub fn set_name(mut self, name: &str) -> Self {
        self.impl_.set_field("name", name);
        self
    }

    pub fn delete_name(mut self) -> Self {
        self.impl_.remove_field("name");
        self
    }

    pub fn set_storage_class(mut self, storage_class: &str) -> Self {
        self.impl_.set_field("storageClass", storage_class);
        self
    }

    pub fn delete_storage_class(mut self) -> Self {
        self.impl_.remove_field("storageClass");
        self
    }

    pub fn set_versioning(mut self, versioning: BucketVersioning) -> Self {
        self.impl_.set_serialized("versioning", &versioning);
        self
    }

    pub fn delete_versioning(mut self) -> Self {
        self.impl_.remove_field("versioning");
        self
    }

    pub fn set_website(mut self, website: &BucketWebsite) -> Self {
        self.impl_.set_serialized("website", website);
        self
    }

    pub fn delete_website(mut self) -> Self {
        self.impl_.remove_field("website");
        self
    }

    pub fn build_patch(&self) -> String {
        let mut patch = self.impl_.clone();
        if self.labels.is_empty() {
            if self.labels_reset {
                patch.remove_field("labels");
            }
        } else {
            patch.add_sub_patch("labels", self.labels.clone());
        }
        patch.to_json_string()
    }
}

/// Modifies some of the metadata of a bucket.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PatchBucketRequest {
    bucket_name: String,
    payload: String,
    options: RequestOptions,
}

impl PatchBucketRequest {
    /// A patch computed from the differences between `original` and `updated`.
    pub fn from_diff(bucket_name: impl Into<String>, original: &BucketMetadata, updated: &BucketMetadata) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            payload: PatchBuilder::diff(original, updated).to_json_string(),
            options: RequestOptions::default(),
        }
    }

    pub fn new(bucket_name: impl Into<String>, patch: &BucketMetadataPatchBuilder) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            payload: patch.build_patch(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl_request_options!(PatchBucketRequest);

impl fmt::Display for PatchBucketRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatchBucketRequest={{bucket_name={}", self.bucket_name)?;
        self.options.dump(f)?;
        write!(f, ", payload={}}}", self.payload)
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &PatchBucketRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}", base_url, req.bucket_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Patch).add_options(&req.options);
    builder
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::http::buckets::tests::bucket_for_test;
    use crate::http::buckets::LifecycleRule;

    fn payload(request: &PatchBucketRequest) -> Value {
        serde_json::from_str(request.payload()).unwrap()
    }

    #[test]
    fn diff_of_identical_buckets_is_empty() {
        let bucket = bucket_for_test();
        let request = PatchBucketRequest::from_diff("test-bucket", &bucket, &bucket);
        assert_eq!(payload(&request), json!({}));
    }

    #[test]
    fn diff_reports_changes_and_removals() {
        let original = bucket_for_test();
        let mut updated = original.clone();
        updated
            .reset_website()
            .disable_versioning()
            .upsert_label("label-key-1", "changed")
            .delete_label("label-key-2");
        updated.mutable_logging().log_prefix = "new-prefix".to_string();
        let request = PatchBucketRequest::from_diff("test-bucket", &original, &updated);
        assert_eq!(
            payload(&request),
            json!({
                "website": null,
                "versioning": {"enabled": false},
                "labels": {"label-key-1": "changed", "label-key-2": null},
                "logging": {"logObjectPrefix": "new-prefix"}
            })
        );
    }

    #[test]
    fn explicit_fields() {
        let builder = BucketMetadataPatchBuilder::new()
            .set_storage_class("NEARLINE")
            .delete_website()
            .set_versioning(BucketVersioning { enabled: true })
            .set_cors(vec![])
            .set_lifecycle(&BucketLifecycle {
                rule: vec![LifecycleRule::new(LifecycleRule::max_age(30), LifecycleRule::delete())],
            })
            .set_label("env", "prod")
            .delete_label("owner");
        let request = PatchBucketRequest::new("my-bucket", &builder);
        assert_eq!(
            payload(&request),
            json!({
                "storageClass": "NEARLINE",
                "website": null,
                "versioning": {"enabled": true},
                "cors": null,
                "lifecycle": {"rule": [{"action": {"type": "Delete"}, "condition": {"age": 30}}]},
                "labels": {"env": "prod", "owner": null}
            })
        );
    }

    #[test]
    fn reset_labels() {
        let builder = BucketMetadataPatchBuilder::new().set_label("a", "1").reset_labels();
        let request = PatchBucketRequest::new("my-bucket", &builder);
        assert_eq!(payload(&request), json!({"labels": null}));

        let builder = BucketMetadataPatchBuilder::new().reset_labels().set_label("a", "1");
        let request = PatchBucketRequest::new("my-bucket", &builder);
        assert_eq!(payload(&request), json!({"labels": {"a": "1"}}));
    }

    #[test]
    fn empty_builder() {
        let request = PatchBucketRequest::new("my-bucket", &BucketMetadataPatchBuilder::new());
        assert_eq!(request.payload(), "{}");
        let builder = build("http://localhost", CurlHandle::new(), &request);
        assert_eq!(builder.url(), "http://localhost/b/my-bucket");
    }
}
