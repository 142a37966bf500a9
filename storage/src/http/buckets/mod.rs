use std::collections::BTreeMap;
use std::fmt;

use time::OffsetDateTime;

use crate::http::bucket_access_controls::BucketAccessControl;
use crate::http::object_access_controls::ObjectAccessControl;
use crate::http::objects::Owner;
use crate::http::{format_timestamp, parse_json_object, to_json_string, Error};

pub use lifecycle::{BucketLifecycle, LifecycleRule, LifecycleRuleAction, LifecycleRuleCondition};

pub mod delete;
pub mod get;
pub mod insert;
pub mod lifecycle;
pub mod list;
pub mod patch;
pub mod update;

/// The metadata of a bucket.
///
/// Optional aggregates such as `billing` or `website` are either present or absent, use the
/// `has_*`, `set_*` and `reset_*` methods to inspect and change that presence.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BucketMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    acl: Vec<BucketAccessControl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    billing: Option<BucketBilling>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    cors: Vec<CorsEntry>,
    #[serde(default, rename = "defaultObjectAcl", skip_serializing_if = "Vec::is_empty")]
    default_acl: Vec<ObjectAccessControl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encryption: Option<BucketEncryption>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    etag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    kind: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lifecycle: Option<BucketLifecycle>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logging: Option<BucketLogging>,
    #[serde(
        default,
        deserialize_with = "crate::http::from_str",
        serialize_with = "crate::http::to_str",
        skip_serializing_if = "crate::http::is_i64_zero"
    )]
    metageneration: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<Owner>,
    #[serde(
        default,
        deserialize_with = "crate::http::from_str",
        serialize_with = "crate::http::to_str",
        skip_serializing_if = "crate::http::is_i64_zero"
    )]
    project_number: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    self_link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    storage_class: String,
    #[serde(default, with = "crate::http::rfc3339", skip_serializing_if = "Option::is_none")]
    time_created: Option<OffsetDateTime>,
    #[serde(default, with = "crate::http::rfc3339", skip_serializing_if = "Option::is_none")]
    updated: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    versioning: Option<BucketVersioning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    website: Option<BucketWebsite>,
}

/// Billing properties of a bucket.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BucketBilling {
    /// When set to true, Requester Pays is enabled for this bucket.
    #[serde(default)]
    pub requester_pays: bool,
}

/// Cross-Origin Response sharing (CORS) properties for a bucket.
/// For more on GCS and CORS, see <https://cloud.google.com/storage/docs/cross-origin.>
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CorsEntry {
    /// The value, in seconds, to return in the Access-Control-Max-Age header used in
    /// preflight responses.
    #[serde(
        default,
        deserialize_with = "crate::http::from_str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_age_seconds: Option<i64>,
    /// HTTP methods on which to include CORS response headers. `*` means any method.
    #[serde(default, rename = "method", skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    /// Origins eligible to receive CORS response headers. `*` means any origin.
    #[serde(default, rename = "origin", skip_serializing_if = "Vec::is_empty")]
    pub origins: Vec<String>,
    #[serde(default, rename = "responseHeader", skip_serializing_if = "Vec::is_empty")]
    pub response_headers: Vec<String>,
}

/// Encryption properties of a bucket.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BucketEncryption {
    /// A Cloud KMS key that will be used to encrypt objects inserted into this
    /// bucket, if no encryption method is specified.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_kms_key_name: String,
}

/// Logging-related properties of a bucket.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BucketLogging {
    /// The destination bucket where the current bucket's logs should be placed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_bucket: String,
    /// A prefix for log object names.
    #[serde(
        default,
        rename = "logObjectPrefix",
        alias = "logPrefix",
        skip_serializing_if = "String::is_empty"
    )]
    pub log_prefix: String,
}

/// Properties of a bucket related to versioning.
#[derive(Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BucketVersioning {
    /// While set to true, versioning is fully enabled for this bucket.
    #[serde(default)]
    pub enabled: bool,
}

/// Properties of a bucket related to accessing the contents as a static website.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BucketWebsite {
    /// Suffix appended to paths that name a directory, usually `index.html`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub main_page_suffix: String,
    /// Object returned as the content of a 404 response.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub not_found_page: String,
}

impl BucketMetadata {
    pub fn parse_from_string(text: &str) -> Result<Self, Error> {
        parse_json_object(text)
    }

    pub fn to_json_string(&self) -> String {
        to_json_string(self)
    }

    pub fn acl(&self) -> &[BucketAccessControl] {
        &self.acl
    }

    pub fn mutable_acl(&mut self) -> &mut Vec<BucketAccessControl> {
        &mut self.acl
    }

    pub fn set_acl(&mut self, acl: Vec<BucketAccessControl>) -> &mut Self {
        self.acl = acl;
        self
    }

    pub fn has_billing(&self) -> bool {
        self.billing.is_some()
    }

    pub fn billing(&self) -> Option<&BucketBilling> {
        self.billing.as_ref()
    }

    pub fn mutable_billing(&mut self) -> &mut BucketBilling {
        self.billing.get_or_insert_with(BucketBilling::default)
    }

    pub fn set_billing(&mut self, billing: BucketBilling) -> &mut Self {
        self.billing = Some(billing);
        self
    }

    pub fn reset_billing(&mut self) -> &mut Self {
        self.billing = None;
        self
    }

    pub fn cors(&self) -> &[CorsEntry] {
        &self.cors
    }

    pub fn mutable_cors(&mut self) -> &mut Vec<CorsEntry> {
        &mut self.cors
    }

    pub fn set_cors(&mut self, cors: Vec<CorsEntry>) -> &mut Self {
        self.cors = cors;
        self
    }

    pub fn default_acl(&self) -> &[ObjectAccessControl] {
        &self.default_acl
    }

    pub fn mutable_default_acl(&mut self) -> &mut Vec<ObjectAccessControl> {
        &mut self.default_acl
    }

    pub fn set_default_acl(&mut self, acl: Vec<ObjectAccessControl>) -> &mut Self {
        self.default_acl = acl;
        self
    }

    pub fn has_encryption(&self) -> bool {
        self.encryption.is_some()
    }

    pub fn encryption(&self) -> Option<&BucketEncryption> {
        self.encryption.as_ref()
    }

    pub fn mutable_encryption(&mut self) -> &mut BucketEncryption {
        self.encryption.get_or_insert_with(BucketEncryption::default)
    }

    pub fn set_encryption(&mut self, encryption: BucketEncryption) -> &mut Self {
        self.encryption = Some(encryption);
        self
    }

    pub fn reset_encryption(&mut self) -> &mut Self {
        self.encryption = None;
        self
    }

    pub fn etag(&self) -> &str {
        &self.etag
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn mutable_labels(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.labels
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn has_label(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }

    /// The value of label `key`, `NotFound` when the bucket has no such label.
    pub fn label(&self, key: &str) -> Result<&str, Error> {
        self.labels
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::NotFound(format!("label {key:?}")))
    }

    pub fn upsert_label(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn delete_label(&mut self, key: &str) -> &mut Self {
        self.labels.remove(key);
        self
    }

    pub fn has_lifecycle(&self) -> bool {
        self.lifecycle.is_some()
    }

    pub fn lifecycle(&self) -> Option<&BucketLifecycle> {
        self.lifecycle.as_ref()
    }

    pub fn mutable_lifecycle(&mut self) -> &mut BucketLifecycle {
        self.lifecycle.get_or_insert_with(BucketLifecycle::default)
    }

    pub fn set_lifecycle(&mut self, lifecycle: BucketLifecycle) -> &mut Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    pub fn reset_lifecycle(&mut self) -> &mut Self {
        self.lifecycle = None;
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, location: impl Into<String>) -> &mut Self {
        self.location = location.into();
        self
    }

    pub fn has_logging(&self) -> bool {
        self.logging.is_some()
    }

    pub fn logging(&self) -> Option<&BucketLogging> {
        self.logging.as_ref()
    }

    pub fn mutable_logging(&mut self) -> &mut BucketLogging {
        self.logging.get_or_insert_with(BucketLogging::default)
    }

    pub fn set_logging(&mut self, logging: BucketLogging) -> &mut Self {
        self.logging = Some(logging);
        self
    }

    pub fn reset_logging(&mut self) -> &mut Self {
        self.logging = None;
        self
    }

    pub fn metageneration(&self) -> i64 {
        self.metageneration
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn has_owner(&self) -> bool {
        self.owner.is_some()
    }

    pub fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }

    pub fn mutable_owner(&mut self) -> &mut Owner {
        self.owner.get_or_insert_with(Owner::default)
    }

    pub fn set_owner(&mut self, owner: Owner) -> &mut Self {
        self.owner = Some(owner);
        self
    }

    pub fn reset_owner(&mut self) -> &mut Self {
        self.owner = None;
        self
    }

    pub fn project_number(&self) -> i64 {
        self.project_number
    }

    pub fn self_link(&self) -> &str {
        &self.self_link
    }

    pub fn storage_class(&self) -> &str {
        &self.storage_class
    }

    pub fn set_storage_class(&mut self, storage_class: impl Into<String>) -> &mut Self {
        self.storage_class = storage_class.into();
        self
    }

    pub fn time_created(&self) -> Option<OffsetDateTime> {
        self.time_created
    }

    pub fn updated(&self) -> Option<OffsetDateTime> {
        self.updated
    }

    pub fn has_versioning(&self) -> bool {
        self.versioning.is_some()
    }

    pub fn versioning(&self) -> Option<BucketVersioning> {
        self.versioning
    }

    pub fn mutable_versioning(&mut self) -> &mut BucketVersioning {
        self.versioning.get_or_insert_with(BucketVersioning::default)
    }

    pub fn set_versioning(&mut self, versioning: BucketVersioning) -> &mut Self {
        self.versioning = Some(versioning);
        self
    }

    pub fn reset_versioning(&mut self) -> &mut Self {
        self.versioning = None;
        self
    }

    pub fn enable_versioning(&mut self) -> &mut Self {
        self.set_versioning(BucketVersioning { enabled: true })
    }

    pub fn disable_versioning(&mut self) -> &mut Self {
        self.set_versioning(BucketVersioning { enabled: false })
    }

    /// Removes the versioning configuration, leaving the service default in place.
    pub fn clear_versioning(&mut self) -> &mut Self {
        self.reset_versioning()
    }

    pub fn has_website(&self) -> bool {
        self.website.is_some()
    }

    pub fn website(&self) -> Option<&BucketWebsite> {
        self.website.as_ref()
    }

    pub fn mutable_website(&mut self) -> &mut BucketWebsite {
        self.website.get_or_insert_with(BucketWebsite::default)
    }

    pub fn set_website(&mut self, website: BucketWebsite) -> &mut Self {
        self.website = Some(website);
        self
    }

    pub fn reset_website(&mut self) -> &mut Self {
        self.website = None;
        self
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

impl fmt::Display for CorsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CorsEntry={")?;
        if let Some(max_age) = self.max_age_seconds {
            write!(f, "max_age_seconds={max_age}, ")?;
        }
        write!(
            f,
            "method=[{}], origin=[{}], response_header=[{}]}}",
            self.methods.join(", "),
            self.origins.join(", "),
            self.response_headers.join(", ")
        )
    }
}

impl fmt::Display for BucketMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BucketMetadata={acl=")?;
        write_list(f, &self.acl)?;
        if let Some(billing) = &self.billing {
            write!(f, ", billing.requester_pays={}", billing.requester_pays)?;
        }
        f.write_str(", cors=")?;
        write_list(f, &self.cors)?;
        f.write_str(", default_acl=")?;
        write_list(f, &self.default_acl)?;
        if let Some(encryption) = &self.encryption {
            write!(f, ", encryption.default_kms_key_name={}", encryption.default_kms_key_name)?;
        }
        write!(f, ", etag={}, id={}, kind={}", self.etag, self.id, self.kind)?;
        for (key, value) in &self.labels {
            write!(f, ", labels.{key}={value}")?;
        }
        if let Some(lifecycle) = &self.lifecycle {
            f.write_str(", lifecycle.rule=")?;
            write_list(f, &lifecycle.rule)?;
        }
        write!(f, ", location={}", self.location)?;
        if let Some(logging) = &self.logging {
            write!(
                f,
                ", logging.log_bucket={}, logging.log_prefix={}",
                logging.log_bucket, logging.log_prefix
            )?;
        }
        write!(f, ", metageneration={}, name={}", self.metageneration, self.name)?;
        if let Some(owner) = &self.owner {
            write!(f, ", owner.entity={}, owner.entity_id={}", owner.entity, owner.entity_id)?;
        }
        write!(
            f,
            ", project_number={}, self_link={}, storage_class={}",
            self.project_number, self.self_link, self.storage_class
        )?;
        if let Some(time_created) = &self.time_created {
            write!(f, ", time_created={}", format_timestamp(time_created))?;
        }
        if let Some(updated) = &self.updated {
            write!(f, ", updated={}", format_timestamp(updated))?;
        }
        if let Some(versioning) = &self.versioning {
            write!(f, ", versioning.enabled={}", versioning.enabled)?;
        }
        if let Some(website) = &self.website {
            write!(
                f,
                ", website.main_page_suffix={}, website.not_found_page={}",
                website.main_page_suffix, website.not_found_page
            )?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::http::error::Code;
    use crate::http::storage_class;

    pub(crate) const BUCKET_TEXT: &str = r#"{
      "acl": [{
        "kind": "storage#bucketAccessControl",
        "id": "acl-id-0",
        "selfLink": "https://www.googleapis.com/storage/v1/b/test-bucket/acl/user-test-user",
        "bucket": "test-bucket",
        "entity": "user-test-user",
        "role": "OWNER",
        "email": "test-user@example.com",
        "entityId": "user-test-user-id-123",
        "domain": "example.com",
        "projectTeam": {"projectNumber": "4567", "team": "owners"},
        "etag": "AYX="
      }, {
        "kind": "storage#objectAccessControl",
        "id": "acl-id-1",
        "selfLink": "https://www.googleapis.com/storage/v1/b/test-bucket/acl/user-test-user2",
        "bucket": "test-bucket",
        "entity": "user-test-user2",
        "role": "READER",
        "email": "test-user2@example.com",
        "entityId": "user-test-user2-id-123",
        "domain": "example.com",
        "projectTeam": {"projectNumber": "4567", "team": "viewers"},
        "etag": "AYX="
      }],
      "billing": {"requesterPays": true},
      "cors": [{
        "maxAgeSeconds": 3600,
        "method": ["GET", "HEAD"],
        "origin": ["cross-origin-example.com"]
      }, {
        "method": ["GET", "HEAD"],
        "origin": ["another-example.com"],
        "responseHeader": ["Content-Type"]
      }],
      "defaultObjectAcl": [{
        "kind": "storage#objectAccessControl",
        "id": "default-acl-id-0",
        "bucket": "test-bucket",
        "entity": "user-test-user-3",
        "role": "OWNER",
        "email": "test-user-1@example.com",
        "entityId": "user-test-user-1-id-123",
        "domain": "example.com",
        "projectTeam": {"projectNumber": "123456789", "team": "owners"},
        "etag": "AYX="
      }],
      "encryption": {
        "defaultKmsKeyName": "projects/test-project/locations/us/keyRings/test-keyring/cryptoKeys/test-key"
      },
      "etag": "XYZ=",
      "id": "test-bucket",
      "kind": "storage#bucket",
      "labels": {"label-key-1": "label-value-1", "label-key-2": "label-value-2"},
      "lifecycle": {
        "rule": [{
          "condition": {"age": 30, "matchesStorageClass": ["STANDARD"]},
          "action": {"type": "SetStorageClass", "storageClass": "NEARLINE"}
        }]
      },
      "location": "US",
      "logging": {"logBucket": "test-log-bucket", "logPrefix": "test-log-prefix"},
      "metageneration": "4",
      "name": "test-bucket",
      "owner": {"entity": "project-owners-123456789", "entityId": "test-owner-id-123"},
      "projectNumber": "123456789",
      "selfLink": "https://www.googleapis.com/storage/v1/b/test-bucket",
      "storageClass": "STANDARD",
      "timeCreated": "2018-05-19T19:31:14Z",
      "updated": "2018-05-19T19:31:24Z",
      "versioning": {"enabled": true},
      "website": {"mainPageSuffix": "index.html", "notFoundPage": "404.html"}
    }"#;

    pub(crate) fn bucket_for_test() -> BucketMetadata {
        BucketMetadata::parse_from_string(BUCKET_TEXT).unwrap()
    }

    #[test]
    fn parse() {
        let actual = bucket_for_test();
        assert_eq!(actual.acl().len(), 2);
        assert_eq!(actual.acl()[0].id(), "acl-id-0");
        assert_eq!(actual.acl()[1].id(), "acl-id-1");
        assert!(actual.billing().unwrap().requester_pays);
        assert_eq!(actual.cors().len(), 2);
        assert_eq!(
            actual.cors()[0],
            CorsEntry {
                max_age_seconds: Some(3600),
                methods: vec!["GET".into(), "HEAD".into()],
                origins: vec!["cross-origin-example.com".into()],
                response_headers: vec![],
            }
        );
        assert_eq!(actual.cors()[1].max_age_seconds, None);
        assert_eq!(actual.cors()[1].response_headers, ["Content-Type"]);
        assert_eq!(actual.default_acl().len(), 1);
        assert_eq!(actual.default_acl()[0].entity(), "user-test-user-3");
        assert!(actual.encryption().unwrap().default_kms_key_name.ends_with("cryptoKeys/test-key-name"));
        assert_eq!(actual.etag(), "XYZ=");
        assert_eq!(actual.id(), "test-bucket");
        assert_eq!(actual.kind(), "storage#bucket");
        assert_eq!(actual.label_count(), 2);
        assert!(actual.has_label("label-key-1"));
        assert_eq!(actual.label("label-key-1").unwrap(), "label-value-1");
        assert!(!actual.has_label("not-a-label-key"));
        assert_eq!(actual.label("not-a-label-key").unwrap_err().code(), Code::NotFound);

        let lifecycle = actual.lifecycle().unwrap();
        assert_eq!(lifecycle.rule.len(), 1);
        let expected_condition = LifecycleRule::condition_conjunction([
            LifecycleRule::max_age(30),
            LifecycleRule::matches_storage_class_standard(),
        ])
        .unwrap();
        assert_eq!(lifecycle.rule[0].condition(), &expected_condition);
        assert_eq!(lifecycle.rule[0].action(), &LifecycleRule::set_storage_class_nearline());

        assert_eq!(actual.location(), "US");
        assert_eq!(actual.logging().unwrap().log_bucket, "test-log-bucket");
        assert_eq!(actual.logging().unwrap().log_prefix, "test-log-prefix");
        assert_eq!(actual.metageneration(), 4);
        assert_eq!(actual.name(), "test-bucket");
        assert_eq!(actual.owner().unwrap().entity, "project-owners-123456789");
        assert_eq!(actual.owner().unwrap().entity_id, "test-owner-id-123");
        assert_eq!(actual.project_number(), 123456789);
        assert_eq!(actual.self_link(), "https://www.googleapis.com/storage/v1/b/test-bucket");
        assert_eq!(actual.storage_class(), storage_class::STANDARD);
        // date -u +%s --date='2018-05-19T19:31:14Z'
        let magic_timestamp = 1526758274;
        assert_eq!(actual.time_created().unwrap().unix_timestamp(), magic_timestamp);
        assert_eq!(actual.updated().unwrap().unix_timestamp(), magic_timestamp + 10);
        assert_eq!(actual.website().unwrap().main_page_suffix, "index.html");
        assert_eq!(actual.website().unwrap().not_found_page, "404.html");
    }

    #[test]
    fn display() {
        let actual = bucket_for_test().to_string();
        for expected in [
            "BucketMetadata",
            "acl-id-0",
            "acl-id-1",
            "billing.requester_pays=true",
            "bucket=test-bucket",
            "labels.label-key-1=label-value-1",
            "labels.label-key-2=label-value-2",
            "user-test-user-3",
            "cryptoKeys/test-key-name",
            "age=30",
            "test-log-bucket",
            "test-log-prefix",
            "name=test-bucket",
            "project-owners-123456789",
            "test-owner-id-123",
            "versioning.enabled=true",
            "index.html",
            "404.html",
            "time_created=2018-05-19T19:31:14Z",
        ] {
            assert!(actual.contains(expected), "{expected} missing from {actual}");
        }
    }

    #[test]
    fn to_json_string_round_trip() {
        let tested = bucket_for_test();
        let text = tested.to_json_string();
        let actual: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(actual["acl"].as_array().unwrap().len(), 2);
        assert_eq!(actual["acl"][0]["entity"], "user-test-user");
        assert_eq!(actual["billing"]["requesterPays"], true);
        assert_eq!(actual["cors"][0]["maxAgeSeconds"], 3600);
        assert_eq!(actual["defaultObjectAcl"][0]["entity"], "user-test-user-3");
        assert_eq!(actual["labels"]["label-key-2"], "label-value-2");
        assert_eq!(actual["logging"]["logObjectPrefix"], "test-log-prefix");
        assert_eq!(actual["metageneration"], "4");
        assert_eq!(actual["timeCreated"], "2018-05-19T19:31:14Z");
        assert_eq!(actual["name"], "test-bucket");
        assert_eq!(BucketMetadata::parse_from_string(&text).unwrap(), tested);
    }

    #[test]
    fn mutable_acl() {
        let expected = bucket_for_test();
        let mut copy = expected.clone();
        assert_eq!(expected, copy);
        copy.mutable_acl()[0].set_role(BucketAccessControl::ROLE_READER);
        copy.mutable_acl()[1].set_role(BucketAccessControl::ROLE_OWNER);
        assert_eq!(copy.acl()[0].role(), "READER");
        assert_eq!(copy.acl()[1].role(), "OWNER");
        assert_ne!(expected, copy);
    }

    #[test]
    fn mutable_cors() {
        let expected = bucket_for_test();
        let mut copy = expected.clone();
        copy.mutable_cors()[0].max_age_seconds = Some(3 * 3600);
        assert_ne!(expected, copy);
        assert_eq!(expected.cors()[0].max_age_seconds, Some(3600));
        assert_eq!(copy.cors()[0].max_age_seconds, Some(3 * 3600));
    }

    #[test]
    fn set_default_acl() {
        let expected = bucket_for_test();
        let mut copy = expected.clone();
        let mut default_acl = expected.default_acl().to_vec();
        let access = default_acl[0].clone().with_entity("allAuthenticatedUsers").with_role("READER");
        default_acl.push(access);
        copy.set_default_acl(default_acl);
        assert_eq!(copy.default_acl().len(), 2);
        assert_eq!(copy.default_acl()[1].entity(), "allAuthenticatedUsers");
        assert_ne!(expected, copy);
    }

    #[test]
    fn set_and_reset_aggregates() {
        let expected = bucket_for_test();

        let mut copy = expected.clone();
        let billing = BucketBilling { requester_pays: false };
        copy.set_billing(billing.clone());
        assert_eq!(copy.billing(), Some(&billing));
        assert_ne!(expected, copy);
        copy.reset_billing();
        assert!(!copy.has_billing());
        assert!(!copy.to_string().contains("billing"));

        let mut copy = expected.clone();
        let encryption = BucketEncryption {
            default_kms_key_name: "projects/p/locations/l/keyRings/k/cryptoKeys/another".to_string(),
        };
        copy.set_encryption(encryption.clone());
        assert_eq!(copy.encryption(), Some(&encryption));
        copy.reset_encryption();
        assert!(!copy.has_encryption());
        assert!(!copy.to_string().contains("encryption."));

        let mut copy = expected.clone();
        let mut lifecycle = copy.lifecycle().unwrap().clone();
        lifecycle
            .rule
            .push(LifecycleRule::new(LifecycleRule::max_age(365), LifecycleRule::delete()));
        copy.set_lifecycle(lifecycle);
        assert_ne!(expected, copy);
        copy.reset_lifecycle();
        assert!(!copy.has_lifecycle());
        assert!(!copy.to_string().contains("lifecycle."));

        let mut copy = expected.clone();
        let logging = BucketLogging {
            log_bucket: "another-test-bucket".to_string(),
            log_prefix: "another-test-prefix".to_string(),
        };
        copy.set_logging(logging.clone());
        assert_eq!(copy.logging(), Some(&logging));
        copy.reset_logging();
        assert!(!copy.has_logging());
        assert!(!copy.to_string().contains("logging."));

        let mut copy = expected.clone();
        let website = BucketWebsite {
            main_page_suffix: "main.html".to_string(),
            not_found_page: "not-found.html".to_string(),
        };
        copy.set_website(website.clone());
        assert_eq!(copy.website(), Some(&website));
        assert_ne!(expected, copy);
        copy.reset_website();
        assert!(!copy.has_website());
        assert!(!copy.to_string().contains("website."));

        let mut copy = expected.clone();
        let owner = Owner {
            entity: "user-another-owner".to_string(),
            entity_id: "another-owner-id".to_string(),
        };
        copy.set_owner(owner.clone());
        assert_eq!(copy.owner(), Some(&owner));
        assert_ne!(expected, copy);
        copy.reset_owner();
        assert!(!copy.has_owner());
        assert!(!copy.to_string().contains("owner."));
    }

    #[test]
    fn missing_name_is_invalid() {
        let err = BucketMetadata::parse_from_string(r#"{"id": "x", "etag": "E"}"#).unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        assert!(err.to_string().contains("name"), "{err}");
    }

    #[test]
    fn versioning() {
        let expected = bucket_for_test();
        assert_eq!(expected.versioning(), Some(BucketVersioning { enabled: true }));

        let mut copy = expected.clone();
        copy.clear_versioning();
        assert!(!copy.has_versioning());
        assert_ne!(expected, copy);
        assert!(!copy.to_string().contains("versioning."));
        copy.enable_versioning();
        assert_eq!(expected, copy);

        copy.disable_versioning();
        assert_eq!(copy.versioning(), Some(BucketVersioning { enabled: false }));
        assert_ne!(expected, copy);
    }

    #[test]
    fn labels() {
        let mut bucket = bucket_for_test();
        bucket.upsert_label("label-key-1", "changed").upsert_label("new-key", "v");
        assert_eq!(bucket.label("label-key-1").unwrap(), "changed");
        assert_eq!(bucket.label_count(), 3);
        bucket.delete_label("label-key-2").delete_label("never-there");
        assert_eq!(bucket.label_count(), 2);
        assert!(!bucket.has_label("label-key-2"));
    }

    #[test]
    fn mutable_aggregate_sets_presence() {
        let mut bucket = BucketMetadata::default();
        assert!(!bucket.has_website());
        bucket.mutable_website().main_page_suffix = "index.html".to_string();
        assert!(bucket.has_website());
        assert!(bucket.to_string().contains("website.main_page_suffix=index.html"));

        assert!(!bucket.has_owner());
        bucket.mutable_owner().entity = "project-owners-1".to_string();
        assert!(bucket.has_owner());
        assert_eq!(bucket.owner().map(|o| o.entity.as_str()), Some("project-owners-1"));

        assert!(!bucket.has_versioning());
        bucket.mutable_versioning().enabled = true;
        assert_eq!(bucket.versioning(), Some(BucketVersioning { enabled: true }));
    }
}
