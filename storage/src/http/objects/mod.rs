use std::collections::BTreeMap;
use std::fmt;

use time::OffsetDateTime;

use crate::http::object_access_controls::ObjectAccessControl;
use crate::http::{format_timestamp, parse_json_object, to_json_string, Error};

pub mod delete;
pub mod download;
pub mod get;
pub mod insert;
pub mod list;
pub mod patch;
pub mod update;
pub mod upload;

/// The metadata of an object.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    acl: Vec<ObjectAccessControl>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    bucket: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    cache_control: String,
    /// Number of underlying components that make up a composite object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component_count: Option<i32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    content_disposition: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    content_encoding: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    content_language: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    content_type: String,
    /// base64 of the big-endian CRC32C of the data
    #[serde(default, skip_serializing_if = "String::is_empty")]
    crc32c: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customer_encryption: Option<CustomerEncryption>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    etag: String,
    #[serde(
        default,
        deserialize_with = "crate::http::from_str",
        serialize_with = "crate::http::to_str",
        skip_serializing_if = "crate::http::is_i64_zero"
    )]
    generation: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    kms_key_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    md5_hash: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    media_link: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "crate::http::from_str",
        serialize_with = "crate::http::to_str",
        skip_serializing_if = "crate::http::is_i64_zero"
    )]
    metageneration: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<Owner>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    self_link: String,
    #[serde(
        default,
        deserialize_with = "crate::http::from_str_option",
        serialize_with = "crate::http::to_str_option",
        skip_serializing_if = "Option::is_none"
    )]
    size: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    storage_class: String,
    #[serde(default, with = "crate::http::rfc3339", skip_serializing_if = "Option::is_none")]
    time_created: Option<OffsetDateTime>,
    #[serde(default, with = "crate::http::rfc3339", skip_serializing_if = "Option::is_none")]
    time_deleted: Option<OffsetDateTime>,
    #[serde(default, with = "crate::http::rfc3339", skip_serializing_if = "Option::is_none")]
    time_storage_class_updated: Option<OffsetDateTime>,
    #[serde(default, with = "crate::http::rfc3339", skip_serializing_if = "Option::is_none")]
    updated: Option<OffsetDateTime>,
}

/// Describes the customer-supplied key used to store the data at rest.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CustomerEncryption {
    /// The encryption algorithm.
    #[serde(default)]
    pub encryption_algorithm: String,
    /// SHA256 hash value of the encryption key.
    #[serde(default)]
    pub key_sha256: String,
}

/// The owner of a bucket or object.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// The entity, in the form `user-`*userId* or `project-owners-`*projectNumber*.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub entity: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub entity_id: String,
}

impl ObjectMetadata {
    pub fn parse_from_string(text: &str) -> Result<Self, Error> {
        parse_json_object(text)
    }

    pub fn to_json_string(&self) -> String {
        to_json_string(self)
    }

    pub fn acl(&self) -> &[ObjectAccessControl] {
        &self.acl
    }

    pub fn mutable_acl(&mut self) -> &mut Vec<ObjectAccessControl> {
        &mut self.acl
    }

    pub fn set_acl(&mut self, acl: Vec<ObjectAccessControl>) -> &mut Self {
        self.acl = acl;
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn cache_control(&self) -> &str {
        &self.cache_control
    }

    pub fn set_cache_control(&mut self, value: impl Into<String>) -> &mut Self {
        self.cache_control = value.into();
        self
    }

    pub fn component_count(&self) -> Option<i32> {
        self.component_count
    }

    pub fn content_disposition(&self) -> &str {
        &self.content_disposition
    }

    pub fn set_content_disposition(&mut self, value: impl Into<String>) -> &mut Self {
        self.content_disposition = value.into();
        self
    }

    pub fn content_encoding(&self) -> &str {
        &self.content_encoding
    }

    pub fn set_content_encoding(&mut self, value: impl Into<String>) -> &mut Self {
        self.content_encoding = value.into();
        self
    }

    pub fn content_language(&self) -> &str {
        &self.content_language
    }

    pub fn set_content_language(&mut self, value: impl Into<String>) -> &mut Self {
        self.content_language = value.into();
        self
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn set_content_type(&mut self, value: impl Into<String>) -> &mut Self {
        self.content_type = value.into();
        self
    }

    pub fn crc32c(&self) -> &str {
        &self.crc32c
    }

    pub fn has_customer_encryption(&self) -> bool {
        self.customer_encryption.is_some()
    }

    pub fn customer_encryption(&self) -> Option<&CustomerEncryption> {
        self.customer_encryption.as_ref()
    }

    pub fn etag(&self) -> &str {
        &self.etag
    }

    pub fn generation(&self) -> i64 {
        self.generation
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn kms_key_name(&self) -> &str {
        &self.kms_key_name
    }

    pub fn md5_hash(&self) -> &str {
        &self.md5_hash
    }

    pub fn media_link(&self) -> &str {
        &self.media_link
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn has_metadata(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }

    /// The value of user metadata `key`, `NotFound` when there is no such entry.
    pub fn metadata_value(&self, key: &str) -> Result<&str, Error> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::NotFound(format!("metadata {key:?}")))
    }

    pub fn upsert_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn delete_metadata(&mut self, key: &str) -> &mut Self {
        self.metadata.remove(key);
        self
    }

    pub fn metageneration(&self) -> i64 {
        self.metageneration
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_owner(&self) -> bool {
        self.owner.is_some()
    }

    pub fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }

    pub fn self_link(&self) -> &str {
        &self.self_link
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn storage_class(&self) -> &str {
        &self.storage_class
    }

    pub fn time_created(&self) -> Option<OffsetDateTime> {
        self.time_created
    }

    pub fn time_deleted(&self) -> Option<OffsetDateTime> {
        self.time_deleted
    }

    pub fn time_storage_class_updated(&self) -> Option<OffsetDateTime> {
        self.time_storage_class_updated
    }

    pub fn updated(&self) -> Option<OffsetDateTime> {
        self.updated
    }
}

impl fmt::Display for ObjectMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObjectMetadata={acl=[")?;
        for (i, acl) in self.acl.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{acl}")?;
        }
        write!(f, "], bucket={}, cache_control={}", self.bucket, self.cache_control)?;
        if let Some(count) = self.component_count {
            write!(f, ", component_count={count}")?;
        }
        write!(
            f,
            ", content_disposition={}, content_encoding={}, content_language={}, content_type={}, crc32c={}",
            self.content_disposition, self.content_encoding, self.content_language, self.content_type, self.crc32c
        )?;
        if let Some(encryption) = &self.customer_encryption {
            write!(
                f,
                ", customer_encryption.encryption_algorithm={}, customer_encryption.key_sha256={}",
                encryption.encryption_algorithm, encryption.key_sha256
            )?;
        }
        write!(
            f,
            ", etag={}, generation={}, id={}, kind={}, kms_key_name={}, md5_hash={}, media_link={}",
            self.etag, self.generation, self.id, self.kind, self.kms_key_name, self.md5_hash, self.media_link
        )?;
        for (key, value) in &self.metadata {
            write!(f, ", metadata.{key}={value}")?;
        }
        write!(f, ", metageneration={}, name={}", self.metageneration, self.name)?;
        if let Some(owner) = &self.owner {
            write!(f, ", owner.entity={}, owner.entity_id={}", owner.entity, owner.entity_id)?;
        }
        write!(f, ", self_link={}", self.self_link)?;
        if let Some(size) = self.size {
            write!(f, ", size={size}")?;
        }
        write!(f, ", storage_class={}", self.storage_class)?;
        let times = [
            ("time_created", &self.time_created),
            ("time_deleted", &self.time_deleted),
            ("time_storage_class_updated", &self.time_storage_class_updated),
            ("updated", &self.updated),
        ];
        for (name, value) in times {
            if let Some(value) = value {
                write!(f, ", {name}={}", format_timestamp(value))?;
            }
        }
        f.write_str("}")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::http::error::Code;

    pub(crate) const OBJECT_TEXT: &str = r#"{
      "acl": [{"kind": "storage#objectAccessControl", "id": "acl-id-0", "entity": "user-qux", "role": "OWNER"}],
      "bucket": "foo-bar",
      "cacheControl": "no-cache",
      "componentCount": 7,
      "contentDisposition": "a-disposition",
      "contentEncoding": "an-encoding",
      "contentLanguage": "a-language",
      "contentType": "application/octet-stream",
      "crc32c": "deadbeef",
      "customerEncryption": {"encryptionAlgorithm": "some-algo", "keySha256": "abc123"},
      "etag": "XYZ=",
      "generation": "12345",
      "id": "foo-bar/baz/12345",
      "kind": "storage#object",
      "kmsKeyName": "/foo/bar/baz/key",
      "md5Hash": "deaderBeef=",
      "mediaLink": "https://www.googleapis.com/download/storage/v1/b/foo-bar/o/baz?generation=12345&alt=media",
      "metadata": {"foo": "bar", "baz": "qux"},
      "metageneration": "4",
      "name": "baz",
      "owner": {"entity": "user-qux", "entityId": "user-qux-id-123"},
      "selfLink": "https://www.googleapis.com/storage/v1/b/foo-bar/o/baz",
      "size": 102400,
      "storageClass": "STANDARD",
      "timeCreated": "2018-05-19T19:31:14Z",
      "timeDeleted": "2018-05-19T19:32:24Z",
      "timeStorageClassUpdated": "2018-05-19T19:31:34Z",
      "updated": "2018-05-19T19:31:24Z"
    }"#;

    #[test]
    fn parse() {
        let actual = ObjectMetadata::parse_from_string(OBJECT_TEXT).unwrap();
        assert_eq!(actual.acl().len(), 1);
        assert_eq!(actual.bucket(), "foo-bar");
        assert_eq!(actual.component_count(), Some(7));
        assert_eq!(actual.customer_encryption().unwrap().key_sha256, "abc123");
        assert_eq!(actual.generation(), 12345);
        assert_eq!(actual.metageneration(), 4);
        assert_eq!(actual.size(), Some(102400));
        assert_eq!(actual.metadata_value("foo").unwrap(), "bar");
        assert_eq!(actual.metadata_value("nope").unwrap_err().code(), Code::NotFound);
        assert_eq!(actual.owner().unwrap().entity_id, "user-qux-id-123");
        let magic_timestamp = 1526758274;
        assert_eq!(actual.time_created().unwrap().unix_timestamp(), magic_timestamp);
        assert_eq!(actual.updated().unwrap().unix_timestamp(), magic_timestamp + 10);
        assert_eq!(actual.time_storage_class_updated().unwrap().unix_timestamp(), magic_timestamp + 20);
        assert_eq!(actual.time_deleted().unwrap().unix_timestamp(), magic_timestamp + 70);
    }

    #[test]
    fn round_trip() {
        let actual = ObjectMetadata::parse_from_string(OBJECT_TEXT).unwrap();
        let text = actual.to_json_string();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["size"], "102400");
        assert_eq!(value["generation"], "12345");
        assert_eq!(ObjectMetadata::parse_from_string(&text).unwrap(), actual);
    }

    #[test]
    fn display() {
        let actual = ObjectMetadata::parse_from_string(OBJECT_TEXT).unwrap().to_string();
        for expected in [
            "ObjectMetadata={acl=[ObjectAccessControl={",
            "bucket=foo-bar",
            "customer_encryption.key_sha256=abc123",
            "metadata.baz=qux",
            "metadata.foo=bar",
            "owner.entity=user-qux",
            "size=102400",
            "updated=2018-05-19T19:31:24Z",
        ] {
            assert!(actual.contains(expected), "{expected} missing from {actual}");
        }
        let empty = ObjectMetadata::default().to_string();
        assert!(!empty.contains("customer_encryption."));
        assert!(!empty.contains("owner."));
    }

    #[test]
    fn user_metadata() {
        let mut object = ObjectMetadata::default();
        object.upsert_metadata("a", "1").upsert_metadata("b", "2");
        assert!(object.has_metadata("a"));
        object.delete_metadata("a");
        assert!(!object.has_metadata("a"));
        assert_eq!(object.metadata().len(), 1);
    }
}
