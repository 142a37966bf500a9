use std::fmt;

use crate::http::object_access_controls::ProjectTeam;
use crate::http::{parse_json_object, to_json_string, Error};

pub mod delete;
pub mod get;
pub mod insert;
pub mod list;
pub mod patch;
pub mod update;

/// Predefined or "canned" aliases for sets of specific bucket ACL entries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum PredefinedBucketAcl {
    /// Project team owners get `OWNER` access, and
    /// `allAuthenticatedUsers` get `READER` access.
    AuthenticatedRead,
    /// Project team owners get `OWNER` access.
    Private,
    /// Project team members get access according to their roles.
    ProjectPrivate,
    /// Project team owners get `OWNER` access, and
    /// `allUsers` get `READER` access.
    PublicRead,
    /// Project team owners get `OWNER` access, and
    /// `allUsers` get `WRITER` access.
    PublicReadWrite,
}

impl PredefinedBucketAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredefinedBucketAcl::AuthenticatedRead => "authenticatedRead",
            PredefinedBucketAcl::Private => "private",
            PredefinedBucketAcl::ProjectPrivate => "projectPrivate",
            PredefinedBucketAcl::PublicRead => "publicRead",
            PredefinedBucketAcl::PublicReadWrite => "publicReadWrite",
        }
    }
}

/// An access-control entry on a bucket.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BucketAccessControl {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    bucket: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    domain: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    email: String,
    /// The entity holding the permission, in one of the following forms:
    /// * `user-{userid}` or `user-{email}`
    /// * `group-{groupid}` or `group-{email}`
    /// * `domain-{domain}`
    /// * `project-{team}-{projectid}`
    /// * `allUsers`
    /// * `allAuthenticatedUsers`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    entity: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    entity_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    etag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project_team: Option<ProjectTeam>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    role: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    self_link: String,
}

impl BucketAccessControl {
    pub const ROLE_OWNER: &'static str = "OWNER";
    pub const ROLE_READER: &'static str = "READER";
    pub const ROLE_WRITER: &'static str = "WRITER";

    pub fn parse_from_string(text: &str) -> Result<Self, Error> {
        parse_json_object(text)
    }

    pub fn to_json_string(&self) -> String {
        to_json_string(self)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
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

    pub fn has_project_team(&self) -> bool {
        self.project_team.is_some()
    }

    pub fn project_team(&self) -> Option<&ProjectTeam> {
        self.project_team.as_ref()
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn self_link(&self) -> &str {
        &self.self_link
    }

    pub fn set_entity(&mut self, entity: impl Into<String>) -> &mut Self {
        self.entity = entity.into();
        self
    }

    pub fn set_role(&mut self, role: impl Into<String>) -> &mut Self {
        self.role = role.into();
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = entity.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

impl fmt::Display for BucketAccessControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BucketAccessControl={{bucket={}, domain={}, email={}, entity={}, entity_id={}, etag={}, id={}, kind={}",
            self.bucket, self.domain, self.email, self.entity, self.entity_id, self.etag, self.id, self.kind
        )?;
        if let Some(team) = &self.project_team {
            write!(
                f,
                ", project_team.project_number={}, project_team.team={}",
                team.project_number, team.team
            )?;
        }
        write!(f, ", role={}, self_link={}}}", self.role, self.self_link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACL_TEXT: &str = r#"{
      "bucket": "foo-bar",
      "domain": "example.com",
      "email": "foobar@example.com",
      "entity": "user-foobar",
      "entityId": "user-foobar-id-123",
      "etag": "XYZ=",
      "id": "bucket-foo-bar-acl-234",
      "kind": "storage#bucketAccessControl",
      "projectTeam": {"projectNumber": "3456789", "team": "a-team"},
      "role": "OWNER"
    }"#;

    #[test]
    fn parse() {
        let acl = BucketAccessControl::parse_from_string(ACL_TEXT).unwrap();
        assert_eq!(acl.bucket(), "foo-bar");
        assert_eq!(acl.email(), "foobar@example.com");
        assert_eq!(acl.entity(), "user-foobar");
        assert_eq!(acl.id(), "bucket-foo-bar-acl-234");
        assert_eq!(acl.kind(), "storage#bucketAccessControl");
        assert!(acl.has_project_team());
        assert_eq!(acl.project_team().unwrap().team, "a-team");
        assert_eq!(acl.role(), BucketAccessControl::ROLE_OWNER);
        assert_eq!(BucketAccessControl::parse_from_string(&acl.to_json_string()).unwrap(), acl);
    }

    #[test]
    fn mutators() {
        let mut acl = BucketAccessControl::parse_from_string(ACL_TEXT).unwrap();
        let copy = acl.clone().with_role(BucketAccessControl::ROLE_WRITER);
        assert_ne!(acl, copy);
        acl.set_role(BucketAccessControl::ROLE_WRITER);
        assert_eq!(acl, copy);
        acl.set_entity("allUsers");
        assert_eq!(acl.entity(), "allUsers");
    }

    #[test]
    fn display() {
        let acl = BucketAccessControl::parse_from_string(ACL_TEXT).unwrap();
        let text = acl.to_string();
        assert!(text.starts_with("BucketAccessControl={bucket=foo-bar"));
        assert!(text.contains("project_team.project_number=3456789"));
        assert!(text.contains("role=OWNER"));
        let text = BucketAccessControl::default().to_string();
        assert!(!text.contains("project_team"));
    }
}
