use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::http::{parse_json_object, to_json_string, Error};

pub mod delete;
pub mod get;
pub mod insert;
pub mod list;
pub mod patch;
pub mod update;

/// An access-control entry on an object, or a default entry applied to new objects.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ObjectAccessControl {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    bucket: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    domain: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    entity: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    entity_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    etag: String,
    #[serde(
        default,
        deserialize_with = "crate::http::from_str_option",
        serialize_with = "crate::http::to_str_option",
        skip_serializing_if = "Option::is_none"
    )]
    generation: Option<i64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project_team: Option<ProjectTeam>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    role: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    self_link: String,
}

impl ObjectAccessControl {
    pub const ROLE_OWNER: &'static str = "OWNER";
    pub const ROLE_READER: &'static str = "READER";

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

    pub fn generation(&self) -> Option<i64> {
        self.generation
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn object(&self) -> &str {
        &self.object
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

impl fmt::Display for ObjectAccessControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ObjectAccessControl={{bucket={}, domain={}, email={}, entity={}, entity_id={}, etag={}",
            self.bucket, self.domain, self.email, self.entity, self.entity_id, self.etag
        )?;
        if let Some(generation) = self.generation {
            write!(f, ", generation={generation}")?;
        }
        write!(f, ", id={}, kind={}, object={}", self.id, self.kind, self.object)?;
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

/// Represents the Viewers, Editors, or Owners of a given project.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTeam {
    /// The project number.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_number: String,
    /// The team.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub team: String,
}

/// Predefined or "canned" aliases for sets of specific object ACL entries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum PredefinedObjectAcl {
    /// Object owner gets `OWNER` access, and
    /// `allAuthenticatedUsers` get `READER` access.
    AuthenticatedRead,
    /// Object owner gets `OWNER` access, and project team owners get
    /// `OWNER` access.
    BucketOwnerFullControl,
    /// Object owner gets `OWNER` access, and project team owners get
    /// `READER` access.
    BucketOwnerRead,
    /// Object owner gets `OWNER` access.
    Private,
    /// Object owner gets `OWNER` access, and project team members get
    /// access according to their roles.
    ProjectPrivate,
    /// Object owner gets `OWNER` access, and `allUsers`
    /// get `READER` access.
    PublicRead,
}

impl PredefinedObjectAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredefinedObjectAcl::AuthenticatedRead => "authenticatedRead",
            PredefinedObjectAcl::BucketOwnerFullControl => "bucketOwnerFullControl",
            PredefinedObjectAcl::BucketOwnerRead => "bucketOwnerRead",
            PredefinedObjectAcl::Private => "private",
            PredefinedObjectAcl::ProjectPrivate => "projectPrivate",
            PredefinedObjectAcl::PublicRead => "publicRead",
        }
    }
}

/// The principal named by an ACL entity string.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum AccessControlEntity {
    /// `user-{userId}` or `user-{email}`
    User(String),
    /// `group-{groupId}` or `group-{email}`
    Group(String),
    /// `domain-{domain}`
    Domain(String),
    /// `project-{team}-{projectId}`, team is one of `owners`, `editors` or `viewers`.
    Project { team: String, project_id: String },
    AllUsers,
    AllAuthenticatedUsers,
}

static ENTITY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(user|group|domain)-(.+)|project-(owners|editors|viewers)-(.+))$").unwrap());

impl FromStr for AccessControlEntity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allUsers" => return Ok(AccessControlEntity::AllUsers),
            "allAuthenticatedUsers" => return Ok(AccessControlEntity::AllAuthenticatedUsers),
            _ => {}
        }
        let invalid = || Error::InvalidArgument(format!("malformed ACL entity: {s:?}"));
        let captures = ENTITY_REGEX.captures(s).ok_or_else(invalid)?;
        let text = |i: usize| captures.get(i).map(|m| m.as_str().to_string());
        match (text(1).as_deref(), text(2), text(3), text(4)) {
            (Some("user"), Some(v), _, _) => Ok(AccessControlEntity::User(v)),
            (Some("group"), Some(v), _, _) => Ok(AccessControlEntity::Group(v)),
            (Some("domain"), Some(v), _, _) => Ok(AccessControlEntity::Domain(v)),
            (None, None, Some(team), Some(project_id)) => Ok(AccessControlEntity::Project { team, project_id }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for AccessControlEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessControlEntity::User(v) => write!(f, "user-{v}"),
            AccessControlEntity::Group(v) => write!(f, "group-{v}"),
            AccessControlEntity::Domain(v) => write!(f, "domain-{v}"),
            AccessControlEntity::Project { team, project_id } => write!(f, "project-{team}-{project_id}"),
            AccessControlEntity::AllUsers => f.write_str("allUsers"),
            AccessControlEntity::AllAuthenticatedUsers => f.write_str("allAuthenticatedUsers"),
        }
    }
}

/// Checks `entity` against the ACL entity grammar.
pub(crate) fn validate_entity(entity: &str) -> Result<(), Error> {
    entity.parse::<AccessControlEntity>().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::Code;

    const ACL_TEXT: &str = r#"{
      "bucket": "foo-bar",
      "domain": "example.com",
      "email": "foobar@example.com",
      "entity": "user-foobar",
      "entityId": "user-foobar-id-123",
      "etag": "XYZ=",
      "generation": "12345",
      "id": "object-foo-bar-baz-acl-234",
      "kind": "storage#objectAccessControl",
      "object": "baz",
      "projectTeam": {"projectNumber": "3456789", "team": "a-team"},
      "role": "OWNER",
      "someUnknownField": true
    }"#;

    #[test]
    fn parse() {
        let acl = ObjectAccessControl::parse_from_string(ACL_TEXT).unwrap();
        assert_eq!(acl.bucket(), "foo-bar");
        assert_eq!(acl.domain(), "example.com");
        assert_eq!(acl.entity(), "user-foobar");
        assert_eq!(acl.entity_id(), "user-foobar-id-123");
        assert_eq!(acl.etag(), "XYZ=");
        assert_eq!(acl.generation(), Some(12345));
        assert_eq!(acl.object(), "baz");
        assert_eq!(acl.project_team().unwrap().project_number, "3456789");
        assert_eq!(acl.project_team().unwrap().team, "a-team");
        assert_eq!(acl.role(), ObjectAccessControl::ROLE_OWNER);
    }

    #[test]
    fn round_trip_drops_unknown_fields() {
        let acl = ObjectAccessControl::parse_from_string(ACL_TEXT).unwrap();
        let text = acl.to_json_string();
        assert!(!text.contains("someUnknownField"));
        assert!(text.contains(r#""generation":"12345""#));
        assert_eq!(ObjectAccessControl::parse_from_string(&text).unwrap(), acl);
    }

    #[test]
    fn display() {
        let acl = ObjectAccessControl::parse_from_string(ACL_TEXT).unwrap();
        let text = acl.to_string();
        assert!(text.starts_with("ObjectAccessControl={"));
        assert!(text.contains("entity=user-foobar"));
        assert!(text.contains("generation=12345"));
        assert!(text.contains("project_team.team=a-team"));

        let empty = ObjectAccessControl::default().with_role("READER");
        let text = empty.to_string();
        assert!(!text.contains("project_team."));
        assert!(!text.contains("generation="));
        assert!(text.contains("role=READER"));
    }

    #[test]
    fn parse_rejects_non_objects() {
        let err = ObjectAccessControl::parse_from_string("[1, 2]").unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[test]
    fn entity_grammar() {
        let cases = [
            ("user-joe@example.com", AccessControlEntity::User("joe@example.com".into())),
            ("group-admins@example.com", AccessControlEntity::Group("admins@example.com".into())),
            ("domain-example.com", AccessControlEntity::Domain("example.com".into())),
            (
                "project-owners-123456",
                AccessControlEntity::Project {
                    team: "owners".into(),
                    project_id: "123456".into(),
                },
            ),
            ("allUsers", AccessControlEntity::AllUsers),
            ("allAuthenticatedUsers", AccessControlEntity::AllAuthenticatedUsers),
        ];
        for (text, expected) in cases {
            let parsed: AccessControlEntity = text.parse().unwrap();
            assert_eq!(parsed, expected);
            assert_eq!(parsed.to_string(), text);
        }
        for text in ["", "user-", "nobody", "project-admins-1", "allusers"] {
            let err = text.parse::<AccessControlEntity>().unwrap_err();
            assert_eq!(err.code(), Code::InvalidArgument, "{text}");
        }
    }
}
