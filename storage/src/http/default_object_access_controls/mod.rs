//! Default access controls applied to objects created in a bucket without an explicit ACL.
//!
//! The entries share the [`ObjectAccessControl`](crate::http::object_access_controls::ObjectAccessControl)
//! representation and patch builder with object ACLs.

pub mod delete;
pub mod get;
pub mod insert;
pub mod list;
pub mod patch;
pub mod update;
