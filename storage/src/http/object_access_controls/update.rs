use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Replaces the role of an existing object access control.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct UpdateObjectAclRequest {
    bucket_name: String,
    object_name: String,
    entity: String,
    role: String,
    options: RequestOptions,
}

impl UpdateObjectAclRequest {
    pub fn new(
        bucket_name: impl Into<String>,
        object_name: impl Into<String>,
        entity: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            entity: entity.into(),
            role: role.into(),
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

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn payload(&self) -> String {
        serde_json::json!({"entity": self.entity, "role": self.role}).to_string()
    }
}

impl_request_options!(UpdateObjectAclRequest);

impl fmt::Display for UpdateObjectAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UpdateObjectAclRequest={{bucket_name={}, object_name={}, entity={}, role={}",
            self.bucket_name, self.object_name, self.entity, self.role
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &UpdateObjectAclRequest) -> CurlRequestBuilder {
    let url = format!(
        "{}/b/{}/o/{}/acl/{}",
        base_url,
        req.bucket_name.escape(),
        req.object_name.escape(),
        req.entity.escape()
    );
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Put).add_options(&req.options);
    builder
}
