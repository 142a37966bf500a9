use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::object_access_controls::validate_entity;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::{Error, Escape};

/// Grants `role` on an object to `entity`.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CreateObjectAclRequest {
    bucket_name: String,
    object_name: String,
    entity: String,
    role: String,
    options: RequestOptions,
}

impl CreateObjectAclRequest {
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

    /// The JSON body sent to the service.
    pub fn payload(&self) -> String {
        serde_json::json!({"entity": self.entity, "role": self.role}).to_string()
    }
}

impl_request_options!(CreateObjectAclRequest);

impl fmt::Display for CreateObjectAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CreateObjectAclRequest={{bucket_name={}, object_name={}, entity={}, role={}",
            self.bucket_name, self.object_name, self.entity, self.role
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(
    base_url: &str,
    handle: CurlHandle,
    req: &CreateObjectAclRequest,
) -> Result<CurlRequestBuilder, Error> {
    validate_entity(&req.entity)?;
    let url = format!("{}/b/{}/o/{}/acl", base_url, req.bucket_name.escape(), req.object_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Post).add_options(&req.options);
    Ok(builder)
}
