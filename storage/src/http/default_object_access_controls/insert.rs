use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::object_access_controls::validate_entity;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::{Error, Escape};

/// Adds a default object access control to a bucket.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CreateDefaultObjectAclRequest {
    bucket_name: String,
    entity: String,
    role: String,
    options: RequestOptions,
}

impl CreateDefaultObjectAclRequest {
    pub fn new(bucket_name: impl Into<String>, entity: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            entity: entity.into(),
            role: role.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
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

impl_request_options!(CreateDefaultObjectAclRequest);

impl fmt::Display for CreateDefaultObjectAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CreateDefaultObjectAclRequest={{bucket_name={}, entity={}, role={}",
            self.bucket_name, self.entity, self.role
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(
    base_url: &str,
    handle: CurlHandle,
    req: &CreateDefaultObjectAclRequest,
) -> Result<CurlRequestBuilder, Error> {
    validate_entity(&req.entity)?;
    let url = format!("{}/b/{}/defaultObjectAcl", base_url, req.bucket_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Post).add_options(&req.options);
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::Code;

    #[test]
    fn rejects_malformed_entity() {
        let request = CreateDefaultObjectAclRequest::new("my-bucket", "everyone", "READER");
        let err = build("http://localhost", CurlHandle::new(), &request).err().unwrap();
        assert_eq!(err.code(), Code::InvalidArgument);

        let request = CreateDefaultObjectAclRequest::new("my-bucket", "allAuthenticatedUsers", "READER");
        assert!(build("http://localhost", CurlHandle::new(), &request).is_ok());
    }
}
