use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct UpdateDefaultObjectAclRequest {
    bucket_name: String,
    entity: String,
    role: String,
    options: RequestOptions,
}

impl UpdateDefaultObjectAclRequest {
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

impl_request_options!(UpdateDefaultObjectAclRequest);

impl fmt::Display for UpdateDefaultObjectAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UpdateDefaultObjectAclRequest={{bucket_name={}, entity={}, role={}",
            self.bucket_name, self.entity, self.role
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &UpdateDefaultObjectAclRequest) -> CurlRequestBuilder {
    let url = format!(
        "{}/b/{}/defaultObjectAcl/{}",
        base_url,
        req.bucket_name.escape(),
        req.entity.escape()
    );
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Put).add_options(&req.options);
    builder
}
