use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::object_access_controls::validate_entity;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::{Error, Escape};

/// Grants `role` on a bucket to `entity`.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CreateBucketAclRequest {
    bucket_name: String,
    entity: String,
    role: String,
    options: RequestOptions,
}

impl CreateBucketAclRequest {
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

impl_request_options!(CreateBucketAclRequest);

impl fmt::Display for CreateBucketAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CreateBucketAclRequest={{bucket_name={}, entity={}, role={}",
            self.bucket_name, self.entity, self.role
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(
    base_url: &str,
    handle: CurlHandle,
    req: &CreateBucketAclRequest,
) -> Result<CurlRequestBuilder, Error> {
    validate_entity(&req.entity)?;
    let url = format!("{}/b/{}/acl", base_url, req.bucket_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Post).add_options(&req.options);
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::Code;
    use crate::http::options::RequestOption;

    #[test]
    fn display() {
        let request = CreateBucketAclRequest::new("my-bucket", "project-editors-123", "WRITER")
            .with_option(RequestOption::UserProject("my-project".to_string()));
        assert_eq!(
            request.to_string(),
            "CreateBucketAclRequest={bucket_name=my-bucket, entity=project-editors-123, role=WRITER, \
             userProject=my-project}"
        );
    }

    #[test]
    fn build_posts_to_acl_collection() {
        let request = CreateBucketAclRequest::new("my-bucket", "group-devs@example.com", "READER");
        let builder = build("http://localhost/storage/v1", CurlHandle::new(), &request).unwrap();
        assert_eq!(builder.url(), "http://localhost/storage/v1/b/my-bucket/acl");
    }

    #[test]
    fn malformed_entity() {
        let request = CreateBucketAclRequest::new("my-bucket", "project-admins-123", "READER");
        let err = build("http://localhost/storage/v1", CurlHandle::new(), &request).err().unwrap();
        assert_eq!(err.code(), Code::InvalidArgument);
    }
}
