use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::object_access_controls::patch::ObjectAccessControlPatchBuilder;
use crate::http::object_access_controls::ObjectAccessControl;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::patch_builder::PatchBuilder;
use crate::http::Escape;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PatchDefaultObjectAclRequest {
    bucket_name: String,
    entity: String,
    payload: String,
    options: RequestOptions,
}

impl PatchDefaultObjectAclRequest {
    pub fn from_diff(
        bucket_name: impl Into<String>,
        entity: impl Into<String>,
        original: &ObjectAccessControl,
        updated: &ObjectAccessControl,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            entity: entity.into(),
            payload: PatchBuilder::diff(original, updated).to_json_string(),
            options: RequestOptions::default(),
        }
    }

    pub fn new(
        bucket_name: impl Into<String>,
        entity: impl Into<String>,
        patch: &ObjectAccessControlPatchBuilder,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            entity: entity.into(),
            payload: patch.build_patch(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl_request_options!(PatchDefaultObjectAclRequest);

impl fmt::Display for PatchDefaultObjectAclRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PatchDefaultObjectAclRequest={{bucket_name={}, entity={}",
            self.bucket_name, self.entity
        )?;
        self.options.dump(f)?;
        write!(f, ", payload={}}}", self.payload)
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &PatchDefaultObjectAclRequest) -> CurlRequestBuilder {
    let url = format!(
        "{}/b/{}/defaultObjectAcl/{}",
        base_url,
        req.bucket_name.escape(),
        req.entity.escape()
    );
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Patch).add_options(&req.options);
    builder
}
