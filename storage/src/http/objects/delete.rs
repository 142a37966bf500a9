use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Deletes an object, or one generation of it when a `Generation` option is set.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DeleteObjectRequest {
    bucket_name: String,
    object_name: String,
    options: RequestOptions,
}

impl DeleteObjectRequest {
    pub fn new(bucket_name: impl Into<String>, object_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }
}

impl_request_options!(DeleteObjectRequest);

impl fmt::Display for DeleteObjectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DeleteObjectRequest={{bucket_name={}, object_name={}",
            self.bucket_name, self.object_name
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &DeleteObjectRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}/o/{}", base_url, req.bucket_name.escape(), req.object_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder.set_method(Method::Delete).add_options(&req.options);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::options::RequestOption;

    #[test]
    fn generation_is_a_query_parameter() {
        let request = DeleteObjectRequest::new("b", "dir/file.txt").with_option(RequestOption::Generation(42));
        let builder = build("http://localhost", CurlHandle::new(), &request);
        assert_eq!(builder.url(), "http://localhost/b/b/o/dir%2Ffile.txt?generation=42");
        assert_eq!(
            request.to_string(),
            "DeleteObjectRequest={bucket_name=b, object_name=dir/file.txt, generation=42}"
        );
    }
}
