use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::objects::insert::media_upload_builder;
use crate::http::options::{impl_request_options, RequestOptions};

/// Creates an object whose contents are streamed with a chunked request.
///
/// See [`crate::http::upload_stream::ObjectWriteStream`].
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct WriteObjectRequest {
    bucket_name: String,
    object_name: String,
    options: RequestOptions,
}

impl WriteObjectRequest {
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

impl_request_options!(WriteObjectRequest);

impl fmt::Display for WriteObjectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WriteObjectRequest={{bucket_name={}, object_name={}",
            self.bucket_name, self.object_name
        )?;
        self.options.dump(f)?;
        f.write_str("}")
    }
}

pub(crate) fn build(upload_base_url: &str, handle: CurlHandle, req: &WriteObjectRequest) -> CurlRequestBuilder {
    media_upload_builder(upload_base_url, handle, &req.bucket_name, &req.object_name, &req.options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::options::RequestOption;

    #[test]
    fn upload_url() {
        let request = WriteObjectRequest::new("b", "o").with_option(RequestOption::ContentType("text/plain".into()));
        let builder = build("http://localhost/upload/storage/v1", CurlHandle::new(), &request);
        assert_eq!(builder.url(), "http://localhost/upload/storage/v1/b/b/o?uploadType=media&name=o");
        assert_eq!(builder.headers(), ["Content-Type: text/plain"]);
        assert_eq!(
            request.to_string(),
            "WriteObjectRequest={bucket_name=b, object_name=o, Content-Type: text/plain}"
        );
    }
}
