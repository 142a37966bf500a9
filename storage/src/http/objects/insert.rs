use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::Method;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOption, RequestOptions};
use crate::http::Escape;

pub(crate) const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Creates an object from contents held in memory, with a single `uploadType=media` request.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct InsertObjectMediaRequest {
    bucket_name: String,
    object_name: String,
    contents: Vec<u8>,
    options: RequestOptions,
}

impl InsertObjectMediaRequest {
    pub fn new(bucket_name: impl Into<String>, object_name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
            contents: contents.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn set_contents(&mut self, contents: impl Into<Vec<u8>>) -> &mut Self {
        self.contents = contents.into();
        self
    }
}

impl_request_options!(InsertObjectMediaRequest);

impl fmt::Display for InsertObjectMediaRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InsertObjectMediaRequest={{bucket_name={}, object_name={}",
            self.bucket_name, self.object_name
        )?;
        self.options.dump(f)?;
        write!(f, ", contents={}}}", String::from_utf8_lossy(&self.contents))
    }
}

/// Adds the media upload query parameters shared by simple and streaming uploads.
pub(crate) fn media_upload_builder(
    upload_base_url: &str,
    handle: CurlHandle,
    bucket_name: &str,
    object_name: &str,
    options: &RequestOptions,
) -> CurlRequestBuilder {
    let url = format!("{}/b/{}/o", upload_base_url, bucket_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    builder
        .set_method(Method::Post)
        .add_query_parameter("uploadType", "media")
        .add_query_parameter("name", object_name)
        .add_options(options);
    if options.find(|o| matches!(o, RequestOption::ContentType(_))).is_none() {
        builder.add_header(format!("Content-Type: {DEFAULT_CONTENT_TYPE}"));
    }
    builder
}

pub(crate) fn build(upload_base_url: &str, handle: CurlHandle, req: &InsertObjectMediaRequest) -> CurlRequestBuilder {
    media_upload_builder(upload_base_url, handle, &req.bucket_name, &req.object_name, &req.options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_content_type() {
        let request = InsertObjectMediaRequest::new("my-bucket", "folder/file.txt", "hello");
        let builder = build("http://localhost/upload/storage/v1", CurlHandle::new(), &request);
        assert_eq!(
            builder.url(),
            "http://localhost/upload/storage/v1/b/my-bucket/o?uploadType=media&name=folder%2Ffile.txt"
        );
        assert_eq!(builder.headers(), ["Content-Type: application/octet-stream"]);
        assert_eq!(
            request.to_string(),
            "InsertObjectMediaRequest={bucket_name=my-bucket, object_name=folder/file.txt, contents=hello}"
        );
    }

    #[test]
    fn explicit_content_type() {
        let request = InsertObjectMediaRequest::new("b", "o", "{}")
            .with_option(RequestOption::ContentType("application/json".to_string()))
            .with_option(RequestOption::IfGenerationMatch(0));
        let builder = build("http://localhost", CurlHandle::new(), &request);
        assert_eq!(
            builder.url(),
            "http://localhost/b/b/o?uploadType=media&name=o&ifGenerationMatch=0"
        );
        assert_eq!(builder.headers(), ["Content-Type: application/json"]);
    }
}
