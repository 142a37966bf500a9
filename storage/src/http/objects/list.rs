use std::fmt;

use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::objects::ObjectMetadata;
use crate::http::options::{impl_request_options, RequestOptions};
use crate::http::Escape;

/// Lists the objects of a bucket, one page at a time.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ListObjectsRequest {
    bucket_name: String,
    page_token: String,
    options: RequestOptions,
}

impl ListObjectsRequest {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            page_token: String::new(),
            options: RequestOptions::default(),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn page_token(&self) -> &str {
        &self.page_token
    }

    pub fn set_page_token(&mut self, page_token: impl Into<String>) -> &mut Self {
        self.page_token = page_token.into();
        self
    }
}

impl_request_options!(ListObjectsRequest);

impl fmt::Display for ListObjectsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListObjectsRequest={{bucket_name={}", self.bucket_name)?;
        if !self.page_token.is_empty() {
            write!(f, ", page_token={}", self.page_token)?;
        }
        self.options.dump(f)?;
        f.write_str("}")
    }
}

/// One page of objects.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsResponse {
    #[serde(default)]
    pub next_page_token: String,
    /// Common prefixes when the listing used a delimiter.
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub items: Vec<ObjectMetadata>,
}

impl fmt::Display for ListObjectsResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ListObjectsResponse={{next_page_token={}, prefixes=[{}], items=[",
            self.next_page_token,
            self.prefixes.join(", ")
        )?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &ListObjectsRequest) -> CurlRequestBuilder {
    let url = format!("{}/b/{}/o", base_url, req.bucket_name.escape());
    let mut builder = CurlRequestBuilder::new(url, handle);
    if !req.page_token.is_empty() {
        builder.add_query_parameter("pageToken", &req.page_token);
    }
    builder.add_options(&req.options);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::options::RequestOption;

    #[test]
    fn build_url() {
        let mut request = ListObjectsRequest::new("my-bucket");
        request
            .set_page_token("token-1")
            .set_multiple_options([RequestOption::Delimiter("/".to_string()), RequestOption::Versions(true)]);
        let builder = build("http://localhost/storage/v1", CurlHandle::new(), &request);
        assert_eq!(
            builder.url(),
            "http://localhost/storage/v1/b/my-bucket/o?pageToken=token-1&delimiter=%2F&versions=true"
        );
    }

    #[test]
    fn parse_response() {
        let response: ListObjectsResponse = serde_json::from_str(
            r#"{"kind": "storage#objects", "nextPageToken": "n", "prefixes": ["a/", "b/"],
                "items": [{"name": "a/1", "size": "12"}]}"#,
        )
        .unwrap();
        assert_eq!(response.prefixes, vec!["a/", "b/"]);
        assert_eq!(response.items[0].size(), Some(12));
        assert!(response
            .to_string()
            .starts_with("ListObjectsResponse={next_page_token=n, prefixes=[a/, b/], items=[ObjectMetadata={"));
    }
}
