use std::fmt;

use crate::http::buckets::BucketMetadata;
use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::options::{impl_request_options, RequestOptions};

/// Lists the buckets of a project, one page at a time.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ListBucketsRequest {
    project_id: String,
    page_token: String,
    options: RequestOptions,
}

impl ListBucketsRequest {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            page_token: String::new(),
            options: RequestOptions::default(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn page_token(&self) -> &str {
        &self.page_token
    }

    /// Continues a listing from the `next_page_token` of an earlier response.
    pub fn set_page_token(&mut self, page_token: impl Into<String>) -> &mut Self {
        self.page_token = page_token.into();
        self
    }
}

impl_request_options!(ListBucketsRequest);

impl fmt::Display for ListBucketsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListBucketsRequest={{project_id={}", self.project_id)?;
        if !self.page_token.is_empty() {
            write!(f, ", page_token={}", self.page_token)?;
        }
        self.options.dump(f)?;
        f.write_str("}")
    }
}

/// One page of buckets.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListBucketsResponse {
    /// Empty on the last page.
    #[serde(default)]
    pub next_page_token: String,
    #[serde(default)]
    pub items: Vec<BucketMetadata>,
}

impl fmt::Display for ListBucketsResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListBucketsResponse={{next_page_token={}, items=[", self.next_page_token)?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]}")
    }
}

pub(crate) fn build(base_url: &str, handle: CurlHandle, req: &ListBucketsRequest) -> CurlRequestBuilder {
    let mut builder = CurlRequestBuilder::new(format!("{base_url}/b"), handle);
    builder.add_query_parameter("project", &req.project_id);
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
        let mut request = ListBucketsRequest::new("my-project").with_option(RequestOption::Prefix("logs".to_string()));
        request.set_page_token("abc=");
        let builder = build("https://storage.example.com/storage/v1", CurlHandle::new(), &request);
        assert_eq!(
            builder.url(),
            "https://storage.example.com/storage/v1/b?project=my-project&pageToken=abc%3D&prefix=logs"
        );
        assert_eq!(
            request.to_string(),
            "ListBucketsRequest={project_id=my-project, page_token=abc=, prefix=logs}"
        );
    }

    #[test]
    fn parse_response() {
        let response: ListBucketsResponse = serde_json::from_str(
            r#"{"kind": "storage#buckets", "nextPageToken": "next",
                "items": [{"name": "bucket-1"}, {"name": "bucket-2", "metageneration": "2"}]}"#,
        )
        .unwrap();
        assert_eq!(response.next_page_token, "next");
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[1].metageneration(), 2);
        assert!(response.to_string().starts_with("ListBucketsResponse={next_page_token=next, items=[BucketMetadata={"));

        let last: ListBucketsResponse = serde_json::from_str(r#"{"kind": "storage#buckets"}"#).unwrap();
        assert!(last.next_page_token.is_empty());
        assert!(last.items.is_empty());
    }
}
