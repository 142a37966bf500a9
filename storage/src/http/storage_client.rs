use std::sync::Arc;

use serde::de::DeserializeOwned;

use google_cloud_token::TokenSource;

use crate::http::bucket_access_controls::delete::DeleteBucketAclRequest;
use crate::http::bucket_access_controls::get::GetBucketAclRequest;
use crate::http::bucket_access_controls::insert::CreateBucketAclRequest;
use crate::http::bucket_access_controls::list::{ListBucketAclRequest, ListBucketAclResponse};
use crate::http::bucket_access_controls::patch::PatchBucketAclRequest;
use crate::http::bucket_access_controls::update::UpdateBucketAclRequest;
use crate::http::bucket_access_controls::BucketAccessControl;
use crate::http::buckets::delete::DeleteBucketRequest;
use crate::http::buckets::get::GetBucketMetadataRequest;
use crate::http::buckets::insert::CreateBucketRequest;
use crate::http::buckets::list::{ListBucketsRequest, ListBucketsResponse};
use crate::http::buckets::patch::PatchBucketRequest;
use crate::http::buckets::update::UpdateBucketRequest;
use crate::http::buckets::BucketMetadata;
use crate::http::conn_pool::ConnectionPool;
use crate::http::curl_handle::CurlHandle;
use crate::http::curl_request::HttpResponse;
use crate::http::curl_request_builder::{CurlRequestBuilder, TransferSettings};
use crate::http::default_object_access_controls::delete::DeleteDefaultObjectAclRequest;
use crate::http::default_object_access_controls::get::GetDefaultObjectAclRequest;
use crate::http::default_object_access_controls::insert::CreateDefaultObjectAclRequest;
use crate::http::default_object_access_controls::list::{ListDefaultObjectAclRequest, ListDefaultObjectAclResponse};
use crate::http::default_object_access_controls::patch::PatchDefaultObjectAclRequest;
use crate::http::default_object_access_controls::update::UpdateDefaultObjectAclRequest;
use crate::http::download_stream::ObjectReadStream;
use crate::http::object_access_controls::delete::DeleteObjectAclRequest;
use crate::http::object_access_controls::get::GetObjectAclRequest;
use crate::http::object_access_controls::insert::CreateObjectAclRequest;
use crate::http::object_access_controls::list::{ListObjectAclRequest, ListObjectAclResponse};
use crate::http::object_access_controls::patch::PatchObjectAclRequest;
use crate::http::object_access_controls::update::UpdateObjectAclRequest;
use crate::http::object_access_controls::ObjectAccessControl;
use crate::http::objects::delete::DeleteObjectRequest;
use crate::http::objects::download::ReadObjectRequest;
use crate::http::objects::get::GetObjectMetadataRequest;
use crate::http::objects::insert::InsertObjectMediaRequest;
use crate::http::objects::list::{ListObjectsRequest, ListObjectsResponse};
use crate::http::objects::patch::PatchObjectRequest;
use crate::http::objects::update::UpdateObjectRequest;
use crate::http::objects::upload::WriteObjectRequest;
use crate::http::objects::ObjectMetadata;
use crate::http::upload_stream::ObjectWriteStream;
use crate::http::{
    bucket_access_controls, buckets, default_object_access_controls, object_access_controls, objects, Error,
};

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/devstorage.full_control",
];

pub(crate) const USER_AGENT: &str = concat!("gcloud-storage-curl/", env!("CARGO_PKG_VERSION"));

/// Executes requests against the JSON API over pooled libcurl handles.
#[derive(Clone, Debug)]
pub struct StorageClient {
    ts: Arc<dyn TokenSource>,
    pool: Arc<ConnectionPool>,
    json_base_url: String,
    upload_base_url: String,
    settings: TransferSettings,
}

impl StorageClient {
    pub(crate) fn new(ts: Arc<dyn TokenSource>, pool: Arc<ConnectionPool>, settings: TransferSettings) -> Self {
        let endpoint = pool.endpoint().trim_end_matches('/');
        Self {
            json_base_url: format!("{endpoint}/storage/v1"),
            upload_base_url: format!("{endpoint}/upload/storage/v1"),
            ts,
            pool,
            settings,
        }
    }

    pub fn json_base_url(&self) -> &str {
        &self.json_base_url
    }

    pub fn upload_base_url(&self) -> &str {
        &self.upload_base_url
    }

    /// Retrieves a list of buckets for a given project.
    pub fn list_buckets(&self, req: &ListBucketsRequest) -> Result<ListBucketsResponse, Error> {
        let builder = buckets::list::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, None)
    }

    /// Creates a new bucket.
    pub fn create_bucket(&self, req: &CreateBucketRequest) -> Result<BucketMetadata, Error> {
        let builder = buckets::insert::build(&self.json_base_url, self.handle()?, req)?;
        self.send(builder, Some(req.payload()))
    }

    pub fn get_bucket_metadata(&self, req: &GetBucketMetadataRequest) -> Result<BucketMetadata, Error> {
        let builder = buckets::get::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, None)
    }

    /// Deletes an empty bucket.
    pub fn delete_bucket(&self, req: &DeleteBucketRequest) -> Result<(), Error> {
        let builder = buckets::delete::build(&self.json_base_url, self.handle()?, req);
        self.send_get_empty(builder)
    }

    pub fn update_bucket(&self, req: &UpdateBucketRequest) -> Result<BucketMetadata, Error> {
        let builder = buckets::update::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, Some(req.payload()))
    }

    pub fn patch_bucket(&self, req: &PatchBucketRequest) -> Result<BucketMetadata, Error> {
        let builder = buckets::patch::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, Some(req.payload().to_string()))
    }

    pub fn list_bucket_acl(&self, req: &ListBucketAclRequest) -> Result<ListBucketAclResponse, Error> {
        let builder = bucket_access_controls::list::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, None)
    }

    pub fn create_bucket_acl(&self, req: &CreateBucketAclRequest) -> Result<BucketAccessControl, Error> {
        let builder = bucket_access_controls::insert::build(&self.json_base_url, self.handle()?, req)?;
        self.send(builder, Some(req.payload()))
    }

    pub fn get_bucket_acl(&self, req: &GetBucketAclRequest) -> Result<BucketAccessControl, Error> {
        let builder = bucket_access_controls::get::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, None)
    }

    pub fn delete_bucket_acl(&self, req: &DeleteBucketAclRequest) -> Result<(), Error> {
        let builder = bucket_access_controls::delete::build(&self.json_base_url, self.handle()?, req);
        self.send_get_empty(builder)
    }

    pub fn update_bucket_acl(&self, req: &UpdateBucketAclRequest) -> Result<BucketAccessControl, Error> {
        let builder = bucket_access_controls::update::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, Some(req.payload()))
    }

    pub fn patch_bucket_acl(&self, req: &PatchBucketAclRequest) -> Result<BucketAccessControl, Error> {
        let builder = bucket_access_controls::patch::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, Some(req.payload().to_string()))
    }

    pub fn list_default_object_acl(
        &self,
        req: &ListDefaultObjectAclRequest,
    ) -> Result<ListDefaultObjectAclResponse, Error> {
        let builder = default_object_access_controls::list::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, None)
    }

    pub fn create_default_object_acl(
        &self,
        req: &CreateDefaultObjectAclRequest,
    ) -> Result<ObjectAccessControl, Error> {
        let builder = default_object_access_controls::insert::build(&self.json_base_url, self.handle()?, req)?;
        self.send(builder, Some(req.payload()))
    }

    pub fn get_default_object_acl(&self, req: &GetDefaultObjectAclRequest) -> Result<ObjectAccessControl, Error> {
        let builder = default_object_access_controls::get::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, None)
    }

    pub fn delete_default_object_acl(&self, req: &DeleteDefaultObjectAclRequest) -> Result<(), Error> {
        let builder = default_object_access_controls::delete::build(&self.json_base_url, self.handle()?, req);
        self.send_get_empty(builder)
    }

    pub fn update_default_object_acl(
        &self,
        req: &UpdateDefaultObjectAclRequest,
    ) -> Result<ObjectAccessControl, Error> {
        let builder = default_object_access_controls::update::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, Some(req.payload()))
    }

    pub fn patch_default_object_acl(&self, req: &PatchDefaultObjectAclRequest) -> Result<ObjectAccessControl, Error> {
        let builder = default_object_access_controls::patch::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, Some(req.payload().to_string()))
    }

    /// Retrieves a list of objects matching the criteria.
    pub fn list_objects(&self, req: &ListObjectsRequest) -> Result<ListObjectsResponse, Error> {
        let builder = objects::list::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, None)
    }

    /// Stores a new object whose contents are held in memory.
    pub fn insert_object_media(&self, req: &InsertObjectMediaRequest) -> Result<ObjectMetadata, Error> {
        let builder = objects::insert::build(&self.upload_base_url, self.handle()?, req);
        let builder = self.with_headers(builder)?;
        Self::parse(self.execute(builder, req.contents().to_vec())?)
    }

    pub fn get_object_metadata(&self, req: &GetObjectMetadataRequest) -> Result<ObjectMetadata, Error> {
        let builder = objects::get::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, None)
    }

    /// Starts downloading an object's contents.
    pub fn read_object(&self, req: &ReadObjectRequest) -> Result<ObjectReadStream, Error> {
        let builder = objects::download::build(&self.json_base_url, self.handle()?, req);
        self.with_headers(builder)?.build_download_request()
    }

    /// Starts a streaming upload. The object exists once [`ObjectWriteStream::close`] succeeds.
    pub fn write_object(&self, req: &WriteObjectRequest) -> Result<ObjectWriteStream, Error> {
        let builder = objects::upload::build(&self.upload_base_url, self.handle()?, req);
        self.with_headers(builder)?.build_upload_request()
    }

    pub fn delete_object(&self, req: &DeleteObjectRequest) -> Result<(), Error> {
        let builder = objects::delete::build(&self.json_base_url, self.handle()?, req);
        self.send_get_empty(builder)
    }

    pub fn update_object(&self, req: &UpdateObjectRequest) -> Result<ObjectMetadata, Error> {
        let builder = objects::update::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, Some(req.payload()))
    }

    pub fn patch_object(&self, req: &PatchObjectRequest) -> Result<ObjectMetadata, Error> {
        let builder = objects::patch::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, Some(req.payload().to_string()))
    }

    pub fn list_object_acl(&self, req: &ListObjectAclRequest) -> Result<ListObjectAclResponse, Error> {
        let builder = object_access_controls::list::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, None)
    }

    pub fn create_object_acl(&self, req: &CreateObjectAclRequest) -> Result<ObjectAccessControl, Error> {
        let builder = object_access_controls::insert::build(&self.json_base_url, self.handle()?, req)?;
        self.send(builder, Some(req.payload()))
    }

    pub fn get_object_acl(&self, req: &GetObjectAclRequest) -> Result<ObjectAccessControl, Error> {
        let builder = object_access_controls::get::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, None)
    }

    pub fn delete_object_acl(&self, req: &DeleteObjectAclRequest) -> Result<(), Error> {
        let builder = object_access_controls::delete::build(&self.json_base_url, self.handle()?, req);
        self.send_get_empty(builder)
    }

    pub fn update_object_acl(&self, req: &UpdateObjectAclRequest) -> Result<ObjectAccessControl, Error> {
        let builder = object_access_controls::update::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, Some(req.payload()))
    }

    pub fn patch_object_acl(&self, req: &PatchObjectAclRequest) -> Result<ObjectAccessControl, Error> {
        let builder = object_access_controls::patch::build(&self.json_base_url, self.handle()?, req);
        self.send(builder, Some(req.payload().to_string()))
    }

    fn handle(&self) -> Result<CurlHandle, Error> {
        self.pool.channel().handle()
    }

    fn with_headers(&self, mut builder: CurlRequestBuilder) -> Result<CurlRequestBuilder, Error> {
        let token = self.ts.token().map_err(Error::TokenSource)?;
        if !token.is_empty() {
            builder.add_header(format!("Authorization: {token}"));
        }
        builder
            .add_header("X-Goog-Api-Client: rust")
            .add_user_agent_prefix(USER_AGENT)
            .set_transfer_settings(self.settings);
        Ok(builder)
    }

    fn send<T: DeserializeOwned>(&self, builder: CurlRequestBuilder, body: Option<String>) -> Result<T, Error> {
        let mut builder = self.with_headers(builder)?;
        let payload = match body {
            Some(body) => {
                if !builder.has_header("Content-Type") {
                    builder.add_header("Content-Type: application/json");
                }
                body.into_bytes()
            }
            None => Vec::new(),
        };
        Self::parse(self.execute(builder, payload)?)
    }

    fn send_get_empty(&self, builder: CurlRequestBuilder) -> Result<(), Error> {
        let builder = self.with_headers(builder)?;
        self.execute(builder, Vec::new()).map(|_| ())
    }

    fn execute(&self, builder: CurlRequestBuilder, payload: Vec<u8>) -> Result<HttpResponse, Error> {
        let (response, handle) = builder.build_request(payload).make_request_keeping_handle()?;
        // every channel of the pool shares endpoint and options
        self.pool.channel().release(handle);
        match response.check_status() {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::debug!("request failed: {e}");
                Err(e)
            }
        }
    }

    fn parse<T: DeserializeOwned>(response: HttpResponse) -> Result<T, Error> {
        tracing::trace!("response: {}", response.payload_str());
        response.parse_json()
    }
}
