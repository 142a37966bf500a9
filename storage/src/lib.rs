#![allow(clippy::result_large_err)]
//! # gcloud-storage-curl
//!
//! Google Cloud Storage JSON API client built on libcurl.
//!
//! * [About Cloud Storage](https://cloud.google.com/storage/)
//! * [JSON API Documentation](https://cloud.google.com/storage/docs/json_api/v1)
//!
//! ## Quick Start
//!
//! ### Authentication
//!
//! Credentials come from a [`google_cloud_token::TokenSourceProvider`]. The token source returns
//! the whole `Authorization` header value, so any OAuth2 flow can be plugged in.
//!
//! ```
//! use google_cloud_token::{StaticTokenSource, StaticTokenSourceProvider};
//! use gcloud_storage_curl::client::{Client, ClientConfig};
//!
//! fn run(access_token: &str) {
//!     let config = ClientConfig::default()
//!         .with_token_source_provider(StaticTokenSourceProvider::new(StaticTokenSource::bearer(access_token)));
//!     let client = Client::new(config);
//! }
//! ```
//!
//! ### Anonymous Access and the emulator
//!
//! `ClientConfig::default()` sends requests without credentials. `with_env()` honours
//! `STORAGE_EMULATOR_HOST`.
//!
//! ```
//! use gcloud_storage_curl::client::{Client, ClientConfig};
//!
//! fn run() {
//!     let client = Client::new(ClientConfig::default().anonymous().with_env());
//! }
//! ```
//!
//! ### Usage
//!
//! ```
//! use std::io::{Read, Write};
//!
//! use gcloud_storage_curl::client::Client;
//! use gcloud_storage_curl::http::objects::download::{Range, ReadObjectRequest};
//! use gcloud_storage_curl::http::objects::insert::InsertObjectMediaRequest;
//! use gcloud_storage_curl::http::objects::patch::{ObjectMetadataPatchBuilder, PatchObjectRequest};
//! use gcloud_storage_curl::http::objects::upload::WriteObjectRequest;
//! use gcloud_storage_curl::http::options::RequestOption;
//! use gcloud_storage_curl::http::Error;
//!
//! fn run(client: Client) -> Result<(), Error> {
//!     // Upload from memory
//!     let req = InsertObjectMediaRequest::new("bucket", "file.txt", "hello world")
//!         .with_option(RequestOption::ContentType("text/plain".to_string()))
//!         .with_option(RequestOption::IfGenerationMatch(0));
//!     let uploaded = client.insert_object_media(&req)?;
//!
//!     // Stream an upload
//!     let mut stream = client.write_object(&WriteObjectRequest::new("bucket", "large.bin"))?;
//!     stream.write_all(&[0u8; 1024])?;
//!     let written = stream.close()?;
//!
//!     // Download a range
//!     let req = ReadObjectRequest::new("bucket", "file.txt")
//!         .with_option(RequestOption::Range(Range(Some(0), Some(4))));
//!     let mut data = String::new();
//!     client.read_object(&req)?.read_to_string(&mut data)?;
//!
//!     // Change some metadata
//!     let patch = ObjectMetadataPatchBuilder::new().set_cache_control("no-cache").set_metadata("k", "v");
//!     let patched = client.patch_object(&PatchObjectRequest::new("bucket", "file.txt", &patch))?;
//!     Ok(())
//! }
//! ```
pub mod client;
pub mod http;
pub mod token_source;
