use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use google_cloud_token::TokenSourceProvider;

use crate::http::buckets::list::ListBucketsRequest;
use crate::http::buckets::BucketMetadata;
use crate::http::conn_pool::{ConnectionOptions, ConnectionPool};
use crate::http::curl_request_builder::TransferSettings;
use crate::http::objects::list::ListObjectsRequest;
use crate::http::objects::ObjectMetadata;
use crate::http::storage_client::StorageClient;
use crate::http::Error;
use crate::token_source::AnonymousTokenSourceProvider;

const EMULATOR_HOST_ENV: &str = "STORAGE_EMULATOR_HOST";
const ENABLE_TRACING_ENV: &str = "CLOUD_STORAGE_ENABLE_TRACING";

#[derive(Debug)]
pub struct ClientConfig {
    pub storage_endpoint: String,
    /// `None` sends every request without credentials.
    pub token_source_provider: Option<Box<dyn TokenSourceProvider>>,
    pub project_id: Option<String>,
    pub connection_pool_size: usize,
    pub connect_timeout: Option<Duration>,
    pub timeout: Option<Duration>,
    pub enable_http_tracing: bool,
    pub maximum_simple_upload_size: usize,
    pub download_buffer_size: usize,
    pub upload_buffer_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let settings = TransferSettings::default();
        Self {
            storage_endpoint: "https://storage.googleapis.com".to_string(),
            token_source_provider: None,
            project_id: None,
            connection_pool_size: 4,
            connect_timeout: None,
            timeout: None,
            enable_http_tracing: false,
            maximum_simple_upload_size: settings.maximum_simple_upload_size,
            download_buffer_size: settings.download_buffer_size,
            upload_buffer_size: settings.upload_buffer_size,
        }
    }
}

impl ClientConfig {
    pub fn anonymous(mut self) -> Self {
        self.token_source_provider = None;
        self
    }

    pub fn with_token_source_provider(mut self, provider: impl TokenSourceProvider + 'static) -> Self {
        self.token_source_provider = Some(Box::new(provider));
        self
    }

    /// Applies `STORAGE_EMULATOR_HOST`, which replaces the endpoint and turns off credentials,
    /// and `CLOUD_STORAGE_ENABLE_TRACING`, which enables transport tracing when it lists `http`.
    pub fn with_env(mut self) -> Self {
        if let Ok(host) = std::env::var(EMULATOR_HOST_ENV) {
            if !host.is_empty() {
                // `host:port` parses as a URL with scheme `host`
                self.storage_endpoint = match url::Url::parse(&host) {
                    Ok(url) if matches!(url.scheme(), "http" | "https") => host,
                    _ => format!("http://{host}"),
                };
                self.token_source_provider = None;
            }
        }
        if let Ok(value) = std::env::var(ENABLE_TRACING_ENV) {
            if value.split(',').any(|v| v.trim() == "http") {
                self.enable_http_tracing = true;
            }
        }
        self
    }

    fn transfer_settings(&self) -> TransferSettings {
        TransferSettings {
            maximum_simple_upload_size: self.maximum_simple_upload_size,
            download_buffer_size: self.download_buffer_size,
            upload_buffer_size: self.upload_buffer_size,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Client {
    project_id: Option<String>,
    storage_client: StorageClient,
}

impl Deref for Client {
    type Target = StorageClient;

    fn deref(&self) -> &Self::Target {
        &self.storage_client
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl Client {
    /// New client
    pub fn new(config: ClientConfig) -> Self {
        let ts = match &config.token_source_provider {
            Some(tsp) => tsp.token_source(),
            None => {
                tracing::trace!("Use anonymous access due to lack of token");
                AnonymousTokenSourceProvider {}.token_source()
            }
        };
        let options = ConnectionOptions {
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
            enable_http_tracing: config.enable_http_tracing,
        };
        let pool = Arc::new(ConnectionPool::new(
            config.connection_pool_size,
            config.storage_endpoint.as_str(),
            options,
        ));
        Self {
            storage_client: StorageClient::new(ts, pool, config.transfer_settings()),
            project_id: config.project_id,
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Iterates over all the buckets matching `req`, fetching pages as needed.
    ///
    /// ```
    /// use gcloud_storage_curl::client::Client;
    /// use gcloud_storage_curl::http::buckets::list::ListBucketsRequest;
    ///
    /// fn run(client: Client) -> Result<(), gcloud_storage_curl::http::Error> {
    ///     for bucket in client.list_buckets_iter(ListBucketsRequest::new("my-project")) {
    ///         println!("{}", bucket?.name());
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub fn list_buckets_iter(&self, req: ListBucketsRequest) -> PageIter<'_, ListBucketsRequest> {
        PageIter::new(&self.storage_client, req)
    }

    /// Iterates over all the objects matching `req`, fetching pages as needed.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub fn list_objects_iter(&self, req: ListObjectsRequest) -> PageIter<'_, ListObjectsRequest> {
        PageIter::new(&self.storage_client, req)
    }
}

/// A list request that continues with a page token.
pub trait PagedRequest {
    type Item;

    fn set_next_page(&mut self, token: &str);

    /// Fetches one page: its items and the token of the next page, empty on the last one.
    fn fetch(&self, client: &StorageClient) -> Result<(Vec<Self::Item>, String), Error>;
}

impl PagedRequest for ListBucketsRequest {
    type Item = BucketMetadata;

    fn set_next_page(&mut self, token: &str) {
        self.set_page_token(token);
    }

    fn fetch(&self, client: &StorageClient) -> Result<(Vec<BucketMetadata>, String), Error> {
        let page = client.list_buckets(self)?;
        Ok((page.items, page.next_page_token))
    }
}

impl PagedRequest for ListObjectsRequest {
    type Item = ObjectMetadata;

    fn set_next_page(&mut self, token: &str) {
        self.set_page_token(token);
    }

    fn fetch(&self, client: &StorageClient) -> Result<(Vec<ObjectMetadata>, String), Error> {
        let page = client.list_objects(self)?;
        Ok((page.items, page.next_page_token))
    }
}

/// Yields the items of every page until the service stops returning a page token. The first
/// error ends the iteration.
pub struct PageIter<'a, R: PagedRequest> {
    client: &'a StorageClient,
    request: R,
    items: std::vec::IntoIter<R::Item>,
    done: bool,
}

impl<'a, R: PagedRequest> PageIter<'a, R> {
    fn new(client: &'a StorageClient, request: R) -> Self {
        Self {
            client,
            request,
            items: Vec::new().into_iter(),
            done: false,
        }
    }
}

impl<R: PagedRequest> Iterator for PageIter<'_, R> {
    type Item = Result<R::Item, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.items.next() {
                return Some(Ok(item));
            }
            if self.done {
                return None;
            }
            match self.request.fetch(self.client) {
                Ok((items, next_page_token)) => {
                    self.items = items.into_iter();
                    if next_page_token.is_empty() {
                        self.done = true;
                    } else {
                        self.request.set_next_page(&next_page_token);
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use serial_test::serial;

    use google_cloud_token::{StaticTokenSource, StaticTokenSourceProvider};

    use crate::client::{Client, ClientConfig, EMULATOR_HOST_ENV, ENABLE_TRACING_ENV};

    #[ctor::ctor]
    fn init() {
        let _ = tracing_subscriber::fmt().try_init();
    }

    fn clear_env() {
        std::env::remove_var(EMULATOR_HOST_ENV);
        std::env::remove_var(ENABLE_TRACING_ENV);
    }

    #[test]
    #[serial]
    fn defaults() {
        clear_env();
        let config = ClientConfig::default().with_env();
        assert_eq!(config.storage_endpoint, "https://storage.googleapis.com");
        assert_eq!(config.connection_pool_size, 4);
        assert_eq!(config.maximum_simple_upload_size, 8 * 1024 * 1024);
        assert!(!config.enable_http_tracing);
        let client = Client::new(config);
        assert_eq!(client.json_base_url(), "https://storage.googleapis.com/storage/v1");
        assert_eq!(client.upload_base_url(), "https://storage.googleapis.com/upload/storage/v1");
    }

    #[test]
    #[serial]
    fn emulator_host_replaces_endpoint_and_credentials() {
        clear_env();
        std::env::set_var(EMULATOR_HOST_ENV, "localhost:9000");
        std::env::set_var(ENABLE_TRACING_ENV, "rpc,http");
        let config = ClientConfig::default()
            .with_token_source_provider(StaticTokenSourceProvider::new(StaticTokenSource::bearer("abc")))
            .with_env();
        clear_env();
        assert_eq!(config.storage_endpoint, "http://localhost:9000");
        assert!(config.token_source_provider.is_none());
        assert!(config.enable_http_tracing);
        let client = Client::new(config);
        assert_eq!(client.json_base_url(), "http://localhost:9000/storage/v1");
    }

    #[test]
    #[serial]
    fn project_id_is_kept() {
        clear_env();
        let client = Client::new(ClientConfig {
            project_id: Some("my-project".to_string()),
            ..ClientConfig::default()
        });
        assert_eq!(client.project_id(), Some("my-project"));
    }
}
