use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use reqwest::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::cache::ImageUrlCache;
use crate::config::UnsplashConfig;
use crate::cursor::{Cursor, Paged};
use crate::downloader::{CallbackQueue, ImageDownloader};
use crate::error::RequestError;
use crate::models::{Photo, SearchResponse};
use crate::request::{RequestOptions, build_download_location_url, build_url};
use crate::response::handle_response;
use crate::result::Result;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated API client.
///
/// Cheap to clone; clones share the HTTP connection pool, the image cache
/// and the callback queue.
#[derive(Clone, Debug)]
pub struct Client {
    http: HttpClient,
    config: UnsplashConfig,
    cache: Arc<ImageUrlCache>,
    callbacks: Arc<OnceLock<CallbackQueue>>,
}

impl Client {
    /// Builds a client with a disk-backed image cache under the platform
    /// cache directory.
    pub fn new(config: UnsplashConfig) -> Result<Self> {
        let cache = match dirs::cache_dir() {
            Some(dir) => ImageUrlCache::new().with_disk(
                dir.join("unsplash").join("images"),
                ImageUrlCache::DEFAULT_CAPACITY,
            ),
            None => ImageUrlCache::new(),
        };
        Self::with_cache(config, cache)
    }

    /// Builds a client around an explicit image cache.
    pub fn with_cache(config: UnsplashConfig, cache: ImageUrlCache) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&config.authorization())
            .map_err(|_| RequestError::InvalidAccessKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("Accept-Version", HeaderValue::from_static("v1"));
        headers.insert("Authorization", auth);

        Ok(Self {
            http: HttpClient::builder()
                .default_headers(headers)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap(),
            config,
            cache: Arc::new(cache),
            callbacks: Arc::new(OnceLock::new()),
        })
    }

    pub fn config(&self) -> &UnsplashConfig {
        &self.config
    }

    pub fn image_cache(&self) -> &ImageUrlCache {
        &self.cache
    }

    /// A fresh downloader sharing this client's cache and callback queue.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn downloader(&self) -> ImageDownloader {
        let callbacks = self
            .callbacks
            .get_or_init(CallbackQueue::new)
            .clone();
        ImageDownloader::new(self.http.clone(), Arc::clone(&self.cache), callbacks)
    }

    /// Fetches a single random photo.
    pub async fn random_photo(&self) -> Result<Photo> {
        self.send(RequestOptions::new("/photos/random")).await
    }

    /// Searches photos matching `query` at the given cursor position.
    pub async fn search_photos(&self, query: &str, cursor: Cursor) -> Result<SearchResponse> {
        let paged = Paged::new(
            cursor,
            HashMap::from([("query".to_owned(), query.to_owned())]),
        );
        let options = RequestOptions::new("/search/photos").query_items(paged.query_items());

        self.send(options).await
    }

    /// Lists one page of a collection's photos.
    pub async fn collection_photos(
        &self,
        collection_id: &str,
        cursor: Cursor,
    ) -> Result<Vec<Photo>> {
        let paged = Paged::new(
            cursor,
            HashMap::from([("id".to_owned(), collection_id.to_owned())]),
        );
        let options = RequestOptions::new(format!("/collections/{collection_id}/photos"))
            .params(paged.into_parameters());

        self.send(options).await
    }

    /// Fires the download-tracking beacon for `photo`.
    ///
    /// The request carries `client_id={access_key}` ahead of any query the
    /// download-location link already has; its response is discarded.
    /// No-op when the photo has no download-location link. Must be called
    /// from within a Tokio runtime.
    pub fn track_download(&self, photo: &Photo) {
        let Some(url) = build_download_location_url(photo, self.config.access_key()) else {
            return;
        };

        let request = self.http.get(url);
        tokio::spawn(async move {
            let _ = request.send().await;
        });
    }

    /// Sends an arbitrary request described by `options` and decodes the
    /// response. Escape hatch for endpoints without a dedicated method;
    /// caller headers win over the client defaults on key collision.
    pub async fn send<T: DeserializeOwned>(&self, options: RequestOptions) -> Result<T> {
        let url = build_url(self.config.api_url(), &options);
        let mut request = self.http.request(options.method.clone(), url);
        if let Some(headers) = &options.headers {
            for (key, value) in headers {
                request = request.header(key.as_str(), value.as_str());
            }
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                let data = response.bytes().await.ok();
                handle_response(data.as_deref(), Some(status), None)
            }
            Err(error) => handle_response(None, None, Some(error.into())),
        }
    }
}
