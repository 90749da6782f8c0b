//! Client SDK for the Unsplash REST API.
//!
//! [`Client`] builds authenticated requests and decodes typed responses;
//! [`ImageDownloader`] fetches photo renditions through a bounded,
//! URL-keyed response cache with at most one in-flight request per
//! instance.
//!
//! ```no_run
//! use unsplash::{Client, Cursor, UnsplashConfig};
//!
//! # async fn run() -> unsplash::Result<()> {
//! let client = Client::new(UnsplashConfig::new("ACCESS_KEY", "SECRET"))?;
//!
//! let photo = client.random_photo().await?;
//! let search = client.search_photos("forest", Cursor::new(1, 30)).await?;
//! println!("{} of {} photos", search.results.len(), search.total);
//!
//! client.track_download(&photo);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod cursor;
pub mod downloader;
pub mod error;
pub mod models;
pub mod request;
pub mod response;
pub mod result;

pub use cache::{CacheEntry, ImageUrlCache};
pub use client::Client;
pub use config::UnsplashConfig;
pub use cursor::Cursor;
pub use downloader::{DownloadState, ImageDownloader};
pub use error::RequestError;
pub use models::{
    Photo, PhotoExif, PhotoLinkKind, PhotoUrlKind, ProfileImageSize, Rgba, SearchResponse, Size,
    UrlKey, UrlMap, User, UserLinkKind,
};
pub use request::RequestOptions;
pub use response::ErrorMessages;
pub use result::Result;
