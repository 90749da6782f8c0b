use std::sync::Arc;

use image::DynamicImage;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use crate::cache::{CacheEntry, ImageUrlCache};
use crate::models::{Photo, PhotoUrlKind, Size};

type Job = Box<dyn FnOnce() + Send>;

/// Serial execution context for user-visible completions.
///
/// All completions sent through one queue run on a single task, one after
/// another, so no two of them ever observe each other mid-flight.
#[derive(Debug, Clone)]
pub(crate) struct CallbackQueue {
    sender: mpsc::UnboundedSender<Job>,
}

impl CallbackQueue {
    /// Must be called from within a Tokio runtime.
    pub(crate) fn new() -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                job();
            }
        });
        Self { sender }
    }

    pub(crate) fn dispatch(&self, job: impl FnOnce() + Send + 'static) {
        let _ = self.sender.send(Box::new(job));
    }
}

/// Observable state of an [`ImageDownloader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    Idle,
    Loading,
    Completed,
    Cancelled,
}

/// Fetches photo renditions through the shared response cache, with at
/// most one in-flight request per instance.
///
/// Failures never surface as errors: the completion receives `None` and a
/// flag telling whether the image came from the cache. Create instances
/// with [`Client::downloader`].
///
/// [`Client::downloader`]: crate::Client::downloader
pub struct ImageDownloader {
    http: reqwest::Client,
    cache: Arc<ImageUrlCache>,
    callbacks: CallbackQueue,
    task: Option<InFlight>,
    cancelled: bool,
}

struct InFlight {
    url: Url,
    handle: JoinHandle<()>,
}

impl ImageDownloader {
    pub(crate) fn new(
        http: reqwest::Client,
        cache: Arc<ImageUrlCache>,
        callbacks: CallbackQueue,
    ) -> Self {
        Self {
            http,
            cache,
            callbacks,
            task: None,
            cancelled: false,
        }
    }

    /// Loads a rendition of `photo` and hands the result to `on_done`.
    ///
    /// A cache hit invokes `on_done(image, true)` synchronously on the
    /// caller's stack; a miss starts a background fetch whose completion
    /// arrives on the client's callback queue with `is_cached == false`.
    /// The call is a no-op while an earlier fetch is still running, and
    /// when the variant URL cannot be resolved.
    pub fn load<F>(&mut self, photo: &Photo, size: Option<Size>, kind: PhotoUrlKind, on_done: F)
    where
        F: FnOnce(Option<DynamicImage>, bool) + Send + 'static,
    {
        let Some(url) = photo.url(kind, size) else {
            return;
        };
        if self.is_running() {
            return;
        }

        self.cancelled = false;

        if let Some(image) = self.cache.image(&url) {
            on_done(Some(image), true);
            return;
        }

        let http = self.http.clone();
        let cache = Arc::clone(&self.cache);
        let callbacks = self.callbacks.clone();
        let request_url = url.clone();

        let handle = tokio::spawn(async move {
            let image = fetch_image(&http, &request_url, &cache).await;
            callbacks.dispatch(move || on_done(image, false));
        });

        self.task = Some(InFlight { url, handle });
    }

    /// Marks the instance cancelled and aborts any in-flight fetch.
    ///
    /// Cancellation is advisory: a fetch whose completion is already
    /// queued still delivers it. The next `load` clears the flag.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        if let Some(task) = &self.task {
            task.handle.abort();
        }
    }

    /// True iff the in-flight fetch is still running and its original URL
    /// matches the one resolved from the given arguments.
    pub fn is_current_load_equal_to(
        &self,
        photo: &Photo,
        size: Option<Size>,
        kind: PhotoUrlKind,
    ) -> bool {
        let Some(task) = &self.task else {
            return false;
        };
        let Some(url) = photo.url(kind, size) else {
            return false;
        };
        task.url == url && !task.handle.is_finished()
    }

    pub fn state(&self) -> DownloadState {
        if self.cancelled {
            return DownloadState::Cancelled;
        }
        match &self.task {
            None => DownloadState::Idle,
            Some(task) if task.handle.is_finished() => DownloadState::Completed,
            Some(_) => DownloadState::Loading,
        }
    }

    /// `async` variant of [`load`](Self::load): cache check, fetch, cache
    /// write, with every failure degrading to `None`. Does not participate
    /// in the instance's single-flight bookkeeping.
    pub async fn download(
        &self,
        photo: &Photo,
        size: Option<Size>,
        kind: PhotoUrlKind,
    ) -> Option<DynamicImage> {
        let url = photo.url(kind, size)?;

        if let Some(image) = self.cache.image(&url) {
            return Some(image);
        }

        fetch_image(&self.http, &url, &self.cache).await
    }

    fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }
}

/// Fetches and decodes one image, writing the cache entry before the
/// result is handed back.
async fn fetch_image(
    http: &reqwest::Client,
    url: &Url,
    cache: &ImageUrlCache,
) -> Option<DynamicImage> {
    let response = http.get(url.clone()).send().await.ok()?;
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let data = response.bytes().await.ok()?;
    let image = image::load_from_memory(&data).ok()?;

    cache.insert(url, CacheEntry::new(status, content_type, data));
    Some(image)
}
