use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::UNIX_EPOCH;

use bytes::Bytes;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

/// One cached HTTP exchange: response metadata plus the raw body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub status: u16,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl CacheEntry {
    pub fn new(status: u16, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            status,
            content_type,
            data,
        }
    }
}

/// Bounded response cache keyed by URL.
///
/// Reads and inserts are safe from any thread; share one instance behind an
/// `Arc`. The cache does not track in-flight fetches: two downloaders
/// racing on the same URL both hit the network and the last writer wins.
#[derive(Debug)]
pub struct ImageUrlCache {
    memory: Mutex<MemoryCache>,
    disk: Option<DiskCache>,
}

impl ImageUrlCache {
    /// Default capacity of each layer: 50 MB in memory, 50 MB on disk.
    pub const DEFAULT_CAPACITY: u64 = 50 * 1024 * 1024;

    /// Memory-only cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Memory-only cache bounded to `capacity` bytes of body data.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            memory: Mutex::new(MemoryCache::new(capacity)),
            disk: None,
        }
    }

    /// Adds a persistent layer under `dir`, bounded to `capacity` bytes.
    pub fn with_disk(mut self, dir: PathBuf, capacity: u64) -> Self {
        self.disk = Some(DiskCache { dir, capacity });
        self
    }

    pub fn insert(&self, url: &Url, entry: CacheEntry) {
        if let Some(disk) = &self.disk {
            disk.insert(url, &entry);
        }
        self.memory.lock().unwrap().insert(url.clone(), entry);
    }

    pub fn get(&self, url: &Url) -> Option<CacheEntry> {
        if let Some(entry) = self.memory.lock().unwrap().get(url) {
            return Some(entry);
        }

        let entry = self.disk.as_ref()?.get(url)?;
        self.memory.lock().unwrap().insert(url.clone(), entry.clone());
        Some(entry)
    }

    /// Decodes the cached body for `url` into an image, if both exist.
    pub fn image(&self, url: &Url) -> Option<DynamicImage> {
        let entry = self.get(url)?;
        image::load_from_memory(&entry.data).ok()
    }

    pub fn remove(&self, url: &Url) {
        if let Some(disk) = &self.disk {
            disk.remove(url);
        }
        self.memory.lock().unwrap().remove(url);
    }
}

impl Default for ImageUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte-bounded store with least-recently-used eviction.
#[derive(Debug)]
struct MemoryCache {
    capacity: u64,
    total: u64,
    entries: HashMap<Url, CacheEntry>,
    // Least recently used at the front.
    order: VecDeque<Url>,
}

impl MemoryCache {
    fn new(capacity: u64) -> Self {
        Self {
            capacity,
            total: 0,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&mut self, url: &Url) -> Option<CacheEntry> {
        let entry = self.entries.get(url)?.clone();
        self.touch(url);
        Some(entry)
    }

    fn insert(&mut self, url: Url, entry: CacheEntry) {
        let size = entry.data.len() as u64;
        if size > self.capacity {
            return;
        }

        if let Some(previous) = self.entries.insert(url.clone(), entry) {
            self.total -= previous.data.len() as u64;
            self.touch(&url);
        } else {
            self.order.push_back(url);
        }
        self.total += size;

        while self.total > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if let Some(removed) = self.entries.remove(&oldest) {
                self.total -= removed.data.len() as u64;
            }
        }
    }

    fn remove(&mut self, url: &Url) {
        if let Some(removed) = self.entries.remove(url) {
            self.total -= removed.data.len() as u64;
        }
        if let Some(position) = self.order.iter().position(|key| key == url) {
            self.order.remove(position);
        }
    }

    fn touch(&mut self, url: &Url) {
        if let Some(position) = self.order.iter().position(|key| key == url) {
            if let Some(key) = self.order.remove(position) {
                self.order.push_back(key);
            }
        }
    }
}

/// Best-effort persistent layer: one encoded file per URL, evicted
/// oldest-first once the directory exceeds its capacity. IO failures are
/// logged and otherwise ignored.
#[derive(Debug)]
struct DiskCache {
    dir: PathBuf,
    capacity: u64,
}

impl DiskCache {
    fn entry_path(&self, url: &Url) -> PathBuf {
        let digest = Sha256::digest(url.as_str().as_bytes());
        self.dir.join(hex::encode(digest))
    }

    fn get(&self, url: &Url) -> Option<CacheEntry> {
        let raw = fs::read(self.entry_path(url)).ok()?;
        postcard::from_bytes(&raw).ok()
    }

    fn insert(&self, url: &Url, entry: &CacheEntry) {
        if let Err(error) = fs::create_dir_all(&self.dir) {
            tracing::debug!(%error, "failed to create cache directory");
            return;
        }

        let Ok(raw) = postcard::to_allocvec(entry) else {
            return;
        };
        if raw.len() as u64 > self.capacity {
            return;
        }

        if let Err(error) = fs::write(self.entry_path(url), &raw) {
            tracing::debug!(%error, url = %url, "failed to persist cache entry");
            return;
        }

        self.enforce_capacity();
    }

    fn remove(&self, url: &Url) {
        let _ = fs::remove_file(self.entry_path(url));
    }

    fn enforce_capacity(&self) {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return;
        };

        let mut files: Vec<_> = entries
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let metadata = entry.metadata().ok()?;
                metadata.is_file().then(|| {
                    (
                        metadata.modified().unwrap_or(UNIX_EPOCH),
                        entry.path(),
                        metadata.len(),
                    )
                })
            })
            .collect();

        let mut total: u64 = files.iter().map(|(_, _, len)| len).sum();
        if total <= self.capacity {
            return;
        }

        files.sort_by_key(|(modified, _, _)| *modified);
        for (_, path, len) in files {
            if total <= self.capacity {
                break;
            }
            if fs::remove_file(&path).is_ok() {
                total -= len;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://images.unsplash.com/{path}")).unwrap()
    }

    fn entry(size: usize) -> CacheEntry {
        CacheEntry::new(200, None, Bytes::from(vec![0u8; size]))
    }

    fn png_bytes() -> Bytes {
        let image = DynamicImage::new_rgb8(2, 2);
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        Bytes::from(buffer.into_inner())
    }

    #[test]
    fn insert_then_get_round_trips() {
        let cache = ImageUrlCache::new();
        cache.insert(&url("a"), entry(16));

        let found = cache.get(&url("a")).unwrap();
        assert_eq!(found.status, 200);
        assert_eq!(found.data.len(), 16);
        assert!(cache.get(&url("b")).is_none());
    }

    #[test]
    fn cached_image_bytes_decode() {
        let cache = ImageUrlCache::new();
        cache.insert(&url("photo.png"), CacheEntry::new(200, None, png_bytes()));

        let image = cache.image(&url("photo.png")).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
    }

    #[test]
    fn least_recently_used_entry_is_evicted_first() {
        let cache = ImageUrlCache::with_capacity(100);
        cache.insert(&url("a"), entry(40));
        cache.insert(&url("b"), entry(40));

        // Touch "a" so "b" becomes the eviction candidate.
        cache.get(&url("a"));
        cache.insert(&url("c"), entry(40));

        assert!(cache.get(&url("a")).is_some());
        assert!(cache.get(&url("b")).is_none());
        assert!(cache.get(&url("c")).is_some());
    }

    #[test]
    fn oversized_bodies_are_never_retained() {
        let cache = ImageUrlCache::with_capacity(10);
        cache.insert(&url("a"), entry(11));
        assert!(cache.get(&url("a")).is_none());
    }

    #[test]
    fn replacing_an_entry_updates_the_accounted_size() {
        let cache = ImageUrlCache::with_capacity(100);
        cache.insert(&url("a"), entry(90));
        cache.insert(&url("a"), entry(10));
        cache.insert(&url("b"), entry(80));

        assert!(cache.get(&url("a")).is_some());
        assert!(cache.get(&url("b")).is_some());
    }

    #[test]
    fn disk_layer_survives_a_fresh_memory_cache() {
        let dir = tempfile::tempdir().unwrap();

        let cache = ImageUrlCache::with_capacity(1024)
            .with_disk(dir.path().to_path_buf(), 1024 * 1024);
        cache.insert(&url("persisted"), CacheEntry::new(200, None, png_bytes()));

        // A new cache over the same directory models a process restart.
        let reopened = ImageUrlCache::with_capacity(1024)
            .with_disk(dir.path().to_path_buf(), 1024 * 1024);
        let found = reopened.get(&url("persisted")).unwrap();
        assert_eq!(found.status, 200);
        assert!(reopened.image(&url("persisted")).is_some());
    }

    #[test]
    fn removed_entries_disappear_from_both_layers() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImageUrlCache::with_capacity(1024)
            .with_disk(dir.path().to_path_buf(), 1024 * 1024);

        cache.insert(&url("a"), entry(16));
        cache.remove(&url("a"));

        assert!(cache.get(&url("a")).is_none());
        let reopened = ImageUrlCache::with_capacity(1024)
            .with_disk(dir.path().to_path_buf(), 1024 * 1024);
        assert!(reopened.get(&url("a")).is_none());
    }
}
