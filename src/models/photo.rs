use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::models::keyed::{UrlKey, UrlMap};
use crate::models::user::User;
use crate::request::prepend_query_pairs;

/// Named rendition of a photo, each with its own URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhotoUrlKind {
    Raw,
    Full,
    Regular,
    Small,
    Thumb,
}

impl UrlKey for PhotoUrlKind {
    fn as_key(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Full => "full",
            Self::Regular => "regular",
            Self::Small => "small",
            Self::Thumb => "thumb",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "raw" => Some(Self::Raw),
            "full" => Some(Self::Full),
            "regular" => Some(Self::Regular),
            "small" => Some(Self::Small),
            "thumb" => Some(Self::Thumb),
            _ => None,
        }
    }
}

/// Hyperlink role attached to a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhotoLinkKind {
    SelfLink,
    Html,
    Download,
    DownloadLocation,
}

impl UrlKey for PhotoLinkKind {
    fn as_key(&self) -> &'static str {
        match self {
            Self::SelfLink => "self",
            Self::Html => "html",
            Self::Download => "download",
            Self::DownloadLocation => "download_location",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "self" => Some(Self::SelfLink),
            "html" => Some(Self::Html),
            "download" => Some(Self::Download),
            "download_location" => Some(Self::DownloadLocation),
            _ => None,
        }
    }
}

/// 32-bit color decoded from the API's hex string.
///
/// Accepts 3, 6 or 8 hex digits with an optional `#` prefix; 8-digit input
/// is read as AARRGGBB and anything else decodes to transparent black.
/// Encodes as RRGGBBAA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgba {
    pub fn from_hex(hex: &str) -> Self {
        let stripped = hex.strip_prefix('#').unwrap_or(hex);
        let digits: Vec<char> = stripped.chars().collect();

        let expanded: Vec<char> = match digits.len() {
            3 => {
                let mut full = vec!['F', 'F'];
                for digit in digits {
                    full.push(digit);
                    full.push(digit);
                }
                full
            }
            6 => {
                let mut full = vec!['F', 'F'];
                full.extend(digits);
                full
            }
            8 => digits,
            _ => {
                return Self {
                    alpha: 0,
                    red: 0,
                    green: 0,
                    blue: 0,
                };
            }
        };

        let component = |index: usize| {
            let pair: String = expanded[index..index + 2].iter().collect();
            u8::from_str_radix(&pair, 16).unwrap_or(0)
        };

        Self {
            alpha: component(0),
            red: component(2),
            green: component(4),
            blue: component(6),
        }
    }

    pub fn to_hex(&self) -> String {
        format!(
            "{:02X}{:02X}{:02X}{:02X}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Ok(Self::from_hex(&hex))
    }
}

/// Requested pixel bounds for a variant URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Camera metadata attached to some photos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoExif {
    pub aperture: Option<String>,
    pub exposure_time: String,
    pub focal_length: Option<String>,
    pub iso: Option<u32>,
    pub make: String,
    pub model: String,
}

/// A photo record as decoded from the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    #[serde(rename = "id")]
    identifier: String,
    height: u32,
    width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Rgba>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exif: Option<PhotoExif>,
    user: User,
    urls: UrlMap<PhotoUrlKind>,
    links: UrlMap<PhotoLinkKind>,
    #[serde(rename = "likes")]
    likes_count: u64,
    #[serde(
        rename = "downloads",
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    downloads_count: Option<u64>,
    #[serde(
        rename = "views",
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    views_count: Option<u64>,
}

impl Photo {
    pub fn id(&self) -> &str {
        &self.identifier
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn color(&self) -> Option<Rgba> {
        self.color
    }

    pub fn exif(&self) -> Option<&PhotoExif> {
        self.exif.as_ref()
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn urls(&self) -> &UrlMap<PhotoUrlKind> {
        &self.urls
    }

    pub fn links(&self) -> &UrlMap<PhotoLinkKind> {
        &self.links
    }

    pub fn likes_count(&self) -> u64 {
        self.likes_count
    }

    pub fn downloads_count(&self) -> Option<u64> {
        self.downloads_count
    }

    pub fn views_count(&self) -> Option<u64> {
        self.views_count
    }

    /// Resolves the URL of a variant, bounding it to `size` when given.
    ///
    /// The `max-w`/`max-h` items go ahead of any query the variant URL
    /// already carries.
    pub fn url(&self, kind: PhotoUrlKind, size: Option<Size>) -> Option<Url> {
        let mut url = self.urls.get(kind)?.clone();

        if let Some(size) = size {
            let width = size.width.to_string();
            let height = size.height.to_string();
            prepend_query_pairs(
                &mut url,
                &[("max-w", width.as_str()), ("max-h", height.as_str())],
            );
        }

        Some(url)
    }
}

/// `try?`-style count decoding: a missing or mistyped value becomes `None`
/// instead of failing the whole record.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64())
}
