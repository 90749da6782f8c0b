use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::keyed::{UrlKey, UrlMap, lenient_url_map};

/// Profile image rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileImageSize {
    Small,
    Medium,
    Large,
}

impl UrlKey for ProfileImageSize {
    fn as_key(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Hyperlink role attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserLinkKind {
    SelfLink,
    Html,
    Photos,
    Likes,
    Portfolio,
}

impl UrlKey for UserLinkKind {
    fn as_key(&self) -> &'static str {
        match self {
            Self::SelfLink => "self",
            Self::Html => "html",
            Self::Photos => "photos",
            Self::Likes => "likes",
            Self::Portfolio => "portfolio",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "self" => Some(Self::SelfLink),
            "html" => Some(Self::Html),
            "photos" => Some(Self::Photos),
            "likes" => Some(Self::Likes),
            "portfolio" => Some(Self::Portfolio),
            _ => None,
        }
    }
}

/// A user record as decoded from the API.
///
/// Two users are the same entity when their identifiers match, regardless
/// of every other field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "id")]
    identifier: String,
    username: String,
    first_name: Option<String>,
    last_name: Option<String>,
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_url_map")]
    profile_image: UrlMap<ProfileImageSize>,
    bio: Option<String>,
    links: UrlMap<UserLinkKind>,
    location: Option<String>,
    portfolio_url: Option<Url>,
    total_collections: u64,
    total_likes: u64,
    total_photos: u64,
}

impl User {
    pub fn id(&self) -> &str {
        &self.identifier
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn profile_image(&self) -> &UrlMap<ProfileImageSize> {
        &self.profile_image
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn links(&self) -> &UrlMap<UserLinkKind> {
        &self.links
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn portfolio_url(&self) -> Option<&Url> {
        self.portfolio_url.as_ref()
    }

    pub fn total_collections(&self) -> u64 {
        self.total_collections
    }

    pub fn total_likes(&self) -> u64 {
        self.total_likes
    }

    pub fn total_photos(&self) -> u64 {
        self.total_photos
    }

    /// Best display name available: explicit name, then "first last", then
    /// first name alone, then the username.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.username.clone(),
        }
    }

    /// Public profile page derived from the username.
    pub fn profile_url(&self) -> Option<Url> {
        Url::parse(&format!("https://unsplash.com/@{}", self.username)).ok()
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for User {}
