use url::Url;

const API_URL: &str = "https://api.unsplash.com/";

/// Access credentials and endpoint for one API client.
///
/// Constructed once at startup and handed to [`Client::new`]; separate
/// clients can carry separate configurations.
///
/// [`Client::new`]: crate::Client::new
#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    access_key: String,
    secret: String,
    api_url: Url,
}

impl UnsplashConfig {
    /// The Unsplash editorial collection id.
    pub const EDITORIAL_COLLECTION_ID: &str = "317099";

    pub fn new(access_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret: secret.into(),
            api_url: Url::parse(API_URL).unwrap(),
        }
    }

    /// Overrides the API base URL. Intended for tests and proxies.
    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.api_url = api_url;
        self
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub(crate) fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub(crate) fn authorization(&self) -> String {
        format!("Client-ID {}", self.access_key)
    }
}
