use std::collections::HashMap;

use reqwest::Method;
use url::Url;

use crate::models::{Photo, PhotoLinkKind};

/// One logical API operation: path, method and the three parameter
/// channels (headers, explicit query items, GET params).
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub path: String,
    pub method: Method,
    pub headers: Option<HashMap<String, String>>,
    pub query_items: Option<Vec<(String, String)>>,
    pub params: Option<HashMap<String, String>>,
}

impl RequestOptions {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::GET,
            headers: None,
            query_items: None,
            params: None,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn query_items(mut self, query_items: Vec<(String, String)>) -> Self {
        self.query_items = Some(query_items);
        self
    }

    pub fn params(mut self, params: HashMap<String, String>) -> Self {
        self.params = Some(params);
        self
    }
}

/// Resolves the absolute URL for an operation.
///
/// Explicit query items are attached verbatim and in order; `params` are
/// appended after them, and only for GET. The two sets are concatenated,
/// never merged by key, so duplicates are legal and all appear.
pub(crate) fn build_url(base: &Url, options: &RequestOptions) -> Url {
    let mut url = base.clone();
    url.set_path(&options.path);

    if let Some(items) = &options.query_items {
        if !items.is_empty() {
            url.query_pairs_mut().extend_pairs(items);
        }
    }

    if options.method == Method::GET {
        if let Some(params) = &options.params {
            if !params.is_empty() {
                url.query_pairs_mut().extend_pairs(params);
            }
        }
    }

    url
}

/// Inserts query pairs ahead of whatever query the URL already carries.
pub(crate) fn prepend_query_pairs(url: &mut Url, pairs: &[(&str, &str)]) {
    let existing: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut serializer = url.query_pairs_mut();
    serializer.clear();
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    for (key, value) in &existing {
        serializer.append_pair(key, value);
    }
}

/// Target of the download-tracking beacon: the photo's download-location
/// link with `client_id` inserted ahead of any existing query items.
pub(crate) fn build_download_location_url(photo: &Photo, access_key: &str) -> Option<Url> {
    let mut url = photo.links().get(PhotoLinkKind::DownloadLocation)?.clone();
    prepend_query_pairs(&mut url, &[("client_id", access_key)]);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.unsplash.com/").unwrap()
    }

    #[test]
    fn resolves_path_against_the_base() {
        let url = build_url(&base(), &RequestOptions::new("/photos/random"));

        assert_eq!(url.host_str(), Some("api.unsplash.com"));
        assert_eq!(url.path(), "/photos/random");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn query_items_come_before_params() {
        let options = RequestOptions::new("/search/photos")
            .query_items(vec![("test".to_owned(), "value".to_owned())])
            .params(HashMap::from([("page".to_owned(), "1".to_owned())]));

        let url = build_url(&base(), &options);

        assert_eq!(url.query(), Some("test=value&page=1"));
    }

    #[test]
    fn duplicate_keys_all_appear() {
        let options = RequestOptions::new("/test")
            .query_items(vec![("page".to_owned(), "1".to_owned())])
            .params(HashMap::from([("page".to_owned(), "2".to_owned())]));

        let url = build_url(&base(), &options);

        assert_eq!(url.query(), Some("page=1&page=2"));
    }

    #[test]
    fn params_are_dropped_for_non_get_methods() {
        let options = RequestOptions::new("/test")
            .method(Method::POST)
            .query_items(vec![("test".to_owned(), "value".to_owned())])
            .params(HashMap::from([("param".to_owned(), "x".to_owned())]));

        let url = build_url(&base(), &options);

        assert_eq!(url.query(), Some("test=value"));
    }

    #[test]
    fn prepend_puts_new_pairs_first() {
        let mut url = Url::parse("https://example.com/path?w=200").unwrap();
        prepend_query_pairs(&mut url, &[("client_id", "key")]);

        assert_eq!(url.query(), Some("client_id=key&w=200"));
    }

    #[test]
    fn prepend_on_a_bare_url_sets_the_query() {
        let mut url = Url::parse("https://example.com/path").unwrap();
        prepend_query_pairs(&mut url, &[("client_id", "key")]);

        assert_eq!(url.query(), Some("client_id=key"));
    }

    #[test]
    fn download_location_url_carries_exactly_the_client_id() {
        let photo: Photo =
            serde_json::from_str(include_str!("../tests/fixtures/photo.json")).unwrap();

        let url = build_download_location_url(&photo, "test-access-key").unwrap();

        assert_eq!(url.query(), Some("client_id=test-access-key"));
        assert_eq!(url.path(), "/photos/Dwu85P9SOIk/download");
        assert_eq!(
            url.path(),
            photo
                .links()
                .get(PhotoLinkKind::DownloadLocation)
                .unwrap()
                .path()
        );
    }

    #[test]
    fn download_location_url_is_none_without_the_link() {
        let photo: Photo = serde_json::from_str(
            &include_str!("../tests/fixtures/photo.json")
                .replace("\"download_location\"", "\"download_elsewhere\""),
        )
        .unwrap();

        assert!(build_download_location_url(&photo, "key").is_none());
    }
}
