pub mod keyed;
pub mod photo;
pub mod search;
pub mod user;

pub use keyed::{UrlKey, UrlMap};
pub use photo::{Photo, PhotoExif, PhotoLinkKind, PhotoUrlKind, Rgba, Size};
pub use search::SearchResponse;
pub use user::{ProfileImageSize, User, UserLinkKind};
