use serde::{Deserialize, Serialize};

use crate::models::photo::Photo;

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total: u64,
    pub total_pages: u64,
    pub results: Vec<Photo>,
}
