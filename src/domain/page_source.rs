//! Page source seam
//!
//! The application layer only needs "give me the rendered HTML of page X".
//! [`PageSource`] is implemented by the Confluence REST client and by test
//! doubles that serve canned markup.

use async_trait::async_trait;

use crate::infrastructure::http_client::FetchError;

/// Source of rendered wiki page markup
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the rendered HTML body of `page_id`
    async fn fetch_page(&self, page_id: &str) -> Result<String, FetchError>;
}
