//! Browser configuration.

use serde::{Deserialize, Serialize};

const fn default_page_size() -> u64 {
    20
}

const fn default_max_page_size() -> u64 {
    1000
}

const fn default_count_rows() -> bool {
    true
}

/// Paging limits and behavior of a [`crate::TableBrowser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Page size used when a request does not give one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound for requested page sizes.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// Run a filtered count for each page. When off, totals are unknown.
    #[serde(default = "default_count_rows")]
    pub count_rows: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            count_rows: default_count_rows(),
        }
    }
}

impl BrowserConfig {
    /// Sets the default page size.
    #[must_use]
    pub const fn with_default_page_size(mut self, size: u64) -> Self {
        self.default_page_size = size;
        self
    }

    /// Sets the maximum page size.
    #[must_use]
    pub const fn with_max_page_size(mut self, size: u64) -> Self {
        self.max_page_size = size;
        self
    }

    /// Enables or disables per-page counts.
    #[must_use]
    pub const fn with_count_rows(mut self, count_rows: bool) -> Self {
        self.count_rows = count_rows;
        self
    }
}
