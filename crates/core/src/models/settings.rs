use serde::{Deserialize, Serialize};

/// Display name used for the reserved no-category bucket.
pub const DEFAULT_UNCATEGORIZED_LABEL: &str = "Sem categoria";

/// Default page size when listing movements from a source.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// User-configurable settings for metrics computation and movement listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name shown for uncategorized movements and for categories with a blank name.
    pub uncategorized_label: String,

    /// Page size for movement listings. `0` disables pagination.
    pub default_page_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            uncategorized_label: DEFAULT_UNCATEGORIZED_LABEL.to_string(),
            default_page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}
