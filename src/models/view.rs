//! View specification parsed from list query parameters.

use serde::{Deserialize, Serialize};

/// Tag value that selects the private vault view.
pub const PRIVATE_TAG: &str = "private";

/// Sidebar category a list request is scoped to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewFilter {
    #[default]
    All,
    Favorites,
    Archive,
    Trash,
    /// Any other sidebar entry (notes, reminders, ...). Accepts everything
    /// that survives the earlier checks.
    #[serde(other)]
    Other,
}

/// Parameters of one rendering of the link grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSpec {
    pub filter: ViewFilter,
    pub tag: Option<String>,
    pub search_query: String,
    pub vault_unlocked: bool,
}

impl ViewFilter {
    /// Parse a `filter` query value. An empty value is the default view.
    pub fn parse(s: &str) -> Self {
        match s {
            "" | "all" => ViewFilter::All,
            "favorites" => ViewFilter::Favorites,
            "archive" => ViewFilter::Archive,
            "trash" => ViewFilter::Trash,
            _ => ViewFilter::Other,
        }
    }
}

impl ViewSpec {
    /// Whether this view targets the private vault.
    pub fn is_vault_view(&self) -> bool {
        self.tag.as_deref() == Some(PRIVATE_TAG)
    }
}

/// Query string accepted by `GET /api/links`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

impl ViewQuery {
    /// Build the view spec; vault state comes from the server, never the client.
    pub fn into_spec(self, vault_unlocked: bool) -> ViewSpec {
        ViewSpec {
            filter: self
                .filter
                .as_deref()
                .map(ViewFilter::parse)
                .unwrap_or_default(),
            tag: self.tag.filter(|t| !t.is_empty()),
            search_query: self.q.unwrap_or_default(),
            vault_unlocked,
        }
    }
}
