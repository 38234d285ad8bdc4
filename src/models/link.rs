//! Link model matching the frontend LinkItem interface.

use serde::{Deserialize, Serialize};

use super::{PreviewData, ThemeStyles};

/// What a saved entry represents. Only `Link` is created by the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    #[default]
    Link,
    Stack,
    Vault,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Link => "link",
            LinkKind::Stack => "stack",
            LinkKind::Vault => "vault",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "link" => Some(LinkKind::Link),
            "stack" => Some(LinkKind::Stack),
            "vault" => Some(LinkKind::Vault),
            _ => None,
        }
    }
}

/// A saved bookmark.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub theme: ThemeStyles,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_trash: bool,
    #[serde(default)]
    pub is_private: bool,
    pub created_at: String,
    pub updated_at: String,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

/// Request body for saving a new link.
///
/// When `preview` is absent the server performs the metadata lookup itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub url: String,
    #[serde(default)]
    pub preview: Option<PreviewData>,
    #[serde(default)]
    pub is_private: Option<bool>,
}

/// Request body for partially updating a link.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
    #[serde(default)]
    pub is_archived: Option<bool>,
    #[serde(default)]
    pub is_trash: Option<bool>,
    #[serde(default)]
    pub is_private: Option<bool>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

impl UpdateLinkRequest {
    /// An update that only moves the link in or out of the trash.
    pub fn trash(is_trash: bool) -> Self {
        Self {
            is_trash: Some(is_trash),
            ..Self::default()
        }
    }
}

/// Usage count of a tag across a user's visible links.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}
