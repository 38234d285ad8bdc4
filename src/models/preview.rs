//! Preview and theme models.

use serde::{Deserialize, Deserializer, Serialize};

/// Colour family a domain resolves to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeFamily {
    Red,
    Green,
    Slate,
    Orange,
    #[default]
    Blue,
}

impl ThemeFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeFamily::Red => "red",
            ThemeFamily::Green => "green",
            ThemeFamily::Slate => "slate",
            ThemeFamily::Orange => "orange",
            ThemeFamily::Blue => "blue",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "red" => Some(ThemeFamily::Red),
            "green" => Some(ThemeFamily::Green),
            "slate" => Some(ThemeFamily::Slate),
            "orange" => Some(ThemeFamily::Orange),
            "blue" => Some(ThemeFamily::Blue),
            _ => None,
        }
    }

    /// The fixed style bundle for this family.
    pub fn styles(self) -> ThemeStyles {
        match self {
            ThemeFamily::Red => ThemeStyles {
                family: self,
                background: "bg-red-50 dark:bg-red-950/40",
                text: "text-red-900 dark:text-red-100",
                description: "text-red-700/80 dark:text-red-200/70",
                border: "border-red-200 dark:border-red-900/50",
                accent: "text-red-600 dark:text-red-400",
                icon_bg: "bg-red-500",
            },
            ThemeFamily::Green => ThemeStyles {
                family: self,
                background: "bg-green-50 dark:bg-green-950/40",
                text: "text-green-900 dark:text-green-100",
                description: "text-green-700/80 dark:text-green-200/70",
                border: "border-green-200 dark:border-green-900/50",
                accent: "text-green-600 dark:text-green-400",
                icon_bg: "bg-green-500",
            },
            ThemeFamily::Slate => ThemeStyles {
                family: self,
                background: "bg-slate-100 dark:bg-slate-900/60",
                text: "text-slate-900 dark:text-slate-100",
                description: "text-slate-600 dark:text-slate-400",
                border: "border-slate-200 dark:border-slate-800",
                accent: "text-slate-700 dark:text-slate-300",
                icon_bg: "bg-slate-800",
            },
            ThemeFamily::Orange => ThemeStyles {
                family: self,
                background: "bg-orange-50 dark:bg-orange-950/40",
                text: "text-orange-900 dark:text-orange-100",
                description: "text-orange-700/80 dark:text-orange-200/70",
                border: "border-orange-200 dark:border-orange-900/50",
                accent: "text-orange-600 dark:text-orange-400",
                icon_bg: "bg-orange-500",
            },
            ThemeFamily::Blue => ThemeStyles {
                family: self,
                background: "bg-blue-50 dark:bg-blue-950/40",
                text: "text-blue-900 dark:text-blue-100",
                description: "text-blue-700/80 dark:text-blue-200/70",
                border: "border-blue-200 dark:border-blue-900/50",
                accent: "text-blue-600 dark:text-blue-400",
                icon_bg: "bg-blue-500",
            },
        }
    }
}

/// Style tokens attached to a link by domain lookup.
///
/// Only the family survives deserialization; the tokens are always taken
/// from the constant table.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeStyles {
    pub family: ThemeFamily,
    pub background: &'static str,
    pub text: &'static str,
    pub description: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
    pub icon_bg: &'static str,
}

impl Default for ThemeStyles {
    fn default() -> Self {
        ThemeFamily::default().styles()
    }
}

#[derive(Deserialize)]
struct ThemeKey {
    #[serde(default)]
    family: ThemeFamily,
}

impl<'de> Deserialize<'de> for ThemeStyles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ThemeKey::deserialize(deserializer).map(|key| key.family.styles())
    }
}

/// Unsaved preview of a link, built before the user confirms the save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    pub domain: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub theme: ThemeStyles,
}

/// Request body for a preview lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    pub url: String,
}
