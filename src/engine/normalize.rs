//! Builds a stable preview from a metadata lookup outcome.

use url::Url;

use super::{classify, resolve_theme};
use crate::metadata::{LookupFailure, RemoteMetadata};
use crate::models::PreviewData;

/// Domain used when the URL has no parsable host.
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// Combine a lookup outcome with the classifier and theme resolver.
///
/// Never fails: any lookup or parsing problem degrades to a domain-only
/// preview.
pub fn normalize(url: &str, outcome: Result<RemoteMetadata, LookupFailure>) -> PreviewData {
    let remote = match outcome {
        Ok(remote) => remote,
        Err(failure) => {
            tracing::debug!("Metadata lookup failed for {}: {}", url, failure);
            return fallback_preview(url);
        }
    };

    let publisher = remote.publisher.filter(|p| !p.is_empty());
    let Some(domain) = publisher.or_else(|| host_of(url).map(|h| strip_www(&h).to_string()))
    else {
        return fallback_preview(url);
    };

    PreviewData {
        title: remote
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| domain.clone()),
        description: remote.description,
        image: remote.image,
        icon: remote.logo,
        tags: classify(url),
        theme: resolve_theme(&domain),
        domain,
    }
}

/// Preview for a failed lookup: the raw host (or "unknown") and nothing else.
fn fallback_preview(url: &str) -> PreviewData {
    let domain = host_of(url).unwrap_or_else(|| UNKNOWN_DOMAIN.to_string());

    PreviewData {
        title: domain.clone(),
        description: None,
        image: None,
        icon: None,
        tags: classify(url),
        theme: resolve_theme(&domain),
        domain,
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThemeFamily;

    fn remote(title: Option<&str>, publisher: Option<&str>) -> RemoteMetadata {
        RemoteMetadata {
            title: title.map(str::to_string),
            description: Some("A description".to_string()),
            image: Some("https://cdn.example.com/og.png".to_string()),
            logo: Some("https://cdn.example.com/logo.png".to_string()),
            publisher: publisher.map(str::to_string),
        }
    }

    #[test]
    fn test_success_uses_publisher_as_domain() {
        let preview = normalize(
            "https://www.youtube.com/watch?v=1",
            Ok(remote(Some("A video"), Some("YouTube"))),
        );
        assert_eq!(preview.domain, "YouTube");
        assert_eq!(preview.title, "A video");
        assert_eq!(preview.tags, vec!["Video"]);
        assert_eq!(preview.theme.family, ThemeFamily::Red);
        assert_eq!(preview.icon.as_deref(), Some("https://cdn.example.com/logo.png"));
    }

    #[test]
    fn test_success_strips_leading_www() {
        let preview = normalize("https://www.amazon.com/dp/1", Ok(remote(None, None)));
        assert_eq!(preview.domain, "amazon.com");
        assert_eq!(preview.title, "amazon.com");
        assert_eq!(preview.theme.family, ThemeFamily::Orange);
        assert_eq!(preview.description.as_deref(), Some("A description"));
    }

    #[test]
    fn test_success_empty_title_falls_back_to_domain() {
        let preview = normalize("https://example.com", Ok(remote(Some(""), Some(""))));
        assert_eq!(preview.domain, "example.com");
        assert_eq!(preview.title, "example.com");
    }

    #[test]
    fn test_failure_keeps_raw_host() {
        let preview = normalize(
            "https://www.github.com/rust-lang",
            Err(LookupFailure::Unsuccessful("fail".to_string())),
        );
        assert_eq!(preview.domain, "www.github.com");
        assert_eq!(preview.title, "www.github.com");
        assert!(preview.description.is_none());
        assert!(preview.image.is_none());
        assert!(preview.icon.is_none());
        assert_eq!(preview.theme.family, ThemeFamily::Slate);
    }

    #[test]
    fn test_unparsable_url_is_unknown() {
        let preview = normalize(
            "not a url",
            Err(LookupFailure::InvalidUrl("relative URL without a base".to_string())),
        );
        assert_eq!(preview.domain, UNKNOWN_DOMAIN);
        assert_eq!(preview.title, UNKNOWN_DOMAIN);
        assert_eq!(preview.tags, vec!["Web"]);
        assert_eq!(preview.theme.family, ThemeFamily::Blue);
    }

    #[test]
    fn test_success_without_host_or_publisher_degrades() {
        let preview = normalize("spotify-playlist", Ok(remote(Some("Mix"), None)));
        assert_eq!(preview.domain, UNKNOWN_DOMAIN);
        assert_eq!(preview.title, UNKNOWN_DOMAIN);
        assert!(preview.image.is_none());
        assert_eq!(preview.tags, vec!["Music"]);
    }

    #[test]
    fn test_tags_independent_of_lookup_outcome() {
        for url in [
            "https://github.com/x",
            "https://open.spotify.com/track/1",
            "https://medium.com/@a/b",
            "ftp://ebay.example",
            "garbage",
        ] {
            let failed = normalize(url, Err(LookupFailure::Transport("down".to_string())));
            assert_eq!(failed.tags, classify(url), "url: {}", url);
            let succeeded = normalize(url, Ok(remote(Some("t"), Some("p"))));
            assert_eq!(succeeded.tags, classify(url), "url: {}", url);
        }
    }
}
