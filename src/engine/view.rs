//! Visible-subset computation for the link grid.

use std::collections::HashMap;

use crate::models::{LinkItem, TagCount, ViewFilter, ViewSpec};

/// Compute the links visible under `spec`, preserving input order.
pub fn compute_visible(items: &[LinkItem], spec: &ViewSpec) -> Vec<LinkItem> {
    let query = spec.search_query.to_lowercase();

    items
        .iter()
        .filter(|item| is_visible(item, spec, &query))
        .cloned()
        .collect()
}

/// The per-item filter chain. Each stage may decide the outcome outright, so
/// the order of the stages is significant: a trashed private item shows up in
/// the trash view because the trash stage runs before the vault stage.
fn is_visible(item: &LinkItem, spec: &ViewSpec, query: &str) -> bool {
    if !query.is_empty() && !item.title.to_lowercase().contains(query) {
        return false;
    }

    if spec.filter == ViewFilter::Trash {
        return item.is_trash;
    }
    if item.is_trash {
        return false;
    }

    if spec.is_vault_view() {
        return spec.vault_unlocked && item.is_private;
    }
    if item.is_private {
        return false;
    }

    if let Some(tag) = spec.tag.as_deref() {
        let tag = tag.to_lowercase();
        return item.tags.iter().any(|t| t.to_lowercase() == tag);
    }

    match spec.filter {
        ViewFilter::Favorites => item.is_favorite,
        ViewFilter::Archive => item.is_archived,
        ViewFilter::All => !item.is_archived,
        ViewFilter::Trash | ViewFilter::Other => true,
    }
}

/// Count tag usage over links that appear outside the trash and the vault.
///
/// Tags are grouped case-insensitively, like the tag filter, and reported
/// under the first spelling seen. Sorted by count, most used first, then by
/// name.
pub fn tag_counts(items: &[LinkItem]) -> Vec<TagCount> {
    let mut counts: HashMap<String, TagCount> = HashMap::new();
    for item in items.iter().filter(|i| !i.is_trash && !i.is_private) {
        for tag in &item.tags {
            counts
                .entry(tag.to_lowercase())
                .or_insert_with(|| TagCount {
                    name: tag.clone(),
                    count: 0,
                })
                .count += 1;
        }
    }

    let mut counts: Vec<TagCount> = counts.into_values().collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinkKind, ThemeStyles, PRIVATE_TAG};

    fn link(id: &str) -> LinkItem {
        LinkItem {
            id: id.to_string(),
            kind: LinkKind::Link,
            title: format!("Link {}", id),
            url: Some(format!("https://example.com/{}", id)),
            domain: Some("example.com".to_string()),
            image: None,
            icon: None,
            tags: vec!["Web".to_string()],
            description: None,
            theme: ThemeStyles::default(),
            is_favorite: false,
            is_archived: false,
            is_trash: false,
            is_private: false,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
            version: 1,
        }
    }

    fn spec(filter: ViewFilter) -> ViewSpec {
        ViewSpec {
            filter,
            ..ViewSpec::default()
        }
    }

    fn ids(items: &[LinkItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    /// Every combination of the four status flags.
    fn flag_matrix() -> Vec<LinkItem> {
        (0..16u8)
            .map(|bits| {
                let mut item = link(&bits.to_string());
                item.is_favorite = bits & 1 != 0;
                item.is_archived = bits & 2 != 0;
                item.is_trash = bits & 4 != 0;
                item.is_private = bits & 8 != 0;
                item
            })
            .collect()
    }

    const ALL_FILTERS: [ViewFilter; 5] = [
        ViewFilter::All,
        ViewFilter::Favorites,
        ViewFilter::Archive,
        ViewFilter::Trash,
        ViewFilter::Other,
    ];

    #[test]
    fn test_archived_hidden_from_all() {
        let mut archived = link("1");
        archived.is_archived = true;
        let mut favorite = link("2");
        favorite.is_favorite = true;

        let visible = compute_visible(&[archived, favorite], &spec(ViewFilter::All));
        assert_eq!(ids(&visible), vec!["2"]);
    }

    #[test]
    fn test_trash_view_is_exactly_trashed_items() {
        let items = flag_matrix();
        let expected: Vec<&str> = items
            .iter()
            .filter(|i| i.is_trash)
            .map(|i| i.id.as_str())
            .collect();

        for tag in [None, Some("web".to_string()), Some(PRIVATE_TAG.to_string())] {
            for vault_unlocked in [false, true] {
                let view = ViewSpec {
                    filter: ViewFilter::Trash,
                    tag: tag.clone(),
                    search_query: String::new(),
                    vault_unlocked,
                };
                assert_eq!(ids(&compute_visible(&items, &view)), expected);
            }
        }
    }

    #[test]
    fn test_private_excluded_outside_vault() {
        let mut item = link("p");
        item.is_private = true;
        item.is_favorite = true;
        item.is_archived = true;

        for filter in ALL_FILTERS {
            for tag in [None, Some("web".to_string())] {
                let view = ViewSpec {
                    filter,
                    tag,
                    search_query: String::new(),
                    vault_unlocked: true,
                };
                assert!(compute_visible(std::slice::from_ref(&item), &view).is_empty());
            }
        }
    }

    #[test]
    fn test_private_tag_requires_unlocked_vault() {
        let mut item = link("p");
        item.is_private = true;
        let public = link("q");
        let items = vec![item, public];

        let mut view = ViewSpec {
            filter: ViewFilter::All,
            tag: Some(PRIVATE_TAG.to_string()),
            search_query: String::new(),
            vault_unlocked: false,
        };
        assert!(compute_visible(&items, &view).is_empty());

        view.vault_unlocked = true;
        assert_eq!(ids(&compute_visible(&items, &view)), vec!["p"]);
    }

    #[test]
    fn test_trashed_private_item_shows_in_trash() {
        // The trash stage short-circuits before the vault stage.
        let mut item = link("tp");
        item.is_trash = true;
        item.is_private = true;

        let visible = compute_visible(&[item], &spec(ViewFilter::Trash));
        assert_eq!(ids(&visible), vec!["tp"]);
    }

    #[test]
    fn test_tag_filter_is_case_insensitive_and_skips_category() {
        let mut video = link("v");
        video.tags = vec!["Video".to_string()];
        video.is_archived = true;
        let web = link("w");

        let view = ViewSpec {
            filter: ViewFilter::All,
            tag: Some("video".to_string()),
            ..ViewSpec::default()
        };
        // Archived items still match a tag view.
        assert_eq!(ids(&compute_visible(&[video, web], &view)), vec!["v"]);
    }

    #[test]
    fn test_search_matches_title_case_insensitively() {
        let mut rust = link("r");
        rust.title = "The Rust Book".to_string();
        let other = link("o");

        let view = ViewSpec {
            search_query: "rUsT".to_string(),
            ..ViewSpec::default()
        };
        assert_eq!(ids(&compute_visible(&[rust, other], &view)), vec!["r"]);
    }

    #[test]
    fn test_search_applies_before_trash() {
        let mut trashed = link("t");
        trashed.is_trash = true;
        trashed.title = "Old recipe".to_string();

        let view = ViewSpec {
            filter: ViewFilter::Trash,
            search_query: "nothing".to_string(),
            ..ViewSpec::default()
        };
        assert!(compute_visible(&[trashed], &view).is_empty());
    }

    #[test]
    fn test_category_filters() {
        let items = flag_matrix();
        for item in compute_visible(&items, &spec(ViewFilter::Favorites)) {
            assert!(item.is_favorite && !item.is_trash && !item.is_private);
        }
        for item in compute_visible(&items, &spec(ViewFilter::Archive)) {
            assert!(item.is_archived && !item.is_trash && !item.is_private);
        }
        // Non-trashed, non-private items: every favorite/archived combination.
        assert_eq!(compute_visible(&items, &spec(ViewFilter::Other)).len(), 4);
    }

    #[test]
    fn test_preserves_input_order() {
        let items = vec![link("c"), link("a"), link("b")];
        assert_eq!(
            ids(&compute_visible(&items, &spec(ViewFilter::All))),
            vec!["c", "a", "b"]
        );
    }

    #[test]
    fn test_tag_counts_skip_trash_and_private() {
        let mut code = link("c");
        code.tags = vec!["Code".to_string(), "Music".to_string()];
        let mut code2 = link("c2");
        code2.tags = vec!["Code".to_string()];
        let mut trashed = link("t");
        trashed.tags = vec!["Video".to_string()];
        trashed.is_trash = true;
        let mut private = link("p");
        private.tags = vec!["Code".to_string()];
        private.is_private = true;

        let counts = tag_counts(&[code, code2, trashed, private]);
        assert_eq!(
            counts,
            vec![
                TagCount {
                    name: "Code".to_string(),
                    count: 2
                },
                TagCount {
                    name: "Music".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_tag_counts_group_case_insensitively() {
        let mut upper = link("u");
        upper.tags = vec!["Code".to_string()];
        let mut lower = link("l");
        lower.tags = vec!["code".to_string()];

        assert_eq!(
            tag_counts(&[upper, lower]),
            vec![TagCount {
                name: "Code".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_filtering_twice_is_a_no_op() {
        let items = flag_matrix();
        for filter in ALL_FILTERS {
            for tag in [None, Some("web".to_string()), Some(PRIVATE_TAG.to_string())] {
                for vault_unlocked in [false, true] {
                    let view = ViewSpec {
                        filter,
                        tag: tag.clone(),
                        search_query: "link".to_string(),
                        vault_unlocked,
                    };
                    let once = compute_visible(&items, &view);
                    let twice = compute_visible(&once, &view);
                    assert_eq!(once, twice);
                }
            }
        }
    }
}
