//! Database repository for per-user link storage.
//!
//! Every write bumps the global revision so clients can poll for changes.

use chrono::{SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::engine::{classify, resolve_theme};
use crate::errors::AppError;
use crate::models::{
    LinkItem, LinkKind, LinkSnapshot, PreviewData, RevisionInfo, ThemeFamily, UpdateLinkRequest,
};

const LINK_COLUMNS: &str = "id, kind, title, url, domain, image, icon, tags, description, theme, \
     is_favorite, is_archived, is_trash, is_private, created_at, updated_at, version";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(timestamp())
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    /// Every link of a user plus the revision it was read at.
    pub async fn get_snapshot(&self, user_id: &str) -> Result<LinkSnapshot, AppError> {
        let meta =
            sqlx::query("SELECT schema_version, revision_id, generated_at FROM meta WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;

        let links = self.list_links(user_id).await?;

        Ok(LinkSnapshot {
            schema_version: meta.get("schema_version"),
            revision_id: meta.get("revision_id"),
            generated_at: meta.get("generated_at"),
            links,
        })
    }

    /// List a user's links, newest first.
    pub async fn list_links(&self, user_id: &str) -> Result<Vec<LinkItem>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM links WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
            LINK_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(link_from_row).collect())
    }

    /// Get one of the user's links by ID.
    pub async fn get_link(&self, user_id: &str, id: &str) -> Result<Option<LinkItem>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM links WHERE id = ? AND user_id = ?",
            LINK_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(link_from_row))
    }

    /// Save a previewed link with default status flags and a fresh ID.
    pub async fn create_link(
        &self,
        user_id: &str,
        url: &str,
        preview: &PreviewData,
        is_private: bool,
    ) -> Result<LinkItem, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp();
        let theme = resolve_theme(&preview.domain);
        let tags = if preview.tags.is_empty() {
            classify(url)
        } else {
            preview.tags.clone()
        };
        let tags_json = serde_json::to_string(&tags)?;

        sqlx::query(&format!(
            "INSERT INTO links ({}, user_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, 0, ?, ?, ?, 1, ?)",
            LINK_COLUMNS
        ))
        .bind(&id)
        .bind(LinkKind::Link.as_str())
        .bind(&preview.title)
        .bind(url)
        .bind(&preview.domain)
        .bind(&preview.image)
        .bind(&preview.icon)
        .bind(&tags_json)
        .bind(&preview.description)
        .bind(theme.family.as_str())
        .bind(is_private as i32)
        .bind(&now)
        .bind(&now)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(LinkItem {
            id,
            kind: LinkKind::Link,
            title: preview.title.clone(),
            url: Some(url.to_string()),
            domain: Some(preview.domain.clone()),
            image: preview.image.clone(),
            icon: preview.icon.clone(),
            tags,
            description: preview.description.clone(),
            theme,
            is_favorite: false,
            is_archived: false,
            is_trash: false,
            is_private,
            created_at: now.clone(),
            updated_at: now,
            version: 1,
        })
    }

    /// Apply a partial update with optimistic concurrency control.
    pub async fn update_link(
        &self,
        user_id: &str,
        id: &str,
        request: &UpdateLinkRequest,
    ) -> Result<LinkItem, AppError> {
        let existing = self
            .get_link(user_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Link {} not found", id)))?;

        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::Conflict {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected, existing.version
                    ),
                    current_version: existing.version,
                });
            }
        }

        let current_version = existing.version;
        let updated = LinkItem {
            title: request.title.clone().unwrap_or(existing.title),
            // An empty description clears the field
            description: match &request.description {
                Some(d) if d.trim().is_empty() => None,
                Some(d) => Some(d.clone()),
                None => existing.description,
            },
            tags: request.tags.clone().unwrap_or(existing.tags),
            is_favorite: request.is_favorite.unwrap_or(existing.is_favorite),
            is_archived: request.is_archived.unwrap_or(existing.is_archived),
            is_trash: request.is_trash.unwrap_or(existing.is_trash),
            is_private: request.is_private.unwrap_or(existing.is_private),
            updated_at: timestamp(),
            version: current_version + 1,
            ..existing
        };
        let tags_json = serde_json::to_string(&updated.tags)?;

        // Conditional UPDATE so a concurrent writer cannot be overwritten
        let result = sqlx::query(
            "UPDATE links SET title = ?, description = ?, tags = ?, is_favorite = ?, \
             is_archived = ?, is_trash = ?, is_private = ?, updated_at = ?, version = ? \
             WHERE id = ? AND user_id = ? AND version = ?",
        )
        .bind(&updated.title)
        .bind(&updated.description)
        .bind(&tags_json)
        .bind(updated.is_favorite as i32)
        .bind(updated.is_archived as i32)
        .bind(updated.is_trash as i32)
        .bind(updated.is_private as i32)
        .bind(&updated.updated_at)
        .bind(updated.version)
        .bind(id)
        .bind(user_id)
        .bind(current_version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.get_link(user_id, id).await?;
            return Err(AppError::Conflict {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|l| l.version).unwrap_or(0),
            });
        }

        self.increment_revision().await?;
        Ok(updated)
    }

    /// Permanently delete a link.
    pub async fn delete_link(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Link {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    /// Permanently delete every trashed link of a user. Returns how many went.
    pub async fn empty_trash(&self, user_id: &str) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM links WHERE user_id = ? AND is_trash = 1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted > 0 {
            sqlx::query(
                "UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1",
            )
            .bind(timestamp())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(deleted)
    }
}

/// Fixed-width UTC timestamp; sorts the same lexically and chronologically.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn link_from_row(row: &sqlx::sqlite::SqliteRow) -> LinkItem {
    let kind: String = row.get("kind");
    let tags: String = row.get("tags");
    let theme: String = row.get("theme");
    let is_favorite: i32 = row.get("is_favorite");
    let is_archived: i32 = row.get("is_archived");
    let is_trash: i32 = row.get("is_trash");
    let is_private: i32 = row.get("is_private");

    LinkItem {
        id: row.get("id"),
        kind: LinkKind::parse(&kind).unwrap_or_default(),
        title: row.get("title"),
        url: row.get("url"),
        domain: row.get("domain"),
        image: row.get("image"),
        icon: row.get("icon"),
        tags: serde_json::from_str(&tags).unwrap_or_default(),
        description: row.get("description"),
        theme: ThemeFamily::parse(&theme).unwrap_or_default().styles(),
        is_favorite: is_favorite != 0,
        is_archived: is_archived != 0,
        is_trash: is_trash != 0,
        is_private: is_private != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::engine::normalize;
    use crate::metadata::LookupFailure;
    use tempfile::TempDir;

    async fn repo() -> (TempDir, Repository) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .unwrap();
        (temp_dir, Repository::new(pool))
    }

    fn preview(url: &str) -> PreviewData {
        normalize(url, Err(LookupFailure::Transport("offline".to_string())))
    }

    #[tokio::test]
    async fn test_create_and_list_newest_first() {
        let (_dir, repo) = repo().await;

        let first = repo
            .create_link("u1", "https://github.com/a", &preview("https://github.com/a"), false)
            .await
            .unwrap();
        let second = repo
            .create_link("u1", "https://example.com", &preview("https://example.com"), false)
            .await
            .unwrap();

        let links = repo.list_links("u1").await.unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].id, second.id);
        assert_eq!(links[1].id, first.id);
        assert_eq!(links[1].tags, classify("https://github.com/a"));
        assert_eq!(links[1].theme.family, ThemeFamily::Slate);
        assert!(!links[0].is_favorite && !links[0].is_trash);
    }

    #[tokio::test]
    async fn test_links_are_scoped_per_user() {
        let (_dir, repo) = repo().await;
        let link = repo
            .create_link("u1", "https://example.com", &preview("https://example.com"), false)
            .await
            .unwrap();

        assert!(repo.list_links("u2").await.unwrap().is_empty());
        assert!(repo.get_link("u2", &link.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete_link("u2", &link.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_flags_and_version() {
        let (_dir, repo) = repo().await;
        let link = repo
            .create_link("u1", "https://example.com", &preview("https://example.com"), false)
            .await
            .unwrap();

        let request = UpdateLinkRequest {
            is_favorite: Some(true),
            expected_version: Some(1),
            ..UpdateLinkRequest::default()
        };
        let updated = repo.update_link("u1", &link.id, &request).await.unwrap();
        assert!(updated.is_favorite);
        assert_eq!(updated.version, 2);
        assert_eq!(updated.title, link.title);

        // Stale version
        let result = repo.update_link("u1", &link.id, &request).await;
        assert!(matches!(
            result,
            Err(AppError::Conflict {
                current_version: 2,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_empty_preview_tags_are_classified() {
        let (_dir, repo) = repo().await;
        let bare = PreviewData {
            tags: Vec::new(),
            ..preview("https://github.com/x")
        };

        let link = repo
            .create_link("u1", "https://github.com/x", &bare, false)
            .await
            .unwrap();
        assert_eq!(link.tags, vec!["Code"]);

        let stored = repo.get_link("u1", &link.id).await.unwrap().unwrap();
        assert_eq!(stored.tags, vec!["Code"]);
    }

    #[tokio::test]
    async fn test_update_description_set_keep_and_clear() {
        let (_dir, repo) = repo().await;
        let link = repo
            .create_link("u1", "https://example.com", &preview("https://example.com"), false)
            .await
            .unwrap();

        let set = UpdateLinkRequest {
            description: Some("Notes".to_string()),
            ..UpdateLinkRequest::default()
        };
        let updated = repo.update_link("u1", &link.id, &set).await.unwrap();
        assert_eq!(updated.description.as_deref(), Some("Notes"));

        let untouched = UpdateLinkRequest {
            is_favorite: Some(true),
            ..UpdateLinkRequest::default()
        };
        let updated = repo.update_link("u1", &link.id, &untouched).await.unwrap();
        assert_eq!(updated.description.as_deref(), Some("Notes"));

        let clear = UpdateLinkRequest {
            description: Some(String::new()),
            ..UpdateLinkRequest::default()
        };
        repo.update_link("u1", &link.id, &clear).await.unwrap();
        let stored = repo.get_link("u1", &link.id).await.unwrap().unwrap();
        assert!(stored.description.is_none());
    }

    #[tokio::test]
    async fn test_empty_trash_only_removes_trashed() {
        let (_dir, repo) = repo().await;
        let keep = repo
            .create_link("u1", "https://a.example", &preview("https://a.example"), false)
            .await
            .unwrap();
        let trash = repo
            .create_link("u1", "https://b.example", &preview("https://b.example"), true)
            .await
            .unwrap();
        repo.update_link("u1", &trash.id, &UpdateLinkRequest::trash(true))
            .await
            .unwrap();

        let before = repo.get_revision_id().await.unwrap();
        assert_eq!(repo.empty_trash("u1").await.unwrap(), 1);
        assert_eq!(repo.get_revision_id().await.unwrap(), before + 1);

        let links = repo.list_links("u1").await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, keep.id);

        // Nothing left to delete: revision stays put
        assert_eq!(repo.empty_trash("u1").await.unwrap(), 0);
        assert_eq!(repo.get_revision_id().await.unwrap(), before + 1);
    }

    #[tokio::test]
    async fn test_snapshot_reports_revision() {
        let (_dir, repo) = repo().await;
        repo.create_link("u1", "https://example.com", &preview("https://example.com"), false)
            .await
            .unwrap();

        let snapshot = repo.get_snapshot("u1").await.unwrap();
        assert_eq!(snapshot.schema_version, 1);
        assert_eq!(snapshot.revision_id, 1);
        assert_eq!(snapshot.links.len(), 1);
    }
}
