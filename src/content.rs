use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::article::Article;
use crate::error::{ContentError, Result};

/// Every entry lives at `{root}/{slug}/index.mdx`.
pub const INDEX_FILE: &str = "index.mdx";

pub const SEARCH_MIN_QUERY_CHARS: usize = 2;
pub const SEARCH_RESULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub blogs: Vec<Article>,
    pub total: usize,
}

/// Read-only view over a content root. Nothing is cached: each call rescans
/// the directory.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    root: PathBuf,
    default_author: String,
}

impl ContentRepository {
    pub fn new(root: impl Into<PathBuf>, default_author: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_author: default_author.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self, slug: &str) -> PathBuf {
        self.root.join(slug).join(INDEX_FILE)
    }

    /// Published articles, most recent first.
    pub fn all_blogs(&self) -> Vec<Article> {
        let slugs = match self.entry_slugs() {
            Ok(slugs) => slugs,
            Err(err) => {
                tracing::warn!(root = %self.root.display(), %err, "cannot read content root");
                return Vec::new();
            }
        };

        let mut articles = Vec::with_capacity(slugs.len());
        for slug in slugs {
            match self.load(&slug) {
                Ok(article) if article.is_published => articles.push(article),
                Ok(_) => tracing::debug!(%slug, "skipping unpublished article"),
                Err(ContentError::Read { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    tracing::debug!(%slug, "skipping entry without index.mdx");
                }
                Err(err) => tracing::warn!(%slug, %err, "skipping unreadable article"),
            }
        }

        sort_by_published_desc(&mut articles);
        articles
    }

    /// Looks up one article regardless of its publication flag.
    pub fn blog_by_slug(&self, slug: &str) -> Option<Article> {
        if !is_plain_segment(slug) {
            tracing::debug!(%slug, "rejecting slug that is not a plain path segment");
            return None;
        }
        match self.load(slug) {
            Ok(article) => Some(article),
            Err(err) => {
                tracing::debug!(%slug, %err, "article not available");
                None
            }
        }
    }

    pub fn all_tags(&self) -> Vec<String> {
        self.all_blogs()
            .into_iter()
            .flat_map(|article| article.tags)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn blogs_by_tag(&self, tag: &str) -> Vec<Article> {
        self.all_blogs()
            .into_iter()
            .filter(|article| article.has_tag(tag))
            .collect()
    }

    /// Case-insensitive substring search over title, description, body and
    /// tags.
    pub fn search(&self, query: &str) -> SearchResults {
        let query = query.trim();
        if query.chars().count() < SEARCH_MIN_QUERY_CHARS {
            return SearchResults {
                blogs: Vec::new(),
                total: 0,
            };
        }

        let needle = query.to_lowercase();
        let matches: Vec<Article> = self
            .all_blogs()
            .into_iter()
            .filter(|article| matches_query(article, &needle))
            .collect();
        let total = matches.len();

        SearchResults {
            blogs: matches.into_iter().take(SEARCH_RESULT_LIMIT).collect(),
            total,
        }
    }

    /// Articles sharing a tag with `slug`, topped up with the most recent
    /// others.
    pub fn related(&self, slug: &str, limit: usize) -> Vec<Article> {
        let all = self.all_blogs();
        let current_tags: Vec<String> = match all.iter().find(|a| a.slug == slug) {
            Some(current) => current.tags.clone(),
            None => self
                .blog_by_slug(slug)
                .map(|a| a.tags)
                .unwrap_or_default(),
        };

        let (mut related, rest): (Vec<Article>, Vec<Article>) = all
            .into_iter()
            .filter(|a| a.slug != slug)
            .partition(|a| a.tags.iter().any(|t| current_tags.contains(t)));
        related.truncate(limit);

        let missing = limit.saturating_sub(related.len());
        related.extend(rest.into_iter().take(missing));
        related
    }

    fn load(&self, slug: &str) -> Result<Article> {
        let path = self.index_path(slug);
        let document = std::fs::read_to_string(&path).map_err(|source| ContentError::Read {
            path: path.clone(),
            source,
        })?;
        Article::parse(slug, &document, &self.default_author)
    }

    /// Visible directory names under the root, in name order.
    fn entry_slugs(&self) -> std::io::Result<Vec<String>> {
        let mut slugs = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(%err, "skipping unreadable directory entry");
                    continue;
                }
            };
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 entry name");
                continue;
            };
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            slugs.push(name);
        }
        slugs.sort();
        Ok(slugs)
    }
}

fn matches_query(article: &Article, needle: &str) -> bool {
    article.title.to_lowercase().contains(needle)
        || article.description.to_lowercase().contains(needle)
        || article.content.to_lowercase().contains(needle)
        || article.tags.join(" ").to_lowercase().contains(needle)
}

fn is_plain_segment(slug: &str) -> bool {
    !slug.is_empty() && !slug.starts_with('.') && !slug.contains(['/', '\\'])
}

/// Stable; unparseable dates go last.
pub fn sort_by_published_desc(articles: &mut [Article]) {
    articles.sort_by_key(|article| Reverse(publish_key(&article.published_at)));
}

fn publish_key(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
