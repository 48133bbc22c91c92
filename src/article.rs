use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::front_matter::{self, FrontMatter};

pub const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingTime {
    pub text: String,
    pub minutes: u64,
    /// Milliseconds.
    pub time: u64,
    pub words: u64,
}

impl ReadingTime {
    /// Counts runs of non-whitespace, so an empty body is 0 words and
    /// "0 min read".
    pub fn from_content(content: &str) -> Self {
        let words = content.split_whitespace().count();
        let minutes = words.div_ceil(WORDS_PER_MINUTE) as u64;
        Self {
            text: format!("{minutes} min read"),
            minutes,
            time: minutes * 60 * 1000,
            words: words as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub updated_at: String,
    pub author: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub is_published: bool,
    pub reading_time: ReadingTime,
    pub url: String,
    pub content: String,
}

impl Article {
    /// Parses a whole document (front matter + body) stored under `slug`.
    pub fn parse(slug: &str, document: &str, default_author: &str) -> Result<Self> {
        let (yaml, body) = front_matter::split(document)?;
        let front = FrontMatter::from_yaml(yaml, default_author)?;
        Ok(Self::from_parts(slug, front, body))
    }

    pub fn from_parts(slug: &str, front: FrontMatter, content: &str) -> Self {
        Self {
            slug: slug.to_owned(),
            title: front.title,
            description: front.description,
            published_at: front.published_at,
            updated_at: front.updated_at,
            author: front.author,
            tags: front.tags,
            image: front.image,
            is_published: front.is_published,
            reading_time: ReadingTime::from_content(content),
            url: format!("/blogs/{slug}"),
            content: content.to_owned(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
