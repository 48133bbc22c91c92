use serde::{Deserialize, Deserializer, Serialize};

/// One entry of `_auto-history.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
}

/// Hand-edited history files sometimes carry `null` instead of a string.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A topic catalog entry as written in `topics.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TopicEntry {
    Title(String),
    Detailed(Topic),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<TopicEntry> for Topic {
    fn from(entry: TopicEntry) -> Self {
        match entry {
            TopicEntry::Title(title) => Topic {
                title,
                tags: Vec::new(),
                description: None,
            },
            TopicEntry::Detailed(topic) => topic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    pub name: String,
    pub profile_url: String,
}

/// A hero image persisted under the public image directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImage {
    /// Public URL path, e.g. `/blogs/{slug}.jpg`.
    pub src: String,
    /// Path relative to `content/{slug}/index.mdx`.
    pub front_matter_path: String,
    pub credit: Credit,
}

/// Front matter written by the generator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFrontMatter {
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub updated_at: String,
    pub author: String,
    pub is_published: bool,
    pub tags: Vec<String>,
    pub image: String,
}
