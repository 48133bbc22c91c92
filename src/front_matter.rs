use serde_yaml::{Mapping, Value};

use crate::error::{ContentError, Result};

const FRONT_MATTER_DELIMITER: &str = "---";

pub const UNTITLED: &str = "Untitled";

/// Front matter of a content document with every default already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub updated_at: String,
    pub author: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub is_published: bool,
}

/// Splits a document into its raw YAML block and body. A document that
/// does not open with `---` has an empty block and is all body.
pub fn split(contents: &str) -> Result<(&str, &str)> {
    let mut lines = contents.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(("", contents));
    };
    if first.trim_end() != FRONT_MATTER_DELIMITER {
        return Ok(("", contents));
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == FRONT_MATTER_DELIMITER {
            let yaml = &contents[yaml_start..offset];
            let body = &contents[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(ContentError::UnclosedFrontMatter)
}

impl FrontMatter {
    pub fn from_yaml(yaml: &str, default_author: &str) -> Result<Self> {
        let value: Value = if yaml.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(yaml)?
        };
        let map = match value {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            _ => return Err(ContentError::NotAMapping),
        };

        let published_at = text(&map, "publishedAt").unwrap_or_default();
        let updated_at = text(&map, "updatedAt").unwrap_or_else(|| published_at.clone());

        Ok(Self {
            title: text(&map, "title").unwrap_or_else(|| UNTITLED.to_owned()),
            description: text(&map, "description").unwrap_or_default(),
            published_at,
            updated_at,
            author: text(&map, "author").unwrap_or_else(|| default_author.to_owned()),
            tags: tags(&map),
            image: text(&map, "image"),
            is_published: !matches!(map.get("isPublished"), Some(Value::Bool(false))),
        })
    }
}

/// Scalar value as a non-empty string.
fn text(map: &Mapping, key: &str) -> Option<String> {
    let value = match map.get(key)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if value.is_empty() { None } else { Some(value) }
}

fn tags(map: &Mapping) -> Vec<String> {
    match map.get("tags") {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    }
}
