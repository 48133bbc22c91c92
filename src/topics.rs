use std::path::Path;

use anyhow::Context as _;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rand::Rng;
use rand::seq::SliceRandom as _;

use crate::formats::{HistoryRecord, Topic, TopicEntry};

/// Topics generated within this many days are not picked again.
pub const HISTORY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedTopic {
    pub topic: Topic,
    pub slug: String,
}

pub fn load(path: &Path) -> anyhow::Result<Vec<Topic>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read topics: {}", path.display()))?;
    load_from_str(&raw).with_context(|| format!("load topics: {}", path.display()))
}

pub fn load_from_str(raw: &str) -> anyhow::Result<Vec<Topic>> {
    let entries: Vec<TopicEntry> = serde_json::from_str(raw).context("parse topic catalog")?;
    let topics: Vec<Topic> = entries.into_iter().map(Topic::from).collect();
    if topics.is_empty() {
        anyhow::bail!("topic list is empty");
    }
    Ok(topics)
}

pub fn slugify(title: &str) -> String {
    slug::slugify(title)
}

/// Picks a topic that was neither generated recently nor already exists on
/// disk. When every topic is taken, the first shuffled topic gets a numeric
/// suffix instead.
pub fn pick<R: Rng + ?Sized>(
    topics: &[Topic],
    history: &[HistoryRecord],
    slug_exists: impl Fn(&str) -> bool,
    now: DateTime<Utc>,
    rng: &mut R,
) -> anyhow::Result<PickedTopic> {
    let mut shuffled: Vec<(&Topic, String)> = topics
        .iter()
        .map(|topic| (topic, slugify(&topic.title)))
        .filter(|(topic, slug)| {
            if slug.is_empty() {
                tracing::warn!(title = %topic.title, "topic title has no usable slug");
            }
            !slug.is_empty()
        })
        .collect();
    if shuffled.is_empty() {
        anyhow::bail!("no topic produces a usable slug");
    }
    shuffled.shuffle(rng);

    for (topic, slug) in &shuffled {
        let recently_used = history
            .iter()
            .find(|record| record.slug == *slug)
            .is_some_and(|record| is_recent(&record.created_at, now));
        if !recently_used && !slug_exists(slug.as_str()) {
            return Ok(PickedTopic {
                topic: (*topic).clone(),
                slug: slug.clone(),
            });
        }
        tracing::debug!(%slug, recently_used, "topic unavailable");
    }

    let (topic, base_slug) = &shuffled[0];
    let mut candidate = base_slug.clone();
    let mut counter = 1_u32;
    while slug_exists(candidate.as_str()) {
        candidate = format!("{base_slug}-{counter}");
        counter += 1;
    }
    tracing::info!(slug = %candidate, "every topic is taken; reusing one with a suffix");

    Ok(PickedTopic {
        topic: (*topic).clone(),
        slug: candidate,
    })
}

/// Whether `created_at` lies within the history window before `now`.
/// Unparseable timestamps are never recent.
pub fn is_recent(created_at: &str, now: DateTime<Utc>) -> bool {
    let Some(created) = parse_timestamp(created_at) else {
        return false;
    };
    now.signed_duration_since(created) < TimeDelta::days(HISTORY_WINDOW_DAYS)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
}
