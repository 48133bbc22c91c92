use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;

use crate::config::GeneratorConfig;
use crate::content::INDEX_FILE;
use crate::enrich::{self, Enrichment};
use crate::formats::HistoryRecord;
use crate::history;
use crate::image::{self, ImageOutcome};
use crate::render::{self, ArticleDraft};
use crate::topics::{self, PickedTopic};

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub slug: String,
    pub title: String,
    pub document_path: PathBuf,
    pub image: ImageOutcome,
    pub enrichment: Enrichment,
}

/// Produces one article per run. Owns the HTTP client used for every
/// outbound call.
pub struct Generator {
    config: GeneratorConfig,
    client: reqwest::Client,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("blogforge/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: GeneratorConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub async fn run(&self) -> anyhow::Result<GenerationReport> {
        let now = Utc::now();
        let paths = &self.config.paths;

        let content_root = paths.content_root();
        std::fs::create_dir_all(&content_root)
            .with_context(|| format!("create content root: {}", content_root.display()))?;
        let _lock = RunLock::acquire(&paths.lock())?;

        tracing::info!(topics = %paths.topics().display(), "generate: load topics");
        let topics = topics::load(&paths.topics()).context("load topics")?;

        tracing::info!("generate: load history");
        let history = history::load(&paths.history(), &paths.legacy_history())
            .context("load history")?;

        let picked = {
            let mut rng = rand::rng();
            self.pick(&topics, &history, now, &mut rng)?
        };
        tracing::info!(slug = %picked.slug, title = %picked.topic.title, "generate: picked topic");

        self.produce(picked, history, now).await
    }

    pub fn pick<R: Rng + ?Sized>(
        &self,
        topics: &[crate::formats::Topic],
        history: &[HistoryRecord],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> anyhow::Result<PickedTopic> {
        let paths = &self.config.paths;
        topics::pick(topics, history, |slug| paths.slug_exists(slug), now, rng)
            .context("pick topic")
    }

    /// Runs the image, enrichment, render, and persist stages for an
    /// already picked topic.
    pub async fn produce(
        &self,
        picked: PickedTopic,
        history: Vec<HistoryRecord>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<GenerationReport> {
        let PickedTopic { topic, slug } = picked;
        let paths = &self.config.paths;

        tracing::info!("generate: hero image");
        let image = image::fetch(
            &self.client,
            self.config.unsplash.as_ref(),
            &topic.title,
            &slug,
            &paths.image_dir(),
        )
        .await
        .context("acquire hero image")?;

        tracing::info!("generate: text enrichment");
        let enrichment = enrich::generate(&self.client, self.config.text.as_ref(), &topic.title).await;

        let description = topic
            .description
            .clone()
            .unwrap_or_else(|| render::default_description(&topic.title));
        let date = now.format("%Y-%m-%d").to_string();
        let document = render::render_document(&ArticleDraft {
            title: &topic.title,
            description: &description,
            date: &date,
            author: &self.config.author,
            tags: render::merge_tags(&topic.tags),
            image: &image,
            enrichment: &enrichment,
        })
        .context("render article")?;

        let document_path = write_document(&paths.content_root(), &slug, &document)?;
        tracing::info!(path = %document_path.display(), "generate: article written");

        let updated = history::record(
            history,
            HistoryRecord {
                slug: slug.clone(),
                title: topic.title.clone(),
                created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
                image: image.image.src.clone(),
            },
        );
        history::save(&paths.history(), &updated).context("save history")?;

        Ok(GenerationReport {
            slug,
            title: topic.title,
            document_path,
            image,
            enrichment,
        })
    }
}

fn write_document(content_root: &Path, slug: &str, document: &str) -> anyhow::Result<PathBuf> {
    let dir = content_root.join(slug);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create article dir: {}", dir.display()))?;

    let path = dir.join(INDEX_FILE);
    let mut file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&path)
        .with_context(|| format!("create article: {}", path.display()))?;
    file.write_all(document.as_bytes())
        .with_context(|| format!("write article: {}", path.display()))?;
    Ok(path)
}

/// Exclusive marker file held for the duration of a run.
struct RunLock {
    path: PathBuf,
}

impl RunLock {
    fn acquire(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create lock dir: {}", parent.display()))?;
        }
        match OpenOptions::new().create_new(true).write(true).open(path) {
            Ok(mut file) => {
                // Dropped on a failed write, which removes the file.
                let lock = Self {
                    path: path.to_path_buf(),
                };
                writeln!(file, "{}", std::process::id())
                    .with_context(|| format!("write lock: {}", path.display()))?;
                Ok(lock)
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => anyhow::bail!(
                "another generator run holds {}; remove it if no run is in progress",
                path.display()
            ),
            Err(err) => Err(err).with_context(|| format!("create lock: {}", path.display())),
        }
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), %err, "failed to remove run lock");
        }
    }
}
