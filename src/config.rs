use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_AUTHOR: &str = "Ozkan Cimenli";
pub const DEFAULT_UNSPLASH_API_BASE: &str = "https://api.unsplash.com";
pub const DEFAULT_HF_MODEL_ID: &str = "google/flan-t5-base";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// File-system layout shared by the generator and the site.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn topics(&self) -> PathBuf {
        self.root.join("scripts").join("topics.json")
    }

    pub fn history(&self) -> PathBuf {
        self.root.join("scripts").join("_auto-history.json")
    }

    pub fn lock(&self) -> PathBuf {
        self.root.join("scripts").join(".generate.lock")
    }

    pub fn content_root(&self) -> PathBuf {
        self.root.join("content")
    }

    pub fn legacy_auto_dir(&self) -> PathBuf {
        self.content_root().join("auto")
    }

    pub fn legacy_history(&self) -> PathBuf {
        self.legacy_auto_dir().join("_history.json")
    }

    pub fn image_dir(&self) -> PathBuf {
        self.root.join("public").join("blogs")
    }

    /// Whether `slug` is taken by a current or legacy content directory.
    pub fn slug_exists(&self, slug: &str) -> bool {
        self.content_root().join(slug).exists() || self.legacy_auto_dir().join(slug).exists()
    }
}

#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    pub access_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct TextGenConfig {
    pub token: String,
    pub model: String,
    pub endpoint: String,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub paths: ProjectPaths,
    pub author: String,
    pub timeout: Duration,
    /// `None` when `UNSPLASH_ACCESS_KEY` is unset.
    pub unsplash: Option<UnsplashConfig>,
    /// `None` when `HF_ACCESS_TOKEN` is unset.
    pub text: Option<TextGenConfig>,
}

impl GeneratorConfig {
    pub fn from_env(paths: ProjectPaths, author: String, timeout: Duration) -> Self {
        Self::from_lookup(paths, author, timeout, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        paths: ProjectPaths,
        author: String,
        timeout: Duration,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let unsplash = var("UNSPLASH_ACCESS_KEY").map(|access_key| UnsplashConfig {
            access_key,
            api_base: var("UNSPLASH_API_BASE")
                .unwrap_or_else(|| DEFAULT_UNSPLASH_API_BASE.to_owned()),
        });

        let text = var("HF_ACCESS_TOKEN").map(|token| {
            let model = var("HF_MODEL_ID").unwrap_or_else(|| DEFAULT_HF_MODEL_ID.to_owned());
            let endpoint = var("HF_ENDPOINT").unwrap_or_else(|| {
                format!("https://api-inference.huggingface.co/models/{model}")
            });
            TextGenConfig {
                token,
                model,
                endpoint,
            }
        });

        Self {
            paths,
            author,
            timeout,
            unsplash,
            text,
        }
    }
}
