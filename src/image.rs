use std::path::{Path, PathBuf};

use anyhow::Context as _;
use base64::Engine as _;

use crate::config::UnsplashConfig;
use crate::fallback::FallbackReason;
use crate::formats::{Credit, HeroImage};

pub const PLACEHOLDER_CREDIT_NAME: &str = "Placeholder Image";
pub const PLACEHOLDER_CREDIT_URL: &str =
    "https://github.com/ozkancimenli/lafoule-m/blob/main/scripts/generate-blog.js";

const PLACEHOLDER_JPEG_BASE64: &str = include_str!("placeholder.jpg.b64");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Provider,
    Placeholder(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOutcome {
    pub image: HeroImage,
    /// Where the bytes were written.
    pub path: PathBuf,
    pub source: ImageSource,
}

impl ImageOutcome {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.source, ImageSource::Placeholder(_))
    }
}

/// Downloads a random image matching `query` into `{image_dir}/{slug}.jpg`,
/// or writes the bundled placeholder there when the provider is unavailable.
pub async fn fetch(
    client: &reqwest::Client,
    config: Option<&UnsplashConfig>,
    query: &str,
    slug: &str,
    image_dir: &Path,
) -> anyhow::Result<ImageOutcome> {
    let downloaded = match config {
        Some(config) => download_random(client, config, query).await,
        None => Err(FallbackReason::MissingCredentials("UNSPLASH_ACCESS_KEY")),
    };

    let (bytes, credit, source) = match downloaded {
        Ok((bytes, credit)) => (bytes, credit, ImageSource::Provider),
        Err(reason) => {
            tracing::warn!(%reason, "hero image unavailable; using placeholder");
            let credit = Credit {
                name: PLACEHOLDER_CREDIT_NAME.to_owned(),
                profile_url: PLACEHOLDER_CREDIT_URL.to_owned(),
            };
            (placeholder_bytes()?, credit, ImageSource::Placeholder(reason))
        }
    };

    let path = write_image(image_dir, slug, &bytes)?;
    tracing::info!(path = %path.display(), placeholder = matches!(source, ImageSource::Placeholder(_)), "hero image saved");

    Ok(ImageOutcome {
        image: HeroImage {
            src: public_src(slug),
            front_matter_path: format!("../../public/blogs/{}", file_name(slug)),
            credit,
        },
        path,
        source,
    })
}

pub fn placeholder_bytes() -> anyhow::Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(PLACEHOLDER_JPEG_BASE64.trim())
        .context("decode placeholder image")
}

fn file_name(slug: &str) -> String {
    format!("{slug}.jpg")
}

fn public_src(slug: &str) -> String {
    format!("/blogs/{}", file_name(slug))
}

fn write_image(image_dir: &Path, slug: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(image_dir)
        .with_context(|| format!("create image dir: {}", image_dir.display()))?;
    let path = image_dir.join(file_name(slug));
    std::fs::write(&path, bytes).with_context(|| format!("write image: {}", path.display()))?;
    Ok(path)
}

async fn download_random(
    client: &reqwest::Client,
    config: &UnsplashConfig,
    query: &str,
) -> Result<(Vec<u8>, Credit), FallbackReason> {
    let base = config.api_base.trim_end_matches('/');
    let endpoint = url::Url::parse_with_params(
        &format!("{base}/photos/random"),
        [
            ("query", query),
            ("orientation", "landscape"),
            ("content_filter", "high"),
            ("client_id", config.access_key.as_str()),
        ],
    )
    .map_err(|err| FallbackReason::InvalidResponse(format!("image api url: {err}")))?;

    let response = client.get(endpoint).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FallbackReason::Status(status.as_u16()));
    }
    let photo: serde_json::Value = response
        .json()
        .await
        .map_err(|err| FallbackReason::InvalidResponse(err.to_string()))?;

    let image_url = photo
        .pointer("/urls/regular")
        .and_then(|v| v.as_str())
        .ok_or(FallbackReason::MissingField("urls.regular"))?;
    let credit = Credit {
        name: photo
            .pointer("/user/name")
            .and_then(|v| v.as_str())
            .unwrap_or("Unsplash Creator")
            .to_owned(),
        profile_url: photo
            .pointer("/user/links/html")
            .and_then(|v| v.as_str())
            .unwrap_or("https://unsplash.com")
            .to_owned(),
    };

    tracing::debug!(%image_url, "downloading hero image");
    let response = client.get(image_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FallbackReason::Status(status.as_u16()));
    }
    let bytes = response.bytes().await?;

    Ok((bytes.to_vec(), credit))
}
