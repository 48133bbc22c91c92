mod provider_stub;

use std::fs;
use std::path::Path;
use std::time::Duration;

use blogforge::config::{DEFAULT_AUTHOR, TextGenConfig, UnsplashConfig};
use blogforge::content::ContentRepository;
use blogforge::enrich::{self, Enrichment};
use blogforge::fallback::FallbackReason;
use blogforge::image::{self, ImageSource};
use predicates::prelude::*;
use provider_stub::{ProviderStub, StubBehavior};

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("build client")
}

fn unsplash(stub: &ProviderStub) -> UnsplashConfig {
    UnsplashConfig {
        access_key: provider_stub::ACCESS_KEY.to_owned(),
        api_base: stub.base_url.clone(),
    }
}

fn text_gen(stub: &ProviderStub) -> TextGenConfig {
    TextGenConfig {
        token: provider_stub::TOKEN.to_owned(),
        model: "stub/model".to_owned(),
        endpoint: stub.generate_endpoint(),
    }
}

fn write_topics(root: &Path, json: &str) -> anyhow::Result<()> {
    fs::create_dir_all(root.join("scripts"))?;
    fs::write(root.join("scripts").join("topics.json"), json)?;
    Ok(())
}

#[tokio::test]
async fn provider_image_is_downloaded_with_credit() -> anyhow::Result<()> {
    let stub = ProviderStub::spawn(StubBehavior::Healthy);
    let temp = tempfile::TempDir::new()?;

    let outcome = image::fetch(
        &client(),
        Some(&unsplash(&stub)),
        "edge caching",
        "edge-caching",
        temp.path(),
    )
    .await?;

    assert_eq!(outcome.source, ImageSource::Provider);
    assert_eq!(outcome.image.src, "/blogs/edge-caching.jpg");
    assert_eq!(outcome.image.credit.name, provider_stub::PHOTOGRAPHER);
    assert_eq!(outcome.image.credit.profile_url, provider_stub::PROFILE_URL);
    assert_eq!(fs::read(temp.path().join("edge-caching.jpg"))?, provider_stub::HERO_JPEG);
    Ok(())
}

#[tokio::test]
async fn provider_errors_fall_back_to_placeholder() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;

    let down = ProviderStub::spawn(StubBehavior::Unavailable);
    let outcome = image::fetch(&client(), Some(&unsplash(&down)), "q", "down", temp.path()).await?;
    assert_eq!(outcome.source, ImageSource::Placeholder(FallbackReason::Status(503)));
    assert_eq!(fs::read(&outcome.path)?, image::placeholder_bytes()?);

    let no_url = ProviderStub::spawn(StubBehavior::MissingImageUrl);
    let outcome =
        image::fetch(&client(), Some(&unsplash(&no_url)), "q", "no-url", temp.path()).await?;
    assert_eq!(
        outcome.source,
        ImageSource::Placeholder(FallbackReason::MissingField("urls.regular"))
    );
    assert_eq!(outcome.image.credit.name, image::PLACEHOLDER_CREDIT_NAME);

    let healthy = ProviderStub::spawn(StubBehavior::Healthy);
    let mut wrong_key = unsplash(&healthy);
    wrong_key.access_key = "wrong".to_owned();
    let outcome = image::fetch(&client(), Some(&wrong_key), "q", "wrong-key", temp.path()).await?;
    assert_eq!(outcome.source, ImageSource::Placeholder(FallbackReason::Status(401)));
    Ok(())
}

#[tokio::test]
async fn enrichment_strips_prompt_echo() {
    let stub = ProviderStub::spawn(StubBehavior::Healthy);

    let outcome = enrich::generate(&client(), Some(&text_gen(&stub)), "Edge Caching").await;

    assert_eq!(
        outcome,
        Enrichment::Generated("Stub intro paragraph.\n\nStub why paragraph.".to_owned())
    );
}

#[tokio::test]
async fn enrichment_failures_are_fallbacks() {
    let down = ProviderStub::spawn(StubBehavior::Unavailable);
    let outcome = enrich::generate(&client(), Some(&text_gen(&down)), "Edge Caching").await;
    assert_eq!(outcome, Enrichment::Fallback(FallbackReason::Status(503)));

    let healthy = ProviderStub::spawn(StubBehavior::Healthy);
    let mut bad_token = text_gen(&healthy);
    bad_token.token = "nope".to_owned();
    let outcome = enrich::generate(&client(), Some(&bad_token), "Edge Caching").await;
    assert_eq!(outcome, Enrichment::Fallback(FallbackReason::Status(401)));

    let unreachable = TextGenConfig {
        token: "t".to_owned(),
        model: "m".to_owned(),
        endpoint: "http://127.0.0.1:9/generate".to_owned(),
    };
    let outcome = enrich::generate(&client(), Some(&unreachable), "Edge Caching").await;
    assert!(matches!(
        outcome,
        Enrichment::Fallback(FallbackReason::Transport(_))
    ));
}

#[test]
fn generate_command_uses_configured_providers() -> anyhow::Result<()> {
    let stub = ProviderStub::spawn(StubBehavior::Healthy);
    let temp = tempfile::TempDir::new()?;
    write_topics(
        temp.path(),
        r#"[{"title": "Edge Caching", "tags": ["performance"]}]"#,
    )?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("blogforge");
    cmd.env_remove("RUST_LOG")
        .env("UNSPLASH_ACCESS_KEY", provider_stub::ACCESS_KEY)
        .env("UNSPLASH_API_BASE", &stub.base_url)
        .env("HF_ACCESS_TOKEN", provider_stub::TOKEN)
        .env("HF_ENDPOINT", stub.generate_endpoint())
        .args(["generate", "--root", temp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("edge-caching"));

    let document = fs::read_to_string(temp.path().join("content/edge-caching/index.mdx"))?;
    assert!(document.contains("Stub intro paragraph."));
    assert!(document.contains(&format!(
        "_Photo by [{}]({}) on Unsplash._",
        provider_stub::PHOTOGRAPHER,
        provider_stub::PROFILE_URL
    )));
    assert_eq!(
        fs::read(temp.path().join("public/blogs/edge-caching.jpg"))?,
        provider_stub::HERO_JPEG
    );

    let repo = ContentRepository::new(temp.path().join("content"), DEFAULT_AUTHOR);
    let article = repo
        .blog_by_slug("edge-caching")
        .ok_or_else(|| anyhow::anyhow!("generated article not readable"))?;
    assert_eq!(article.title, "Edge Caching");
    assert_eq!(
        article.tags,
        vec![
            "performance",
            "web development",
            "productivity",
            "developer experience"
        ]
    );
    assert_eq!(
        article.description,
        "A practical guide to edge caching for modern developers."
    );
    Ok(())
}

#[test]
fn generate_without_credentials_uses_placeholder() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    write_topics(temp.path(), r#"["Dependency Hygiene"]"#)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("blogforge");
    cmd.env_remove("UNSPLASH_ACCESS_KEY")
        .env_remove("HF_ACCESS_TOKEN")
        .env_remove("RUST_LOG")
        .args(["generate", "--root", temp.path().to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("using placeholder"));

    let document = fs::read_to_string(temp.path().join("content/dependency-hygiene/index.mdx"))?;
    assert!(document.contains(&format!(
        "_Hero image: [Placeholder Image]({})._",
        blogforge::image::PLACEHOLDER_CREDIT_URL
    )));
    assert!(document.contains("manual chores around **Dependency Hygiene**"));
    assert!(temp.path().join("public/blogs/dependency-hygiene.jpg").exists());
    Ok(())
}

#[test]
fn generate_with_missing_catalog_exits_non_zero() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("blogforge");
    cmd.env_remove("UNSPLASH_ACCESS_KEY")
        .env_remove("HF_ACCESS_TOKEN")
        .args(["generate", "--root", temp.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("topics.json"));
    Ok(())
}
