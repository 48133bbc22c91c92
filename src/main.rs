use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser as _;

use blogforge::cli::{Cli, Command};
use blogforge::config::{GeneratorConfig, ProjectPaths};
use blogforge::content::ContentRepository;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    blogforge::logging::init(cli.verbose).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    let repo = ContentRepository::new(&cli.content, cli.author.clone());

    match cli.command {
        Command::List(args) => {
            let blogs = match args.tag.as_deref() {
                Some(tag) => repo.blogs_by_tag(tag),
                None => repo.all_blogs(),
            };
            print_json(&blogs)?;
        }
        Command::Show(args) => {
            let article = repo
                .blog_by_slug(&args.slug)
                .ok_or_else(|| anyhow::anyhow!("blog not found: {}", args.slug))?;
            print_json(&article)?;
        }
        Command::Tags => print_json(&repo.all_tags())?,
        Command::Search(args) => print_json(&repo.search(&args.query))?,
        Command::Related(args) => print_json(&repo.related(&args.slug, args.limit))?,
        Command::Generate(args) => {
            let config = GeneratorConfig::from_env(
                ProjectPaths::new(&args.root),
                cli.author,
                Duration::from_secs(args.timeout_secs),
            );
            let generator = blogforge::generate::Generator::new(config)?;
            let report = generator.run().await.context("generate")?;
            tracing::info!(
                slug = %report.slug,
                image = %report.image.path.display(),
                placeholder_image = report.image.is_placeholder(),
                enriched = report.enrichment.text().is_some(),
                "blog post generated"
            );
            println!("{}", report.document_path.display());
        }
        Command::Serve(args) => {
            blogforge::server::serve(args.addr, repo)
                .await
                .context("serve")?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}
