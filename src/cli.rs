use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_AUTHOR, DEFAULT_HTTP_TIMEOUT_SECS};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Content root holding `{slug}/index.mdx` entries.
    #[arg(long, global = true, default_value = "content")]
    pub content: String,

    /// Author used when front matter does not name one.
    #[arg(long, global = true, default_value = DEFAULT_AUTHOR)]
    pub author: String,

    /// Increase log verbosity (overridden by RUST_LOG).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print published articles as JSON, newest first.
    List(ListArgs),
    /// Print one article as JSON.
    Show(ShowArgs),
    /// Print every tag used by published articles.
    Tags,
    /// Search titles, descriptions, bodies and tags.
    Search(SearchArgs),
    /// Print articles related to one article.
    Related(RelatedArgs),
    /// Generate a new article from the topic catalog.
    Generate(GenerateArgs),
    /// Serve the read-only JSON API.
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only articles carrying this tag.
    #[arg(long)]
    pub tag: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub slug: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub query: String,
}

#[derive(Debug, Args)]
pub struct RelatedArgs {
    pub slug: String,

    #[arg(long, default_value_t = 3)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Site root containing `scripts/`, `content/` and `public/`.
    #[arg(long, default_value = ".")]
    pub root: String,

    /// Timeout for each outbound HTTP request.
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,
}
