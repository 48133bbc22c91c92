use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a single content document.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("front matter is not closed by a '---' line")]
    UnclosedFrontMatter,

    #[error("front matter must be a mapping")]
    NotAMapping,

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ContentError>;
