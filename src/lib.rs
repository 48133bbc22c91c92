#![forbid(unsafe_code)]

pub mod article;
pub mod cli;
pub mod config;
pub mod content;
pub mod enrich;
pub mod error;
pub mod fallback;
pub mod formats;
pub mod front_matter;
pub mod generate;
pub mod history;
pub mod image;
pub mod logging;
pub mod render;
pub mod server;
pub mod topics;
