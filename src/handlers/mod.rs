#![deny(clippy::all, clippy::pedantic)]

use std::fmt;

use reqwest::Url;

use crate::args::Commands;
use crate::client::{CliError, Ctx};
use crate::conflict::Confirmer;

pub mod cache;
pub mod notebooks;

/// What a successful command accomplished; every variant exits 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    CacheCleared,
    Deleted { path: String },
    Uploaded { url: Url },
    UploadCancelled,
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CacheCleared => write!(f, "Cache cleared."),
            Self::Deleted { path } => write!(f, "Deleted dashboard `{path}`."),
            Self::Uploaded { url } => write!(f, "Dashboard published at {url}"),
            Self::UploadCancelled => write!(f, "Upload cancelled."),
        }
    }
}

pub async fn handle<C: Confirmer>(
    ctx: &Ctx,
    command: Commands,
    confirmer: &C,
) -> Result<Completion, CliError> {
    match command {
        Commands::ClearCache => cache::clear(ctx).await,
        Commands::Delete { path } => notebooks::delete(ctx, path).await,
        Commands::Upload(args) => notebooks::upload(ctx, args, confirmer).await,
    }
}
