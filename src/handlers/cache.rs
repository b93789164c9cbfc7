#![deny(clippy::all, clippy::pedantic)]

use reqwest::{Method, StatusCode};

use crate::client::{CliError, Ctx, RequestDescriptor};
use crate::handlers::Completion;

const CACHE_API: &str = "_api/cache";

pub async fn clear(ctx: &Ctx) -> Result<Completion, CliError> {
    let url = ctx.url(&[CACHE_API])?;
    ctx.dispatch(RequestDescriptor::new(Method::DELETE, url), StatusCode::OK)
        .await?;
    Ok(Completion::CacheCleared)
}
