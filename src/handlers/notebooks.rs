#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use tracing::info;

use crate::args::UploadArgs;
use crate::client::{CliError, Ctx, RequestDescriptor};
use crate::conflict::{Confirmer, Outcome, resolve_conflict};
use crate::handlers::Completion;

const NOTEBOOKS_API: &str = "_api/notebooks";
const DASHBOARDS_PREFIX: &str = "dashboards";
const NOTEBOOK_SUFFIX: &str = ".ipynb";
const NOTEBOOK_MIME: &str = "application/x-ipynb+json";

pub async fn delete(ctx: &Ctx, path: String) -> Result<Completion, CliError> {
    let url = ctx.url(&[NOTEBOOKS_API, &path])?;
    ctx.dispatch(
        RequestDescriptor::new(Method::DELETE, url),
        StatusCode::NO_CONTENT,
    )
    .await?;
    Ok(Completion::Deleted { path })
}

pub async fn upload<C: Confirmer>(
    ctx: &Ctx,
    args: UploadArgs,
    confirmer: &C,
) -> Result<Completion, CliError> {
    let UploadArgs {
        overwrite,
        file,
        pathname,
    } = args;

    validate_pathname(&pathname)?;
    let data = tokio::fs::read(&file)
        .await
        .map_err(|source| CliError::InputFile {
            path: file.display().to_string(),
            source,
        })?;

    let dashboard = ctx.url(&[DASHBOARDS_PREFIX, &pathname])?;
    match resolve_conflict(ctx, dashboard.clone(), overwrite, confirmer).await {
        Outcome::Proceed => {}
        Outcome::AbortConflict => {
            info!(pathname = %pathname, "upload declined by operator");
            return Ok(Completion::UploadCancelled);
        }
        Outcome::AbortError(err) => return Err(err),
    }

    let part = Part::bytes(data)
        .file_name(upload_file_name(&file))
        .mime_str(NOTEBOOK_MIME)?;
    let form = Form::new().part("file", part);
    let url = ctx.url(&[NOTEBOOKS_API, &pathname])?;
    ctx.dispatch(
        RequestDescriptor::new(Method::POST, url).multipart(form),
        StatusCode::CREATED,
    )
    .await?;

    Ok(Completion::Uploaded { url: dashboard })
}

/// The destination names a dashboard, never the notebook file itself.
pub fn validate_pathname(pathname: &str) -> Result<(), CliError> {
    let trimmed = pathname.trim_end_matches('/');
    if trimmed.to_ascii_lowercase().ends_with(NOTEBOOK_SUFFIX) {
        return Err(CliError::InvalidPathname(pathname.to_string()));
    }
    Ok(())
}

fn upload_file_name(file: &Path) -> String {
    file.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("notebook.ipynb")
        .to_string()
}
