//! Existence check and overwrite confirmation gating an upload.

#![deny(clippy::all, clippy::pedantic)]

use dialoguer::Input;
use reqwest::{StatusCode, Url};
use tracing::{info, warn};

use crate::client::{CliError, Ctx, extract_message};

/// Decision reached before any upload bytes leave the machine.
#[derive(Debug)]
pub enum Outcome {
    Proceed,
    AbortConflict,
    AbortError(CliError),
}

/// Asks the operator whether an existing destination may be replaced.
pub trait Confirmer {
    async fn confirm(&self, question: &str) -> Result<bool, CliError>;
}

/// Yes/no prompt on the attached terminal, read off the async runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    async fn confirm(&self, question: &str) -> Result<bool, CliError> {
        let prompt = format!("{question} [y/N]");
        tokio::task::spawn_blocking(move || ask(&prompt))
            .await
            .map_err(|err| CliError::Prompt(std::io::Error::other(err)))?
    }
}

fn ask(prompt: &str) -> Result<bool, CliError> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &'static str> {
            parse_answer(input)
                .map(|_| ())
                .ok_or("please answer yes or no")
        })
        .interact_text()
        .map_err(CliError::Prompt)?;

    Ok(parse_answer(&answer).unwrap_or(false))
}

/// `y`/`yes`/`n`/`no` in any case; empty input means no.
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "" | "n" | "no" => Some(false),
        _ => None,
    }
}

/// Check `destination` and, if something is already there, ask before
/// replacing it. With `overwrite` set no request is made at all.
///
/// 404 means free and any 2xx means taken; every other status aborts.
pub async fn resolve_conflict<C: Confirmer>(
    ctx: &Ctx,
    destination: Url,
    overwrite: bool,
    confirmer: &C,
) -> Outcome {
    if overwrite {
        info!(destination = %destination, "overwrite requested, skipping existence check");
        return Outcome::Proceed;
    }

    let question = format!("Dashboard {destination} already exists. Overwrite?");
    let resp = match ctx.check_exists(destination.clone()).await {
        Ok(resp) => resp,
        Err(err) => return Outcome::AbortError(err),
    };

    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        info!(destination = %destination, "destination is free");
        return Outcome::Proceed;
    }
    if !status.is_success() {
        let body = resp.bytes().await.unwrap_or_default();
        return Outcome::AbortError(CliError::UnexpectedStatus {
            status,
            expected: StatusCode::NOT_FOUND,
            message: extract_message(&body),
        });
    }

    info!(destination = %destination, status = %status, "destination already exists");
    match confirmer.confirm(&question).await {
        Ok(true) => Outcome::Proceed,
        Ok(false) => Outcome::AbortConflict,
        Err(err) => {
            warn!(error = %err, "could not read confirmation, treating as declined");
            Outcome::AbortConflict
        }
    }
}
