#![deny(clippy::all, clippy::pedantic)]

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::args::GlobalArgs;
use crate::auth::resolve_token;
use crate::config::{LoadError, Settings};
use crate::target::{resolve_host, resolve_target, with_scheme};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(
        "invalid pathname `{0}`: the destination must not end in `.ipynb`\n\n\
         Usage: dashboards-cli upload [--overwrite] <FILE> <PATHNAME>"
    )]
    InvalidPathname(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{}", describe_status(*.status, *.expected, .message.as_deref()))]
    UnexpectedStatus {
        status: StatusCode,
        expected: StatusCode,
        message: Option<String>,
    },
    #[error("prompt failed: {0}")]
    Prompt(std::io::Error),
}

fn describe_status(status: StatusCode, expected: StatusCode, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("server responded with {status} (expected {expected}): {message}"),
        None => format!("server responded with {status} (expected {expected})"),
    }
}

/// Body attached to an outgoing request.
#[derive(Debug)]
pub enum RequestBody {
    Empty,
    Multipart(Form),
}

/// A single HTTP call, built fresh and consumed by exactly one send.
#[derive(Debug)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub body: RequestBody,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: RequestBody::Empty,
        }
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub client: Client,
    pub base: String,
    pub token: Option<String>,
}

impl Ctx {
    pub fn new(host: &str, token: Option<String>) -> Result<Self, CliError> {
        let base = with_scheme(host);
        let parsed = Url::parse(&base)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CliError::InvalidInput(format!(
                "host `{base}` must use http or https"
            )));
        }
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            base,
            token,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("dashboards-cli/", env!("CARGO_PKG_VERSION"))
    }

    pub fn auth_header(&self) -> Result<Option<HeaderValue>, CliError> {
        self.token
            .as_ref()
            .map(|token| {
                HeaderValue::from_str(&format!("token {token}"))
                    .map_err(|e| CliError::InvalidInput(e.to_string()))
            })
            .transpose()
    }

    pub fn url(&self, segments: &[&str]) -> Result<Url, CliError> {
        resolve_target(&self.base, segments)
    }

    async fn send(&self, request: RequestDescriptor) -> Result<Response, CliError> {
        let RequestDescriptor { method, url, body } = request;
        debug!(method = %method, url = %url, "dispatching request");

        let mut req = self.client.request(method, url);
        if let Some(header) = self.auth_header()? {
            req = req.header(AUTHORIZATION, header);
        }
        if let RequestBody::Multipart(form) = body {
            req = req.multipart(form);
        }

        Ok(req.send().await?)
    }

    /// Send `request` and succeed only on exactly `expected`.
    pub async fn dispatch(
        &self,
        request: RequestDescriptor,
        expected: StatusCode,
    ) -> Result<Response, CliError> {
        let resp = self.send(request).await?;
        let status = resp.status();
        if status == expected {
            return Ok(resp);
        }

        let bytes = resp.bytes().await.unwrap_or_default();
        Err(CliError::UnexpectedStatus {
            status,
            expected,
            message: extract_message(&bytes),
        })
    }

    /// Issue an existence check and hand back the response without judging it.
    pub async fn check_exists(&self, url: Url) -> Result<Response, CliError> {
        self.send(RequestDescriptor::new(Method::GET, url)).await
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Best-effort `message` extraction from a JSON error body.
pub fn extract_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|parsed| parsed.message.trim().to_string())
        .filter(|message| !message.is_empty())
}

pub fn build_ctx_from_cli(args: &GlobalArgs, settings: &Settings) -> Result<Ctx, CliError> {
    let host = match &args.host {
        Some(host) => host.clone(),
        None => resolve_host(
            &settings.server.ip,
            settings.server.port,
            &settings.server.public_link_pattern,
        ),
    };
    let token = resolve_token(args.auth_token.as_deref(), settings.auth_token.as_deref());

    Ctx::new(&host, token)
}
