#![deny(clippy::all, clippy::pedantic)]

/// Pick the token to send: an explicit command-line value always wins.
/// Blank values are treated as unset.
pub fn resolve_token(cli: Option<&str>, configured: Option<&str>) -> Option<String> {
    non_blank(cli)
        .or_else(|| non_blank(configured))
        .map(ToString::to_string)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|token| !token.is_empty())
}
