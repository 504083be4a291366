//! Instance domain normalization

use chica_domain::SessionError;
use url::Url;

/// Validate a user-typed instance domain and return its canonical form
///
/// Accepts a bare host with an optional port (`mastodon.social`,
/// `127.0.0.1:3000`). Schemes, paths, queries, fragments, credentials and
/// whitespace are refused rather than stripped. The result is lowercase and
/// written without the trailing root dot (`hyrma.example.` becomes
/// `hyrma.example`).
///
/// # Errors
/// `SessionError::InvalidDomain` carrying the input as typed.
pub fn normalize_domain(input: &str) -> Result<String, SessionError> {
    let invalid = || SessionError::InvalidDomain(input.to_string());

    if input.is_empty()
        || input.chars().any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | '\\'))
    {
        return Err(invalid());
    }

    let url = Url::parse(&format!("https://{input}/")).map_err(|_| invalid())?;
    let host = url
        .host_str()
        .map(|h| h.trim_end_matches('.'))
        .filter(|h| !h.is_empty())
        .ok_or_else(invalid)?;

    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
