//! Release update check.
//!
//! One GET against the release-metadata endpoint, a substring scan for the
//! `tag_name` field, and a numeric version comparison. No polling; the
//! check runs when asked and reports once.

use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const CURRENT_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));
pub const RELEASE_URL: &str = "https://api.github.com/repos/voidksa/BootEase/releases/latest";

const HTTP_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = "BootEase-App";

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("update request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("release metadata has no tag_name field")]
    MissingTag,
    #[error("malformed version tag: {0:?}")]
    BadVersion(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate,
    Available { latest: String },
}

/// A `vMAJOR.MINOR.PATCH` release tag, compared numerically per component.
/// A plain string compare would order "v1.10.0" before "v1.2.0".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn parse(tag: &str) -> Result<Self, UpdateError> {
        let bad = || UpdateError::BadVersion(tag.to_string());
        let digits = tag.trim().strip_prefix(['v', 'V']).unwrap_or(tag.trim());

        let mut parts = digits.split('.');
        let component = |parts: &mut std::str::Split<'_, char>| {
            parts.next().and_then(|p| p.parse::<u64>().ok()).ok_or_else(|| bad())
        };

        let major = component(&mut parts)?;
        let minor = component(&mut parts)?;
        let patch = component(&mut parts)?;
        if parts.next().is_some() {
            return Err(bad());
        }

        Ok(Self { major, minor, patch })
    }
}

/// Pull the string value of `"tag_name"` out of the response body by
/// substring scan; the endpoint returns a large document and exactly one
/// field of it matters here.
pub fn extract_tag_name(body: &str) -> Option<String> {
    let key = "\"tag_name\":";
    let at = body.find(key)?;
    let rest = &body[at + key.len()..];

    let start = rest.find('"')?;
    let rest = &rest[start + 1..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

/// Fetch the latest release tag and compare it against `current`.
pub fn check(url: &str, current: &str) -> Result<UpdateStatus, UpdateError> {
    let current = Version::parse(current)?;

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;

    let body = client.get(url).send()?.error_for_status()?.text()?;
    let tag = extract_tag_name(&body).ok_or(UpdateError::MissingTag)?;
    debug!("Latest release tag: {tag}");

    if Version::parse(&tag)? > current {
        Ok(UpdateStatus::Available { latest: tag })
    } else {
        Ok(UpdateStatus::UpToDate)
    }
}
