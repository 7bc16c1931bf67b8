//! Checking for a newer release.

use std::cmp::Ordering;
use std::time::Duration;

use http::HeaderValue;
use http::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use url::Url;

use super::{HttpClient, HttpError, HttpRequest, UpdateError};

/// Latest-release API endpoint.
pub const DEFAULT_RELEASES_API_URL: &str =
    "https://api.github.com/repos/joshfromtessy/nodus-ip/releases/latest";

/// Human-facing releases page, offered when the check fails.
pub const RELEASES_PAGE_URL: &str = "https://github.com/joshfromtessy/nodus-ip/releases";

/// User agent sent with the check.
const UPDATER_USER_AGENT: &str = "Nodus-IP-Updater";

/// Default limit for the whole request.
pub const DEFAULT_UPDATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Version of this build.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Outcome of an update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatus {
    /// A newer release exists.
    pub update_available: bool,
    /// Latest released version, or the current one if unknown.
    pub latest_version: String,
    /// Where to get it.
    pub download_url: String,
}

impl UpdateStatus {
    /// The status reported when the latest release is unknown.
    #[must_use]
    pub fn unknown(current_version: &str) -> Self {
        Self {
            update_available: false,
            latest_version: current_version.to_string(),
            download_url: RELEASES_PAGE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    html_url: Option<String>,
}

/// Compares two dotted numeric versions.
///
/// Missing trailing components count as zero, so `1.2` equals `1.2.0`.
/// Returns `None` if either side has a non-numeric component.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let a = parse_version(a)?;
    let b = parse_version(b)?;
    let len = a.len().max(b.len());

    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ord| ord.is_ne())
        .or(Some(Ordering::Equal))
}

fn parse_version(version: &str) -> Option<Vec<u64>> {
    let version = version.trim();
    if version.is_empty() {
        return None;
    }
    version.split('.').map(|part| part.parse().ok()).collect()
}

/// Looks up the latest release and compares it with this build.
///
/// # Example
///
/// ```no_run
/// use nodus_ip::update::{DEFAULT_RELEASES_API_URL, ReqwestClient, UpdateChecker};
/// use url::Url;
///
/// # async fn example() -> Result<(), url::ParseError> {
/// let checker = UpdateChecker::new(ReqwestClient::new(), Url::parse(DEFAULT_RELEASES_API_URL)?);
/// let status = checker.check().await;
/// if status.update_available {
///     println!("Version {} is available at {}", status.latest_version, status.download_url);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct UpdateChecker<C> {
    client: C,
    url: Url,
    current_version: String,
    timeout: Duration,
}

impl<C: HttpClient> UpdateChecker<C> {
    /// Creates a checker querying `url`.
    #[must_use]
    pub fn new(client: C, url: Url) -> Self {
        Self {
            client,
            url,
            current_version: CURRENT_VERSION.to_string(),
            timeout: DEFAULT_UPDATE_TIMEOUT,
        }
    }

    /// Compares against another version instead of this build's.
    #[must_use]
    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks for a newer release.
    ///
    /// Never fails: any problem yields "no update", the current version and
    /// the releases page.
    pub async fn check(&self) -> UpdateStatus {
        match self.try_check().await {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!("Update check failed: {e}");
                UpdateStatus::unknown(&self.current_version)
            }
        }
    }

    /// Like [`check`](Self::check), but reports why the check failed.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError`] if the endpoint cannot be reached, answers
    /// with an error status, or returns an unrecognized body or version.
    pub async fn try_check(&self) -> Result<UpdateStatus, UpdateError> {
        let request = HttpRequest::get(self.url.clone())
            .with_header(USER_AGENT, HeaderValue::from_static(UPDATER_USER_AGENT))
            .with_header(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let response = tokio::time::timeout(self.timeout, self.client.get(request))
            .await
            .unwrap_or(Err(HttpError::Timeout))?;

        if !response.is_success() {
            return Err(UpdateError::Status(response.status));
        }

        let release: Release = serde_json::from_slice(&response.body).map_err(UpdateError::Parse)?;
        let latest = release.tag_name.trim();
        let latest = latest.strip_prefix(['v', 'V']).unwrap_or(latest);

        let ordering = compare_versions(latest, &self.current_version)
            .ok_or_else(|| UpdateError::Version(release.tag_name.clone()))?;

        Ok(UpdateStatus {
            update_available: ordering == Ordering::Greater,
            latest_version: latest.to_string(),
            download_url: release
                .html_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| RELEASES_PAGE_URL.to_string()),
        })
    }
}

#[cfg(test)]
#[path = "checker_tests.rs"]
mod tests;
