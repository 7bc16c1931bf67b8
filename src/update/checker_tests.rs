//! Tests for the update check.

use std::sync::Mutex;

use http::StatusCode;

use super::*;
use crate::update::HttpResponse;

/// Mock client returning one canned result and recording requests.
struct MockClient {
    response: Mutex<Option<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    hang: bool,
}

impl MockClient {
    fn ok(status: StatusCode, body: &str) -> Self {
        Self::returning(Ok(HttpResponse::new(status, body.as_bytes().to_vec())))
    }

    fn returning(result: Result<HttpResponse, HttpError>) -> Self {
        Self {
            response: Mutex::new(Some(result)),
            requests: Mutex::new(Vec::new()),
            hang: false,
        }
    }

    fn hanging() -> Self {
        Self {
            response: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            hang: true,
        }
    }
}

impl HttpClient for MockClient {
    async fn get(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        if self.hang {
            return std::future::pending().await;
        }
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(HttpError::Timeout))
    }
}

fn checker(client: MockClient, current: &str) -> UpdateChecker<MockClient> {
    UpdateChecker::new(client, Url::parse(DEFAULT_RELEASES_API_URL).unwrap())
        .with_current_version(current)
}

const RELEASE_1_3_0: &str = r#"{
    "tag_name": "v1.3.0",
    "html_url": "https://github.com/joshfromtessy/nodus-ip/releases/tag/v1.3.0",
    "name": "Nodus IP 1.3.0"
}"#;

mod versions {
    use super::*;

    #[test]
    fn numeric_components_compare_numerically() {
        assert_eq!(compare_versions("1.10.0", "1.9.0"), Some(Ordering::Greater));
        assert_eq!(compare_versions("1.2.3", "1.2.4"), Some(Ordering::Less));
    }

    #[test]
    fn missing_components_count_as_zero() {
        assert_eq!(compare_versions("1.2", "1.2.0"), Some(Ordering::Equal));
        assert_eq!(compare_versions("2", "1.9.9"), Some(Ordering::Greater));
    }

    #[test]
    fn non_numeric_is_unrecognized() {
        assert_eq!(compare_versions("1.2.0-beta", "1.2.0"), None);
        assert_eq!(compare_versions("", "1.0.0"), None);
    }
}

mod check {
    use super::*;

    #[tokio::test]
    async fn newer_release_is_reported() {
        let status = checker(MockClient::ok(StatusCode::OK, RELEASE_1_3_0), "1.0.0")
            .check()
            .await;

        assert_eq!(
            status,
            UpdateStatus {
                update_available: true,
                latest_version: "1.3.0".to_string(),
                download_url: "https://github.com/joshfromtessy/nodus-ip/releases/tag/v1.3.0"
                    .to_string(),
            }
        );
    }

    #[tokio::test]
    async fn same_version_is_not_an_update() {
        let status = checker(MockClient::ok(StatusCode::OK, RELEASE_1_3_0), "1.3.0")
            .check()
            .await;

        assert!(!status.update_available);
        assert_eq!(status.latest_version, "1.3.0");
    }

    #[tokio::test]
    async fn older_release_is_not_an_update() {
        let status = checker(MockClient::ok(StatusCode::OK, RELEASE_1_3_0), "2.0.0")
            .check()
            .await;

        assert!(!status.update_available);
    }

    #[tokio::test]
    async fn missing_html_url_falls_back_to_releases_page() {
        let status = checker(
            MockClient::ok(StatusCode::OK, r#"{"tag_name": "1.4.0"}"#),
            "1.0.0",
        )
        .check()
        .await;

        assert!(status.update_available);
        assert_eq!(status.download_url, RELEASES_PAGE_URL);
    }

    #[tokio::test]
    async fn sends_updater_user_agent() {
        let client = MockClient::ok(StatusCode::OK, RELEASE_1_3_0);
        let checker = checker(client, "1.0.0");

        checker.check().await;

        let requests = checker.client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].headers[USER_AGENT], "Nodus-IP-Updater");
        assert_eq!(requests[0].url.as_str(), DEFAULT_RELEASES_API_URL);
    }
}

mod failures {
    use super::*;

    fn assert_unknown(status: &UpdateStatus, current: &str) {
        assert_eq!(status, &UpdateStatus::unknown(current));
        assert_eq!(status.download_url, RELEASES_PAGE_URL);
    }

    #[tokio::test]
    async fn connection_error_reports_current_version() {
        let client = MockClient::returning(Err(HttpError::Connection("refused".into())));

        let status = checker(client, "1.0.0").check().await;

        assert_unknown(&status, "1.0.0");
    }

    #[tokio::test]
    async fn error_status_reports_current_version() {
        let checker = checker(MockClient::ok(StatusCode::FORBIDDEN, "rate limited"), "1.0.0");

        assert!(matches!(
            checker.try_check().await,
            Err(UpdateError::Status(StatusCode::FORBIDDEN))
        ));
        assert_unknown(&checker.check().await, "1.0.0");
    }

    #[tokio::test]
    async fn invalid_json_reports_current_version() {
        let status = checker(MockClient::ok(StatusCode::OK, "<html>"), "1.0.0")
            .check()
            .await;

        assert_unknown(&status, "1.0.0");
    }

    #[tokio::test]
    async fn unrecognized_tag_reports_current_version() {
        let client = MockClient::ok(StatusCode::OK, r#"{"tag_name": "nightly"}"#);
        let checker = checker(client, "1.0.0");

        assert!(matches!(
            checker.try_check().await,
            Err(UpdateError::Version(ref tag)) if tag == "nightly"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_server_times_out() {
        let checker = checker(MockClient::hanging(), "1.0.0").with_timeout(Duration::from_secs(3));

        assert!(matches!(
            checker.try_check().await,
            Err(UpdateError::Http(HttpError::Timeout))
        ));
    }
}
