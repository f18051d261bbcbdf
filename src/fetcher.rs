use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::redirect;
use scraper::Html;
use std::time::Duration;
use log::{info, warn};

/// Terminal failure of a single fetch. Extraction-level anomalies are not
/// errors and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed")]
    ConnectionFailed,
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::ConnectionFailed
        } else {
            FetchError::Other(err.to_string())
        }
    }
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.9,en-US;q=0.8"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            // Cap redirect chains instead of relying on the library default.
            .redirect(redirect::Policy::limited(5))
            .build()
            .expect("Failed to build HTTP client");

        Fetcher { client }
    }

    /// Issues a single GET and parses the body into a document tree.
    /// `timeout_ms` bounds the whole request, connect and read included.
    /// No retries; any failure is surfaced as-is.
    pub fn fetch(&self, url: &str, timeout_ms: u64) -> Result<Html, FetchError> {
        info!("Fetching: {}", url);

        let resp = self
            .client
            .get(url)
            .timeout(Duration::from_millis(timeout_ms))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Fetch of {} failed with status {}", url, status);
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = resp.text()?;
        // html5ever repairs malformed markup; this never fails outright.
        Ok(Html::parse_document(&body))
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // The blocking client spawns its own runtime internally, so it has to
    // run off the tokio test threads. The parsed document is not Send,
    // which keeps document inspection inside the closure as well.
    async fn fetch_err(url: String, timeout_ms: u64) -> FetchError {
        tokio::task::spawn_blocking(move || {
            Fetcher::new().fetch(&url, timeout_ms).unwrap_err()
        })
        .await
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_parses_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><h1>Results</h1></body></html>"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/search", server.uri());
        let heading = tokio::task::spawn_blocking(move || {
            let document = Fetcher::new().fetch(&url, 5_000).unwrap();
            let selector = scraper::Selector::parse("h1").unwrap();
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>())
        })
        .await
        .unwrap();

        assert_eq!(heading.as_deref(), Some("Results"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_maps_404_to_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetch_err(server.uri(), 5_000).await;
        assert!(matches!(err, FetchError::HttpStatus(404)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_times_out_on_slow_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let err = fetch_err(server.uri(), 100).await;
        assert!(matches!(err, FetchError::Timeout));
    }

    #[test]
    fn fetch_reports_refused_connection() {
        // Grab a free port, then close the listener before connecting.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = Fetcher::new()
            .fetch(&format!("http://127.0.0.1:{}/", port), 5_000)
            .unwrap_err();
        assert!(matches!(err, FetchError::ConnectionFailed));
    }

    #[test]
    fn parser_repairs_unclosed_tags() {
        let document =
            Html::parse_document("<html><head><title>Test</title></head><body><h1>Unclosed tag");

        let selector = scraper::Selector::parse("h1").unwrap();
        let headings: Vec<_> = document.select(&selector).collect();
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text().collect::<String>(), "Unclosed tag");
    }
}
