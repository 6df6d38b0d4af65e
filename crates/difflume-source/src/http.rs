//! HTTP source and the shared GET helper.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ReadError, ReadResult};
use crate::fetcher::SourceFetcher;

/// GET `url` and return the body, failing on any non-success status.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> reqwest::Result<String> {
    debug!(url, "GET");
    let response = client.get(url).send().await?.error_for_status()?;
    response.text().await
}

/// A document served by plain HTTP GET.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    url: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn read_text(&self) -> ReadResult<String> {
        get_text(&self.client, &self.url)
            .await
            .map_err(|source| ReadError::Url {
                url: self.url.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn reads_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(format!("{}/doc", server.uri()), reqwest::Client::new());
        assert_eq!(fetcher.read_text().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn error_status_is_a_read_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing", server.uri());
        let err = HttpFetcher::new(url.clone(), reqwest::Client::new())
            .read_text()
            .await
            .unwrap_err();
        assert!(matches!(&err, ReadError::Url { url: u, .. } if *u == url));
        assert!(err.to_string().starts_with("Could not read URL"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_read_error() {
        let fetcher = HttpFetcher::new("http://127.0.0.1:9/doc", reqwest::Client::new());
        assert!(matches!(
            fetcher.read_text().await,
            Err(ReadError::Url { .. })
        ));
    }

    #[tokio::test]
    async fn has_no_revisions() {
        let fetcher = HttpFetcher::new("http://127.0.0.1:9/doc", reqwest::Client::new());
        assert!(fetcher.read_revisions().await.unwrap().is_empty());
    }
}
