//! services/api/src/adapters/pdf_fetch.rs
//!
//! Downloads PDFs that the client references by URL (for example a public
//! object-storage link). Implements the `PdfFetchService` port.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use pdf_chat_core::ports::{PdfFetchService, PortError, PortResult};
use std::time::Duration;
use tracing::info;

/// An adapter that implements `PdfFetchService` with `reqwest`.
#[derive(Clone)]
pub struct HttpPdfFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpPdfFetcher {
    /// Creates a fetcher whose requests give up after `timeout` and refuse
    /// bodies larger than `max_bytes`.
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, max_bytes })
    }
}

#[async_trait]
impl PdfFetchService for HttpPdfFetcher {
    async fn fetch_pdf(&self, url: &str) -> PortResult<Bytes> {
        info!("Fetching PDF from URL: {}", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PortError::Upstream(format!("Failed to fetch PDF: {}", e)))?;

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(PortError::Upstream(format!(
                    "Remote PDF is {} bytes, limit is {}",
                    length, self.max_bytes
                )));
            }
        }

        // Content-Length can be absent or wrong, so the limit is enforced while reading.
        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| PortError::Upstream(format!("Failed to read PDF body: {}", e)))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(PortError::Upstream(format!(
                    "Remote PDF exceeds the {} byte limit",
                    self.max_bytes
                )));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::canned_http::{response, serve_once};

    #[tokio::test]
    async fn unreachable_url_is_an_upstream_error() {
        let fetcher = HttpPdfFetcher::new(Duration::from_secs(2), 1024).unwrap();
        let err = fetcher
            .fetch_pdf("http://127.0.0.1:9/missing.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Upstream(_)));
    }

    #[tokio::test]
    async fn invalid_url_is_an_upstream_error() {
        let fetcher = HttpPdfFetcher::new(Duration::from_secs(2), 1024).unwrap();
        let err = fetcher.fetch_pdf("not a url").await.unwrap_err();
        assert!(matches!(err, PortError::Upstream(_)));
    }

    #[tokio::test]
    async fn small_body_is_returned_whole() {
        let base = serve_once(response("200 OK", "application/pdf", "%PDF-1.4 tiny")).await;
        let fetcher = HttpPdfFetcher::new(Duration::from_secs(5), 1024).unwrap();

        let body = fetcher.fetch_pdf(&format!("{}/a.pdf", base)).await.unwrap();
        assert_eq!(&body[..], b"%PDF-1.4 tiny");
    }

    #[tokio::test]
    async fn non_success_status_is_an_upstream_error() {
        let base = serve_once(response("404 Not Found", "text/plain", "gone")).await;
        let fetcher = HttpPdfFetcher::new(Duration::from_secs(5), 1024).unwrap();

        let err = fetcher.fetch_pdf(&format!("{}/a.pdf", base)).await.unwrap_err();
        assert!(matches!(err, PortError::Upstream(_)));
    }

    #[tokio::test]
    async fn declared_length_over_the_limit_is_rejected() {
        let body = "x".repeat(2048);
        let base = serve_once(response("200 OK", "application/pdf", &body)).await;
        let fetcher = HttpPdfFetcher::new(Duration::from_secs(5), 1024).unwrap();

        let err = fetcher.fetch_pdf(&format!("{}/a.pdf", base)).await.unwrap_err();
        match err {
            PortError::Upstream(msg) => assert!(msg.contains("2048 bytes"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn chunked_body_over_the_limit_is_rejected_while_reading() {
        let chunk = "y".repeat(512);
        let raw = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n200\r\n{chunk}\r\n200\r\n{chunk}\r\n0\r\n\r\n"
        );
        let base = serve_once(raw).await;
        let fetcher = HttpPdfFetcher::new(Duration::from_secs(5), 600).unwrap();

        let err = fetcher.fetch_pdf(&format!("{}/a.pdf", base)).await.unwrap_err();
        match err {
            PortError::Upstream(msg) => assert!(msg.contains("600 byte limit"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
