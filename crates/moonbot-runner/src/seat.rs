//! Report service client.
//!
//! Fetches the public moon extraction report as a JSON document over HTTP
//! via `reqwest`. Exactly one attempt is made per trigger; the client's
//! timeout bounds how long a report can wait on the service.

use moonbot_types::{ReportDocument, decode_document};
use tracing::debug;

use crate::config::SeatConfig;
use crate::error::RunnerError;

/// HTTP client for the report service.
pub struct SeatClient {
    client: reqwest::Client,
    url: String,
    token: String,
}

/// Public report URL for a service host and slug.
pub fn report_url(host: &str, slug: &str) -> String {
    format!("{}/moonbot/public/{slug}", host.trim_end_matches('/'))
}

impl SeatClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &SeatConfig) -> Result<Self, RunnerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RunnerError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: report_url(&config.host, &config.slug),
            token: config.token.clone(),
        })
    }

    /// The URL this client fetches.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode the current report document.
    ///
    /// # Errors
    ///
    /// - [`RunnerError::Request`] if the request cannot be built.
    /// - [`RunnerError::Fetch`] on transport failure or a non-success status.
    /// - [`RunnerError::Decode`] if the body is not a valid document.
    pub async fn fetch(&self) -> Result<ReportDocument, RunnerError> {
        let request = self
            .client
            .get(&self.url)
            .header("Authorization", &self.token)
            .header("Accept", "application/json")
            .build()
            .map_err(|e| RunnerError::Request(e.to_string()))?;

        debug!(url = self.url, "fetching extraction report");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| RunnerError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RunnerError::Fetch(format!("report service returned {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RunnerError::Fetch(e.to_string()))?;

        let document = decode_document(&body).map_err(|e| RunnerError::Decode(e.to_string()))?;
        debug!(
            url = self.url,
            bytes = body.len(),
            records = document.len(),
            "extraction report decoded"
        );
        Ok(document)
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! Single-shot HTTP responder for exercising the client.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and hand back the raw request text.
    ///
    /// Returns the base URL to point a client at, or `None` if no local
    /// port could be bound.
    pub(crate) async fn serve_once(
        status_line: &'static str,
        body: String,
    ) -> Option<(String, JoinHandle<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await.ok()?;
        let addr = listener.local_addr().ok()?;
        let handle = tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return String::new();
            };
            let mut buf = vec![0_u8; 8192];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(buf.get(..n).unwrap_or_default()),
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });
        Some((format!("http://{addr}"), handle))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::net::TcpListener;

    use super::test_server::serve_once;
    use super::*;

    fn config(host: String) -> SeatConfig {
        SeatConfig {
            host,
            slug: "5bc10e8e".to_owned(),
            token: "token-123".to_owned(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn builds_public_report_url() {
        assert_eq!(
            report_url("https://seat.example.com/", "abc"),
            "https://seat.example.com/moonbot/public/abc"
        );
        assert_eq!(
            report_url("https://seat.example.com", "abc"),
            "https://seat.example.com/moonbot/public/abc"
        );
    }

    #[tokio::test]
    async fn fetches_and_decodes_document() {
        let body = serde_json::json!([{
            "id": 1,
            "extraction_start_time": "2021-08-18 01:28:18",
            "chunk_arrival_time": "2021-08-19 01:28:18",
            "moon": { "moon_id": 40_000_001, "name": "Moon" }
        }])
        .to_string();
        let served = serve_once("200 OK", body).await;
        assert!(served.is_some(), "local listener failed to bind");
        let Some((host, server)) = served else { return };

        let client = SeatClient::new(&config(host));
        assert!(client.is_ok());
        let Ok(client) = client else { return };
        let document = client.fetch().await;
        assert_eq!(document.map(|d| d.len()).ok(), Some(1));

        let request = server.await.unwrap_or_default().to_lowercase();
        assert!(request.starts_with("get /moonbot/public/5bc10e8e "));
        assert!(request.contains("authorization: token-123"));
    }

    #[tokio::test]
    async fn error_status_is_fetch_failure() {
        let served = serve_once("401 Unauthorized", "{}".to_owned()).await;
        assert!(served.is_some(), "local listener failed to bind");
        let Some((host, _server)) = served else { return };
        let client = SeatClient::new(&config(host));
        assert!(client.is_ok());
        let Ok(client) = client else { return };
        let result = client.fetch().await;
        assert!(matches!(result, Err(RunnerError::Fetch(msg)) if msg.contains("401")));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_failure() {
        let served = serve_once("200 OK", "{\"oops\": true}".to_owned()).await;
        assert!(served.is_some(), "local listener failed to bind");
        let Some((host, _server)) = served else { return };
        let client = SeatClient::new(&config(host));
        assert!(client.is_ok());
        let Ok(client) = client else { return };
        let result = client.fetch().await;
        assert!(matches!(result, Err(RunnerError::Decode(_))));
    }

    #[tokio::test]
    async fn unreachable_service_is_fetch_failure() {
        // Bind then drop to obtain a port with nothing listening.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.ok();
            listener
                .and_then(|l| l.local_addr().ok())
                .map(|a| a.to_string())
                .unwrap_or_default()
        };
        assert!(!addr.is_empty(), "local listener failed to bind");
        let client = SeatClient::new(&config(format!("http://{addr}")));
        assert!(client.is_ok());
        let Ok(client) = client else { return };
        let result = client.fetch().await;
        assert!(matches!(result, Err(RunnerError::Fetch(_))));
    }
}
