//! Socrata SODA incident source.
//!
//! Fetches the whole dataset with a single uncached GET. There is no
//! pagination or retry: any failure aborts the fetch and is reported to the
//! caller as one [`SourceError`].

use async_trait::async_trait;
use ois_map_incident_models::ShootingIncident;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};

use crate::normalize::normalize_records;
use crate::parsing::{json_type_name, preview};
use crate::{IncidentSource, SourceError};

/// City of Orlando officer-involved shootings dataset.
pub const DEFAULT_API_URL: &str = "https://data.cityoforlando.net/resource/6kz6-6c7n.json";

/// Maximum length of the non-JSON body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 200;

/// Configuration for a Socrata incident source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocrataConfig {
    /// Dataset resource URL (e.g., `"https://data.cityoforlando.net/resource/6kz6-6c7n.json"`).
    pub api_url: String,
    /// Unique source identifier.
    pub id: String,
    /// Label for log messages and display.
    pub label: String,
}

impl Default for SocrataConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            id: "orlando_pd".to_string(),
            label: "Orlando Police Department".to_string(),
        }
    }
}

/// Incident source backed by a Socrata dataset.
pub struct SocrataSource {
    client: reqwest::Client,
    config: SocrataConfig,
}

impl SocrataSource {
    /// Creates a source for `config` with a fresh HTTP client.
    #[must_use]
    pub fn new(config: SocrataConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Creates a source that reuses an existing HTTP client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, config: SocrataConfig) -> Self {
        Self { client, config }
    }

    /// The configuration this source was built with.
    #[must_use]
    pub const fn config(&self) -> &SocrataConfig {
        &self.config
    }
}

impl Default for SocrataSource {
    fn default() -> Self {
        Self::new(SocrataConfig::default())
    }
}

#[async_trait]
impl IncidentSource for SocrataSource {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.label
    }

    async fn fetch_incidents(&self) -> Result<Vec<ShootingIncident>, SourceError> {
        log::info!("Fetching {} incidents from {}", self.config.label, self.config.api_url);

        let response = self
            .client
            .get(&self.config.api_url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        check_status(status)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text().await?;

        let incidents = decode_response(status, content_type.as_deref(), &body)?;
        log::info!(
            "Normalized {} {} incidents",
            incidents.len(),
            self.config.label
        );
        Ok(incidents)
    }
}

/// Validates an upstream response and normalizes its records.
///
/// Checks, in order: 2xx status, a JSON content type, a parseable body,
/// and a top-level array.
///
/// # Errors
///
/// Returns the [`SourceError`] for the first check that fails.
pub fn decode_response(
    status: StatusCode,
    content_type: Option<&str>,
    body: &str,
) -> Result<Vec<ShootingIncident>, SourceError> {
    check_status(status)?;

    if !content_type.is_some_and(|ct| ct.contains("application/json")) {
        log::error!(
            "Received non-JSON response ({content_type:?}): {}",
            preview(body, BODY_PREVIEW_LEN)
        );
        return Err(SourceError::NotJson {
            content_type: content_type.map(String::from),
        });
    }

    let payload: serde_json::Value = serde_json::from_str(body)?;
    let records = match payload {
        serde_json::Value::Array(records) => records,
        other => {
            return Err(SourceError::UnexpectedShape {
                found: json_type_name(&other),
            });
        }
    };

    log::debug!("Received {} upstream records", records.len());
    Ok(normalize_records(&records))
}

fn check_status(status: StatusCode) -> Result<(), SourceError> {
    if status.is_success() {
        return Ok(());
    }

    Err(SourceError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: Option<&str> = Some("application/json;charset=utf-8");

    #[test]
    fn decodes_geocoded_records() {
        let body = r#"[
            {"case":"A1","date":"2024-01-01","geocoded_column":{"coordinates":[-81.0,28.5]},
             "address":"123 Main","incident_type":"Shooting"},
            {"case":"B2","address":"No coordinates"}
        ]"#;

        let incidents = decode_response(StatusCode::OK, JSON, body).unwrap();
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].case_number, "A1");
        assert_eq!(incidents[0].officers[0].name, "Unknown");
        assert_eq!(incidents[0].suspects[0].name, "Unknown");
    }

    #[test]
    fn rejects_error_status() {
        let err = decode_response(StatusCode::NOT_FOUND, JSON, "[]").unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch data: 404 Not Found");
    }

    #[test]
    fn rejects_non_json_content_type() {
        let err = decode_response(StatusCode::OK, Some("text/html"), "<html></html>").unwrap_err();
        assert!(matches!(err, SourceError::NotJson { .. }));
        assert_eq!(
            err.to_string(),
            "Received non-JSON response from data source"
        );

        let missing = decode_response(StatusCode::OK, None, "[]").unwrap_err();
        assert!(matches!(missing, SourceError::NotJson { content_type: None }));
    }

    #[test]
    fn rejects_non_array_payload() {
        let err = decode_response(StatusCode::OK, JSON, r#"{"error":"nope"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Expected array but received: object");

        let err = decode_response(StatusCode::OK, JSON, "\"text\"").unwrap_err();
        assert_eq!(err.to_string(), "Expected array but received: string");
    }

    #[test]
    fn rejects_unparseable_body() {
        let err = decode_response(StatusCode::OK, JSON, "[{").unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }

    #[test]
    fn default_config_points_at_orlando_dataset() {
        let source = SocrataSource::default();
        assert_eq!(source.config().api_url, DEFAULT_API_URL);
        assert_eq!(source.id(), "orlando_pd");
    }

    #[tokio::test]
    async fn error_status_wins_over_truncated_body() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0_u8; 1024];
            let _ = socket.read(&mut request).await.unwrap();
            // Declares more body than it sends, then hangs up.
            socket
                .write_all(
                    b"HTTP/1.1 503 Service Unavailable\r\n\
                      Content-Type: text/plain\r\n\
                      Content-Length: 1000\r\n\r\nshort",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let source = SocrataSource::new(SocrataConfig {
            api_url: format!("http://{addr}/resource.json"),
            ..SocrataConfig::default()
        });
        let err = source.fetch_incidents().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch data: 503 Service Unavailable"
        );
    }

    #[tokio::test]
    async fn unreachable_upstream_is_http_error() {
        let source = SocrataSource::new(SocrataConfig {
            api_url: "http://127.0.0.1:1/resource.json".to_string(),
            ..SocrataConfig::default()
        });
        let err = source.fetch_incidents().await.unwrap_err();
        assert!(matches!(err, SourceError::Http(_)));
    }
}
