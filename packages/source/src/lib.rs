#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Upstream incident fetching and record normalization.
//!
//! A data provider implements the [`IncidentSource`] trait to fetch raw
//! records and turn them into [`ShootingIncident`]s. Every provider runs
//! its records through the shared [`normalize`] module so there is exactly
//! one mapping from upstream columns to the incident model.

pub mod normalize;
pub mod parsing;
pub mod socrata;

use async_trait::async_trait;
use ois_map_incident_models::ShootingIncident;

/// Errors that abort a fetch.
///
/// The display string of each variant is what the API surfaces to the
/// user, so keep them readable.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("Failed to fetch data: {status} {reason}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase (may be empty).
        reason: String,
    },

    /// Upstream declared a content type other than JSON.
    #[error("Received non-JSON response from data source")]
    NotJson {
        /// The declared `Content-Type`, if any.
        content_type: Option<String>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload parsed but is not an array of records.
    #[error("Expected array but received: {found}")]
    UnexpectedShape {
        /// JSON type name of what was received.
        found: &'static str,
    },
}

/// A provider of officer-involved shooting incidents.
#[async_trait]
pub trait IncidentSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., `"orlando_pd"`).
    fn id(&self) -> &str;

    /// Returns the human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetches the full dataset and normalizes it, preserving upstream
    /// order. Records without a geocoded coordinate are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or the response is not
    /// a JSON array.
    async fn fetch_incidents(&self) -> Result<Vec<ShootingIncident>, SourceError>;
}
