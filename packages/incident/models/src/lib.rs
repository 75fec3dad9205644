#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Officer-involved shooting incident types.
//!
//! Every upstream record that carries a geocoded coordinate is normalized
//! into a [`ShootingIncident`]. These types are also the JSON contract of
//! the `/api/incidents` endpoint, so field names serialize in camelCase.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder used wherever the upstream record omits a value that the
/// incident model requires.
pub const UNKNOWN: &str = "Unknown";

/// A `(longitude, latitude)` pair in WGS84, the order map substrates
/// expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from longitude and latitude.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Where an incident took place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Street address as reported upstream.
    pub address: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

impl Location {
    /// Returns the location as a map coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.longitude, self.latitude)
    }
}

/// An officer involved in a shooting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerInfo {
    /// Officer name, or `"Unknown"`.
    pub name: String,
    /// Badge number. Not published by the Orlando dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_number: Option<String>,
    /// Race as reported upstream (e.g., `"W"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    /// Ethnicity. Not published by the Orlando dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<String>,
    /// Gender as reported upstream (e.g., `"M"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Years of service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure: Option<u32>,
}

impl OfficerInfo {
    /// An officer entry with no known attributes.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            ..Self::default()
        }
    }
}

/// A suspect's age, which upstream sometimes reports as the literal
/// string `"Unknown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuspectAge {
    /// Age in years.
    Years(u32),
    /// Upstream explicitly marked the age as unknown.
    Unknown(UnknownAge),
}

/// Serde helper matching only the string `"Unknown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownAge {
    Unknown,
}

impl SuspectAge {
    /// Returns the age in years if known.
    #[must_use]
    pub const fn years(self) -> Option<u32> {
        match self {
            Self::Years(years) => Some(years),
            Self::Unknown(_) => None,
        }
    }
}

impl std::fmt::Display for SuspectAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Years(years) => write!(f, "{years}"),
            Self::Unknown(_) => f.write_str(UNKNOWN),
        }
    }
}

/// A suspect involved in a shooting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspectInfo {
    /// Suspect name, or `"Unknown"`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<SuspectAge>,
    /// Weapon the suspect carried, as described upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<String>,
    /// Whether the suspect was struck.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub was_hit: Option<bool>,
    /// Whether the shooting was fatal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub was_fatal: Option<bool>,
}

impl SuspectInfo {
    /// A suspect entry with no known attributes.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            ..Self::default()
        }
    }
}

/// An officer-involved shooting normalized from one upstream record.
///
/// `case_number` is used as the identity for deduplication and selection,
/// though upstream does not guarantee it to be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootingIncident {
    /// Agency case number, or `"Unknown"`.
    pub case_number: String,
    /// Date as reported upstream (free text, usually a Socrata floating
    /// timestamp).
    pub date: String,
    /// Geocoded location. Always present.
    pub location: Location,
    /// Incident classification, or `"Unknown"`.
    pub incident_type: String,
    /// Officers involved. Never empty.
    pub officers: Vec<OfficerInfo>,
    /// Suspects involved. Never empty.
    pub suspects: Vec<SuspectInfo>,
    /// Free-text account of the incident.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    /// Link to the State Attorney's review letter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_attorney_letter_url: Option<String>,
}

impl ShootingIncident {
    /// Parses [`Self::date`] into a UTC timestamp.
    #[must_use]
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        parse_incident_date(&self.date)
    }

    /// Whether two incidents share a case number.
    #[must_use]
    pub fn same_case(&self, other: &Self) -> bool {
        self.case_number == other.case_number
    }
}

/// Parses an upstream incident date.
///
/// Accepts Socrata floating timestamps (with or without fractional
/// seconds), RFC 3339 timestamps, and bare `YYYY-MM-DD` dates. Floating
/// timestamps are interpreted as UTC.
#[must_use]
pub fn parse_incident_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident() -> ShootingIncident {
        ShootingIncident {
            case_number: "A1".to_string(),
            date: "2024-01-01".to_string(),
            location: Location {
                address: "123 Main".to_string(),
                latitude: 28.5,
                longitude: -81.0,
            },
            incident_type: "Shooting".to_string(),
            officers: vec![OfficerInfo::unknown()],
            suspects: vec![SuspectInfo::unknown()],
            narrative: None,
            state_attorney_letter_url: None,
        }
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_fields() {
        let value = serde_json::to_value(incident()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "caseNumber": "A1",
                "date": "2024-01-01",
                "location": { "address": "123 Main", "latitude": 28.5, "longitude": -81.0 },
                "incidentType": "Shooting",
                "officers": [{ "name": "Unknown" }],
                "suspects": [{ "name": "Unknown" }],
            })
        );
    }

    #[test]
    fn suspect_age_accepts_number_or_unknown() {
        let known: SuspectAge = serde_json::from_str("34").unwrap();
        assert_eq!(known.years(), Some(34));

        let unknown: SuspectAge = serde_json::from_str("\"Unknown\"").unwrap();
        assert_eq!(unknown.years(), None);
        assert_eq!(unknown.to_string(), "Unknown");
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"Unknown\"");
    }

    #[test]
    fn coordinate_is_longitude_first() {
        let c = incident().location.coordinate();
        assert!((c.longitude - -81.0).abs() < f64::EPSILON);
        assert!((c.latitude - 28.5).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_socrata_floating_timestamp() {
        let dt = parse_incident_date("2024-01-15T14:30:00.000").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 14:30:00 UTC");
    }

    #[test]
    fn parses_bare_date() {
        let dt = parse_incident_date("2024-01-01").unwrap();
        assert_eq!(dt.to_string(), "2024-01-01 00:00:00 UTC");
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_incident_date("2024-01-15T09:30:00-05:00").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 14:30:00 UTC");
    }

    #[test]
    fn rejects_unknown_date() {
        assert!(parse_incident_date(UNKNOWN).is_none());
    }
}
