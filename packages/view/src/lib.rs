#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Headless view logic for the incident map.
//!
//! The list sidebar and the map share one [`Selection`]. The map talks to
//! its rendering substrate only through the [`map::MapRenderer`]
//! capability trait, so everything here runs and is tested without a
//! browser.

pub mod list;
pub mod map;
pub mod page;
pub mod popup;
pub mod selection;

use std::collections::HashSet;

use ois_map_incident_models::ShootingIncident;

pub use selection::Selection;

/// Drops incidents whose case number was already seen, keeping the first
/// occurrence in input order.
#[must_use]
pub fn unique_by_case_number(incidents: &[ShootingIncident]) -> Vec<&ShootingIncident> {
    let mut seen = HashSet::new();
    incidents
        .iter()
        .filter(|incident| seen.insert(incident.case_number.as_str()))
        .collect()
}

/// HTML-escapes text interpolated into marker and popup markup.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod fixtures {
    use ois_map_incident_models::{Location, OfficerInfo, ShootingIncident, SuspectInfo};

    pub fn incident(case_number: &str, date: &str) -> ShootingIncident {
        ShootingIncident {
            case_number: case_number.to_string(),
            date: date.to_string(),
            location: Location {
                address: format!("{case_number} Main St"),
                latitude: 28.5,
                longitude: -81.3,
            },
            incident_type: "Shooting".to_string(),
            officers: vec![OfficerInfo::unknown()],
            suspects: vec![SuspectInfo::unknown()],
            narrative: None,
            state_attorney_letter_url: None,
        }
    }
}
