//! Incident list sidebar.
//!
//! Rows are deduplicated by case number, newest first, each labelled with
//! a coarse relative age.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use ois_map_incident_models::{ShootingIncident, UNKNOWN};

use crate::{Selection, unique_by_case_number};

/// Heading shown above the list.
pub const LIST_HEADER: &str = "Recent Incidents";

const DAYS_PER_MONTH: i64 = 30;

/// One rendered list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    /// Stable row key (`"{caseNumber}-{date}"`).
    pub key: String,
    /// Case number of the incident behind the row.
    pub case_number: String,
    /// Relative age: `"Today"`, `"{n}d"` or `"{n}mo"`.
    pub time_label: String,
    pub incident_type: String,
    pub address: String,
    /// Whether this row is the current selection.
    pub active: bool,
}

/// The list sidebar over one incident set.
#[derive(Debug, Clone)]
pub struct IncidentList<'a> {
    incidents: Vec<&'a ShootingIncident>,
}

impl<'a> IncidentList<'a> {
    /// Builds the list: deduplicated by case number, then sorted newest
    /// first.
    #[must_use]
    pub fn new(incidents: &'a [ShootingIncident]) -> Self {
        let mut incidents = unique_by_case_number(incidents);
        sort_newest_first(&mut incidents);
        Self { incidents }
    }

    /// The incidents in display order.
    #[must_use]
    pub fn incidents(&self) -> &[&'a ShootingIncident] {
        &self.incidents
    }

    /// Renders every row relative to `now`, marking the selected one.
    #[must_use]
    pub fn rows(&self, selection: &Selection, now: DateTime<Utc>) -> Vec<ListRow> {
        self.incidents
            .iter()
            .map(|incident| ListRow {
                key: format!("{}-{}", incident.case_number, incident.date),
                case_number: incident.case_number.clone(),
                time_label: time_ago(incident, now),
                incident_type: incident.incident_type.clone(),
                address: incident.location.address.clone(),
                active: selection.is_selected(incident),
            })
            .collect()
    }

    /// The incident behind a clicked row, to hand to the selection
    /// callback.
    #[must_use]
    pub fn incident_for_row(&self, row: &ListRow) -> Option<&'a ShootingIncident> {
        self.incidents
            .iter()
            .copied()
            .find(|incident| incident.case_number == row.case_number)
    }
}

/// Sorts descending by parsed date. Undated incidents go last; the sort is
/// stable so ties keep input order.
pub fn sort_newest_first(incidents: &mut [&ShootingIncident]) {
    incidents.sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Labels how long ago `incident` happened.
///
/// Less than one whole day (including future dates) is `"Today"`, under 30
/// days is `"{n}d"`, anything older is whole 30-day months.
#[must_use]
pub fn time_ago(incident: &ShootingIncident, now: DateTime<Utc>) -> String {
    let Some(date) = incident.parsed_date() else {
        return UNKNOWN.to_string();
    };

    let days = (now - date).num_days();
    if days < 1 {
        "Today".to_string()
    } else if days < DAYS_PER_MONTH {
        format!("{days}d")
    } else {
        format!("{}mo", days / DAYS_PER_MONTH)
    }
}
