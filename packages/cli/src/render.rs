//! Plain-text rendering of the page for the terminal.

use chrono::{DateTime, Utc};
use ois_map_incident_models::ShootingIncident;
use ois_map_view::list::{IncidentList, LIST_HEADER};
use ois_map_view::page::{ERROR_HEADING, LOADING_TEXT, PageState, RETRY_LABEL};
use ois_map_view::{Selection, unique_by_case_number};

/// Renders the page: the incident list, the error view, or the loading
/// text. At most `limit` rows are printed.
#[must_use]
pub fn render_page(
    state: &PageState,
    selection: &Selection,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> String {
    match state {
        PageState::Loading => LOADING_TEXT.to_string(),
        PageState::Failed { message } => {
            format!("{ERROR_HEADING}\n{message}\n\n{RETRY_LABEL}: run the command again")
        }
        PageState::Ready { incidents } => render_list(incidents, selection, now, limit),
    }
}

fn render_list(
    incidents: &[ShootingIncident],
    selection: &Selection,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> String {
    let list = IncidentList::new(incidents);
    let rows = list.rows(selection, now);

    let mut out = format!("{LIST_HEADER} ({})\n", rows.len());
    for row in rows.iter().take(limit.unwrap_or(usize::MAX)) {
        let marker = if row.active { '>' } else { ' ' };
        out.push_str(&format!(
            "{marker} {:>5}  {:<14} {:<32} {}\n",
            row.time_label, row.case_number, row.incident_type, row.address
        ));
    }
    out
}

/// First incident with `case_number`, if any.
#[must_use]
pub fn find_case<'a>(
    incidents: &'a [ShootingIncident],
    case_number: &str,
) -> Option<&'a ShootingIncident> {
    unique_by_case_number(incidents)
        .into_iter()
        .find(|incident| incident.case_number == case_number)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use ois_map_incident_models::{Location, OfficerInfo, SuspectInfo};

    use super::*;

    fn incident(case_number: &str, date: &str) -> ShootingIncident {
        ShootingIncident {
            case_number: case_number.to_string(),
            date: date.to_string(),
            location: Location {
                address: "1 Orange Ave".to_string(),
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

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn renders_rows_newest_first_with_limit() {
        let state = PageState::Ready {
            incidents: vec![
                incident("OLD", "2024-01-01"),
                incident("NEW", "2024-05-27"),
                incident("MID", "2024-03-01"),
            ],
        };

        let out = render_page(&state, &Selection::None, now(), Some(2));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Recent Incidents (3)");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("NEW"));
        assert!(lines[1].contains("5d"));
        assert!(lines[2].contains("MID"));
    }

    #[test]
    fn marks_selected_row() {
        let incidents = vec![incident("A", "2024-05-27")];
        let mut selection = Selection::None;
        selection.select(incidents[0].clone());

        let out = render_page(&PageState::Ready { incidents }, &selection, now(), None);
        assert!(out.lines().nth(1).unwrap().starts_with('>'));
    }

    #[test]
    fn renders_error_view() {
        let state = PageState::Failed {
            message: "Expected array but received: object".to_string(),
        };
        let out = render_page(&state, &Selection::None, now(), None);
        assert!(out.starts_with("Error Loading Data\nExpected array but received: object"));
        assert!(out.contains("Try Again"));
    }

    #[test]
    fn finds_first_case_occurrence() {
        let incidents = vec![incident("A", "2024-01-01"), incident("A", "2024-02-01")];
        assert_eq!(find_case(&incidents, "A").unwrap().date, "2024-01-01");
        assert!(find_case(&incidents, "Z").is_none());
    }
}
