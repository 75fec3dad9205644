//! Incident detail popup.

use std::fmt;

use ois_map_incident_models::ShootingIncident;

use crate::escape_html;

/// CSS class applied to the popup container.
pub const POPUP_CLASS: &str = "incident-details-popup";

/// Link text for the State Attorney's review letter.
pub const REVIEW_LINK_TEXT: &str = "View State Attorney's Review →";

/// Everything the detail popup shows for one incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub case_number: String,
    /// Long-form date (`"January 5, 2024"`), or the raw upstream value if
    /// it does not parse.
    pub date: String,
    pub incident_type: String,
    pub address: String,
    /// Name of the first listed officer.
    pub officer: Option<String>,
    /// State Attorney's review letter.
    pub review_url: Option<String>,
}

impl PopupContent {
    #[must_use]
    pub fn from_incident(incident: &ShootingIncident) -> Self {
        Self {
            case_number: incident.case_number.clone(),
            date: format_long_date(incident),
            incident_type: incident.incident_type.clone(),
            address: incident.location.address.clone(),
            officer: incident
                .officers
                .first()
                .map(|officer| officer.name.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            review_url: incident.state_attorney_letter_url.clone(),
        }
    }

    /// Popup title (`"Case #{caseNumber}"`).
    #[must_use]
    pub fn title(&self) -> String {
        format!("Case #{}", self.case_number)
    }

    /// Renders the popup body markup. Every interpolated value is escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str(r#"<div class="popup-content">"#);
        html.push_str(&format!(
            r#"<h3 class="text-lg font-bold mb-3">{}</h3>"#,
            escape_html(&self.title())
        ));
        html.push_str(r#"<div class="space-y-2">"#);
        push_field(&mut html, "Date", &self.date);
        push_field(&mut html, "Type", &self.incident_type);
        push_field(&mut html, "Location", &self.address);
        if let Some(officer) = &self.officer {
            push_field(&mut html, "Officer", officer);
        }
        if let Some(url) = &self.review_url {
            html.push_str(&format!(
                r#"<div class="mt-3"><a href="{}" target="_blank" rel="noopener noreferrer" class="text-blue-400 hover:text-blue-300 text-sm">{}</a></div>"#,
                escape_html(url),
                escape_html(REVIEW_LINK_TEXT)
            ));
        }
        html.push_str("</div></div>");
        html
    }
}

fn push_field(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!(
        r#"<p class="text-sm"><span class="font-medium">{label}:</span> {}</p>"#,
        escape_html(value)
    ));
}

impl fmt::Display for PopupContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        writeln!(f, "  Date:     {}", self.date)?;
        writeln!(f, "  Type:     {}", self.incident_type)?;
        write!(f, "  Location: {}", self.address)?;
        if let Some(officer) = &self.officer {
            write!(f, "\n  Officer:  {officer}")?;
        }
        if let Some(url) = &self.review_url {
            write!(f, "\n  Review:   {url}")?;
        }
        Ok(())
    }
}

/// Formats the incident date like `"January 5, 2024"`.
#[must_use]
pub fn format_long_date(incident: &ShootingIncident) -> String {
    incident.parsed_date().map_or_else(
        || incident.date.clone(),
        |date| date.format("%B %-d, %Y").to_string(),
    )
}
