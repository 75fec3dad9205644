//! Page-level load state.
//!
//! The page shows a loading indicator while the single fetch is in
//! flight, then either the map or an error with a retry action. There is
//! no partial rendering.

use std::fmt::Display;

use ois_map_incident_models::ShootingIncident;

pub const LOADING_TEXT: &str = "Loading incident data...";
pub const ERROR_HEADING: &str = "Error Loading Data";
pub const RETRY_LABEL: &str = "Try Again";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PageState {
    /// Fetch in flight.
    #[default]
    Loading,
    /// Fetch failed; `message` is shown with a retry action.
    Failed { message: String },
    /// Incidents are ready for the map and list.
    Ready { incidents: Vec<ShootingIncident> },
}

impl PageState {
    /// Resolves the loading state from a fetch outcome.
    pub fn from_result<E: Display>(result: Result<Vec<ShootingIncident>, E>) -> Self {
        match result {
            Ok(incidents) => Self::Ready { incidents },
            Err(e) => {
                log::error!("Failed to load incidents: {e}");
                Self::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// The retry action: start over as a fresh load.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn retry(self) -> Self {
        Self::Loading
    }

    #[must_use]
    pub fn incidents(&self) -> Option<&[ShootingIncident]> {
        match self {
            Self::Ready { incidents } => Some(incidents),
            Self::Loading | Self::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::incident;

    #[test]
    fn resolves_from_fetch_outcome() {
        let ready = PageState::from_result::<String>(Ok(vec![incident("A", "2024-01-01")]));
        assert_eq!(ready.incidents().map(<[_]>::len), Some(1));

        let failed = PageState::from_result::<String>(Err("boom".to_string()));
        assert_eq!(
            failed,
            PageState::Failed {
                message: "boom".to_string()
            }
        );
        assert!(failed.incidents().is_none());
    }

    #[test]
    fn retry_returns_to_loading() {
        let failed = PageState::Failed {
            message: "boom".to_string(),
        };
        assert_eq!(failed.retry(), PageState::Loading);
    }
}
