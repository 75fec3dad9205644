//! The single selected incident shared by the list and the map.

use ois_map_incident_models::ShootingIncident;

/// Either nothing is selected or exactly one incident is.
///
/// Incidents are compared by case number.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    /// No incident selected.
    #[default]
    None,
    /// The given incident is selected.
    Selected(ShootingIncident),
}

impl Selection {
    /// Selects `incident`, replacing any previous selection.
    ///
    /// Returns `false` if the same case was already selected.
    pub fn select(&mut self, incident: ShootingIncident) -> bool {
        let changed = !self.is_selected(&incident);
        *self = Self::Selected(incident);
        changed
    }

    /// Clears the selection. Returns `true` if something was selected.
    pub fn clear(&mut self) -> bool {
        !matches!(std::mem::take(self), Self::None)
    }

    /// The selected incident, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&ShootingIncident> {
        match self {
            Self::None => None,
            Self::Selected(incident) => Some(incident),
        }
    }

    /// Whether `incident` is the selected one.
    #[must_use]
    pub fn is_selected(&self, incident: &ShootingIncident) -> bool {
        self.current().is_some_and(|current| current.same_case(incident))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::incident;

    #[test]
    fn select_then_clear() {
        let mut selection = Selection::default();
        assert!(selection.current().is_none());

        assert!(selection.select(incident("A", "2024-01-01")));
        assert_eq!(selection.current().unwrap().case_number, "A");

        assert!(selection.clear());
        assert_eq!(selection, Selection::None);
        assert!(!selection.clear());
    }

    #[test]
    fn reselecting_same_case_is_not_a_change() {
        let mut selection = Selection::default();
        selection.select(incident("A", "2024-01-01"));
        assert!(!selection.select(incident("A", "2024-01-01")));
        assert!(selection.select(incident("B", "2024-01-01")));
        assert!(selection.is_selected(&incident("B", "1999-01-01")));
        assert!(!selection.is_selected(&incident("A", "2024-01-01")));
    }
}
