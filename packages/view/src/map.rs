//! Map view controller.
//!
//! [`MapController`] owns the marker set, the open popup and the shared
//! [`Selection`]. It drives the rendering substrate (`MapLibre` in the
//! browser) through the [`MapRenderer`] capability trait and never touches
//! it otherwise.
//!
//! Selection is a two-state machine: nothing selected, or one incident
//! selected with its popup open. Selecting any incident from either state
//! closes the prior popup and opens one for the new incident, so at most
//! one popup exists at a time. Closing the popup returns to nothing
//! selected.

use std::time::Duration;

use ois_map_incident_models::{Coordinate, ShootingIncident};
use strum_macros::{AsRefStr, Display};

use crate::popup::{POPUP_CLASS, PopupContent};
use crate::{Selection, unique_by_case_number};

/// Dark basemap style.
pub const DEFAULT_STYLE_URL: &str =
    "https://basemaps.cartocdn.com/gl/dark-matter-gl-style/style.json";

/// Downtown Orlando.
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(-81.379_234, 28.538_336);

pub const DEFAULT_ZOOM: f64 = 11.0;

/// Zoom level the camera flies to when an incident is selected.
pub const SELECTED_ZOOM: f64 = 15.0;

pub const FLY_TO_DURATION: Duration = Duration::from_millis(1000);

const MARKER_CLASS: &str = "marker-container";
const SELECTED_CLASS: &str = "selected";

/// Location pin, 24x32, anchored at its bottom tip.
const MARKER_SVG: &str = r##"<svg width="24" height="32" viewBox="0 0 24 32" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M12 0C5.37 0 0 5.37 0 12c0 9 12 20 12 20s12-11 12-20c0-6.63-5.37-12-12-12zm0 16c-2.21 0-4-1.79-4-4s1.79-4 4-4 4 1.79 4 4-1.79 4-4 4z" fill="#60A5FA"/></svg>"##;

/// Handle to a marker placed by a [`MapRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Handle to a popup shown by a [`MapRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopupId(pub u64);

/// Corner of the map a control is docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Which point of a marker element sits on its coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum MarkerAnchor {
    Center,
    Bottom,
}

/// Initial map configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Style document URL.
    pub style_url: String,
    /// Initial center.
    pub center: Coordinate,
    /// Initial zoom level.
    pub zoom: f64,
    /// Corner the navigation control is docked to.
    pub control_position: ControlPosition,
    /// Whether the navigation control shows a compass.
    pub show_compass: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            style_url: DEFAULT_STYLE_URL.to_string(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            control_position: ControlPosition::TopRight,
            show_compass: false,
        }
    }
}

/// A marker to place.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// Where the marker is placed.
    pub coordinate: Coordinate,
    /// Which point of the marker element sits on `coordinate`.
    pub anchor: MarkerAnchor,
    /// Inner markup of the marker element.
    pub html: String,
    /// CSS classes of the marker element.
    pub class_name: String,
    /// Whether the marker's incident is the current selection.
    pub selected: bool,
}

impl MarkerSpec {
    /// Marker for `incident`, highlighted when `selected`.
    #[must_use]
    pub fn for_incident(incident: &ShootingIncident, selected: bool) -> Self {
        let class_name = if selected {
            format!("{MARKER_CLASS} {SELECTED_CLASS}")
        } else {
            MARKER_CLASS.to_string()
        };
        Self {
            coordinate: incident.location.coordinate(),
            anchor: MarkerAnchor::Bottom,
            html: MARKER_SVG.to_string(),
            class_name,
            selected,
        }
    }
}

/// A popup to show.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupSpec {
    /// Where the popup is anchored.
    pub coordinate: Coordinate,
    /// Popup body markup, already escaped.
    pub html: String,
    /// Whether the popup has a close button.
    pub close_button: bool,
    /// Whether clicking elsewhere on the map closes the popup.
    pub close_on_click: bool,
    /// CSS max width (e.g., `"300px"`).
    pub max_width: String,
    /// CSS class of the popup element.
    pub class_name: String,
}

impl PopupSpec {
    /// Detail popup for `incident`.
    #[must_use]
    pub fn for_incident(incident: &ShootingIncident) -> Self {
        Self {
            coordinate: incident.location.coordinate(),
            html: PopupContent::from_incident(incident).to_html(),
            close_button: true,
            close_on_click: false,
            max_width: "300px".to_string(),
            class_name: POPUP_CLASS.to_string(),
        }
    }
}

/// Capabilities the controller needs from a map rendering substrate.
pub trait MapRenderer {
    /// Instantiates the map.
    fn create_map(&mut self, options: &MapOptions);

    /// Adds zoom buttons (and optionally a compass).
    fn add_navigation_control(&mut self, position: ControlPosition, show_compass: bool);

    /// Places a marker and returns its handle.
    fn place_marker(&mut self, marker: &MarkerSpec) -> MarkerId;

    fn remove_marker(&mut self, id: MarkerId);

    /// Animates the camera to `center`.
    fn fly_to(&mut self, center: Coordinate, zoom: f64, duration: Duration);

    /// Opens a popup and returns its handle. The renderer reports a user
    /// closing it through [`MapController::on_popup_closed`].
    fn show_popup(&mut self, popup: &PopupSpec) -> PopupId;

    fn remove_popup(&mut self, id: PopupId);

    /// Tears down the map instance.
    fn destroy_map(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Unmounted,
    /// Map created, style still loading.
    Mounted,
    Loaded,
}

/// Owned map view state.
pub struct MapController<R: MapRenderer> {
    renderer: R,
    options: MapOptions,
    lifecycle: Lifecycle,
    incidents: Vec<ShootingIncident>,
    markers: Vec<(MarkerId, ShootingIncident)>,
    popup: Option<PopupId>,
    selection: Selection,
}

impl<R: MapRenderer> MapController<R> {
    /// Creates an unmounted controller.
    #[must_use]
    pub fn new(renderer: R, options: MapOptions) -> Self {
        Self {
            renderer,
            options,
            lifecycle: Lifecycle::Unmounted,
            incidents: Vec::new(),
            markers: Vec::new(),
            popup: None,
            selection: Selection::None,
        }
    }

    /// Creates the map and its navigation control. No-op if already
    /// mounted.
    pub fn mount(&mut self) {
        if self.lifecycle != Lifecycle::Unmounted {
            return;
        }
        self.renderer.create_map(&self.options);
        self.renderer
            .add_navigation_control(self.options.control_position, self.options.show_compass);
        self.lifecycle = Lifecycle::Mounted;
    }

    /// Called once the map has finished loading. Markers are only placed
    /// from this point on.
    pub fn on_load(&mut self) {
        if self.lifecycle == Lifecycle::Unmounted {
            log::warn!("Map load event received while unmounted");
            return;
        }
        self.lifecycle = Lifecycle::Loaded;
        self.refresh_markers();
    }

    /// Replaces the incident set and redraws markers.
    pub fn set_incidents(&mut self, incidents: Vec<ShootingIncident>) {
        self.incidents = incidents;
        self.refresh_markers();
    }

    /// Selects `incident`: flies to it, opens its popup (closing any other)
    /// and highlights its marker.
    ///
    /// Returns `false` if the map has not loaded yet.
    pub fn select(&mut self, incident: &ShootingIncident) -> bool {
        if self.lifecycle != Lifecycle::Loaded {
            log::debug!("Ignoring selection of {} before map load", incident.case_number);
            return false;
        }

        self.close_popup();
        self.selection.select(incident.clone());

        self.renderer.fly_to(
            incident.location.coordinate(),
            SELECTED_ZOOM,
            FLY_TO_DURATION,
        );
        self.popup = Some(self.renderer.show_popup(&PopupSpec::for_incident(incident)));

        self.refresh_markers();
        true
    }

    /// Handles a marker click. Returns `false` for unknown markers.
    pub fn on_marker_click(&mut self, id: MarkerId) -> bool {
        let Some(incident) = self
            .markers
            .iter()
            .find(|(marker, _)| *marker == id)
            .map(|(_, incident)| incident.clone())
        else {
            return false;
        };
        self.select(&incident)
    }

    /// Handles the user closing a popup. Stale popup ids are ignored.
    pub fn on_popup_closed(&mut self, id: PopupId) {
        if self.popup != Some(id) {
            return;
        }
        self.popup = None;
        if self.selection.clear() {
            self.refresh_markers();
        }
    }

    /// Closes the popup and clears the selection.
    pub fn deselect(&mut self) {
        self.close_popup();
        if self.selection.clear() {
            self.refresh_markers();
        }
    }

    /// Removes all markers and the popup, then destroys the map. State is
    /// reset as if the controller were new.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }
        self.clear_markers();
        self.close_popup();
        self.renderer.destroy_map();
        self.selection = Selection::None;
        self.lifecycle = Lifecycle::Unmounted;
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Currently open popup.
    #[must_use]
    pub const fn popup(&self) -> Option<PopupId> {
        self.popup
    }

    /// Placed markers with the incident each one represents.
    #[must_use]
    pub fn markers(&self) -> &[(MarkerId, ShootingIncident)] {
        &self.markers
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Loaded)
    }

    fn close_popup(&mut self) {
        if let Some(id) = self.popup.take() {
            self.renderer.remove_popup(id);
        }
    }

    fn clear_markers(&mut self) {
        for (id, _) in self.markers.drain(..) {
            self.renderer.remove_marker(id);
        }
    }

    fn refresh_markers(&mut self) {
        if self.lifecycle != Lifecycle::Loaded {
            return;
        }
        self.clear_markers();

        for incident in unique_by_case_number(&self.incidents) {
            let spec = MarkerSpec::for_incident(incident, self.selection.is_selected(incident));
            let id = self.renderer.place_marker(&spec);
            self.markers.push((id, incident.clone()));
        }
        log::trace!("Placed {} markers", self.markers.len());
    }
}

impl<R: MapRenderer> Drop for MapController<R> {
    fn drop(&mut self) {
        self.unmount();
    }
}
