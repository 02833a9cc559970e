use std::fmt::{Display, Formatter};
use std::str::FromStr;

use kartograf_types::geo::{GeoDelta, GeoPoint, GeoPoint2d, MAX_ZOOM, MIN_ZOOM};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::KartografError;

/// Rendering style of the map image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    /// Standard street map.
    #[default]
    Map,
    /// Satellite imagery.
    Satellite,
    /// Satellite imagery with street and label overlay.
    Hybrid,
}

impl Layout {
    /// All layouts in the cycling order.
    pub const ALL: [Layout; 3] = [Layout::Map, Layout::Satellite, Layout::Hybrid];

    /// Value of the `l` parameter of the static map service.
    pub fn wire_code(&self) -> &'static str {
        match self {
            Layout::Map => "map",
            Layout::Satellite => "sat",
            Layout::Hybrid => "sat,skl",
        }
    }

    /// Layout following this one: `Map -> Satellite -> Hybrid -> Map`.
    pub fn next(&self) -> Self {
        match self {
            Layout::Map => Layout::Satellite,
            Layout::Satellite => Layout::Hybrid,
            Layout::Hybrid => Layout::Map,
        }
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_code())
    }
}

impl FromStr for Layout {
    type Err = KartografError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layout::ALL
            .into_iter()
            .find(|layout| layout.wire_code() == s)
            .ok_or_else(|| KartografError::Generic(format!("unknown layout code: {s}")))
    }
}

/// A pin placed by a search or a click, together with the address resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Position of the pin.
    pub position: GeoPoint2d,
    /// Human-readable address of the position, if known.
    pub address: Option<String>,
    /// Postal code of the address, if known.
    pub postal_code: Option<String>,
}

/// Authoritative state of the map view: what is shown and where the marker is.
///
/// Every mutator keeps the state valid: longitude stays in `[-180, 180]`, latitude in `[-90, 90]`,
/// zoom in `[1, 17]`. A mutation that would break one of these is rejected without any change and
/// reported by returning `false`. Address and postal code only exist together with the marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewState {
    center: GeoPoint2d,
    zoom: u8,
    layout: Layout,
    marker: Option<Marker>,
    show_postal_code: bool,
}

impl MapViewState {
    /// Creates a state with no marker. Returns `None` if the center or zoom are out of range.
    pub fn new(center: GeoPoint2d, zoom: u8, layout: Layout) -> Option<Self> {
        if !center.is_valid() || !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return None;
        }

        Some(Self {
            center,
            zoom,
            layout,
            marker: None,
            show_postal_code: false,
        })
    }

    /// Center of the map.
    pub fn center(&self) -> GeoPoint2d {
        self.center
    }

    /// Longitude of the map center.
    pub fn longitude(&self) -> f64 {
        self.center.lon()
    }

    /// Latitude of the map center.
    pub fn latitude(&self) -> f64 {
        self.center.lat()
    }

    /// Current zoom level.
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Current layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// The marker, if one is placed.
    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    /// Address resolved for the marker.
    pub fn address(&self) -> Option<&str> {
        self.marker.as_ref()?.address.as_deref()
    }

    /// Postal code resolved for the marker.
    pub fn postal_code(&self) -> Option<&str> {
        self.marker.as_ref()?.postal_code.as_deref()
    }

    /// Whether the postal code is appended to the formatted address.
    pub fn show_postal_code(&self) -> bool {
        self.show_postal_code
    }

    pub(crate) fn set_zoom(&mut self, zoom: i32) -> bool {
        match u8::try_from(zoom) {
            Ok(zoom) if (MIN_ZOOM..=MAX_ZOOM).contains(&zoom) => {
                self.zoom = zoom;
                true
            }
            _ => {
                debug!("Zoom {zoom} rejected, staying at {}", self.zoom);
                false
            }
        }
    }

    pub(crate) fn change_zoom(&mut self, delta: i32) -> bool {
        self.set_zoom(i32::from(self.zoom).saturating_add(delta))
    }

    pub(crate) fn move_center(&mut self, delta: GeoDelta) -> bool {
        match self.center.checked_add(delta) {
            Some(center) => {
                self.center = center;
                true
            }
            None => {
                debug!("Move by {delta:?} from {} rejected", self.center);
                false
            }
        }
    }

    pub(crate) fn set_center(&mut self, center: GeoPoint2d) -> bool {
        if center.is_valid() {
            self.center = center;
            true
        } else {
            debug!("Center {center} rejected");
            false
        }
    }

    pub(crate) fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    pub(crate) fn set_marker(
        &mut self,
        position: GeoPoint2d,
        address: Option<String>,
        postal_code: Option<String>,
    ) -> bool {
        if !position.is_valid() {
            debug!("Marker at {position} rejected");
            return false;
        }

        self.marker = Some(Marker {
            position,
            address,
            postal_code,
        });
        true
    }

    /// Updates the address of the marker if it is still at `position`.
    pub(crate) fn set_marker_address(
        &mut self,
        position: GeoPoint2d,
        address: Option<String>,
        postal_code: Option<String>,
    ) -> bool {
        match &mut self.marker {
            Some(marker) if marker.position == position => {
                marker.address = address;
                marker.postal_code = postal_code;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn clear_marker(&mut self) {
        self.marker = None;
    }

    pub(crate) fn set_show_postal_code(&mut self, show: bool) {
        self.show_postal_code = show;
    }

    /// Pan step at the current zoom, see [`MapViewState::move_delta_at`].
    pub fn move_delta(&self) -> f64 {
        Self::move_delta_at(self.zoom)
    }

    /// Pan step in degrees at the given zoom: `0.001 * (18 - zoom)^2`.
    pub fn move_delta_at(zoom: u8) -> f64 {
        let steps = f64::from(MAX_ZOOM + 1) - f64::from(zoom);
        0.001 * steps * steps
    }

    /// Address label for display: the address alone, or `"{address}, {postal code}"` when the postal
    /// code display is enabled and the postal code is known. `None` without a marker.
    pub fn format_address(&self) -> Option<String> {
        let marker = self.marker.as_ref()?;
        let address = marker.address.as_deref()?;

        match (&marker.postal_code, self.show_postal_code) {
            (Some(postal_code), true) => Some(format!("{address}, {postal_code}")),
            _ => Some(address.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kartograf_types::lonlat;

    use super::*;

    fn state() -> MapViewState {
        MapViewState::new(lonlat!(37.91, 59.13), 12, Layout::Map).expect("valid state")
    }

    #[test]
    fn new_rejects_invalid_values() {
        assert!(MapViewState::new(lonlat!(181.0, 0.0), 12, Layout::Map).is_none());
        assert!(MapViewState::new(lonlat!(0.0, 0.0), 0, Layout::Map).is_none());
        assert!(MapViewState::new(lonlat!(0.0, 0.0), 18, Layout::Map).is_none());
    }

    #[test]
    fn set_zoom_rejects_out_of_range() {
        let mut state = state();
        for zoom in [-300, -1, 0, 18, 100, 256, i32::MAX] {
            assert!(!state.set_zoom(zoom));
            assert_eq!(state.zoom(), 12);
        }

        assert!(state.set_zoom(1));
        assert_eq!(state.zoom(), 1);
        assert!(state.set_zoom(17));
        assert_eq!(state.zoom(), 17);
    }

    #[test]
    fn change_zoom_scenario() {
        let mut state = state();
        assert!(state.change_zoom(1));
        assert_eq!(state.zoom(), 13);
        assert!(!state.change_zoom(10));
        assert_eq!(state.zoom(), 13);
        assert!(!state.change_zoom(i32::MAX));
        assert_eq!(state.zoom(), 13);
    }

    #[test]
    fn move_center_rejects_out_of_range() {
        let mut state = state();
        let before = state.center();

        for delta in [
            GeoDelta::new(150.0, 0.0),
            GeoDelta::new(-220.0, 0.0),
            GeoDelta::new(0.0, 31.0),
            GeoDelta::new(0.0, -150.0),
        ] {
            assert!(!state.move_center(delta));
            assert_eq!(state.center(), before);
        }

        assert!(state.move_center(GeoDelta::new(1.0, -1.0)));
        assert_relative_eq!(state.longitude(), 38.91, epsilon = 1e-9);
        assert_relative_eq!(state.latitude(), 58.13, epsilon = 1e-9);
    }

    #[test]
    fn move_delta_decreases_with_zoom() {
        for zoom in MIN_ZOOM..MAX_ZOOM {
            assert!(MapViewState::move_delta_at(zoom) > MapViewState::move_delta_at(zoom + 1));
        }

        assert_relative_eq!(MapViewState::move_delta_at(12), 0.036, epsilon = 1e-12);
        assert_relative_eq!(MapViewState::move_delta_at(17), 0.001, epsilon = 1e-12);
    }

    #[test]
    fn clear_marker_clears_address() {
        let mut state = state();
        assert!(state.set_marker(
            lonlat!(37.6, 55.7),
            Some("Moscow, Russia".into()),
            Some("101000".into())
        ));
        state.clear_marker();

        assert!(state.marker().is_none());
        assert!(state.address().is_none());
        assert!(state.postal_code().is_none());
        assert!(state.format_address().is_none());
    }

    #[test]
    fn format_address_respects_postal_flag() {
        let mut state = state();
        assert_eq!(state.format_address(), None);

        state.set_marker(
            lonlat!(37.6, 55.7),
            Some("Moscow, Russia".into()),
            Some("101000".into()),
        );
        assert_eq!(state.format_address().as_deref(), Some("Moscow, Russia"));

        state.set_show_postal_code(true);
        assert_eq!(
            state.format_address().as_deref(),
            Some("Moscow, Russia, 101000")
        );

        state.set_marker(lonlat!(37.6, 55.7), Some("Red Square".into()), None);
        assert_eq!(state.format_address().as_deref(), Some("Red Square"));
    }

    #[test]
    fn marker_address_is_updated_only_for_same_position() {
        let mut state = state();
        state.set_marker(lonlat!(37.6, 55.7), None, None);

        assert!(!state.set_marker_address(lonlat!(37.0, 55.0), Some("Elsewhere".into()), None));
        assert_eq!(state.address(), None);

        assert!(state.set_marker_address(lonlat!(37.6, 55.7), Some("Moscow".into()), None));
        assert_eq!(state.address(), Some("Moscow"));
    }

    #[test]
    fn layout_codes() {
        assert_eq!(Layout::Map.wire_code(), "map");
        assert_eq!(Layout::Satellite.wire_code(), "sat");
        assert_eq!(Layout::Hybrid.wire_code(), "sat,skl");
        assert_eq!("sat,skl".parse::<Layout>().ok(), Some(Layout::Hybrid));
        assert!("terrain".parse::<Layout>().is_err());
        assert_eq!(Layout::Hybrid.next(), Layout::Map);
    }
}
