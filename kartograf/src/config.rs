use std::path::Path;

use kartograf_types::cartesian::Size;
use kartograf_types::geo::{GeoPoint2d, MAX_ZOOM, MIN_ZOOM};
use kartograf_types::lonlat;
use serde::{Deserialize, Serialize};

use crate::error::KartografError;
use crate::organization::{DEFAULT_CATEGORIES, DEFAULT_SEARCH_SPAN};
use crate::state::Layout;

const GEOCODER_KEY_VAR: &str = "KARTOGRAF_GEOCODER_KEY";
const SEARCH_KEY_VAR: &str = "KARTOGRAF_SEARCH_KEY";

/// Configuration of a [`ViewController`](crate::ViewController).
///
/// Can be read from JSON, missing fields take their default values:
///
/// ```json
/// { "geocoder_api_key": "...", "initial_zoom": 10, "initial_layout": "Satellite" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    map_endpoint: String,
    geocode_endpoint: String,
    search_endpoint: String,
    geocoder_api_key: String,
    search_api_key: String,
    initial_center: GeoPoint2d,
    initial_zoom: u8,
    initial_layout: Layout,
    viewport: Size,
    search_lang: String,
    search_span: String,
    categories: Vec<String>,
    not_found_label: String,
    reverse_geocode_clicks: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            map_endpoint: "http://static-maps.yandex.ru/1.x/".into(),
            geocode_endpoint: "http://geocode-maps.yandex.ru/1.x/".into(),
            search_endpoint: "https://search-maps.yandex.ru/v1/".into(),
            geocoder_api_key: String::new(),
            search_api_key: String::new(),
            initial_center: lonlat!(39.0, 59.0),
            initial_zoom: 12,
            initial_layout: Layout::Map,
            viewport: Size::new(650.0, 450.0),
            search_lang: "ru_RU".into(),
            search_span: DEFAULT_SEARCH_SPAN.into(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            not_found_label: "Nothing found".into(),
            reverse_geocode_clicks: true,
        }
    }
}

impl ViewerConfig {
    /// Parses a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, KartografError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KartografError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replaces the API keys with the values of `KARTOGRAF_GEOCODER_KEY` and
    /// `KARTOGRAF_SEARCH_KEY` environment variables, when they are set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(GEOCODER_KEY_VAR) {
            self.geocoder_api_key = key;
        }
        if let Ok(key) = std::env::var(SEARCH_KEY_VAR) {
            self.search_api_key = key;
        }

        self
    }

    /// Checks that the initial view is valid.
    pub fn validate(&self) -> Result<(), KartografError> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.initial_zoom) {
            return Err(KartografError::Config(format!(
                "initial zoom {} is outside of [{MIN_ZOOM}, {MAX_ZOOM}]",
                self.initial_zoom
            )));
        }

        if !self.initial_center.is_valid() {
            return Err(KartografError::Config(format!(
                "initial center {} is not a valid position",
                self.initial_center
            )));
        }

        if self.viewport.is_zero() {
            return Err(KartografError::Config("viewport is empty".into()));
        }

        Ok(())
    }

    /// Url of the static map service.
    pub fn map_endpoint(&self) -> &str {
        &self.map_endpoint
    }

    /// Sets url of the static map service.
    pub fn with_map_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.map_endpoint = endpoint.into();
        self
    }

    /// Url of the geocoding service.
    pub fn geocode_endpoint(&self) -> &str {
        &self.geocode_endpoint
    }

    /// Sets url of the geocoding service.
    pub fn with_geocode_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.geocode_endpoint = endpoint.into();
        self
    }

    /// Url of the places search service.
    pub fn search_endpoint(&self) -> &str {
        &self.search_endpoint
    }

    /// Sets url of the places search service.
    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = endpoint.into();
        self
    }

    /// API key of the geocoding service.
    pub fn geocoder_api_key(&self) -> &str {
        &self.geocoder_api_key
    }

    /// Sets API key of the geocoding service.
    pub fn with_geocoder_api_key(mut self, key: impl Into<String>) -> Self {
        self.geocoder_api_key = key.into();
        self
    }

    /// API key of the places search service.
    pub fn search_api_key(&self) -> &str {
        &self.search_api_key
    }

    /// Sets API key of the places search service.
    pub fn with_search_api_key(mut self, key: impl Into<String>) -> Self {
        self.search_api_key = key.into();
        self
    }

    /// Center of the map at startup.
    pub fn initial_center(&self) -> GeoPoint2d {
        self.initial_center
    }

    /// Sets center of the map at startup.
    pub fn with_initial_center(mut self, center: GeoPoint2d) -> Self {
        self.initial_center = center;
        self
    }

    /// Zoom level at startup.
    pub fn initial_zoom(&self) -> u8 {
        self.initial_zoom
    }

    /// Sets zoom level at startup.
    pub fn with_initial_zoom(mut self, zoom: u8) -> Self {
        self.initial_zoom = zoom;
        self
    }

    /// Layout at startup.
    pub fn initial_layout(&self) -> Layout {
        self.initial_layout
    }

    /// Sets layout at startup.
    pub fn with_initial_layout(mut self, layout: Layout) -> Self {
        self.initial_layout = layout;
        self
    }

    /// Size of the map image in pixels. Clicks are translated relative to its center.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Sets size of the map image in pixels.
    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    /// Language of the places search results.
    pub fn search_lang(&self) -> &str {
        &self.search_lang
    }

    /// Sets language of the places search results.
    pub fn with_search_lang(mut self, lang: impl Into<String>) -> Self {
        self.search_lang = lang.into();
        self
    }

    /// Span of the places search area.
    pub fn search_span(&self) -> &str {
        &self.search_span
    }

    /// Sets span of the places search area, `"{lon span},{lat span}"` in degrees.
    pub fn with_search_span(mut self, span: impl Into<String>) -> Self {
        self.search_span = span.into();
        self
    }

    /// Category keywords searched by the nearby search, in priority order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Sets category keywords searched by the nearby search.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Label shown when a search finds nothing.
    pub fn not_found_label(&self) -> &str {
        &self.not_found_label
    }

    /// Sets label shown when a search finds nothing.
    pub fn with_not_found_label(mut self, label: impl Into<String>) -> Self {
        self.not_found_label = label.into();
        self
    }

    /// Whether a click resolves the address of the clicked point.
    pub fn reverse_geocode_clicks(&self) -> bool {
        self.reverse_geocode_clicks
    }

    /// Sets whether a click resolves the address of the clicked point.
    pub fn with_reverse_geocode_clicks(mut self, enabled: bool) -> Self {
        self.reverse_geocode_clicks = enabled;
        self
    }
}
