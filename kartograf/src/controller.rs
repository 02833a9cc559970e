use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use kartograf_types::cartesian::{Point2d, Vector2};
use kartograf_types::geo::{pixel_to_geo_delta, GeoDelta, GeoPoint2d};
use log::{debug, info};
use parking_lot::{Mutex, RwLock};

use crate::config::ViewerConfig;
use crate::control::{EventPropagation, Key, MouseButton, UserEvent};
use crate::error::KartografError;
use crate::geocode::{GeocodeResolver, Geocoder};
use crate::messenger::Messenger;
use crate::organization::{OrganizationFinder, OrganizationLookup};
use crate::platform::HttpService;
use crate::state::{Layout, MapViewState};
use crate::static_map::StaticMapClient;

/// Monotonic ticket counter. A result obtained with a ticket is applied only while the ticket is
/// still the latest one issued, so a slow response never overwrites a newer intent.
#[derive(Debug, Default)]
struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

#[derive(Debug, Default)]
struct DisplayState {
    image: Option<Bytes>,
    notice: Option<String>,
}

/// The only entry point of the UI shell: turns user intents into [`MapViewState`] changes and keeps
/// the map image and the address label up to date.
///
/// Intents can be called from any thread or task. Network calls are made without holding any lock,
/// and when several intents of the same kind overlap, only the result of the latest one is applied:
/// map images are sequenced separately from address lookups (search, click, nearby search). A search
/// finishing after a newer zoom, pan or layout change still places its marker but keeps the view.
///
/// A failed map image request keeps the previous image. A failed lookup never changes the marker
/// and only replaces the address label with the configured "not found" text.
pub struct ViewController {
    config: ViewerConfig,
    state: RwLock<MapViewState>,
    display: Mutex<DisplayState>,
    map_client: StaticMapClient,
    geocoder: Box<dyn Geocoder>,
    organizations: Box<dyn OrganizationLookup>,
    messenger: Option<Box<dyn Messenger>>,
    image_requests: RequestSequence,
    lookup_requests: RequestSequence,
    view_changes: RequestSequence,
}

impl ViewController {
    /// Creates a controller talking to the services from the configuration through `http`.
    pub fn new(config: ViewerConfig, http: Arc<dyn HttpService>) -> Result<Self, KartografError> {
        let map_client = StaticMapClient::new(config.map_endpoint(), http.clone());
        let geocoder = GeocodeResolver::new(
            config.geocode_endpoint(),
            config.geocoder_api_key(),
            http.clone(),
        );
        let organizations =
            OrganizationFinder::new(config.search_endpoint(), config.search_api_key(), http)
                .with_categories(config.categories().to_vec())
                .with_lang(config.search_lang())
                .with_span(config.search_span());

        Self::with_services(
            config,
            map_client,
            Box::new(geocoder),
            Box::new(organizations),
        )
    }

    /// Creates a controller with custom geocoder and nearby search implementations.
    pub fn with_services(
        config: ViewerConfig,
        map_client: StaticMapClient,
        geocoder: Box<dyn Geocoder>,
        organizations: Box<dyn OrganizationLookup>,
    ) -> Result<Self, KartografError> {
        config.validate()?;
        let state = MapViewState::new(
            config.initial_center(),
            config.initial_zoom(),
            config.initial_layout(),
        )
        .ok_or_else(|| KartografError::Config("invalid initial view".into()))?;

        Ok(Self {
            config,
            state: RwLock::new(state),
            display: Mutex::new(DisplayState::default()),
            map_client,
            geocoder,
            organizations,
            messenger: None,
            image_requests: RequestSequence::default(),
            lookup_requests: RequestSequence::default(),
            view_changes: RequestSequence::default(),
        })
    }

    /// Sets the messenger notified when the image or the address label change. Use
    /// `None::<DummyMessenger>` to stop notifications.
    pub fn set_messenger(&mut self, messenger: Option<impl Messenger + 'static>) {
        self.messenger = messenger.map(|m| Box::new(m) as Box<dyn Messenger>);
    }

    /// Configuration the controller was created with.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Snapshot of the current view state.
    pub fn state(&self) -> MapViewState {
        self.state.read().clone()
    }

    /// Last successfully loaded map image, encoded as returned by the service.
    pub fn image(&self) -> Option<Bytes> {
        self.display.lock().image.clone()
    }

    /// Text to show in the address field: the result of the last failed or nearby search if there
    /// is one, otherwise the formatted address of the marker.
    pub fn address_label(&self) -> Option<String> {
        if let Some(notice) = self.display.lock().notice.clone() {
            return Some(notice);
        }

        self.state.read().format_address()
    }

    /// Loads the map image for the current state. The shell calls this once at startup, every
    /// intent changing the view calls it on its own.
    pub async fn refresh(&self) {
        let ticket = self.image_requests.next();
        let request = self.map_client.build_request(&self.state.read());

        let Ok(image) = self.map_client.fetch(&request).await else {
            return;
        };

        if !self.image_requests.is_latest(ticket) {
            debug!("Discarding outdated map image {request}");
            return;
        }

        self.display.lock().image = Some(image);
        self.redraw();
    }

    /// Zooms in by one level.
    pub async fn zoom_in(&self) {
        self.change_zoom(1).await;
    }

    /// Zooms out by one level.
    pub async fn zoom_out(&self) {
        self.change_zoom(-1).await;
    }

    async fn change_zoom(&self, delta: i32) {
        let changed = self.state.write().change_zoom(delta);
        if changed {
            self.view_changes.next();
            self.refresh().await;
        }
    }

    /// Moves the view west by one pan step.
    pub async fn pan_left(&self) {
        self.pan(-1.0, 0.0).await;
    }

    /// Moves the view east by one pan step.
    pub async fn pan_right(&self) {
        self.pan(1.0, 0.0).await;
    }

    /// Moves the view north by half of the pan step.
    pub async fn pan_up(&self) {
        self.pan(0.0, 1.0).await;
    }

    /// Moves the view south by half of the pan step.
    pub async fn pan_down(&self) {
        self.pan(0.0, -1.0).await;
    }

    async fn pan(&self, lon_k: f64, lat_k: f64) {
        let moved = {
            let mut state = self.state.write();
            let step = state.move_delta();
            state.move_center(GeoDelta::new(lon_k * step, lat_k * step / 2.0))
        };

        if moved {
            self.view_changes.next();
            self.refresh().await;
        }
    }

    /// Switches the map to the layout.
    pub async fn change_layout(&self, layout: Layout) {
        let changed = {
            let mut state = self.state.write();
            let changed = state.layout() != layout;
            state.set_layout(layout);
            changed
        };

        if changed {
            self.view_changes.next();
            self.refresh().await;
        }
    }

    /// Switches the map to the layout following the current one.
    pub async fn cycle_layout(&self) {
        let next = self.state.read().layout().next();
        self.change_layout(next).await;
    }

    /// Places the marker at the clicked pixel of the map image and, if enabled, resolves the
    /// address of the point. The view is not recentered.
    pub async fn click_at(&self, position: Point2d) {
        let Some(point) = self.screen_to_geo(position) else {
            return;
        };

        let ticket = self.lookup_requests.next();
        let placed = self.state.write().set_marker(point, None, None);
        if !placed {
            return;
        }

        self.set_notice(None);
        self.refresh().await;

        if !self.config.reverse_geocode_clicks() {
            return;
        }

        let result = self.geocoder.reverse(point).await;
        if !self.lookup_requests.is_latest(ticket) {
            debug!("Discarding outdated address of {point}");
            return;
        }

        match result {
            Ok(found) => {
                self.state
                    .write()
                    .set_marker_address(point, Some(found.address), found.postal_code);
                self.redraw();
            }
            Err(_) => self.set_notice(Some(self.config.not_found_label().to_string())),
        }
    }

    /// Searches for a business next to the clicked pixel and shows it in the address label. Neither
    /// the marker nor the view change.
    pub async fn right_click_at(&self, position: Point2d) {
        let Some(point) = self.screen_to_geo(position) else {
            return;
        };

        let ticket = self.lookup_requests.next();
        let result = self.organizations.find_near(point).await;
        if !self.lookup_requests.is_latest(ticket) {
            debug!("Discarding outdated nearby search at {point}");
            return;
        }

        let label = match result {
            Ok(hit) => hit.label(),
            Err(_) => self.config.not_found_label().to_string(),
        };
        self.set_notice(Some(label));
    }

    /// Resolves the query, places the marker at the result and centers the view on it. If nothing
    /// is found, the marker stays where it was and the address label shows the "not found" text.
    /// Blank queries are ignored.
    ///
    /// The view is not recentered if it was zoomed, panned or switched to another layout while the
    /// query was being resolved.
    pub async fn search_text(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let ticket = self.lookup_requests.next();
        let view_ticket = self.view_changes.next();
        let result = self.geocoder.resolve(query).await;
        if !self.lookup_requests.is_latest(ticket) {
            debug!("Discarding outdated search result for '{query}'");
            return;
        }

        let found = match result {
            Ok(found) => found,
            Err(_) => {
                info!("Nothing found for '{query}'");
                self.set_notice(Some(self.config.not_found_label().to_string()));
                return;
            }
        };

        let recenter = self.view_changes.is_latest(view_ticket);
        if !recenter {
            debug!("View changed while resolving '{query}', keeping it");
        }

        let applied = {
            let mut state = self.state.write();
            let position = found.position;
            position.is_valid()
                && (!recenter || state.set_center(position))
                && state.set_marker(position, Some(found.address), found.postal_code)
        };

        if applied {
            self.set_notice(None);
            self.refresh().await;
        } else {
            self.set_notice(Some(self.config.not_found_label().to_string()));
        }
    }

    /// Removes the marker and its address.
    pub async fn reset_search(&self) {
        self.lookup_requests.next();
        let had_marker = {
            let mut state = self.state.write();
            let had_marker = state.marker().is_some();
            state.clear_marker();
            had_marker
        };

        self.set_notice(None);
        if had_marker {
            self.refresh().await;
        }
    }

    /// Enables or disables the postal code in the address label. Makes no network requests.
    pub fn toggle_show_postal(&self, show: bool) {
        self.state.write().set_show_postal_code(show);
        self.set_notice(None);
    }

    /// Converts a toolkit-independent input event into an intent.
    pub async fn handle(&self, event: &UserEvent) -> EventPropagation {
        match event {
            UserEvent::KeyPressed(Key::PageUp) => self.zoom_in().await,
            UserEvent::KeyPressed(Key::PageDown) => self.zoom_out().await,
            UserEvent::KeyPressed(Key::Left) => self.pan_left().await,
            UserEvent::KeyPressed(Key::Right) => self.pan_right().await,
            UserEvent::KeyPressed(Key::Up) => self.pan_up().await,
            UserEvent::KeyPressed(Key::Down) => self.pan_down().await,
            UserEvent::Click(button, position)
                if self.config.viewport().contains(*position)
                    && matches!(button, MouseButton::Left | MouseButton::Right) =>
            {
                if *button == MouseButton::Left {
                    self.click_at(*position).await;
                } else {
                    self.right_click_at(*position).await;
                }
            }
            _ => return EventPropagation::Propagate,
        }

        EventPropagation::Stop
    }

    /// Geographic position under the pixel of the map image, or `None` if the pixel is outside of
    /// the image or the position is not valid.
    fn screen_to_geo(&self, position: Point2d) -> Option<GeoPoint2d> {
        let viewport = self.config.viewport();
        if !viewport.contains(position) {
            debug!("Click at {position} is outside of the map");
            return None;
        }

        let offset: Vector2 = position - viewport.center();
        let state = self.state.read();
        let delta = pixel_to_geo_delta(offset.x, offset.y, state.zoom());
        let point = state.center().checked_add(delta);
        if point.is_none() {
            debug!("Click at {position} is outside of the valid coordinates");
        }

        point
    }

    fn set_notice(&self, notice: Option<String>) {
        self.display.lock().notice = notice;
        self.redraw();
    }

    fn redraw(&self) {
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw();
        }
    }
}
