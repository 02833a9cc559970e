//! Kartograf is the core of an interactive viewer for a static map service. It keeps the state of
//! the view (center, zoom, layout and the marker), loads map images for it, resolves free-text
//! addresses and finds businesses next to a point.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kartograf::platform::NativeHttpService;
//! use kartograf::{ViewController, ViewerConfig};
//!
//! # tokio_test::block_on(async {
//! let config = ViewerConfig::default().with_env_overrides();
//! let http = Arc::new(NativeHttpService::new().unwrap());
//! let controller = ViewController::new(config, http).unwrap();
//!
//! controller.refresh().await;
//! controller.search_text("Moscow").await;
//! let image = controller.image();
//! let label = controller.address_label();
//! # });
//! ```
//!
//! # Main components
//!
//! * [`MapViewState`] is the authoritative state of the view. It can only be changed through the
//!   intents of the
//! * [`ViewController`], the single entry point for a UI shell. It uses
//! * [`StaticMapClient`] to load map images,
//! * a [`Geocoder`](geocode::Geocoder) ([`GeocodeResolver`]) to resolve addresses, and
//! * an [`OrganizationLookup`](organization::OrganizationLookup) ([`OrganizationFinder`]) to find
//!   businesses next to a point.
//!
//! All network access goes through an [`HttpService`](platform::HttpService) given to the
//! controller, so the shell decides which HTTP client is used. Decoding and displaying the image
//! bytes is up to the shell as well.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod config;
pub mod control;
mod controller;
pub mod error;
pub mod geocode;
mod messenger;
pub mod organization;
pub mod platform;
mod state;
mod static_map;

#[cfg(test)]
mod tests;

pub use config::ViewerConfig;
pub use controller::ViewController;
pub use geocode::{GeocodeResolver, GeocodeResult};
pub use messenger::{DummyMessenger, Messenger};
pub use organization::{OrganizationFinder, OrganizationHit};
pub use state::{Layout, MapViewState, Marker};
pub use static_map::StaticMapClient;

// Reexport kartograf_types
pub use kartograf_types;
