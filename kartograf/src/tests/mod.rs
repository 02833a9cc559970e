//! Stubs of the network-facing services shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use kartograf_types::geo::GeoPoint2d;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::error::KartografError;
use crate::geocode::{GeocodeResult, Geocoder};
use crate::messenger::Messenger;
use crate::organization::{OrganizationHit, OrganizationLookup};
use crate::platform::{HttpRequest, HttpService};

pub const MAP_ENDPOINT: &str = "http://static-maps.yandex.ru/1.x/";
pub const GEOCODE_ENDPOINT: &str = "http://geocode-maps.yandex.ru/1.x/";
pub const SEARCH_ENDPOINT: &str = "https://search-maps.yandex.ru/v1/";

type Responder = Box<dyn Fn(&HttpRequest) -> Result<Bytes, KartografError> + Send + Sync>;

/// Answers requests by endpoint and records every request it receives. Requests to unknown
/// endpoints fail with status 404.
#[derive(Default)]
pub struct StubHttp {
    routes: HashMap<String, Responder>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubHttp {
    pub fn with_raw_route(
        mut self,
        endpoint: &str,
        responder: impl Fn(&HttpRequest) -> Result<Bytes, KartografError> + Send + Sync + 'static,
    ) -> Self {
        self.routes.insert(endpoint.to_string(), Box::new(responder));
        self
    }

    pub fn with_route(
        self,
        endpoint: &str,
        responder: impl Fn(&HttpRequest) -> Result<Value, KartografError> + Send + Sync + 'static,
    ) -> Self {
        self.with_raw_route(endpoint, move |request| {
            let value = responder(request)?;
            Ok(Bytes::from(value.to_string()))
        })
    }

    pub fn with_json(self, endpoint: &str, value: Value) -> Self {
        self.with_route(endpoint, move |_| Ok(value.clone()))
    }

    pub fn with_body(self, endpoint: &str, body: &'static [u8]) -> Self {
        self.with_raw_route(endpoint, move |_| Ok(Bytes::from_static(body)))
    }

    pub fn with_map_image(self, image: &'static [u8]) -> Self {
        self.with_body(MAP_ENDPOINT, image)
    }

    pub fn with_status(self, endpoint: &str, status: u16) -> Self {
        self.with_raw_route(endpoint, move |_| Err(KartografError::FetchFailed(status)))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|request| request.endpoint() == endpoint)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl HttpService for StubHttp {
    async fn get(&self, request: &HttpRequest) -> Result<Bytes, KartografError> {
        self.requests.lock().push(request.clone());
        match self.routes.get(request.endpoint()) {
            Some(responder) => responder(request),
            None => Err(KartografError::FetchFailed(404)),
        }
    }
}

/// Geocoder response body with the given `(pos, text, postal code)` feature members.
pub fn geocode_response(members: &[(&str, &str, Option<&str>)]) -> Value {
    let members: Vec<Value> = members
        .iter()
        .map(|(pos, text, postal_code)| {
            let mut address = json!({ "country_code": "RU", "formatted": text });
            if let Some(postal_code) = postal_code {
                address["postal_code"] = json!(postal_code);
            }

            json!({
                "GeoObject": {
                    "metaDataProperty": {
                        "GeocoderMetaData": {
                            "precision": "other",
                            "text": text,
                            "kind": "locality",
                            "Address": address,
                        }
                    },
                    "name": text,
                    "Point": { "pos": pos },
                }
            })
        })
        .collect();
    let found = members.len().to_string();

    json!({
        "response": {
            "GeoObjectCollection": {
                "metaDataProperty": {
                    "GeocoderResponseMetaData": { "found": found }
                },
                "featureMember": members,
            }
        }
    })
}

/// Places search response body with the given `(name, description)` features.
pub fn places_response(features: &[(&str, &str)]) -> Value {
    let features: Vec<Value> = features
        .iter()
        .map(|(name, description)| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [37.6, 55.7] },
                "properties": { "name": name, "description": description },
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}

/// Geocoder answering from a fixed table of queries.
#[derive(Default)]
pub struct StubGeocoder {
    places: HashMap<String, GeocodeResult>,
    reverse: Option<GeocodeResult>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    pub fn with_place(mut self, query: &str, result: GeocodeResult) -> Self {
        self.places.insert(query.to_string(), result);
        self
    }

    pub fn with_reverse(mut self, result: GeocodeResult) -> Self {
        self.reverse = Some(result);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for Arc<StubGeocoder> {
    async fn resolve(&self, query: &str) -> Result<GeocodeResult, KartografError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.places
            .get(query)
            .cloned()
            .ok_or(KartografError::NotFound)
    }

    async fn reverse(&self, _point: GeoPoint2d) -> Result<GeocodeResult, KartografError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reverse.clone().ok_or(KartografError::NotFound)
    }
}

/// Nearby search searching its categories in order, where only the listed categories have a hit.
pub struct StubOrganizations {
    categories: Vec<String>,
    hits: HashMap<String, OrganizationHit>,
    searched: Mutex<Vec<String>>,
}

impl StubOrganizations {
    pub fn new(categories: &[&str]) -> Self {
        Self {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            hits: HashMap::new(),
            searched: Mutex::new(Vec::new()),
        }
    }

    pub fn with_hit(mut self, category: &str, name: &str, description: &str) -> Self {
        self.hits.insert(
            category.to_string(),
            OrganizationHit {
                category: category.to_string(),
                name: name.to_string(),
                description: description.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl OrganizationLookup for Arc<StubOrganizations> {
    async fn find_near(&self, _point: GeoPoint2d) -> Result<OrganizationHit, KartografError> {
        for category in &self.categories {
            self.searched.lock().push(category.clone());
            if let Some(hit) = self.hits.get(category) {
                return Ok(hit.clone());
            }
        }

        Err(KartografError::NotFound)
    }
}

impl StubOrganizations {
    pub fn searched(&self) -> Vec<String> {
        self.searched.lock().clone()
    }
}

/// Messenger counting redraw requests.
#[derive(Default, Clone)]
pub struct CountingMessenger {
    count: Arc<AtomicUsize>,
}

impl CountingMessenger {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Messenger for CountingMessenger {
    fn request_redraw(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
