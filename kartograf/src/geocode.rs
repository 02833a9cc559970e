//! Resolving free text (an address or a `"lon,lat"` pair) into a position and an address label.

use std::sync::Arc;

use async_trait::async_trait;
use kartograf_types::geo::GeoPoint2d;
use log::{debug, info};
use serde::Deserialize;

use crate::error::KartografError;
use crate::platform::{fetch_json, HttpRequest, HttpService};

/// A place found by a [`Geocoder`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    /// Position of the place.
    pub position: GeoPoint2d,
    /// Human-readable address.
    pub address: String,
    /// Postal code, if the place has one.
    pub postal_code: Option<String>,
}

/// Resolves text queries into places.
///
/// Implementations report every failure as [`KartografError::NotFound`]: the caller does not
/// distinguish a network failure from a query that matches nothing.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves the query into the best matching place.
    async fn resolve(&self, query: &str) -> Result<GeocodeResult, KartografError>;

    /// Resolves the address of the point.
    async fn reverse(&self, point: GeoPoint2d) -> Result<GeocodeResult, KartografError> {
        self.resolve(&point.to_string()).await
    }
}

/// [`Geocoder`] using the HTTP geocoding service.
pub struct GeocodeResolver {
    endpoint: String,
    api_key: String,
    http: Arc<dyn HttpService>,
}

impl GeocodeResolver {
    /// Creates a new resolver for the service at `endpoint`.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        http: Arc<dyn HttpService>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            http,
        }
    }

    /// Request resolving the query.
    pub fn build_request(&self, query: &str) -> HttpRequest {
        HttpRequest::new(&self.endpoint)
            .with_param("apikey", &self.api_key)
            .with_param("geocode", query)
            .with_param("format", "json")
    }

    async fn try_resolve(&self, query: &str) -> Result<GeocodeResult, KartografError> {
        let request = self.build_request(query);
        let response: GeocodeResponse = fetch_json(self.http.as_ref(), &request).await?;

        let object = response
            .response
            .collection
            .feature_member
            .into_iter()
            .next()
            .ok_or(KartografError::NotFound)?
            .geo_object;

        let position = GeoPoint2d::from_pos(&object.point.pos)
            .map_err(|err| KartografError::Generic(err.to_string()))?;
        let meta = object.meta_data_property.geocoder_meta_data;

        Ok(GeocodeResult {
            position,
            address: meta.text,
            postal_code: meta.address.and_then(|address| address.postal_code),
        })
    }
}

#[async_trait]
impl Geocoder for GeocodeResolver {
    async fn resolve(&self, query: &str) -> Result<GeocodeResult, KartografError> {
        match self.try_resolve(query).await {
            Ok(result) => {
                info!("Resolved '{query}' to {} at {}", result.address, result.position);
                Ok(result)
            }
            Err(err) => {
                debug!("Geocoding of '{query}' failed: {err}");
                Err(KartografError::NotFound)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    feature_member: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: Point,
    #[serde(rename = "metaDataProperty")]
    meta_data_property: MetaDataProperty,
}

#[derive(Debug, Deserialize)]
struct Point {
    pos: String,
}

#[derive(Debug, Deserialize)]
struct MetaDataProperty {
    #[serde(rename = "GeocoderMetaData")]
    geocoder_meta_data: GeocoderMetaData,
}

#[derive(Debug, Deserialize)]
struct GeocoderMetaData {
    text: String,
    #[serde(rename = "Address")]
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    postal_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use kartograf_types::lonlat;
    use serde_json::json;

    use super::*;
    use crate::tests::{geocode_response, StubHttp, GEOCODE_ENDPOINT};

    fn resolver(http: StubHttp) -> (GeocodeResolver, Arc<StubHttp>) {
        let http = Arc::new(http);
        (
            GeocodeResolver::new(GEOCODE_ENDPOINT, "key", http.clone()),
            http,
        )
    }

    #[test]
    fn resolves_first_feature() {
        let (resolver, http) = resolver(StubHttp::default().with_json(
            GEOCODE_ENDPOINT,
            geocode_response(&[
                ("37.6 55.7", "Moscow, Russia", Some("101000")),
                ("30.3 59.9", "Saint Petersburg, Russia", None),
            ]),
        ));

        let result = tokio_test::block_on(resolver.resolve("Moscow")).expect("found");
        assert_eq!(
            result,
            GeocodeResult {
                position: lonlat!(37.6, 55.7),
                address: "Moscow, Russia".into(),
                postal_code: Some("101000".into()),
            }
        );

        let request = &http.requests()[0];
        assert_eq!(request.param("apikey"), Some("key"));
        assert_eq!(request.param("geocode"), Some("Moscow"));
        assert_eq!(request.param("format"), Some("json"));
    }

    #[test]
    fn postal_code_is_optional() {
        let (resolver, _) = resolver(StubHttp::default().with_json(
            GEOCODE_ENDPOINT,
            geocode_response(&[("30.3 59.9", "Saint Petersburg, Russia", None)]),
        ));

        let result = tokio_test::block_on(resolver.resolve("Piter")).expect("found");
        assert_eq!(result.postal_code, None);
    }

    #[test]
    fn reverse_sends_lon_lat() {
        let (resolver, http) = resolver(StubHttp::default().with_json(
            GEOCODE_ENDPOINT,
            geocode_response(&[("37.6 55.7", "Moscow, Russia", None)]),
        ));

        tokio_test::block_on(resolver.reverse(lonlat!(37.6, 55.7))).expect("found");
        assert_eq!(http.requests()[0].param("geocode"), Some("37.6,55.7"));
    }

    #[test]
    fn empty_collection_is_not_found() {
        let (resolver, _) =
            resolver(StubHttp::default().with_json(GEOCODE_ENDPOINT, geocode_response(&[])));

        assert_matches!(
            tokio_test::block_on(resolver.resolve("xyzzy")),
            Err(KartografError::NotFound)
        );
    }

    #[test]
    fn every_failure_is_not_found() {
        let cases = [
            StubHttp::default().with_status(GEOCODE_ENDPOINT, 403),
            StubHttp::default().with_json(GEOCODE_ENDPOINT, json!({"error": "bad key"})),
            StubHttp::default().with_json(
                GEOCODE_ENDPOINT,
                geocode_response(&[("not a position", "Nowhere", None)]),
            ),
            StubHttp::default().with_body(GEOCODE_ENDPOINT, b"<html>"),
            StubHttp::default(),
        ];

        for http in cases {
            let (resolver, _) = resolver(http);
            assert_matches!(
                tokio_test::block_on(resolver.resolve("Moscow")),
                Err(KartografError::NotFound)
            );
        }
    }
}
