//! Discovering businesses next to a point by searching a list of category keywords.

use std::sync::Arc;

use async_trait::async_trait;
use kartograf_types::geo::GeoPoint2d;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::KartografError;
use crate::platform::{fetch_json, HttpRequest, HttpService};

/// Category keywords searched by default, in priority order.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "shop",
    "pharmacy",
    "bank",
    "cafe",
    "restaurant",
    "gym",
    "auto",
    "stadium",
    "market",
];

/// Span of the search area around the point, `"{lon span},{lat span}"` in degrees.
pub const DEFAULT_SEARCH_SPAN: &str = "0.001,0.001";

/// A business found next to a point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationHit {
    /// Category keyword the business was found with.
    pub category: String,
    /// Name of the business.
    pub name: String,
    /// Description of the business, usually its address.
    pub description: String,
}

impl OrganizationHit {
    /// Label for display: name and description joined together.
    pub fn label(&self) -> String {
        if self.description.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.description)
        }
    }
}

/// Looks up businesses next to a point.
#[async_trait]
pub trait OrganizationLookup: Send + Sync {
    /// Returns the first business found next to the point, or [`KartografError::NotFound`].
    async fn find_near(&self, point: GeoPoint2d) -> Result<OrganizationHit, KartografError>;
}

/// [`OrganizationLookup`] using the HTTP places search service.
///
/// Categories are searched one at a time in the configured order, and the first category with at
/// least one result wins, so earlier categories take priority when a place matches several of them.
pub struct OrganizationFinder {
    endpoint: String,
    api_key: String,
    lang: String,
    span: String,
    categories: Vec<String>,
    http: Arc<dyn HttpService>,
}

impl OrganizationFinder {
    /// Creates a new finder with the default categories, language and span.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        http: Arc<dyn HttpService>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            lang: "ru_RU".into(),
            span: DEFAULT_SEARCH_SPAN.into(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            http,
        }
    }

    /// Sets the ordered list of category keywords to search for.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Sets the language of the results.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Sets the span of the search area.
    pub fn with_span(mut self, span: impl Into<String>) -> Self {
        self.span = span.into();
        self
    }

    /// Categories in the order they are searched.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Request searching for the category around the point.
    pub fn build_request(&self, category: &str, point: GeoPoint2d) -> HttpRequest {
        HttpRequest::new(&self.endpoint)
            .with_param("apikey", &self.api_key)
            .with_param("text", category)
            .with_param("ll", point.to_string())
            .with_param("lang", &self.lang)
            .with_param("type", "biz")
            .with_param("spn", &self.span)
            .with_param("rspn", "1")
    }

    async fn search_category(
        &self,
        category: &str,
        point: GeoPoint2d,
    ) -> Result<Option<OrganizationHit>, KartografError> {
        let request = self.build_request(category, point);
        let response: PlacesResponse = fetch_json(self.http.as_ref(), &request).await?;

        Ok(response.features.into_iter().next().map(|feature| {
            let properties = feature.properties;
            OrganizationHit {
                category: category.to_string(),
                name: properties.name,
                description: properties.description.unwrap_or_default(),
            }
        }))
    }
}

#[async_trait]
impl OrganizationLookup for OrganizationFinder {
    async fn find_near(&self, point: GeoPoint2d) -> Result<OrganizationHit, KartografError> {
        for category in &self.categories {
            match self.search_category(category, point).await {
                Ok(Some(hit)) => {
                    info!("Found '{}' ({category}) near {point}", hit.name);
                    return Ok(hit);
                }
                Ok(None) => debug!("No '{category}' near {point}"),
                Err(err) => warn!("Search for '{category}' near {point} failed: {err}"),
            }
        }

        Err(KartografError::NotFound)
    }
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    features: Vec<PlaceFeature>,
}

#[derive(Debug, Deserialize)]
struct PlaceFeature {
    properties: PlaceProperties,
}

#[derive(Debug, Deserialize)]
struct PlaceProperties {
    name: String,
    description: Option<String>,
}
