use serde::Deserialize;
use tracing::{info, warn};

use crate::app::ports::{HttpClientPort, RateLimiterPort};
use crate::config::GeocoderConfig;
use crate::error::GeocodeError;
use crate::fallback::FallbackTable;
use crate::normalize::normalize;
use crate::types::Coordinate;

#[derive(Debug, Clone)]
pub struct GeocoderSettings {
    pub endpoint: String,
    /// Appended to every address, e.g. "Los Angeles, CA".
    pub locality: String,
    /// Results outside this state are discarded.
    pub expected_state: String,
}

impl From<&GeocoderConfig> for GeocoderSettings {
    fn from(config: &GeocoderConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            locality: config.locality.clone(),
            expected_state: config.expected_state.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSource {
    FallbackTable,
    PrimaryQuery,
    FallbackQuery,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub coordinate: Coordinate,
    pub source: CoordinateSource,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: Degrees,
    lon: Degrees,
    #[serde(default)]
    address: Option<SearchAddress>,
}

#[derive(Debug, Deserialize)]
struct SearchAddress {
    state: Option<String>,
}

// Nominatim sends degrees as strings; accept plain numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Text(String),
    Number(f64),
}

impl Degrees {
    fn value(&self) -> Option<f64> {
        match self {
            Degrees::Text(s) => s.trim().parse().ok(),
            Degrees::Number(n) => Some(*n),
        }
    }
}

/// Resolves survey addresses to coordinates: curated table first, then the
/// zip-qualified query, then the zip-less query.
pub struct GeocodeUseCase {
    http: Box<dyn HttpClientPort>,
    rate: Box<dyn RateLimiterPort>,
    table: FallbackTable,
    settings: GeocoderSettings,
}

impl GeocodeUseCase {
    pub fn new(
        http: Box<dyn HttpClientPort>,
        rate: Box<dyn RateLimiterPort>,
        table: FallbackTable,
        settings: GeocoderSettings,
    ) -> Self {
        Self {
            http,
            rate,
            table,
            settings,
        }
    }

    pub async fn resolve_coordinate(&self, street: &str, zip_code: &str, label: &str) -> Option<Coordinate> {
        self.resolve(street, zip_code, label)
            .await
            .ok()
            .map(|r| r.coordinate)
    }

    pub async fn resolve(
        &self,
        street: &str,
        zip_code: &str,
        label: &str,
    ) -> Result<Resolution, GeocodeError> {
        let Some(cleaned) = normalize(street, zip_code) else {
            info!("Skipping {}: Missing address or zip", label);
            return Err(GeocodeError::MissingAddressData);
        };

        let full_address = format!("{}, {}, {}", cleaned, self.settings.locality, zip_code);
        let fallback_address = format!("{}, {}", cleaned, self.settings.locality);

        if let Some(coordinate) = self.table.lookup(&full_address) {
            info!("Using hardcoded coordinates for {}", label);
            return Ok(Resolution {
                coordinate,
                source: CoordinateSource::FallbackTable,
            });
        }
        if let Some(coordinate) = self.table.lookup(&fallback_address) {
            info!("Using hardcoded coordinates (fallback) for {}", label);
            return Ok(Resolution {
                coordinate,
                source: CoordinateSource::FallbackTable,
            });
        }

        if let Some(coordinate) = self.attempt(&full_address, label).await {
            info!(
                "Geocoded {}: {}, {}",
                label, coordinate.latitude, coordinate.longitude
            );
            return Ok(Resolution {
                coordinate,
                source: CoordinateSource::PrimaryQuery,
            });
        }

        info!("Trying fallback for {}", label);
        if let Some(coordinate) = self.attempt(&fallback_address, label).await {
            info!(
                "Geocoded {} (fallback): {}, {}",
                label, coordinate.latitude, coordinate.longitude
            );
            return Ok(Resolution {
                coordinate,
                source: CoordinateSource::FallbackQuery,
            });
        }

        warn!("Failed to geocode {}: {}", label, full_address);
        Err(GeocodeError::NoQualifyingMatch {
            address: full_address,
        })
    }

    /// One query; transport failures are logged and count as no match.
    async fn attempt(&self, address: &str, label: &str) -> Option<Coordinate> {
        match self.query(address).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Error geocoding {}: {}", label, e);
                None
            }
        }
    }

    async fn query(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let url = reqwest::Url::parse_with_params(
            &self.settings.endpoint,
            &[
                ("format", "json"),
                ("q", address),
                ("addressdetails", "1"),
                ("limit", "1"),
            ],
        )
        .map_err(|e| GeocodeError::Transport(format!("invalid endpoint: {}", e)))?;

        self.rate.acquire().await;
        let resp = self
            .http
            .get(url.as_str())
            .await
            .map_err(GeocodeError::Transport)?;
        if !resp.is_success() {
            return Err(GeocodeError::Transport(format!(
                "HTTP error! status: {}",
                resp.status
            )));
        }

        let results: Vec<SearchResult> = serde_json::from_slice(&resp.bytes)
            .map_err(|e| GeocodeError::Transport(format!("unreadable response: {}", e)))?;

        Ok(results.first().and_then(|r| self.qualify(r)))
    }

    fn qualify(&self, result: &SearchResult) -> Option<Coordinate> {
        let state = result.address.as_ref().and_then(|a| a.state.as_deref());
        if state != Some(self.settings.expected_state.as_str()) {
            info!("Discarding match in {:?}", state);
            return None;
        }
        match (result.lat.value(), result.lon.value()) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => {
                warn!("Match has unparseable coordinates: {:?}, {:?}", result.lat, result.lon);
                None
            }
        }
    }
}
