//! Coordinates for a complaint: photo EXIF first, device GPS second, then a
//! reverse-geocoded address.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;

use crate::client::device::{Device, Permission};
use crate::client::draft::DraftLocation;
use crate::client::error::ClientError;

/// One EXIF GPS coordinate, either already decimal or as degrees/minutes/seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExifCoordinate {
    Decimal(f64),
    Dms([f64; 3]),
}

impl ExifCoordinate {
    /// Signed decimal degrees; the negative hemisphere ref (`S` or `W`) flips the sign.
    pub fn to_decimal(self, hemisphere: Option<&str>, negative_ref: &str) -> f64 {
        let value = match self {
            Self::Decimal(v) => v,
            Self::Dms([deg, min, sec]) => deg + min / 60.0 + sec / 3600.0,
        };
        match hemisphere {
            Some(r) if r.trim().eq_ignore_ascii_case(negative_ref) => -value.abs(),
            _ => value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifGps {
    pub latitude: Option<ExifCoordinate>,
    pub latitude_ref: Option<String>,
    pub longitude: Option<ExifCoordinate>,
    pub longitude_ref: Option<String>,
}

impl ExifGps {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let latitude = self
            .latitude?
            .to_decimal(self.latitude_ref.as_deref(), "S");
        let longitude = self
            .longitude?
            .to_decimal(self.longitude_ref.as_deref(), "W");
        Some((latitude, longitude))
    }
}

/// Address used when reverse geocoding fails
pub fn coordinate_fallback(latitude: f64, longitude: f64) -> String {
    format!("{:.6}, {:.6}", latitude, longitude)
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String, ClientError>;
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    neighbourhood: Option<String>,
    suburb: Option<String>,
    city_district: Option<String>,
    county: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
}

impl NominatimAddress {
    fn city(&self) -> Option<&String> {
        self.city
            .as_ref()
            .or(self.town.as_ref())
            .or(self.village.as_ref())
    }

    /// "area, district, region", skipping parts Nominatim did not return
    fn summary(&self) -> Option<String> {
        let area = self
            .road
            .as_ref()
            .or(self.neighbourhood.as_ref())
            .or(self.suburb.as_ref());
        let district = self
            .city_district
            .as_ref()
            .or(self.county.as_ref())
            .or(self.city());
        let region = self.state.as_ref();

        let mut parts: Vec<&str> = Vec::new();
        for part in [area, district, region].into_iter().flatten() {
            let part = part.trim();
            if !part.is_empty() && !parts.contains(&part) {
                parts.push(part);
            }
        }

        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// Reverse geocoding through a Nominatim instance
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub const PUBLIC_URL: &'static str = "https://nominatim.openstreetmap.org";

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent("CityZen/1.0 (citizen-complaint-system)")
            .timeout(timeout)
            .build()
            .map_err(ClientError::from_reqwest)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String, ClientError> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url, latitude, longitude
        );
        tracing::debug!("Reverse geocoding {}, {} -> {}", latitude, longitude, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(ClientError::Server {
                status: response.status().as_u16(),
                message: "Reverse geocoding failed".to_string(),
            });
        }

        let body: NominatimReverse = response.json().await.map_err(ClientError::from_reqwest)?;
        body.address
            .as_ref()
            .and_then(NominatimAddress::summary)
            .or(body.display_name)
            .ok_or_else(|| ClientError::Decode("Nominatim returned no address".to_string()))
    }
}

/// Locate a capture: EXIF coordinates if present, otherwise the device GPS.
///
/// A geocoding failure is not an error; the address falls back to the coordinates.
pub async fn resolve_location(
    device: &dyn Device,
    geocoder: &dyn ReverseGeocoder,
    exif: Option<&ExifGps>,
) -> Result<DraftLocation, ClientError> {
    let (latitude, longitude) = match exif.and_then(ExifGps::coordinates) {
        Some(coordinates) => coordinates,
        None => {
            if !device.request_permission(Permission::Location).await {
                return Err(Permission::Location.denied());
            }
            device.current_position().await?
        }
    };

    let address = match geocoder.reverse(latitude, longitude).await {
        Ok(address) => address,
        Err(e) => {
            tracing::warn!("Reverse geocode failed: {}", e);
            coordinate_fallback(latitude, longitude)
        }
    };

    Ok(DraftLocation {
        latitude,
        longitude,
        address,
        captured_at: Utc::now(),
    })
}
