use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

use crate::constants::UNKNOWN;

/// A resolved location. Serialized as `[latitude, longitude]`, the shape the map
/// views read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self { latitude, longitude }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.latitude, c.longitude]
    }
}

/// One survey response. Cells are kept as exported; empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyRow {
    pub organization_name: Option<String>,
    pub street: Option<String>,
    pub zip_code: Option<String>,
    pub sector: Option<String>,
    pub primary_district: Option<String>,
    pub other_districts: Option<String>,
    pub primary_spa: Option<String>,
    pub additional_spas: Option<String>,
    pub mission: Option<String>,
    pub primary_activity: Option<String>,
    pub email: Option<String>,
    pub contact_name: Option<String>,
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or(default)
}

impl SurveyRow {
    pub fn organization_name(&self) -> &str {
        or_default(&self.organization_name, UNKNOWN)
    }

    pub fn street(&self) -> &str {
        or_default(&self.street, "")
    }

    pub fn zip_code(&self) -> &str {
        or_default(&self.zip_code, "")
    }

    pub fn sector(&self) -> &str {
        or_default(&self.sector, UNKNOWN)
    }

    pub fn primary_district(&self) -> &str {
        or_default(&self.primary_district, UNKNOWN)
    }

    /// Builds the output record for a row that geocoded successfully.
    pub fn to_record(&self, row_index: usize, coordinates: Coordinate) -> OrganizationRecord {
        OrganizationRecord {
            id: format!("org-{}", row_index),
            name: self.organization_name().to_string(),
            sector: self.sector().to_string(),
            address: self.street().to_string(),
            zip_code: self.zip_code().to_string(),
            coordinates,
            primary_district: self.primary_district().to_string(),
            other_districts: or_default(&self.other_districts, "").to_string(),
            primary_spa: or_default(&self.primary_spa, "").to_string(),
            additional_spas: or_default(&self.additional_spas, "").to_string(),
            mission: or_default(&self.mission, "").to_string(),
            primary_activity: or_default(&self.primary_activity, "").to_string(),
            contact: Contact {
                email: or_default(&self.email, "").to_string(),
                name: or_default(&self.contact_name, "").to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRecord {
    pub id: String,
    pub name: String,
    pub sector: String,
    pub address: String,
    pub zip_code: String,
    pub coordinates: Coordinate,
    pub primary_district: String,
    pub other_districts: String,
    #[serde(rename = "primarySPA")]
    pub primary_spa: String,
    #[serde(rename = "additionalSPAs")]
    pub additional_spas: String,
    pub mission: String,
    pub primary_activity: String,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub total_organizations: usize,
    pub geocoded_organizations: usize,
    pub failed_geocode: usize,
    #[serde(serialize_with = "one_decimal")]
    pub success_rate: f64,
    #[serde(serialize_with = "iso_millis")]
    pub last_updated: DateTime<Utc>,
    pub districts: Vec<String>,
    pub sectors: Vec<String>,
}

impl DatasetMetadata {
    /// Derives the run metadata. Districts and sectors come from the geocoded
    /// records only, in first-seen order.
    pub fn summarize(
        total: usize,
        organizations: &[OrganizationRecord],
        generated_at: DateTime<Utc>,
    ) -> Self {
        let geocoded = organizations.len();
        Self {
            total_organizations: total,
            geocoded_organizations: geocoded,
            failed_geocode: total.saturating_sub(geocoded),
            success_rate: success_rate(geocoded, total),
            last_updated: generated_at,
            districts: distinct(organizations.iter().map(|o| o.primary_district.as_str())),
            sectors: distinct(organizations.iter().map(|o| o.sector.as_str())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDataset {
    pub organizations: Vec<OrganizationRecord>,
    pub metadata: DatasetMetadata,
}

/// Percentage rounded to one decimal. An empty survey reports 0.0.
pub fn success_rate(succeeded: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (succeeded as f64 / total as f64 * 1000.0).round() / 10.0
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

fn one_decimal<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.1}", value))
}

fn iso_millis<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
