use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::constants::*;
use crate::error::Result;
use crate::types::SurveyRow;

/// Header positions of the columns we read. Columns may be absent.
#[derive(Debug, Default)]
struct Columns {
    organization_name: Option<usize>,
    street: Option<usize>,
    zip_code: Option<usize>,
    sector: Option<usize>,
    primary_district: Option<usize>,
    other_districts: Option<usize>,
    primary_spa: Option<usize>,
    additional_spas: Option<usize>,
    mission: Option<usize>,
    primary_activity: Option<usize>,
    email: Option<usize>,
    contact_name: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        // Exact header first; a whitespace-insensitive match covers re-exports that
        // lost the trailing spaces.
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .or_else(|| headers.iter().position(|h| h.trim() == name.trim()))
        };
        let columns = Self {
            organization_name: find(COL_ORG_NAME),
            street: find(COL_STREET),
            zip_code: find(COL_ZIP),
            sector: find(COL_SECTOR),
            primary_district: find(COL_PRIMARY_DISTRICT),
            other_districts: find(COL_OTHER_DISTRICTS),
            primary_spa: find(COL_PRIMARY_SPA),
            additional_spas: find(COL_ADDITIONAL_SPAS),
            mission: find(COL_MISSION),
            primary_activity: find(COL_PRIMARY_ACTIVITY),
            email: find(COL_EMAIL),
            contact_name: find(COL_CONTACT_NAME),
        };
        for (name, idx) in [
            (COL_ORG_NAME, columns.organization_name),
            (COL_STREET, columns.street),
            (COL_ZIP, columns.zip_code),
        ] {
            if idx.is_none() {
                warn!("Survey export has no {:?} column", name);
            }
        }
        columns
    }

    fn row(&self, record: &csv::StringRecord) -> SurveyRow {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        SurveyRow {
            organization_name: cell(self.organization_name),
            street: cell(self.street),
            zip_code: cell(self.zip_code),
            sector: cell(self.sector),
            primary_district: cell(self.primary_district),
            other_districts: cell(self.other_districts),
            primary_spa: cell(self.primary_spa),
            additional_spas: cell(self.additional_spas),
            mission: cell(self.mission),
            primary_activity: cell(self.primary_activity),
            email: cell(self.email),
            contact_name: cell(self.contact_name),
        }
    }
}

/// Reads the survey export from disk.
pub fn read_survey<P: AsRef<Path>>(path: P) -> Result<Vec<SurveyRow>> {
    let path = path.as_ref();
    info!("Reading CSV file {}", path.display());
    let file = File::open(path)?;
    parse_survey(file)
}

/// Parses a survey export: the first row is the header, blank lines are skipped
/// and short rows leave their missing cells empty.
pub fn parse_survey<R: Read>(reader: R) -> Result<Vec<SurveyRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::from_headers(rdr.headers()?);

    let mut rows = Vec::new();
    for record in rdr.records() {
        rows.push(columns.row(&record?));
    }
    Ok(rows)
}
