/// Column headers of the survey export. Several carry trailing or doubled spaces
/// exactly as the form tool exported them.
pub const COL_ORG_NAME: &str = "Organization Name";
pub const COL_STREET: &str = "Main Org Street Address (headquarters)";
pub const COL_ZIP: &str = "Main Org Zip Code";
pub const COL_SECTOR: &str = "Sector";
pub const COL_PRIMARY_DISTRICT: &str =
    "Primary Supervisorial District  (based on headquarters address) ";
pub const COL_MISSION: &str = "Organization Mission Statement ";
pub const COL_PRIMARY_ACTIVITY: &str = "Provide one sentence descriptor of your primary activity";
pub const COL_OTHER_DISTRICTS: &str = "Other Supervisorial District(s) Served (all districts where programs and services are provided) ";
pub const COL_PRIMARY_SPA: &str =
    "Primary SPA (service planning area)(Based on headquarters address)";
pub const COL_ADDITIONAL_SPAS: &str = "Additional SPA(s) (service planning area) Served  (all districts where programs and services are provided) - Mark any or all ";
pub const COL_EMAIL: &str = "Email Address";
pub const COL_CONTACT_NAME: &str = "Your Name (First/Last)";

/// Placeholder for name, sector and primary district when the cell is empty.
pub const UNKNOWN: &str = "Unknown";

// Defaults used when config.toml does not override them
pub const DEFAULT_INPUT_PATH: &str =
    "public/FINAL- Food Systems Stakeholder Survey  (Responses) - Survey Respones.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "src/data/organizations.json";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "FoodSystemsStakeholderSurvey/1.0 (contact@example.com)";
pub const DEFAULT_LOCALITY: &str = "Los Angeles, CA";
pub const DEFAULT_EXPECTED_STATE: &str = "California";

/// Nominatim's usage policy asks for at most one request per second; the survey
/// run stays well under that.
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_ROW_DELAY_MS: u64 = 2000;
