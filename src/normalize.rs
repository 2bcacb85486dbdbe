//! Street address cleanup applied before lookups and queries.
//!
//! The normalized string is the key into the fallback table, so the output must be
//! stable: normalizing an already-normalized address returns it unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

static SUITE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(Suite|Ste\.?)\s*[A-Za-z0-9#\-]+").unwrap());
static UNIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b#\s*[A-Za-z0-9\-]+").unwrap());
static FLOOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bFloor\s*\d+").unwrap());
// "Main office and at 123 Main St" lists several sites; keep the last one named.
static AND_AT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[A-Za-z\s]+ and at ").unwrap());

/// Cleans a street address for lookup. Returns `None` when the street or zip code is
/// missing, or when nothing is left after cleaning.
pub fn normalize(street: &str, zip_code: &str) -> Option<String> {
    if street.trim().is_empty() || zip_code.trim().is_empty() {
        return None;
    }

    // Every pass only deletes text, so this reaches a fixed point.
    let mut current = street.to_string();
    loop {
        let next = clean_once(&current);
        if next == current {
            break;
        }
        current = next;
    }

    if current.is_empty() {
        None
    } else {
        Some(current)
    }
}

fn clean_once(street: &str) -> String {
    let cleaned = SUITE_RE.replace_all(street.trim(), "");
    let cleaned = UNIT_RE.replace_all(&cleaned, "");
    let cleaned = FLOOR_RE.replace_all(&cleaned, "");
    let cleaned = AND_AT_RE.replace(&cleaned, "");
    cleaned
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}
