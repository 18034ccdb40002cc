//! Well position normalization.
//!
//! Layout files and reader payloads spell wells differently (`A1`, `a01`,
//! `A001`); everything is keyed by the canonical `A01` form.
use regex::Regex;
use std::sync::OnceLock;

fn well_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Z]+)0*(\d+)$").expect("well position regex"))
}

/// Normalize a well identifier to row letters plus a two-digit column.
///
/// Tokens that do not look like `<letters><digits>` are returned trimmed and
/// upper-cased, so unusual labels still match themselves.
pub fn normalize_position(raw: &str) -> String {
    let token = raw.trim().to_uppercase();
    let Some(caps) = well_pattern().captures(&token) else {
        return token;
    };
    format!("{}{:0>2}", &caps[1], &caps[2])
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod tests;
