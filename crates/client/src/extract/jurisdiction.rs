//! Jurisdiction derivation from attribution text.
//!
//! Property searches run nation-wide, so the state a record belongs to,
//! and therefore which mapping table applies, can only be read off the
//! record itself. The vendor attributes each record with free text like
//! `"Garland County (Arkansas) - Assessment rolls"`; the county leads,
//! the state name sits in parentheses. Derivation runs before any rule
//! application and fails loudly when the text parses to nothing.

use super::ExtractError;
use regex::Regex;
use std::sync::OnceLock;

/// The state and county a raw record turned out to belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jurisdiction {
    /// Two-letter USPS state code.
    pub state: &'static str,
    pub county: String,
}

fn paren_state() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([A-Za-z ]+)\)").expect("paren-state regex"))
}

fn leading_county() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z ]+)").expect("leading-county regex"))
}

/// Parse the state and county out of a record's attribution string.
pub fn derive_jurisdiction(attribution: &str) -> Result<Jurisdiction, ExtractError> {
    let state_name = paren_state()
        .captures(attribution)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(|| ExtractError::Jurisdiction(attribution.to_string()))?;

    let state = state_abbreviation(state_name)
        .ok_or_else(|| ExtractError::Jurisdiction(attribution.to_string()))?;

    let county = leading_county()
        .captures(attribution)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replace(" County", "").trim().to_string())
        .unwrap_or_default();

    Ok(Jurisdiction { state, county })
}

/// USPS code for a spelled-out state name, case-insensitive.
pub fn state_abbreviation(name: &str) -> Option<&'static str> {
    let code = match name.to_uppercase().as_str() {
        "ALABAMA" => "AL",
        "ALASKA" => "AK",
        "ARIZONA" => "AZ",
        "ARKANSAS" => "AR",
        "CALIFORNIA" => "CA",
        "COLORADO" => "CO",
        "CONNECTICUT" => "CT",
        "DELAWARE" => "DE",
        "DISTRICT OF COLUMBIA" => "DC",
        "FLORIDA" => "FL",
        "GEORGIA" => "GA",
        "HAWAII" => "HI",
        "IDAHO" => "ID",
        "ILLINOIS" => "IL",
        "INDIANA" => "IN",
        "IOWA" => "IA",
        "KANSAS" => "KS",
        "KENTUCKY" => "KY",
        "LOUISIANA" => "LA",
        "MAINE" => "ME",
        "MARYLAND" => "MD",
        "MASSACHUSETTS" => "MA",
        "MICHIGAN" => "MI",
        "MINNESOTA" => "MN",
        "MISSISSIPPI" => "MS",
        "MISSOURI" => "MO",
        "MONTANA" => "MT",
        "NEBRASKA" => "NE",
        "NEVADA" => "NV",
        "NEW HAMPSHIRE" => "NH",
        "NEW JERSEY" => "NJ",
        "NEW MEXICO" => "NM",
        "NEW YORK" => "NY",
        "NORTH CAROLINA" => "NC",
        "NORTH DAKOTA" => "ND",
        "OHIO" => "OH",
        "OKLAHOMA" => "OK",
        "OREGON" => "OR",
        "PENNSYLVANIA" => "PA",
        "RHODE ISLAND" => "RI",
        "SOUTH CAROLINA" => "SC",
        "SOUTH DAKOTA" => "SD",
        "TENNESSEE" => "TN",
        "TEXAS" => "TX",
        "UTAH" => "UT",
        "VERMONT" => "VT",
        "VIRGINIA" => "VA",
        "WASHINGTON" => "WA",
        "WEST VIRGINIA" => "WV",
        "WISCONSIN" => "WI",
        "WYOMING" => "WY",
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_county_and_state() {
        let j = derive_jurisdiction("Garland County (Arkansas) - Assessment rolls").unwrap();
        assert_eq!(j.state, "AR");
        assert_eq!(j.county, "Garland");
    }

    #[test]
    fn test_derive_two_word_state() {
        let j = derive_jurisdiction("Bergen County (New Jersey) - Tax rolls").unwrap();
        assert_eq!(j.state, "NJ");
        assert_eq!(j.county, "Bergen");
    }

    #[test]
    fn test_unknown_state_fails_loudly() {
        let err = derive_jurisdiction("Foo County (Atlantis) - rolls").unwrap_err();
        assert!(matches!(err, ExtractError::Jurisdiction(_)));
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn test_missing_parenthetical_fails_loudly() {
        let err = derive_jurisdiction("Statewide assessment data").unwrap_err();
        assert!(matches!(err, ExtractError::Jurisdiction(_)));
    }

    #[test]
    fn test_state_abbreviation_is_case_insensitive() {
        assert_eq!(state_abbreviation("texas"), Some("TX"));
        assert_eq!(state_abbreviation("TEXAS"), Some("TX"));
        assert_eq!(state_abbreviation("Narnia"), None);
    }
}
