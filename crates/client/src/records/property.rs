//! Real-property tax records.
//!
//! Property searches run nation-wide, so the state (and the county,
//! which can swing the schema within one state) is derived from each
//! record's attribution text before a mapping table can even be chosen.

use super::{Annotatable, CaseStatus, Keyed, record_key};
use crate::extract::transforms::{clean_string, text_after_colon};
use crate::extract::{Extractable, ExtractError, MappingRule, apply_rules, derive_jurisdiction};
use casefinder_core::RawNode;
use serde::{Deserialize, Serialize};

/// Catch-all county entry in a state's table list.
const ANY_COUNTY: &str = "*";

static TX_DEFAULT: &[MappingRule] = &[
    MappingRule::path("./disp_fld1", "owner_name").with_transform(clean_string),
    MappingRule::path("./disp_fld2", "owner_address").with_transform(text_after_colon),
    MappingRule::path("./disp_fld3", "property_address").with_transform(text_after_colon),
    MappingRule::path("./source", "data_source"),
    MappingRule::path(".", "db").with_prop("db"),
    MappingRule::path(".", "ed").with_prop("ed"),
    MappingRule::path(".", "rec").with_prop("rec"),
];

static AR_DEFAULT: &[MappingRule] = &[
    MappingRule::path("./disp_fld1", "owner_name").with_transform(text_after_colon),
    MappingRule::path("./disp_fld2", "property_id").with_transform(text_after_colon),
    MappingRule::path("./disp_fld3", "parcel_id").with_transform(text_after_colon),
    MappingRule::path("./disp_fld4", "property_address").with_transform(text_after_colon),
    MappingRule::path("./source", "data_source"),
    MappingRule::path(".", "db").with_prop("db"),
    MappingRule::path(".", "ed").with_prop("ed"),
    MappingRule::path(".", "rec").with_prop("rec"),
];

// Washington County publishes through a different assessor system than
// the rest of Arkansas.
static AR_WASHINGTON: &[MappingRule] = &[
    MappingRule::path("./disp_fld1", "owner_name"),
    MappingRule::path("./disp_fld2", "owner_address").with_transform(text_after_colon),
    MappingRule::path("./disp_fld3", "property_address").with_transform(text_after_colon),
    MappingRule::path("./source", "data_source"),
    MappingRule::path(".", "db").with_prop("db"),
    MappingRule::path(".", "ed").with_prop("ed"),
    MappingRule::path(".", "rec").with_prop("rec"),
];

static TX_TABLES: &[(&str, &[MappingRule])] = &[(ANY_COUNTY, TX_DEFAULT)];
static AR_TABLES: &[(&str, &[MappingRule])] = &[(ANY_COUNTY, AR_DEFAULT), ("WASHINGTON", AR_WASHINGTON)];

fn summary_rules(source: &str, state: &str, county: &str) -> Result<&'static [MappingRule], ExtractError> {
    let tables = match (source, state) {
        ("PUBLICDATA", "TX") => TX_TABLES,
        ("PUBLICDATA", "AR") => AR_TABLES,
        _ => {
            return Err(ExtractError::UnmappedJurisdiction {
                data_source: source.to_string(),
                state: state.to_string(),
            });
        }
    };

    let county = county.to_uppercase();
    let rules = tables
        .iter()
        .find(|(name, _)| *name == county)
        .or_else(|| tables.iter().find(|(name, _)| *name == ANY_COUNTY))
        .map(|(_, rules)| *rules);

    rules.ok_or_else(|| ExtractError::UnmappedJurisdiction {
        data_source: source.to_string(),
        state: state.to_string(),
    })
}

/// One parcel as it appears in a search result page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySummary {
    pub owner_name: String,
    pub owner_address: String,
    pub property_address: String,
    pub property_id: String,
    pub parcel_id: String,
    pub county: String,
    pub data_source: String,
    pub db: String,
    pub ed: String,
    pub rec: String,
    pub source: String,
    pub state: String,
    pub case_status: CaseStatus,
}

impl PropertySummary {
    /// Parse one raw search record, deriving its jurisdiction first.
    ///
    /// The state is not a parameter: it is read off the record's
    /// attribution text, and failing to read it fails the record.
    pub fn from_raw(root: &RawNode, source: &str) -> Result<Self, ExtractError> {
        let attribution = root
            .first_text("./source")
            .ok_or_else(|| ExtractError::Jurisdiction("record carries no attribution".to_string()))?;
        let jurisdiction = derive_jurisdiction(attribution)?;

        let rules = summary_rules(source, jurisdiction.state, &jurisdiction.county)?;

        let mut record = Self {
            county: jurisdiction.county,
            source: source.to_string(),
            state: jurisdiction.state.to_string(),
            ..Default::default()
        };
        apply_rules(&mut record, root, rules);
        Ok(record)
    }
}

impl Extractable for PropertySummary {
    fn slot(&mut self, attr: &str) -> Option<&mut String> {
        match attr {
            "owner_name" => Some(&mut self.owner_name),
            "owner_address" => Some(&mut self.owner_address),
            "property_address" => Some(&mut self.property_address),
            "property_id" => Some(&mut self.property_id),
            "parcel_id" => Some(&mut self.parcel_id),
            "data_source" => Some(&mut self.data_source),
            "db" => Some(&mut self.db),
            "ed" => Some(&mut self.ed),
            "rec" => Some(&mut self.rec),
            _ => None,
        }
    }
}

impl Keyed for PropertySummary {
    fn key(&self) -> String {
        record_key(&self.source, &self.db, &self.ed, &self.rec)
    }
}

impl Annotatable for PropertySummary {
    fn set_case_status(&mut self, status: CaseStatus) {
        self.case_status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(attribution: &str, fields: &[(&str, &str)]) -> RawNode {
        let mut record = RawNode::new("record");
        record.attrs.insert("db".to_string(), "grp_tax".to_string());
        record.attrs.insert("ed".to_string(), "2019".to_string());
        record.attrs.insert("rec".to_string(), "778899".to_string());
        record.children.push(RawNode {
            text: Some(attribution.to_string()),
            ..RawNode::new("source")
        });
        for (name, text) in fields {
            record.children.push(RawNode { text: Some(text.to_string()), ..RawNode::new(*name) });
        }
        record
    }

    #[test]
    fn test_texas_parcel() {
        let raw = record(
            "Collin County (Texas) - Tax rolls",
            &[
                ("disp_fld1", "SMITH, JOHN Q"),
                ("disp_fld2", "Owner Address: 812 GLAMORGAN AVE, PLANO TX"),
                ("disp_fld3", "Property Address: 900 ELM ST, PLANO TX"),
            ],
        );

        let parcel = PropertySummary::from_raw(&raw, "PUBLICDATA").unwrap();
        assert_eq!(parcel.state, "TX");
        assert_eq!(parcel.county, "Collin");
        assert_eq!(parcel.owner_name, "SMITH JOHN Q");
        assert_eq!(parcel.owner_address, "812 GLAMORGAN AVE, PLANO TX");
        assert_eq!(parcel.property_address, "900 ELM ST, PLANO TX");
        assert_eq!(parcel.key(), "PUBLICDATA:grp_tax.2019.778899");
    }

    #[test]
    fn test_arkansas_county_override() {
        let default = record(
            "Garland County (Arkansas) - Assessment rolls",
            &[("disp_fld2", "Property ID: 100-200")],
        );
        let parcel = PropertySummary::from_raw(&default, "PUBLICDATA").unwrap();
        assert_eq!(parcel.property_id, "100-200");

        // Washington County's second display field is an address, not an id.
        let washington = record(
            "Washington County (Arkansas) - Assessment rolls",
            &[("disp_fld2", "Owner Address: 1 SQUARE PL, FAYETTEVILLE AR")],
        );
        let parcel = PropertySummary::from_raw(&washington, "PUBLICDATA").unwrap();
        assert_eq!(parcel.owner_address, "1 SQUARE PL, FAYETTEVILLE AR");
        assert!(parcel.property_id.is_empty());
    }

    #[test]
    fn test_unmapped_state_fails() {
        let raw = record("King County (Washington) - Tax rolls", &[]);
        let err = PropertySummary::from_raw(&raw, "PUBLICDATA").unwrap_err();
        assert!(matches!(err, ExtractError::UnmappedJurisdiction { .. }));
    }

    #[test]
    fn test_missing_attribution_fails() {
        let mut raw = record("x", &[]);
        raw.children.retain(|c| c.name != "source");
        let err = PropertySummary::from_raw(&raw, "PUBLICDATA").unwrap_err();
        assert!(matches!(err, ExtractError::Jurisdiction(_)));
    }
}
