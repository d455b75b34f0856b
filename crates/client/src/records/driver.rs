//! Driver's-license records.

use super::{Annotatable, CaseStatus, Keyed, record_key};
use crate::extract::transforms::{clean_string, street_link};
use crate::extract::{Extractable, ExtractError, MappingRule, apply_rules};
use casefinder_core::RawNode;
use serde::{Deserialize, Serialize};

static SUMMARY_TX: &[MappingRule] = &[
    MappingRule::path("./disp_fld1", "driver_name").with_transform(clean_string),
    MappingRule::path("./disp_fld2", "dob"),
    MappingRule::path("./source", "data_source"),
    MappingRule::path(".", "db").with_prop("db"),
    MappingRule::path(".", "ed").with_prop("ed"),
    MappingRule::path(".", "rec").with_prop("rec"),
];

static SUMMARY_CO: &[MappingRule] = &[
    MappingRule::path("./disp_fld1", "driver_name"),
    MappingRule::path("./disp_fld2", "dob"),
    MappingRule::path("./source", "data_source"),
    MappingRule::path(".", "db").with_prop("db"),
    MappingRule::path(".", "ed").with_prop("ed"),
    MappingRule::path(".", "rec").with_prop("rec"),
];

static DETAILS_TX: &[MappingRule] = &[
    MappingRule::label("First Name", "first_name").with_transform(clean_string),
    MappingRule::label("Middle Name", "middle_name").with_transform(clean_string),
    MappingRule::label("Last Name", "last_name").with_transform(clean_string),
    MappingRule::label("Name Suffix", "suffix").with_transform(clean_string),
    MappingRule::label("Address", "address"),
    MappingRule::label("Address", "linkable_address").with_transform(street_link),
    MappingRule::label("Address(Continued)", "address"),
    MappingRule::label("City/ZIP Code", "city"),
    MappingRule::label("DOB", "dob"),
    MappingRule::label("License number", "license_number"),
    MappingRule::label("License type", "license_type"),
    MappingRule::label("Issue Date", "issue_date").with_prop("formatteddate"),
];

fn summary_rules(source: &str, state: &str) -> Result<&'static [MappingRule], ExtractError> {
    match (source, state) {
        ("PUBLICDATA", "TX") => Ok(SUMMARY_TX),
        ("PUBLICDATA", "CO") => Ok(SUMMARY_CO),
        _ => Err(ExtractError::UnmappedJurisdiction { data_source: source.to_string(), state: state.to_string() }),
    }
}

fn details_rules(source: &str, state: &str) -> Result<&'static [MappingRule], ExtractError> {
    match (source, state) {
        ("PUBLICDATA", "TX") => Ok(DETAILS_TX),
        _ => Err(ExtractError::UnmappedJurisdiction { data_source: source.to_string(), state: state.to_string() }),
    }
}

/// One driver as it appears in a search result page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverSummary {
    pub driver_name: String,
    pub dob: String,
    pub data_source: String,
    pub db: String,
    pub ed: String,
    pub rec: String,
    pub source: String,
    pub state: String,
    pub case_status: CaseStatus,
}

impl DriverSummary {
    /// Parse one raw search record into the normalized form.
    pub fn from_raw(root: &RawNode, source: &str, state: &str) -> Result<Self, ExtractError> {
        let rules = summary_rules(source, state)?;
        let mut record =
            Self { source: source.to_string(), state: state.to_string(), ..Default::default() };
        apply_rules(&mut record, root, rules);
        Ok(record)
    }
}

impl Extractable for DriverSummary {
    fn slot(&mut self, attr: &str) -> Option<&mut String> {
        match attr {
            "driver_name" => Some(&mut self.driver_name),
            "dob" => Some(&mut self.dob),
            "data_source" => Some(&mut self.data_source),
            "db" => Some(&mut self.db),
            "ed" => Some(&mut self.ed),
            "rec" => Some(&mut self.rec),
            _ => None,
        }
    }
}

impl Keyed for DriverSummary {
    fn key(&self) -> String {
        record_key(&self.source, &self.db, &self.ed, &self.rec)
    }
}

impl Annotatable for DriverSummary {
    fn set_case_status(&mut self, status: CaseStatus) {
        self.case_status = status;
    }
}

/// Full driver's-license record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverDetails {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub suffix: String,

    pub address: String,
    pub linkable_address: String,
    pub city: String,
    pub dob: String,

    pub license_number: String,
    pub license_type: String,
    pub issue_date: String,

    pub source: String,
    pub state: String,
}

impl DriverDetails {
    /// Parse a raw details tree into the normalized form.
    pub fn from_raw(root: &RawNode, source: &str, state: &str) -> Result<Self, ExtractError> {
        let rules = details_rules(source, state)?;
        let mut record =
            Self { source: source.to_string(), state: state.to_string(), ..Default::default() };
        apply_rules(&mut record, root, rules);
        Ok(record)
    }
}

impl Extractable for DriverDetails {
    fn slot(&mut self, attr: &str) -> Option<&mut String> {
        match attr {
            "first_name" => Some(&mut self.first_name),
            "middle_name" => Some(&mut self.middle_name),
            "last_name" => Some(&mut self.last_name),
            "suffix" => Some(&mut self.suffix),
            "address" => Some(&mut self.address),
            "linkable_address" => Some(&mut self.linkable_address),
            "city" => Some(&mut self.city),
            "dob" => Some(&mut self.dob),
            "license_number" => Some(&mut self.license_number),
            "license_type" => Some(&mut self.license_type),
            "issue_date" => Some(&mut self.issue_date),
            _ => None,
        }
    }
}
