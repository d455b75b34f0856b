//! Motor-vehicle registration records.

use super::{Annotatable, CaseStatus, Keyed, record_key};
use crate::extract::transforms::{clean_string, co_owner, text_after_colon};
use crate::extract::{Extractable, ExtractError, MappingRule, apply_rules};
use casefinder_core::RawNode;
use serde::{Deserialize, Serialize};

static SUMMARY_TX: &[MappingRule] = &[
    MappingRule::path("./disp_fld1", "owner_name"),
    MappingRule::path("./disp_fld2", "year_make_model").with_transform(text_after_colon),
    MappingRule::path("./disp_fld3", "plate").with_transform(text_after_colon),
    MappingRule::path("./disp_fld5", "prev_plate"),
    MappingRule::path("./source", "data_source"),
    MappingRule::path(".", "db").with_prop("db"),
    MappingRule::path(".", "ed").with_prop("ed"),
    MappingRule::path(".", "rec").with_prop("rec"),
];

static SUMMARY_CO: &[MappingRule] = &[
    MappingRule::path("./disp_fld1", "owner_name").with_transform(co_owner),
    MappingRule::path("./disp_fld2", "year_make_model").with_transform(text_after_colon),
    MappingRule::path("./source", "data_source"),
    MappingRule::path(".", "db").with_prop("db"),
    MappingRule::path(".", "ed").with_prop("ed"),
    MappingRule::path(".", "rec").with_prop("rec"),
];

static DETAILS_TX: &[MappingRule] = &[
    MappingRule::label("Owner Name", "owner_name"),
    MappingRule::label("Owner Street", "owner_street"),
    MappingRule::label("Owner City", "owner_city"),
    MappingRule::label("Owner State", "owner_state"),
    MappingRule::label("Owner ZIP Code", "owner_zip"),
    MappingRule::label("Previous Owner Name", "prev_owner_name"),
    MappingRule::label("Previous Owner City", "prev_owner_city"),
    MappingRule::label("Previous Owner State", "prev_owner_state"),
    MappingRule::label("Renewal Notice Street", "notice_street"),
    MappingRule::label("Renewal Notice City", "notice_city"),
    MappingRule::label("Renewal Notice State", "notice_state"),
    MappingRule::label("Renewal Notice ZIP Code", "notice_zip"),
    MappingRule::label("License Plate Number", "plate").with_prop("formattedplate"),
    MappingRule::label("Previous License Plate Number", "prev_plate").with_prop("formattedplate"),
    MappingRule::label("Title Date", "title_date").with_prop("formatteddate"),
    MappingRule::label("Vehicle Sold Date", "sold_date"),
    MappingRule::label("Vehicle Sales Price", "sold_price"),
    MappingRule::label("Model Year", "year"),
    MappingRule::label("Make", "make"),
    MappingRule::label("Model", "model"),
    MappingRule::label("Model Description", "model_desc"),
    MappingRule::label("Vehicle Body Type", "body_type"),
    MappingRule::label("Vehicle Class Code", "class_code"),
    MappingRule::label("Vehicle Major Color[Color Group]", "main_color"),
    MappingRule::label("Vehicle Minor Color[Color Group]", "other_color"),
    MappingRule::label("VIN Number", "vin").with_prop("formattedvin"),
];

static DETAILS_CO: &[MappingRule] = &[
    MappingRule::label("Owner 1", "owner_name").with_transform(clean_string),
    MappingRule::label("Owner 2", "owner_name").with_transform(clean_string),
    MappingRule::label("Owner 3", "owner_name").with_transform(clean_string),
    MappingRule::label("Legal Address", "owner_street"),
    MappingRule::label("Legal City", "owner_city"),
    MappingRule::label("Legal State", "owner_state"),
    MappingRule::label("Legal ZIP Code", "owner_zip"),
    MappingRule::label("Mail Address", "notice_street"),
    MappingRule::label("Mail City", "notice_city"),
    MappingRule::label("Mail State", "notice_state"),
    MappingRule::label("Mail ZIP Code", "notice_zip"),
    MappingRule::label("Lic. Plate", "plate").with_prop("formattedplate"),
    MappingRule::label("Previous License Plate", "prev_plate").with_prop("formattedplate"),
    MappingRule::label("Tran. Date", "title_date").with_prop("formatteddate"),
    MappingRule::label("Purchase Date", "sold_date").with_prop("formatteddate"),
    MappingRule::label("Purchase Price", "sold_price"),
    MappingRule::label("Vehicle Year", "year"),
    MappingRule::label("Make", "make"),
    MappingRule::label("Model", "model"),
    MappingRule::label("Model Description", "model_desc"),
    MappingRule::label("Title Vehicle Type", "body_type"),
    MappingRule::label("Own. Tax Class", "class_code"),
    MappingRule::label("VIN", "vin"),
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
        ("PUBLICDATA", "CO") => Ok(DETAILS_CO),
        _ => Err(ExtractError::UnmappedJurisdiction { data_source: source.to_string(), state: state.to_string() }),
    }
}

/// One vehicle as it appears in a search result page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub owner_name: String,
    pub vin: String,
    pub year_make_model: String,
    pub plate: String,
    pub prev_plate: String,
    pub data_source: String,
    pub db: String,
    pub ed: String,
    pub rec: String,
    pub source: String,
    pub state: String,
    pub case_status: CaseStatus,
}

impl VehicleSummary {
    /// Parse one raw search record into the normalized form.
    pub fn from_raw(root: &RawNode, source: &str, state: &str) -> Result<Self, ExtractError> {
        let rules = summary_rules(source, state)?;
        let mut record =
            Self { source: source.to_string(), state: state.to_string(), ..Default::default() };
        apply_rules(&mut record, root, rules);
        Ok(record)
    }
}

impl Extractable for VehicleSummary {
    fn slot(&mut self, attr: &str) -> Option<&mut String> {
        match attr {
            "owner_name" => Some(&mut self.owner_name),
            "vin" => Some(&mut self.vin),
            "year_make_model" => Some(&mut self.year_make_model),
            "plate" => Some(&mut self.plate),
            "prev_plate" => Some(&mut self.prev_plate),
            "data_source" => Some(&mut self.data_source),
            "db" => Some(&mut self.db),
            "ed" => Some(&mut self.ed),
            "rec" => Some(&mut self.rec),
            _ => None,
        }
    }
}

impl Keyed for VehicleSummary {
    fn key(&self) -> String {
        record_key(&self.source, &self.db, &self.ed, &self.rec)
    }
}

impl Annotatable for VehicleSummary {
    fn set_case_status(&mut self, status: CaseStatus) {
        self.case_status = status;
    }
}

/// Full registration record for one vehicle, including its lien holders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleDetails {
    pub owner_name: String,
    pub owner_street: String,
    pub owner_city: String,
    pub owner_state: String,
    pub owner_zip: String,

    pub prev_owner_name: String,
    pub prev_owner_city: String,
    pub prev_owner_state: String,

    pub notice_street: String,
    pub notice_city: String,
    pub notice_state: String,
    pub notice_zip: String,

    pub plate: String,
    pub prev_plate: String,
    pub vin: String,

    pub title_date: String,
    pub sold_date: String,
    pub sold_price: String,

    pub year: String,
    pub make: String,
    pub model: String,
    pub model_desc: String,
    pub body_type: String,
    pub class_code: String,
    pub main_color: String,
    pub other_color: String,

    pub liens: Vec<super::LienHolder>,

    pub source: String,
    pub state: String,
}

impl VehicleDetails {
    /// Parse a raw details tree, lien holders included.
    pub fn from_raw(root: &RawNode, source: &str, state: &str) -> Result<Self, ExtractError> {
        let rules = details_rules(source, state)?;
        let mut record =
            Self { source: source.to_string(), state: state.to_string(), ..Default::default() };
        apply_rules(&mut record, root, rules);
        record.liens = super::lien::lien_holders(root, source, state)?;
        Ok(record)
    }
}

impl Extractable for VehicleDetails {
    fn slot(&mut self, attr: &str) -> Option<&mut String> {
        match attr {
            "owner_name" => Some(&mut self.owner_name),
            "owner_street" => Some(&mut self.owner_street),
            "owner_city" => Some(&mut self.owner_city),
            "owner_state" => Some(&mut self.owner_state),
            "owner_zip" => Some(&mut self.owner_zip),
            "prev_owner_name" => Some(&mut self.prev_owner_name),
            "prev_owner_city" => Some(&mut self.prev_owner_city),
            "prev_owner_state" => Some(&mut self.prev_owner_state),
            "notice_street" => Some(&mut self.notice_street),
            "notice_city" => Some(&mut self.notice_city),
            "notice_state" => Some(&mut self.notice_state),
            "notice_zip" => Some(&mut self.notice_zip),
            "plate" => Some(&mut self.plate),
            "prev_plate" => Some(&mut self.prev_plate),
            "vin" => Some(&mut self.vin),
            "title_date" => Some(&mut self.title_date),
            "sold_date" => Some(&mut self.sold_date),
            "sold_price" => Some(&mut self.sold_price),
            "year" => Some(&mut self.year),
            "make" => Some(&mut self.make),
            "model" => Some(&mut self.model),
            "model_desc" => Some(&mut self.model_desc),
            "body_type" => Some(&mut self.body_type),
            "class_code" => Some(&mut self.class_code),
            "main_color" => Some(&mut self.main_color),
            "other_color" => Some(&mut self.other_color),
            _ => None,
        }
    }
}
