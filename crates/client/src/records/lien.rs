//! Lien-holder records attached to a vehicle registration.

use crate::extract::{Extractable, ExtractError, MappingRule, apply_rules};
use casefinder_core::RawNode;
use serde::{Deserialize, Serialize};

// Both spellings of "Position": the vendor ships the typo today, and the
// correct label is matched in case they ever fix it.
static LIEN_TX: &[MappingRule] = &[
    MappingRule::path(".//textdata/field[@label='Lien Holder Position']", "position"),
    MappingRule::path(".//textdata/field[@label='Lien Holder Postion']", "position"),
    MappingRule::path(".//textdata/field[@label='Lien Date']", "date"),
    MappingRule::path(
        ".//dataset[@label='Lien Holder Information']/dataitem/textdata/field[@label='Lien Holder Name']",
        "name",
    ),
    MappingRule::path(
        ".//dataset[@label='Lien Holder Information']/dataitem/textdata/field[@label='Lien Holder Number']",
        "number",
    ),
    MappingRule::path(
        ".//dataset[@label='Lien Holder Information']/dataitem/textdata/field[@label='Street']",
        "street",
    ),
    MappingRule::path(
        ".//dataset[@label='Lien Holder Information']/dataitem/textdata/field[@label='Street (cont)']",
        "street",
    ),
    MappingRule::path(
        ".//dataset[@label='Lien Holder Information']/dataitem/textdata/field[@label='City']",
        "city_state_zip",
    ),
    MappingRule::path(
        ".//dataset[@label='Lien Holder Information']/dataitem/textdata/field[@label='State']",
        "city_state_zip",
    ),
    MappingRule::path(
        ".//dataset[@label='Lien Holder Information']/dataitem/textdata/field[@label='Zip Code']",
        "city_state_zip",
    ),
    MappingRule::path(
        ".//dataset[@label='Lien Holder Information']/dataitem/textdata/field[@label='Country']",
        "country",
    ),
];

fn lien_rules(source: &str, state: &str) -> Result<&'static [MappingRule], ExtractError> {
    match (source, state) {
        ("PUBLICDATA", "TX") => Ok(LIEN_TX),
        _ => Err(ExtractError::UnmappedJurisdiction { data_source: source.to_string(), state: state.to_string() }),
    }
}

/// One lien holder on a vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LienHolder {
    pub position: String,
    pub number: String,
    pub date: String,
    pub name: String,
    pub street: String,
    pub city_state_zip: String,
    pub country: String,
}

impl LienHolder {
    /// Parse one lien node of a vehicle details tree.
    pub fn from_raw(root: &RawNode, source: &str, state: &str) -> Result<Self, ExtractError> {
        let rules = lien_rules(source, state)?;
        let mut record = Self::default();
        apply_rules(&mut record, root, rules);
        Ok(record)
    }
}

impl Extractable for LienHolder {
    // City, state, and zip assemble into one display field.
    const SEPARATOR: &'static str = " ";

    fn slot(&mut self, attr: &str) -> Option<&mut String> {
        match attr {
            "position" => Some(&mut self.position),
            "number" => Some(&mut self.number),
            "date" => Some(&mut self.date),
            "name" => Some(&mut self.name),
            "street" => Some(&mut self.street),
            "city_state_zip" => Some(&mut self.city_state_zip),
            "country" => Some(&mut self.country),
            _ => None,
        }
    }
}

/// Extract every lien holder from a vehicle details tree.
///
/// A record with no lien nodes is a vehicle with no liens, not an error.
pub(crate) fn lien_holders(root: &RawNode, source: &str, state: &str) -> Result<Vec<LienHolder>, ExtractError> {
    let lien_nodes = root.select(".//liens/lien");
    if lien_nodes.is_empty() {
        return Ok(Vec::new());
    }

    // Resolve the table once; per-node parsing cannot fail after that.
    lien_rules(source, state)?;

    lien_nodes
        .into_iter()
        .map(|node| LienHolder::from_raw(node, source, state))
        .collect()
}
