//! Table-driven field extraction.
//!
//! Every data source has one schema per state, sometimes per county,
//! and none of them are under our control. Rather than one parser per
//! schema, each normalized record kind carries declarative mapping tables:
//! ordered lists of rules saying where in the raw tree a value lives and
//! which attribute of the record it becomes. The engine here walks one
//! table against one raw record.
//!
//! Rule order matters: when a later rule lands on an attribute that
//! already holds text, the new value is appended with the record kind's
//! separator instead of overwriting, so multi-part fields assemble in
//! table order.

pub mod jurisdiction;
pub mod transforms;

pub use jurisdiction::{Jurisdiction, derive_jurisdiction};

use casefinder_core::RawNode;

/// Extraction configuration errors.
///
/// These are programmer/ops errors (a record arrived from a jurisdiction
/// nobody has written a table for) and they fail the whole operation
/// with an actionable message rather than producing a half-populated
/// record.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractError {
    /// No mapping table covers this (source, state) pair.
    #[error("no {data_source} mapping table for state {state}")]
    UnmappedJurisdiction { data_source: String, state: String },

    /// The record's attribution text named no recognizable jurisdiction.
    #[error("cannot derive jurisdiction from attribution: {0:?}")]
    Jurisdiction(String),
}

/// Where in the raw tree a rule reads from.
#[derive(Debug, Clone, Copy)]
pub enum Locator {
    /// A path in the tree's selector language.
    Path(&'static str),
    /// A labeled field: shorthand for `.//field[@label='…']`.
    Label(&'static str),
}

/// A pure value transform. `None` means the transform could not make
/// sense of the input; the engine logs and keeps the raw value.
pub type Transform = fn(&str) -> Option<String>;

/// One declarative extraction rule.
#[derive(Debug, Clone, Copy)]
pub struct MappingRule {
    pub locator: Locator,
    /// Read this attribute of the located node instead of its text.
    pub prop: Option<&'static str>,
    /// Destination attribute on the normalized record.
    pub attr: &'static str,
    pub transform: Option<Transform>,
}

impl MappingRule {
    /// Shorthand for a plain path rule with no transform.
    pub const fn path(path: &'static str, attr: &'static str) -> Self {
        Self { locator: Locator::Path(path), prop: None, attr, transform: None }
    }

    /// Shorthand for a labeled-field rule with no transform.
    pub const fn label(label: &'static str, attr: &'static str) -> Self {
        Self { locator: Locator::Label(label), prop: None, attr, transform: None }
    }

    pub const fn with_prop(mut self, prop: &'static str) -> Self {
        self.prop = Some(prop);
        self
    }

    pub const fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// A normalized record the engine can write fields into.
///
/// Each record kind is a concrete struct with a fixed attribute set, so
/// dispatch is a plain `match` in `slot`, with no reflection. The separator
/// is the kind's policy for rules that append to an occupied attribute.
pub trait Extractable {
    const SEPARATOR: &'static str = " / ";

    /// Mutable access to the destination attribute named by a rule, or
    /// `None` when the table names an attribute this kind doesn't have.
    fn slot(&mut self, attr: &str) -> Option<&mut String>;
}

/// Walk `rules` in order against `root`, populating `record`.
///
/// Missing locators are skipped; sparse source schemas are expected. A
/// failed transform falls back to the untransformed value; extraction of
/// the remaining rules always continues.
pub fn apply_rules<R: Extractable>(record: &mut R, root: &RawNode, rules: &[MappingRule]) {
    for rule in rules {
        let label_path;
        let path = match rule.locator {
            Locator::Path(path) => path,
            Locator::Label(label) => {
                label_path = format!(".//field[@label='{label}']");
                label_path.as_str()
            }
        };

        let Some(node) = root.first(path) else {
            continue;
        };
        let raw = match rule.prop {
            Some(prop) => node.attr(prop),
            None => node.text(),
        };
        let Some(raw) = raw else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }

        let value = match rule.transform {
            Some(transform) => transform(raw).unwrap_or_else(|| {
                tracing::warn!(attr = rule.attr, raw, "transform failed; keeping untransformed value");
                raw.to_string()
            }),
            None => raw.to_string(),
        };

        match record.slot(rule.attr) {
            Some(slot) => {
                if slot.is_empty() {
                    *slot = value;
                } else {
                    slot.push_str(R::SEPARATOR);
                    slot.push_str(&value);
                }
            }
            None => {
                tracing::error!(attr = rule.attr, "mapping rule targets an unknown attribute");
                debug_assert!(false, "mapping rule targets unknown attribute {:?}", rule.attr);
            }
        }
    }
}
