//! Semi-structured raw record trees.
//!
//! Vendor responses arrive as loosely-structured trees whose shape varies by
//! data source, state, and sometimes county. `RawNode` is the owned,
//! serializable form those responses are parsed into, and the path selector
//! here is the locator language the field-mapping tables are written in.
//!
//! Supported paths:
//!
//! - `.`: the node itself
//! - `./child` and `./a/b`: direct-child steps
//! - `.//name`: any-depth descendant step
//! - `name[@attr='value']`: attribute predicate on any step

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of a semi-structured vendor record.
///
/// Attributes are kept in a `BTreeMap` so a serialized tree is byte-stable,
/// which the cache round-trip relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Create a node with a name and no content.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Get the node's text content.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Select every node matching `path`, in document order.
    ///
    /// An unparseable path selects nothing; mapping tables treat a missing
    /// locator as "field not present in this source's schema".
    pub fn select<'a>(&'a self, path: &str) -> Vec<&'a RawNode> {
        let Some(steps) = parse_path(path) else {
            return Vec::new();
        };

        let mut current: Vec<&RawNode> = vec![self];
        for step in &steps {
            let mut next = Vec::new();
            for node in current {
                if step.descendant {
                    collect_descendants(node, step, &mut next);
                } else {
                    next.extend(node.children.iter().filter(|c| step.matches(c)));
                }
            }
            current = next;
        }
        current
    }

    /// Select the first node matching `path`.
    pub fn first<'a>(&'a self, path: &str) -> Option<&'a RawNode> {
        self.select(path).into_iter().next()
    }

    /// Text of the first node matching `path`, if any.
    pub fn first_text<'a>(&'a self, path: &str) -> Option<&'a str> {
        self.first(path).and_then(RawNode::text)
    }
}

/// One step of a parsed locator path.
struct Step {
    name: String,
    predicate: Option<(String, String)>,
    descendant: bool,
}

impl Step {
    fn matches(&self, node: &RawNode) -> bool {
        if node.name != self.name {
            return false;
        }
        match &self.predicate {
            Some((attr, value)) => node.attr(attr) == Some(value.as_str()),
            None => true,
        }
    }
}

fn collect_descendants<'a>(node: &'a RawNode, step: &Step, out: &mut Vec<&'a RawNode>) {
    for child in &node.children {
        if step.matches(child) {
            out.push(child);
        }
        collect_descendants(child, step, out);
    }
}

/// Parse a locator path into steps. Returns `None` for malformed paths.
fn parse_path(path: &str) -> Option<Vec<Step>> {
    let mut rest = path.strip_prefix('.').unwrap_or(path);
    let mut steps = Vec::new();

    while !rest.is_empty() {
        let descendant = if let Some(r) = rest.strip_prefix("//") {
            rest = r;
            true
        } else if let Some(r) = rest.strip_prefix('/') {
            rest = r;
            false
        } else {
            return None;
        };

        // A segment ends at the next '/' outside a predicate bracket.
        let mut end = rest.len();
        let mut in_bracket = false;
        for (i, c) in rest.char_indices() {
            match c {
                '[' => in_bracket = true,
                ']' => in_bracket = false,
                '/' if !in_bracket => {
                    end = i;
                    break;
                }
                _ => {}
            }
        }
        let segment = &rest[..end];
        rest = &rest[end..];

        steps.push(parse_step(segment, descendant)?);
    }

    Some(steps)
}

fn parse_step(segment: &str, descendant: bool) -> Option<Step> {
    if segment.is_empty() {
        return None;
    }

    match segment.split_once('[') {
        None => Some(Step { name: segment.to_string(), predicate: None, descendant }),
        Some((name, pred)) => {
            let pred = pred.strip_suffix(']')?.strip_prefix('@')?;
            let (attr, value) = pred.split_once('=')?;
            let value = value.strip_prefix('\'')?.strip_suffix('\'')?;
            Some(Step {
                name: name.to_string(),
                predicate: Some((attr.to_string(), value.to_string())),
                descendant,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, text: &str) -> RawNode {
        RawNode { text: Some(text.to_string()), ..RawNode::new(name) }
    }

    fn labeled_field(label: &str, text: &str) -> RawNode {
        let mut node = leaf("field", text);
        node.attrs.insert("label".to_string(), label.to_string());
        node
    }

    fn sample_record() -> RawNode {
        let mut record = RawNode::new("record");
        record.attrs.insert("db".to_string(), "grp_dmv_tx".to_string());
        record.attrs.insert("ed".to_string(), "20190401".to_string());
        record.children.push(leaf("disp_fld1", "SMITH JOHN"));
        record.children.push(leaf("disp_fld2", "Year/Make: 2005 BMW K1200LT"));

        let mut textdata = RawNode::new("textdata");
        textdata.children.push(labeled_field("Owner Name", "SMITH, JOHN Q"));
        textdata.children.push(labeled_field("Model Year", "2005"));
        record.children.push(textdata);
        record
    }

    #[test]
    fn test_select_self() {
        let record = sample_record();
        let hits = record.select(".");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "record");
    }

    #[test]
    fn test_select_direct_child() {
        let record = sample_record();
        assert_eq!(record.first_text("./disp_fld1"), Some("SMITH JOHN"));
        assert!(record.first("./no_such_field").is_none());
    }

    #[test]
    fn test_select_nested_path() {
        let record = sample_record();
        let fields = record.select("./textdata/field");
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_select_descendant_with_predicate() {
        let record = sample_record();
        let hit = record.first(".//field[@label='Owner Name']").unwrap();
        assert_eq!(hit.text(), Some("SMITH, JOHN Q"));
        assert!(record.first(".//field[@label='VIN Number']").is_none());
    }

    #[test]
    fn test_descendant_does_not_match_self() {
        let record = sample_record();
        assert!(record.select(".//record").is_empty());
    }

    #[test]
    fn test_attr_lookup() {
        let record = sample_record();
        assert_eq!(record.attr("db"), Some("grp_dmv_tx"));
        assert_eq!(record.attr("rec"), None);
    }

    #[test]
    fn test_malformed_path_selects_nothing() {
        let record = sample_record();
        assert!(record.select("disp_fld1").is_empty());
        assert!(record.select("./field[@label]").is_empty());
        assert!(record.select("./").is_empty());
    }

    #[test]
    fn test_segment_split_ignores_slash_in_predicate() {
        let mut root = RawNode::new("root");
        let mut child = leaf("field", "x");
        child.attrs.insert("label".to_string(), "City/ZIP Code".to_string());
        root.children.push(child);

        let hit = root.first("./field[@label='City/ZIP Code']");
        assert!(hit.is_some());
    }

    #[test]
    fn test_serde_round_trip_is_stable() {
        let record = sample_record();
        let one = serde_json::to_string(&record).unwrap();
        let two = serde_json::to_string(&record).unwrap();
        assert_eq!(one, two);

        let back: RawNode = serde_json::from_str(&one).unwrap();
        assert_eq!(back, record);
    }
}
