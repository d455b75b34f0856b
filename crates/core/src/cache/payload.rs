//! Type-tagged cache payloads.
//!
//! Query results are not homogeneous: the same cache stores parsed record
//! trees, dict-like structures, and plain response bodies. The producer of
//! an entry declares its payload kind explicitly through this enum, and the
//! persisted tag drives the deserialization path on the way back out.

use crate::Error;
use crate::tree::RawNode;

/// A cache payload with its reconstitution tag declared by the producer.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedPayload {
    /// Semi-structured record tree, binary-safe encoding.
    Tree(RawNode),
    /// Dict-like payload, textual structured encoding.
    Json(serde_json::Value),
    /// Plain text, stored unchanged.
    Text(String),
    /// Opaque binary payload.
    Bytes(Vec<u8>),
}

impl CachedPayload {
    /// Tag persisted alongside the payload.
    pub fn tag(&self) -> &'static str {
        match self {
            CachedPayload::Tree(_) => "TREE",
            CachedPayload::Json(_) => "JSON",
            CachedPayload::Text(_) => "TEXT",
            CachedPayload::Bytes(_) => "BIN",
        }
    }

    /// Serialize for storage according to the payload kind.
    pub(crate) fn encode(&self) -> Result<Vec<u8>, Error> {
        match self {
            CachedPayload::Tree(tree) => {
                bincode::serialize(tree).map_err(|e| Error::Encode(e.to_string()))
            }
            CachedPayload::Json(value) => {
                serde_json::to_vec(value).map_err(|e| Error::Encode(e.to_string()))
            }
            CachedPayload::Text(text) => Ok(text.as_bytes().to_vec()),
            CachedPayload::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    /// Reconstitute a stored payload from its tag and bytes.
    pub(crate) fn decode(tag: &str, bytes: &[u8]) -> Result<Self, Error> {
        match tag {
            "TREE" => bincode::deserialize(bytes)
                .map(CachedPayload::Tree)
                .map_err(|e| Error::Decode(format!("TREE: {e}"))),
            "JSON" => serde_json::from_slice(bytes)
                .map(CachedPayload::Json)
                .map_err(|e| Error::Decode(format!("JSON: {e}"))),
            "TEXT" => String::from_utf8(bytes.to_vec())
                .map(CachedPayload::Text)
                .map_err(|e| Error::Decode(format!("TEXT: {e}"))),
            "BIN" => Ok(CachedPayload::Bytes(bytes.to_vec())),
            other => Err(Error::Decode(format!("unknown result type tag: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(payload: CachedPayload) -> CachedPayload {
        let tag = payload.tag();
        let bytes = payload.encode().unwrap();
        CachedPayload::decode(tag, &bytes).unwrap()
    }

    #[test]
    fn test_tree_round_trip() {
        let mut tree = RawNode::new("record");
        tree.attrs.insert("db".to_string(), "grp_dmv_tx".to_string());
        tree.children.push(RawNode {
            text: Some("SMITH JOHN".to_string()),
            ..RawNode::new("disp_fld1")
        });

        let payload = CachedPayload::Tree(tree);
        assert_eq!(round_trip(payload.clone()), payload);
    }

    #[test]
    fn test_json_round_trip() {
        let payload = CachedPayload::Json(serde_json::json!({
            "owner": "SMITH JOHN",
            "zestimate": 250000,
        }));
        assert_eq!(round_trip(payload.clone()), payload);
    }

    #[test]
    fn test_text_passes_through_unchanged() {
        let payload = CachedPayload::Text("<pd type=\"search\"/>".to_string());
        let bytes = payload.encode().unwrap();
        assert_eq!(bytes, b"<pd type=\"search\"/>");
        assert_eq!(round_trip(payload.clone()), payload);
    }

    #[test]
    fn test_bytes_round_trip() {
        let payload = CachedPayload::Bytes(vec![0, 159, 146, 150]);
        assert_eq!(round_trip(payload.clone()), payload);
    }

    #[test]
    fn test_unknown_tag_is_decode_error() {
        let result = CachedPayload::decode("PICKLE", b"whatever");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_corrupt_tree_is_decode_error() {
        let result = CachedPayload::decode("TREE", b"not bincode");
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
