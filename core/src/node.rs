use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Node identity.
///
/// Keys are normalized on construction: a string that is the canonical
/// decimal rendering of an `i64` becomes `Int`, so `NodeId::from(123)` and
/// `NodeId::from("123")` name the same node. Non-canonical spellings
/// (`"0123"`, `"+5"`, `" 7"`) stay strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Str(String),
}

impl NodeId {
    /// Normalize a textual key.
    pub fn parse(text: &str) -> Self {
        match text.parse::<i64>() {
            Ok(n) if n.to_string() == text => NodeId::Int(n),
            _ => NodeId::Str(text.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            NodeId::Int(n) => Some(*n),
            NodeId::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeId::Int(_) => None,
            NodeId::Str(s) => Some(s),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(n) => write!(f, "{n}"),
            NodeId::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for NodeId {
    fn from(text: &str) -> Self {
        NodeId::parse(text)
    }
}

impl From<String> for NodeId {
    fn from(text: String) -> Self {
        match text.parse::<i64>() {
            Ok(n) if n.to_string() == text => NodeId::Int(n),
            _ => NodeId::Str(text),
        }
    }
}

impl From<&String> for NodeId {
    fn from(text: &String) -> Self {
        NodeId::parse(text)
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

macro_rules! int_node_id {
    ($($t:ty),*) => {
        $(
            impl From<$t> for NodeId {
                fn from(n: $t) -> Self {
                    NodeId::Int(i64::from(n))
                }
            }
        )*
    };
}

macro_rules! wide_int_node_id {
    ($($t:ty),*) => {
        $(
            impl From<$t> for NodeId {
                fn from(n: $t) -> Self {
                    match i64::try_from(n) {
                        Ok(n) => NodeId::Int(n),
                        Err(_) => NodeId::Str(n.to_string()),
                    }
                }
            }
        )*
    };
}

int_node_id!(i8, i16, i32, i64, u8, u16, u32);
wide_int_node_id!(u64, usize);

/// Wire shape accepted on deserialization, normalized into `NodeId`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNodeId {
    Int(i64),
    Str(String),
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawNodeId::deserialize(deserializer)? {
            RawNodeId::Int(n) => NodeId::Int(n),
            RawNodeId::Str(s) => NodeId::from(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_integer_strings_collide() {
        assert_eq!(NodeId::from("123"), NodeId::from(123));
        assert_eq!(NodeId::from("-42"), NodeId::Int(-42));
        assert_eq!(NodeId::from(String::from("7")), NodeId::Int(7));
    }

    #[test]
    fn test_non_canonical_strings_stay_strings() {
        for text in ["0123", "+5", " 7", "-0", "1e3", "abc", ""] {
            assert_eq!(NodeId::from(text), NodeId::Str(text.to_string()), "{text:?}");
        }
    }

    #[test]
    fn test_large_unsigned_falls_back_to_text() {
        let id = NodeId::from(u64::MAX);
        assert_eq!(id, NodeId::Str(u64::MAX.to_string()));
    }

    #[test]
    fn test_display_round_trips_key_text() {
        assert_eq!(NodeId::from("A").to_string(), "A");
        assert_eq!(NodeId::from(-3).to_string(), "-3");
    }

    #[test]
    fn test_json_shapes() {
        let ids: Vec<NodeId> = serde_json::from_str(r#"[1, "1", "x", "01"]"#).unwrap();
        assert_eq!(
            ids,
            vec![
                NodeId::Int(1),
                NodeId::Int(1),
                NodeId::Str("x".into()),
                NodeId::Str("01".into()),
            ]
        );
        assert_eq!(serde_json::to_string(&NodeId::from("x")).unwrap(), r#""x""#);
        assert_eq!(serde_json::to_string(&NodeId::from(5)).unwrap(), "5");
    }
}
