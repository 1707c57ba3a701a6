use serde::{Deserialize, Serialize};

use crate::schema::{Fields, Value};

/// One voting node taking part in an election. The public key travels with
/// the address inside `GenerateRequest.Roster.List`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub address: String,
    #[serde(default)]
    pub public: Vec<u8>,
}

impl Node {
    pub fn new(address: impl Into<String>) -> Self {
        Node {
            address: address.into(),
            public: Vec::new(),
        }
    }
}

/// Ordered set of voting nodes. Order is significant: element 0 is the
/// contact point for every RPC and a node's index feeds into the block
/// selector of a fetch call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Roster {
    nodes: Vec<Node>,
}

impl Roster {
    pub fn new(nodes: Vec<Node>) -> Self {
        Roster { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The designated contact point, i.e. the first entry.
    pub fn contact(&self) -> Option<&Node> {
        self.nodes.first()
    }

    /// Zero-based position of the node with the given address.
    pub fn position(&self, address: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.address == address)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Roster as it appears inside a `GenerateRequest`.
    pub fn to_value(&self) -> Value {
        let list = self
            .nodes
            .iter()
            .map(|node| {
                let mut record = Fields::new();
                record.insert("Address".to_string(), Value::Text(node.address.clone()));
                record.insert("Public".to_string(), Value::Bytes(node.public.clone()));
                Value::Record(record)
            })
            .collect();
        let mut roster = Fields::new();
        roster.insert("List".to_string(), Value::List(list));
        Value::Record(roster)
    }
}

/// One encrypted vote, produced locally against the election key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot(pub Vec<u8>);

impl Ballot {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_finds_nodes_in_order() {
        let roster = Roster::new(vec![
            Node::new("127.0.0.1:9000"),
            Node::new("127.0.0.1:9001"),
            Node::new("127.0.0.1:9002"),
        ]);
        assert_eq!(roster.position("127.0.0.1:9000"), Some(0));
        assert_eq!(roster.position("127.0.0.1:9002"), Some(2));
        assert_eq!(roster.position("10.0.0.1:9000"), None);
        assert_eq!(
            roster.contact().map(|n| n.address.as_str()),
            Some("127.0.0.1:9000")
        );
    }

    #[test]
    fn roster_value_keeps_order() {
        let roster = Roster::new(vec![Node::new("a:1"), Node::new("b:2")]);
        let value = roster.to_value();
        let record = value.as_record().unwrap();
        let list = record.get("List").and_then(Value::as_list).unwrap();
        assert_eq!(list.len(), 2);
        let first = list[0].as_record().unwrap();
        assert_eq!(first.get("Address").and_then(Value::as_text), Some("a:1"));
    }
}
