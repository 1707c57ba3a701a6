use serde::{Deserialize, Serialize};

use crate::data::Node;

/// Contents of `client_config.json`: which election to drive and the roster
/// of voting nodes taking part in it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    pub election_name: String,
    pub roster: Vec<Node>,
    /// Votes to cast, one ballot each.
    #[serde(default)]
    pub votes: Vec<String>,
}
