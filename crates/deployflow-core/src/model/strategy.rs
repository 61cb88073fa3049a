//! Deployment strategies

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// Deployment strategy of a deploy stage
///
/// Parsed from the identifier the pipeline carries in its `strategy`
/// field. An empty identifier means no strategy was configured.
/// Identifiers without a dedicated variant are kept as [`Strategy::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Strategy {
    /// No strategy; the new server group is simply created
    #[default]
    None,
    /// Create the new group, then disable the old one in a single switch
    RedBlack,
    /// Shift traffic to the new group incrementally
    RollingRedBlack,
    /// Red/black, then destroy every older group in the cluster
    Highlander,
    /// Deployment driven by an external deployment monitor
    Monitored,
    /// User-supplied pipeline
    Custom,
    /// Any other identifier, lowercased
    Other(String),
}

impl Strategy {
    /// Strategies with a dedicated variant
    pub const NAMED: [Strategy; 6] = [
        Strategy::None,
        Strategy::RedBlack,
        Strategy::RollingRedBlack,
        Strategy::Highlander,
        Strategy::Monitored,
        Strategy::Custom,
    ];

    /// Canonical wire identifier
    pub fn as_str(&self) -> &str {
        match self {
            Strategy::None => "",
            Strategy::RedBlack => "redblack",
            Strategy::RollingRedBlack => "rollingredblack",
            Strategy::Highlander => "highlander",
            Strategy::Monitored => "monitored",
            Strategy::Custom => "custom",
            Strategy::Other(identifier) => identifier,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::None => write!(f, "none"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl FromStr for Strategy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let identifier = s.trim().to_ascii_lowercase();
        Ok(match identifier.as_str() {
            "" | "none" => Strategy::None,
            "redblack" => Strategy::RedBlack,
            "rollingredblack" => Strategy::RollingRedBlack,
            "highlander" => Strategy::Highlander,
            "monitored" => Strategy::Monitored,
            "custom" => Strategy::Custom,
            _ => Strategy::Other(identifier),
        })
    }
}

impl From<String> for Strategy {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(strategy) => strategy,
            Err(never) => match never {},
        }
    }
}

impl From<Strategy> for String {
    fn from(strategy: Strategy) -> Self {
        strategy.as_str().to_string()
    }
}
