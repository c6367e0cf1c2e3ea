//! Shared types for the research tree.
//!
//! These types are catalog-agnostic and used by every pipeline stage.

use serde::{Deserialize, Serialize};

/// Errors when parsing identifiers from strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown country: {0}")]
    UnknownCountry(String),
    #[error("Unknown vehicle category: {0}")]
    UnknownCategory(String),
    #[error("Unknown node kind: {0}")]
    UnknownKind(String),
    #[error("Unknown node status: {0}")]
    UnknownStatus(String),
}

/// A nation with a research tree of its own.
///
/// The catalog keys its top level by `country_*`; keys outside this set
/// (event tabs, clan slots) are skipped, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Country {
    Usa,
    Germany,
    Ussr,
    Britain,
    Japan,
    China,
    Italy,
    France,
    Sweden,
    Israel,
}

impl Country {
    /// All countries in canonical catalog order
    pub const ALL: &'static [Country] = &[
        Self::Usa,
        Self::Germany,
        Self::Ussr,
        Self::Britain,
        Self::Japan,
        Self::China,
        Self::Italy,
        Self::France,
        Self::Sweden,
        Self::Israel,
    ];

    /// Resolve a top-level catalog key like `country_usa`.
    pub fn from_catalog_key(key: &str) -> Option<Self> {
        match key {
            "country_usa" => Some(Self::Usa),
            "country_germany" => Some(Self::Germany),
            "country_ussr" => Some(Self::Ussr),
            "country_britain" => Some(Self::Britain),
            "country_japan" => Some(Self::Japan),
            "country_china" => Some(Self::China),
            "country_italy" => Some(Self::Italy),
            "country_france" => Some(Self::France),
            "country_sweden" => Some(Self::Sweden),
            "country_israel" => Some(Self::Israel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usa => "usa",
            Self::Germany => "germany",
            Self::Ussr => "ussr",
            Self::Britain => "britain",
            Self::Japan => "japan",
            Self::China => "china",
            Self::Italy => "italy",
            Self::France => "france",
            Self::Sweden => "sweden",
            Self::Israel => "israel",
        }
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Country {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "usa" => Ok(Self::Usa),
            "germany" => Ok(Self::Germany),
            "ussr" => Ok(Self::Ussr),
            "britain" => Ok(Self::Britain),
            "japan" => Ok(Self::Japan),
            "china" => Ok(Self::China),
            "italy" => Ok(Self::Italy),
            "france" => Ok(Self::France),
            "sweden" => Ok(Self::Sweden),
            "israel" => Ok(Self::Israel),
            _ => Err(ParseError::UnknownCountry(s.to_string())),
        }
    }
}

/// A vehicle branch within one country's tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCategory {
    Army,
    Aviation,
    Helicopters,
    Ships,
    Boats,
}

impl VehicleCategory {
    /// All branches in canonical catalog order
    pub const ALL: &'static [VehicleCategory] = &[
        Self::Army,
        Self::Aviation,
        Self::Helicopters,
        Self::Ships,
        Self::Boats,
    ];

    /// Resolve a second-level catalog key like `aviation`.
    pub fn from_catalog_key(key: &str) -> Option<Self> {
        match key {
            "army" => Some(Self::Army),
            "aviation" => Some(Self::Aviation),
            "helicopters" => Some(Self::Helicopters),
            "ships" => Some(Self::Ships),
            "boats" => Some(Self::Boats),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Army => "army",
            Self::Aviation => "aviation",
            Self::Helicopters => "helicopters",
            Self::Ships => "ships",
            Self::Boats => "boats",
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VehicleCategory {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_catalog_key(s).ok_or_else(|| ParseError::UnknownCategory(s.to_string()))
    }
}

/// What a node represents in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Vehicle,
    Folder,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vehicle => write!(f, "vehicle"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

impl std::str::FromStr for NodeKind {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vehicle" => Ok(Self::Vehicle),
            "folder" => Ok(Self::Folder),
            _ => Err(ParseError::UnknownKind(s.to_string())),
        }
    }
}

/// How a node is unlocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Unlocked through the research chain
    Standard,
    /// Purchasable, outside the research chain
    Premium,
}

impl Default for NodeStatus {
    fn default() -> Self {
        Self::Standard
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Premium => write!(f, "premium"),
        }
    }
}

impl std::str::FromStr for NodeStatus {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "premium" => Ok(Self::Premium),
            _ => Err(ParseError::UnknownStatus(s.to_string())),
        }
    }
}

/// One cell of the flattened research tree.
///
/// Ids are lowercased at emission and unique within a run. `predecessor`
/// always references a node emitted earlier in the same run; premium nodes
/// never carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub rank: u32,
    pub country: Country,
    pub vehicle_category: VehicleCategory,
    pub kind: NodeKind,
    pub status: NodeStatus,
    pub column_index: i64,
    pub row_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predecessor: Option<String>,
    /// Folder this node sits inside, for folder children only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Position among siblings of the same folder, starting at 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_in_folder: Option<u32>,
}
