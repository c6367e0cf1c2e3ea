//! # wtree
//!
//! War Thunder research tree library - catalog decomposition, classification,
//! and layout.
//!
//! The game ships its whole vehicle shop as one nested `shop.blkx` JSON
//! document with no explicit graph encoding: research dependencies, folder
//! grouping, and premium status are all implied by entry order and attribute
//! heuristics. This library recovers that structure:
//!
//! - Parse the catalog preserving source order ([`document`])
//! - Filter event and anomalous entries ([`filter`])
//! - Resolve hidden master/slave unit aliases ([`alias`])
//! - Walk every research column, emitting classified nodes with synthesized
//!   predecessor edges and grid coordinates ([`column`])
//! - Reflow premium-dominated columns outside the research grid
//!   ([`premium`])
//!
//! ## Example
//!
//! ```
//! use wtree::{decompose, Catalog, DecomposeConfig};
//!
//! # fn main() -> Result<(), wtree::CatalogError> {
//! let doc = r#"{
//!     "country_usa": { "army": { "range": [ {
//!         "us_m2a2": { "rank": 1, "reqAir": "" },
//!         "us_m3_stuart": { "rank": 1 }
//!     } ] } }
//! }"#;
//!
//! let catalog = Catalog::from_json(doc)?;
//! let result = decompose(catalog, &DecomposeConfig::default());
//!
//! assert_eq!(result.nodes.len(), 2);
//! assert_eq!(result.nodes[1].predecessor.as_deref(), Some("us_m2a2"));
//! # Ok(())
//! # }
//! ```

pub mod alias;
pub mod classify;
pub mod column;
pub mod config;
pub mod decompose;
pub mod document;
pub mod filter;
pub mod premium;
pub mod types;

// Re-export commonly used items
#[doc(inline)]
pub use alias::SlaveMap;
#[doc(inline)]
pub use config::DecomposeConfig;
#[doc(inline)]
pub use decompose::{decompose, DecomposeReport, Decomposition};
#[doc(inline)]
pub use document::{Catalog, CatalogError, PrereqSignal};
#[doc(inline)]
pub use types::{Country, Node, NodeKind, NodeStatus, ParseError, VehicleCategory};
