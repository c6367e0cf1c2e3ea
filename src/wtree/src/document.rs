//! Catalog document model.
//!
//! `shop.blkx` ships as one deeply nested JSON object: country, then vehicle
//! branch, then a `range` array of columns, where each column is an ordered
//! map of entry id to attributes. Attribute order is load-bearing: adjacency
//! in a column is the only signal for default research dependencies, so
//! ingestion preserves source order end to end (`serde_json` is built with
//! `preserve_order` for exactly this).
//!
//! Ingestion is deliberately forgiving. Unknown countries and categories are
//! skipped, malformed entries are logged and dropped, and the prerequisite
//! marker is resolved into [`PrereqSignal`] once so later stages never poke
//! at raw attribute values.

use serde_json::{Map, Value};

use crate::classify;
use crate::types::{Country, VehicleCategory};

/// Attribute carrying the research tier
pub const ATTR_RANK: &str = "rank";
/// Attribute carrying the prerequisite marker
pub const ATTR_PREREQ: &str = "reqAir";
/// Attribute declaring a hidden slave unit
pub const ATTR_SLAVE_UNIT: &str = "slaveUnit";
/// Attribute carrying explicit grid placement
pub const ATTR_PLACEMENT: &str = "rankPosXY";
/// Attribute carrying the icon path
pub const ATTR_IMAGE: &str = "image";

/// Key holding the column list inside a branch object
const RANGE_KEY: &str = "range";

/// Errors producing a [`Catalog`] from raw JSON
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog root must be an object, found {0}")]
    UnexpectedRoot(&'static str),
}

/// Dependency-chain participation, resolved once at ingestion.
///
/// The marker attribute is tri-state in the source data: absent, present but
/// empty, or present with a value the live game no longer honors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrereqSignal {
    /// Marker absent: inherit the default chain predecessor
    #[default]
    Inherit,
    /// Marker present and empty: chain root, never gets a predecessor
    NoPrerequisite,
    /// Marker present with a value: ignored, default chain logic applies
    Reserved,
}

/// One catalog entry: an id plus its ordered attributes.
///
/// Non-service attributes holding objects are the entry's children,
/// materialized at ingestion. Service attributes stay in the attribute map.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: String,
    pub prereq: PrereqSignal,
    attrs: Map<String, Value>,
    children: Vec<Entry>,
    has_nested: bool,
}

impl Entry {
    fn from_attrs(id: String, attrs: Map<String, Value>) -> Self {
        let prereq = match attrs.get(ATTR_PREREQ) {
            None => PrereqSignal::Inherit,
            Some(Value::String(s)) if s.is_empty() => PrereqSignal::NoPrerequisite,
            Some(value) => {
                log::debug!("entry {id}: prerequisite marker carries value {value}, using default chain");
                PrereqSignal::Reserved
            }
        };

        let mut service = Map::new();
        let mut children = Vec::new();
        let mut has_nested = false;
        for (name, value) in attrs {
            if classify::is_service_field(&name) {
                service.insert(name, value);
                continue;
            }
            has_nested = true;
            match value {
                Value::Object(nested) => children.push(Entry::from_attrs(name, nested)),
                other => log::warn!(
                    "entry {id}: nested field {name} is {}, not an object, skipping",
                    json_type(&other)
                ),
            }
        }

        Entry {
            id,
            prereq,
            attrs: service,
            children,
            has_nested,
        }
    }

    /// Declared research tier, when present and usable
    pub fn rank(&self) -> Option<u32> {
        let rank = self.attrs.get(ATTR_RANK)?.as_u64()?;
        u32::try_from(rank).ok().filter(|rank| *rank >= 1)
    }

    /// Hidden slave unit this entry stands in for
    pub fn slave_unit(&self) -> Option<&str> {
        self.attrs
            .get(ATTR_SLAVE_UNIT)?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    /// Icon path, e.g. `#ui/unitshopitems#us_m4a1_sherman`
    pub fn image(&self) -> Option<&str> {
        self.attrs.get(ATTR_IMAGE)?.as_str()
    }

    /// Explicit grid placement, overriding computed coordinates
    pub fn placement(&self) -> Option<(i64, i64)> {
        let pair = self.attrs.get(ATTR_PLACEMENT)?.as_array()?;
        match pair.as_slice() {
            [x, y] => Some((as_coord(x)?, as_coord(y)?)),
            _ => None,
        }
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Child entries in source order
    pub fn children(&self) -> &[Entry] {
        &self.children
    }

    /// Whether any non-service attribute was present, well-formed or not
    pub fn has_nested_fields(&self) -> bool {
        self.has_nested
    }
}

fn as_coord(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One ordered progression lane for a country and category
#[derive(Debug, Clone, Default)]
pub struct Column {
    pub entries: Vec<Entry>,
}

impl Column {
    fn from_map(entries: Map<String, Value>) -> Self {
        let mut parsed = Vec::with_capacity(entries.len());
        for (id, value) in entries {
            match value {
                Value::Object(attrs) => parsed.push(Entry::from_attrs(id, attrs)),
                other => {
                    log::warn!("entry {id} is {}, not an object, skipping", json_type(&other));
                }
            }
        }
        Column { entries: parsed }
    }
}

/// All columns for one country and vehicle category
#[derive(Debug, Clone)]
pub struct Branch {
    pub country: Country,
    pub category: VehicleCategory,
    pub columns: Vec<Column>,
}

/// A fully ingested catalog document
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub branches: Vec<Branch>,
}

impl Catalog {
    /// Parse a catalog from JSON text.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        Self::try_from(serde_json::from_str::<Value>(text)?)
    }

    /// Parse a catalog from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        Self::try_from(serde_json::from_slice::<Value>(bytes)?)
    }

    /// Build a catalog from an already parsed JSON value.
    ///
    /// Branches appear in document order. Unlike [`Catalog::try_from`], a
    /// non-object root is tolerated and yields an empty catalog.
    pub fn from_value(root: Value) -> Self {
        let Value::Object(countries) = root else {
            log::warn!("catalog root is not an object, nothing to process");
            return Catalog::default();
        };

        let mut branches = Vec::new();
        for (country_key, country_value) in countries {
            let Some(country) = Country::from_catalog_key(&country_key) else {
                continue;
            };
            let Value::Object(categories) = country_value else {
                log::warn!(
                    "country {country_key} is {}, not an object, skipping",
                    json_type(&country_value)
                );
                continue;
            };
            for (category_key, category_value) in categories {
                let Some(category) = VehicleCategory::from_catalog_key(&category_key) else {
                    continue;
                };
                branches.push(Branch {
                    country,
                    category,
                    columns: parse_columns(country, category, category_value),
                });
            }
        }
        Catalog { branches }
    }
}

impl TryFrom<Value> for Catalog {
    type Error = CatalogError;

    fn try_from(root: Value) -> Result<Self, Self::Error> {
        if !root.is_object() {
            return Err(CatalogError::UnexpectedRoot(json_type(&root)));
        }
        Ok(Self::from_value(root))
    }
}

fn parse_columns(country: Country, category: VehicleCategory, value: Value) -> Vec<Column> {
    let Value::Object(mut branch) = value else {
        log::warn!(
            "{country}/{category}: branch is {}, not an object, skipping",
            json_type(&value)
        );
        return Vec::new();
    };
    let columns = match branch.remove(RANGE_KEY) {
        Some(Value::Array(columns)) => columns,
        Some(other) => {
            log::warn!(
                "{country}/{category}: {RANGE_KEY} is {}, not an array, skipping",
                json_type(&other)
            );
            Vec::new()
        }
        None => Vec::new(),
    };
    columns
        .into_iter()
        .enumerate()
        .map(|(index, column)| match column {
            Value::Object(entries) => Column::from_map(entries),
            other => {
                log::warn!(
                    "{country}/{category}: column {index} is {}, not an object, skipping",
                    json_type(&other)
                );
                // keep the slot so later columns keep their positions
                Column::default()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(json: &str) -> Catalog {
        Catalog::from_json(json).unwrap()
    }

    #[test]
    fn test_parses_branches_in_document_order() {
        let doc = catalog(
            r#"{
                "country_germany": {
                    "aviation": { "range": [] },
                    "army": { "range": [] }
                },
                "country_usa": { "army": { "range": [] } }
            }"#,
        );
        let keys: Vec<_> = doc
            .branches
            .iter()
            .map(|b| (b.country, b.category))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Country::Germany, VehicleCategory::Aviation),
                (Country::Germany, VehicleCategory::Army),
                (Country::Usa, VehicleCategory::Army),
            ]
        );
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let doc = catalog(
            r#"{
                "country_atlantis": { "army": { "range": [] } },
                "country_usa": {
                    "army": { "range": [] },
                    "submarines": { "range": [] }
                },
                "version": 42
            }"#,
        );
        assert_eq!(doc.branches.len(), 1);
        assert_eq!(doc.branches[0].country, Country::Usa);
    }

    #[test]
    fn test_entries_keep_source_order() {
        let doc = catalog(
            r#"{ "country_usa": { "army": { "range": [
                { "us_b": { "rank": 1 }, "us_a": { "rank": 2 }, "us_c": { "rank": 3 } }
            ] } } }"#,
        );
        let ids: Vec<_> = doc.branches[0].columns[0]
            .entries
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["us_b", "us_a", "us_c"]);
    }

    #[test]
    fn test_prereq_signal_tri_state() {
        let doc = catalog(
            r#"{ "country_usa": { "army": { "range": [ {
                "absent": { "rank": 1 },
                "empty": { "rank": 1, "reqAir": "" },
                "valued": { "rank": 1, "reqAir": "some_unit" }
            } ] } } }"#,
        );
        let entries = &doc.branches[0].columns[0].entries;
        assert_eq!(entries[0].prereq, PrereqSignal::Inherit);
        assert_eq!(entries[1].prereq, PrereqSignal::NoPrerequisite);
        assert_eq!(entries[2].prereq, PrereqSignal::Reserved);
    }

    #[test]
    fn test_children_materialized_in_order() {
        let doc = catalog(
            r##"{ "country_usa": { "army": { "range": [ {
                "us_group": {
                    "image": "#ui/icons#folder",
                    "rank": 2,
                    "us_first": { "rank": 2 },
                    "us_second": { "rank": 2 }
                }
            } ] } } }"##,
        );
        let folder = &doc.branches[0].columns[0].entries[0];
        let children: Vec<_> = folder.children().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(children, vec!["us_first", "us_second"]);
        assert!(folder.has_nested_fields());
        assert_eq!(folder.image(), Some("#ui/icons#folder"));
    }

    #[test]
    fn test_malformed_child_skipped_but_counts_as_nested() {
        let doc = catalog(
            r#"{ "country_usa": { "army": { "range": [ {
                "us_group": { "rank": 1, "us_broken": "oops" }
            } ] } } }"#,
        );
        let folder = &doc.branches[0].columns[0].entries[0];
        assert!(folder.children().is_empty());
        assert!(folder.has_nested_fields());
    }

    #[test]
    fn test_malformed_entry_skipped() {
        let doc = catalog(
            r#"{ "country_usa": { "army": { "range": [
                { "us_ok": { "rank": 1 }, "us_bad": 7 }
            ] } } }"#,
        );
        assert_eq!(doc.branches[0].columns[0].entries.len(), 1);
    }

    #[test]
    fn test_malformed_column_keeps_position() {
        let doc = catalog(
            r#"{ "country_usa": { "army": { "range": [
                "not a column",
                { "us_ok": { "rank": 1 } }
            ] } } }"#,
        );
        let columns = &doc.branches[0].columns;
        assert_eq!(columns.len(), 2);
        assert!(columns[0].entries.is_empty());
        assert_eq!(columns[1].entries[0].id, "us_ok");
    }

    #[test]
    fn test_missing_range_means_no_columns() {
        let doc = catalog(r#"{ "country_usa": { "army": {} } }"#);
        assert!(doc.branches[0].columns.is_empty());
    }

    #[test]
    fn test_rank_rejects_unusable_values() {
        let doc = catalog(
            r#"{ "country_usa": { "army": { "range": [ {
                "a": { "rank": 3 },
                "b": { "rank": 0 },
                "c": { "rank": "three" },
                "d": {}
            } ] } } }"#,
        );
        let entries = &doc.branches[0].columns[0].entries;
        assert_eq!(entries[0].rank(), Some(3));
        assert_eq!(entries[1].rank(), None);
        assert_eq!(entries[2].rank(), None);
        assert_eq!(entries[3].rank(), None);
    }

    #[test]
    fn test_placement_parsing() {
        let doc = catalog(
            r#"{ "country_usa": { "army": { "range": [ {
                "a": { "rankPosXY": [4, 2] },
                "b": { "rankPosXY": [4] },
                "c": { "rankPosXY": "nope" },
                "d": { "slaveUnit": "" }
            } ] } } }"#,
        );
        let entries = &doc.branches[0].columns[0].entries;
        assert_eq!(entries[0].placement(), Some((4, 2)));
        assert_eq!(entries[1].placement(), None);
        assert_eq!(entries[2].placement(), None);
        // empty slave declarations are treated as absent
        assert_eq!(entries[3].slave_unit(), None);
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let err = Catalog::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, CatalogError::UnexpectedRoot("an array")));
        // the lenient constructor tolerates it
        assert!(Catalog::from_value(serde_json::json!(null)).branches.is_empty());
    }
}
