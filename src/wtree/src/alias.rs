//! Master/slave unit resolution.
//!
//! Some entries declare a `slaveUnit`: the visible master occupies the tree
//! cell while the hidden slave is the unit actually granted. Resolution runs
//! over the whole filtered catalog before any column is processed, because a
//! folder in one column can alias a unit declared anywhere else in the
//! document. The resulting map is frozen and read-only during column
//! processing, so branches can be walked in parallel.
//!
//! All ids are compared case-insensitively; the map stores them lowercased.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::document::{Catalog, Entry};

/// Global alias knowledge for one run
#[derive(Debug, Clone, Default)]
pub struct SlaveMap {
    /// master id -> the slave id it aliases
    aliases: HashMap<String, String>,
    /// every id declared as a slave anywhere
    slave_ids: HashSet<String>,
}

impl SlaveMap {
    /// Scan the catalog, top level and one level into folders.
    pub fn build(catalog: &Catalog) -> Self {
        let mut map = SlaveMap::default();
        for branch in &catalog.branches {
            for column in &branch.columns {
                for entry in &column.entries {
                    map.record(entry);
                    for child in entry.children() {
                        map.record(child);
                    }
                }
            }
        }
        if !map.aliases.is_empty() {
            log::debug!("resolved {} slave unit aliases", map.aliases.len());
        }
        map
    }

    fn record(&mut self, entry: &Entry) {
        let Some(slave) = entry.slave_unit() else {
            return;
        };
        let master = entry.id.to_lowercase();
        let slave = slave.to_lowercase();
        if let Some(previous) = self.aliases.insert(master.clone(), slave.clone()) {
            if previous != slave {
                log::warn!("master {master} redeclared: slave {previous} replaced by {slave}");
            }
        }
        self.slave_ids.insert(slave);
    }

    /// The slave id a master aliases, if this id is a master.
    pub fn alias_target(&self, id: &str) -> Option<&str> {
        if self.aliases.is_empty() {
            return None;
        }
        self.aliases.get(&id.to_lowercase()).map(String::as_str)
    }

    /// Whether this id was declared as a slave unit anywhere.
    pub fn is_slave(&self, id: &str) -> bool {
        !self.slave_ids.is_empty() && self.slave_ids.contains(&id.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Collect fallback display-name sources for ids that never become nodes.
///
/// Aliased masters and suppressed slaves still need localized names and
/// icons downstream; the icon stem is the only stable handle the catalog
/// offers for them. Masters donate their stem to the slave they alias when
/// the slave has none of its own.
pub fn collect_image_fields(catalog: &Catalog, slaves: &SlaveMap) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    if slaves.is_empty() {
        return fields;
    }
    let mut donations: Vec<(String, String)> = Vec::new();
    let mut visit = |entry: &Entry| {
        let id = entry.id.to_lowercase();
        let target = slaves.alias_target(&id);
        if target.is_none() && !slaves.is_slave(&id) {
            return;
        }
        let Some(stem) = entry.image().and_then(image_stem) else {
            return;
        };
        fields.entry(id).or_insert_with(|| stem.to_string());
        if let Some(target) = target {
            donations.push((target.to_string(), stem.to_string()));
        }
    };
    for branch in &catalog.branches {
        for column in &branch.columns {
            for entry in &column.entries {
                visit(entry);
                for child in entry.children() {
                    visit(child);
                }
            }
        }
    }
    // an entry's own icon wins over anything donated by its master
    for (target, stem) in donations {
        fields.entry(target).or_insert(stem);
    }
    fields
}

/// Bare image name from a catalog icon path.
///
/// Paths look like `#ui/unitshopitems#us_m4a1_sherman` or
/// `ui/images/us_m4a1_sherman`; the stem is the final segment.
fn image_stem(path: &str) -> Option<&str> {
    let tail = path.rsplit('/').next()?;
    let stem = tail.rsplit('#').next()?;
    if stem.is_empty() {
        None
    } else {
        Some(stem)
    }
}
