//! Entry classification predicates.
//!
//! The catalog encodes structure by convention, not schema: a folder is
//! recognized by its id suffix, an icon attribute, or nested children; a
//! premium vehicle by any of a handful of marketing flags. Everything the
//! column processor needs to know about an entry comes from the cheap
//! predicates here.

use crate::alias::SlaveMap;
use crate::document::{Column, Entry, ATTR_IMAGE};

/// Id suffix that marks a folder
pub const GROUP_SUFFIX: &str = "_group";

/// Attributes that describe an entry rather than nest a child under it.
/// Any attribute outside this set counts as a folder child.
pub const SERVICE_FIELDS: &[&str] = &[
    "rank",
    "reqAir",
    "image",
    "slaveUnit",
    "reqUnlock",
    "gift",
    "marketplaceItemdefId",
    "hideFeature",
    "event",
    "showOnlyWhenBought",
    "beginPurchaseDate",
    "endPurchaseDate",
    "isClanVehicle",
    "reqFeature",
    "showByPlatform",
    "costGold",
    "freeRepairs",
    "rankPosXY",
    "fakeReqUnitType",
    "fakeReqUnitImage",
    "fakeReqUnitRank",
    "fakeReqUnitPosXY",
    "showOnlyWhenResearch",
    "hideByPlatform",
];

/// Marketing and ownership flags. Any one of them makes an entry premium.
pub const PREMIUM_MARKERS: &[&str] = &[
    "showOnlyWhenBought",
    "gift",
    "marketplaceItemdefId",
    "isClanVehicle",
    "showOnlyWhenResearch",
    "event",
    "hideFeature",
    "beginPurchaseDate",
    "endPurchaseDate",
    "hideByPlatform",
];

pub fn is_service_field(name: &str) -> bool {
    SERVICE_FIELDS.contains(&name)
}

/// A folder: groups several vehicles under one tree cell.
pub fn is_group(entry: &Entry) -> bool {
    entry.id.ends_with(GROUP_SUFFIX) || entry.has_attr(ATTR_IMAGE) || entry.has_nested_fields()
}

/// An entry standing in for a hidden slave unit.
pub fn is_slave_alias(entry: &Entry) -> bool {
    entry.slave_unit().is_some()
}

/// A purchasable entry, exempt from the research chain.
pub fn is_premium(entry: &Entry) -> bool {
    PREMIUM_MARKERS.iter().any(|marker| entry.has_attr(marker))
}

/// Share of premium entries in a column, in `0.0..=1.0`.
///
/// Folder children count individually; suppressed slave units do not count
/// at all. An empty column has share `0.0`.
pub fn premium_share(column: &Column, slaves: &SlaveMap, suppress_slaves: bool) -> f64 {
    let mut total = 0usize;
    let mut premium = 0usize;
    let mut count = |entry: &Entry| {
        if suppress_slaves && slaves.is_slave(&entry.id) {
            return;
        }
        total += 1;
        if is_premium(entry) {
            premium += 1;
        }
    };
    for entry in &column.entries {
        count(entry);
        for child in entry.children() {
            count(child);
        }
    }
    if total == 0 {
        0.0
    } else {
        premium as f64 / total as f64
    }
}
