use std::collections::HashMap;

use crate::model::FieldMap;

/// Source header spelling to canonical column, in lookup order.
///
/// Several spellings collapse onto one column. When a single row carries two of
/// them, the entry listed later wins, so this order is part of the behavior.
pub(crate) const HEADER_MAPPING: &[(&str, &str)] = &[
    ("MAL_ID", "id"),
    ("anime_id", "id"),
    ("id", "id"),
    ("Name", "name"),
    ("name", "name"),
    ("English name", "english_name"),
    ("Japanese name", "japanese_name"),
    ("Other name", "other_name"),
    ("russian", "russian"),
    ("Image URL", "poster_url"),
    ("kind", "type"),
    ("Type", "type"),
    ("type", "type"),
    ("Episodes", "episodes"),
    ("episodes", "episodes"),
    ("episodes_aired", "episodes_aired"),
    ("volumes", "volumes"),
    ("chapters", "chapters"),
    ("Aired", "aired"),
    ("aired_on", "aired_on"),
    ("released_on", "released_on"),
    ("Premiered", "premiered"),
    ("Producers", "producers"),
    ("Licensors", "licensors"),
    ("Studios", "studios"),
    ("Source", "source"),
    ("Duration", "duration"),
    ("Rating", "rating"),
    ("Genres", "genres"),
    ("genre", "genres"),
    ("Status", "status"),
    ("status", "status"),
    ("Synopsis", "synopsis"),
    ("synopsis", "synopsis"),
    ("sypnopsis", "synopsis"),
];

/// Rewrites a source row into canonical column names.
///
/// Lookup is exact and case-sensitive. Source keys without a mapping are
/// dropped and canonical columns without a source key stay absent.
pub(crate) fn reconcile(row: &HashMap<&str, &str>) -> FieldMap {
    let mut fields = FieldMap::new();
    for (source, canonical) in HEADER_MAPPING {
        if let Some(value) = row.get(source) {
            fields.insert(*canonical, (*value).to_string());
        }
    }
    fields
}
