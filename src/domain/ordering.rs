//! Order resolution for collected contributions.
//!
//! Records are keyed in catalog order. A record without a usable declared order
//! takes the next automatic key; a key that is already taken walks forward until
//! a free one is found. Only the automatic branch and the walk advance the shared
//! counter, so the result depends on processing order and is not a plain sort of
//! the declared values.

use std::collections::btree_map::{self, BTreeMap};

use tracing::trace;

use crate::domain::entities::ContributionRecord;

/// Records keyed by their resolved order, iterated in ascending key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedCollection {
    entries: BTreeMap<i64, ContributionRecord>,
}

impl OrderedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: i64) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn get(&self, key: i64) -> Option<&ContributionRecord> {
        self.entries.get(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.keys().copied()
    }

    pub fn records(&self) -> impl Iterator<Item = &ContributionRecord> {
        self.entries.values()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, i64, ContributionRecord> {
        self.entries.iter()
    }

    /// Inserts at a key that must be vacant; an occupied key leaves the entry untouched.
    fn insert_vacant(&mut self, key: i64, record: ContributionRecord) -> bool {
        match self.entries.entry(key) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }
}

impl IntoIterator for OrderedCollection {
    type Item = (i64, ContributionRecord);
    type IntoIter = btree_map::IntoIter<i64, ContributionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a OrderedCollection {
    type Item = (&'a i64, &'a ContributionRecord);
    type IntoIter = btree_map::Iter<'a, i64, ContributionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Assigns every record a unique key, walking forward on collisions.
pub fn resolve_order<I>(records: I) -> OrderedCollection
where
    I: IntoIterator<Item = ContributionRecord>,
{
    let mut collection = OrderedCollection::new();
    let mut last_order: i64 = 0;

    for record in records {
        let mut order = match record.parsed_order() {
            Some(declared) => i64::from(declared),
            None => {
                last_order += 1;
                last_order
            }
        };
        while collection.contains_key(order) {
            order += 1;
            last_order = order;
        }
        trace!("resolve_order: {} -> {}", record, order);
        let inserted = collection.insert_vacant(order, record);
        debug_assert!(inserted, "resolved key {} must be vacant", order);
    }

    collection
}
