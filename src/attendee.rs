use crate::data::{parse_count, Office, ValidationError};
use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single "N attendees from office X" row.
///
/// Entries are immutable once created; the only way to change a row is
/// to remove it and add a replacement.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AttendeeEntry {
    pub id: u32,
    pub office: Office,
    pub count: u32,
}

/// The session's collection of attendee entries.
///
/// Insertion order is preserved for display; aggregation ignores it.
/// The registry lives in memory only and is owned by a single session.
#[derive(Debug, Clone, Default)]
pub struct AttendeeRegistry {
    entries: Vec<AttendeeEntry>,
    next_id: u32,
}

impl AttendeeRegistry {
    pub fn new() -> AttendeeRegistry {
        AttendeeRegistry::default()
    }

    /// Appends a new entry for `office` with the parsed `raw_count`.
    ///
    /// Fails with `InvalidCount` when the count is empty, non-numeric,
    /// or not positive, leaving the registry untouched. Duplicate
    /// offices stay as separate rows; they merge only in
    /// [`aggregate`](AttendeeRegistry::aggregate). Returns the created
    /// entry so the caller can render it immediately.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::attendee::AttendeeRegistry;
    /// use treffpunkt_libs::data::Office;
    ///
    /// let mut registry = AttendeeRegistry::new();
    /// let entry = registry.add(Office::Paris, "3").unwrap();
    /// assert_eq!(entry.count, 3);
    ///
    /// assert!(registry.add(Office::Paris, "zero").is_err());
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn add(&mut self, office: Office, raw_count: &str) -> Result<AttendeeEntry, ValidationError> {
        let count = parse_count(raw_count).ok_or_else(|| ValidationError::InvalidCount {
            found: raw_count.to_string(),
        })?;

        self.next_id += 1;
        let entry = AttendeeEntry {
            id: self.next_id,
            office,
            count,
        };
        self.entries.push(entry);

        debug!("added attendee entry {}: {} from {}", entry.id, count, office);

        Ok(entry)
    }

    /// Removes the entry with the matching id.
    ///
    /// A missing id is a no-op rather than an error: the caller only
    /// removes ids it has rendered, so absence is a stale render racing
    /// a repeated click.
    pub fn remove(&mut self, id: u32) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);

        if self.entries.len() < before {
            debug!("removed attendee entry {}", id);
        }
    }

    /// The current rows, in insertion order.
    pub fn entries(&self) -> &[AttendeeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sums the counts per office over the current entries.
    ///
    /// Pure with respect to the registry; an empty registry yields an
    /// empty map, and insertion order never affects the result.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::attendee::AttendeeRegistry;
    /// use treffpunkt_libs::data::Office;
    ///
    /// let mut registry = AttendeeRegistry::new();
    /// registry.add(Office::Paris, "3").unwrap();
    /// registry.add(Office::Paris, "2").unwrap();
    /// registry.add(Office::London, "1").unwrap();
    ///
    /// let totals = registry.aggregate();
    /// assert_eq!(totals[&Office::Paris], 5);
    /// assert_eq!(totals[&Office::London], 1);
    /// ```
    pub fn aggregate(&self) -> BTreeMap<Office, u32> {
        trace!("aggregating {} attendee entries", self.entries.len());

        self.entries
            .iter()
            .map(|entry| (entry.office, entry.count))
            .into_grouping_map()
            .sum()
            .into_iter()
            .collect()
    }
}
