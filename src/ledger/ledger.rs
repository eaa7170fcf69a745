use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Entry;
use crate::errors::LedgerError;

const GOAL_PREFIX: &str = "Goal ";

/// Ordered, in-memory collection of entries. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<Entry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        for entry in entries {
            ledger.push(entry)?;
        }
        Ok(ledger)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Appends an entry, keeping ids unique.
    pub fn push(&mut self, entry: Entry) -> Result<Uuid, LedgerError> {
        if self.get(entry.id).is_some() {
            return Err(LedgerError::DuplicateEntry(entry.id));
        }
        let id = entry.id;
        self.entries.push(entry);
        Ok(id)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Entry, LedgerError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(LedgerError::EntryNotFound(id))?;
        Ok(self.entries.remove(index))
    }

    /// Number for the next "Goal N" name: one past the highest already used.
    pub fn next_goal_number(&self) -> u32 {
        self.entries
            .iter()
            .filter_map(|entry| entry.name.strip_prefix(GOAL_PREFIX))
            .filter_map(|suffix| suffix.trim().parse::<u32>().ok())
            .max()
            .map_or(1, |highest| highest.saturating_add(1))
    }

    pub fn next_goal_name(&self) -> String {
        format!("{}{}", GOAL_PREFIX, self.next_goal_number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Label;
    use chrono::{TimeZone, Utc};

    fn entry(amount: f64, name: &str) -> Entry {
        let time = Utc.with_ymd_and_hms(2024, 9, 18, 9, 0, 0).unwrap();
        Entry::new(amount, Label::A, "", time, name)
    }

    #[test]
    fn push_rejects_duplicate_ids() {
        let mut ledger = Ledger::new();
        let first = entry(-5.0, "Goal 1");
        let copy = first.clone();
        ledger.push(first).unwrap();
        assert!(matches!(
            ledger.push(copy),
            Err(LedgerError::DuplicateEntry(_))
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn remove_unknown_id_errors() {
        let mut ledger = Ledger::new();
        let missing = Uuid::new_v4();
        let err = ledger.remove(missing).unwrap_err();
        assert!(err.to_string().contains(&missing.to_string()));
    }

    #[test]
    fn goal_numbers_follow_highest_remaining_name() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.next_goal_name(), "Goal 1");
        ledger.push(entry(1.0, "Goal 1")).unwrap();
        let second = ledger.push(entry(2.0, "Goal 2")).unwrap();
        ledger.push(entry(3.0, "Salary")).unwrap();
        assert_eq!(ledger.next_goal_number(), 3);
        ledger.remove(second).unwrap();
        assert_eq!(ledger.next_goal_number(), 2);
    }

    #[test]
    fn serializes_as_plain_array() {
        let ledger = Ledger::new();
        assert_eq!(serde_json::to_string(&ledger).unwrap(), "[]");
    }
}
