//! The ordered offset → action map that lets a subsequent revision locate
//! actions already registered on the page. Keys are token offsets into the
//! *current* revision's text; values identify which action owns the
//! interval starting at that offset, or that the offset is the page's
//! end-of-page boundary.
//!
//! The `(-1,-1)` sentinel from the design doc is represented as a distinct
//! enum variant rather than a magic tuple, so "is this the boundary marker"
//! is a type-level question instead of a runtime comparison against `-1`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ReconstructError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageEntry {
    /// `action_id` owns the interval starting at this offset, indented
    /// `indentation` levels.
    Live { action_id: String, indentation: i64 },
    /// The page's end-of-page boundary. Exactly one key may hold this.
    EndOfPage,
}

impl PageEntry {
    pub fn is_end_of_page(&self) -> bool {
        matches!(self, PageEntry::EndOfPage)
    }

    pub fn action_id(&self) -> Option<&str> {
        match self {
            PageEntry::Live { action_id, .. } => Some(action_id),
            PageEntry::EndOfPage => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageState {
    pub page_id: String,
    pub page_title: String,
    pub actions: BTreeMap<i64, PageEntry>,
}

impl PageState {
    /// A freshly created page: offset 0 is immediately the end-of-page
    /// boundary (mirrors `page_creation` in the original implementation).
    pub fn new(page_id: impl Into<String>, page_title: impl Into<String>) -> Self {
        let mut actions = BTreeMap::new();
        actions.insert(0, PageEntry::EndOfPage);
        Self { page_id: page_id.into(), page_title: page_title.into(), actions }
    }

    /// The greatest key ≤ `offset`.
    pub fn get_action_start(&self, offset: i64) -> Option<i64> {
        self.actions.range(..=offset).next_back().map(|(k, _)| *k)
    }

    /// The least key > `start`.
    pub fn get_action_end(&self, start: i64) -> Option<i64> {
        self.actions.range(start + 1..).next().map(|(k, _)| *k)
    }

    /// Index of `get_action_start(offset)` in the sorted key list.
    pub fn find_pos(&self, offset: i64) -> Option<usize> {
        let start = self.get_action_start(offset)?;
        self.actions.keys().position(|k| *k == start)
    }

    pub fn insert_entry(&mut self, offset: i64, entry: PageEntry) {
        self.actions.insert(offset, entry);
    }

    pub fn remove_entry(&mut self, offset: i64) -> Option<PageEntry> {
        self.actions.remove(&offset)
    }

    pub fn move_entry(&mut self, old_key: i64, new_key: i64) {
        if let Some(entry) = self.actions.remove(&old_key) {
            self.actions.insert(new_key, entry);
        }
    }

    pub fn sorted_keys(&self) -> Vec<i64> {
        self.actions.keys().copied().collect()
    }

    /// Re-assert invariants (i)-(iv) of the data model. Called at the end
    /// of classification (Phase G); violation aborts the revision.
    pub fn validate(&self) -> Result<(), ReconstructError> {
        if !self.actions.contains_key(&0) {
            return Err(ReconstructError::InvariantViolation(
                "offset 0 missing from page state".into(),
            ));
        }
        let max_key = *self.actions.keys().next_back().ok_or_else(|| {
            ReconstructError::InvariantViolation("page state has no entries".into())
        })?;
        if !self.actions[&max_key].is_end_of_page() {
            return Err(ReconstructError::InvariantViolation(
                "max offset does not hold the end-of-page boundary".into(),
            ));
        }
        for (offset, entry) in &self.actions {
            if *offset != max_key && entry.is_end_of_page() {
                return Err(ReconstructError::InvariantViolation(format!(
                    "offset {offset} holds the end-of-page boundary but is not the max offset"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_page_has_zero_as_end_of_page() {
        let page = PageState::new("p1", "Talk:Example");
        assert_eq!(page.actions.get(&0), Some(&PageEntry::EndOfPage));
        page.validate().unwrap();
    }

    #[test]
    fn get_action_start_end_and_find_pos() {
        let mut page = PageState::new("p1", "Talk:Example");
        page.insert_entry(5, PageEntry::Live { action_id: "1.0".into(), indentation: 0 });
        page.remove_entry(0);
        page.insert_entry(0, PageEntry::Live { action_id: "1.0".into(), indentation: 0 });
        page.insert_entry(20, PageEntry::EndOfPage);

        assert_eq!(page.get_action_start(3), Some(0));
        assert_eq!(page.get_action_start(5), Some(5));
        assert_eq!(page.get_action_end(5), Some(20));
        assert_eq!(page.find_pos(12), Some(1));
        page.validate().unwrap();
    }

    #[test]
    fn validate_rejects_stray_sentinel() {
        let mut page = PageState::new("p1", "Talk:Example");
        page.insert_entry(10, PageEntry::EndOfPage);
        // two EndOfPage entries now: 0 and 10 -> invalid, 0 is not the max.
        assert!(page.validate().is_err());
    }
}
