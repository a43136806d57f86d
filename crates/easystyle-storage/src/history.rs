use serde::{Deserialize, Serialize};

use crate::safe::SafeStorage;
use crate::{new_entry_id, now_millis, HISTORY_KEY};

/// Most recent entries kept by [`HistoryManager::add`].
pub const HISTORY_LIMIT: usize = 50;

/// Product snapshot stored alongside a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryProduct {
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub category: String,
    pub image_url: String,
}

/// A saved styling result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: i64,
    pub original_image: String,
    pub styled_image: String,
    pub description: String,
    pub prompt: String,
    #[serde(default)]
    pub products: Vec<HistoryProduct>,
}

/// Caller-supplied fields of a new entry; id and timestamp are assigned.
#[derive(Debug, Clone, Default)]
pub struct NewHistoryEntry {
    pub original_image: String,
    pub styled_image: String,
    pub description: String,
    pub prompt: String,
    pub products: Vec<HistoryProduct>,
}

/// Newest-first list of styling results, capped at [`HISTORY_LIMIT`].
///
/// Every mutation rewrites the whole list.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    storage: SafeStorage,
}

impl HistoryManager {
    #[must_use]
    pub fn new(storage: SafeStorage) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn get_all(&self) -> Vec<HistoryEntry> {
        self.storage.get(HISTORY_KEY, Vec::new())
    }

    /// Prepends the entry and drops anything past the limit. Returns the new
    /// id, or `None` when the list could not be written.
    pub fn add(&self, entry: NewHistoryEntry) -> Option<String> {
        let id = new_entry_id();
        let mut history = self.get_all();
        history.insert(
            0,
            HistoryEntry {
                id: id.clone(),
                timestamp: now_millis(),
                original_image: entry.original_image,
                styled_image: entry.styled_image,
                description: entry.description,
                prompt: entry.prompt,
                products: entry.products,
            },
        );
        history.truncate(HISTORY_LIMIT);
        self.storage.set(HISTORY_KEY, &history).then_some(id)
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut history = self.get_all();
        history.retain(|entry| entry.id != id);
        self.storage.set(HISTORY_KEY, &history)
    }

    pub fn clear(&self) -> bool {
        self.storage.remove(HISTORY_KEY)
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<HistoryEntry> {
        self.get_all().into_iter().find(|entry| entry.id == id)
    }

    /// Keeps only the `len` newest entries. A list already within bounds is
    /// left untouched.
    pub fn trim_to(&self, len: usize) -> bool {
        let mut history = self.get_all();
        if history.len() <= len {
            return true;
        }
        history.truncate(len);
        self.storage.set(HISTORY_KEY, &history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(prompt: &str) -> NewHistoryEntry {
        NewHistoryEntry {
            original_image: "data:image/jpeg;base64,AAAA".to_string(),
            styled_image: "data:image/png;base64,BBBB".to_string(),
            description: "A clean street look.".to_string(),
            prompt: prompt.to_string(),
            products: vec![HistoryProduct {
                name: "Oxford Shirt".to_string(),
                brand: "Muji".to_string(),
                price: 39_000,
                category: "Tops".to_string(),
                image_url: "https://img.example/shirt.jpg".to_string(),
            }],
        }
    }

    #[test]
    fn add_prepends_and_assigns_ids() {
        let history = HistoryManager::new(SafeStorage::in_memory());
        let first = history.add(entry("first look")).expect("first add");
        let second = history.add(entry("second look")).expect("second add");

        assert_ne!(first, second);
        let all = history.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second);
        assert_eq!(all[0].prompt, "second look");
        assert_eq!(all[1].id, first);
    }

    #[test]
    fn add_keeps_only_newest_fifty() {
        let history = HistoryManager::new(SafeStorage::in_memory());
        for i in 0..55 {
            history.add(entry(&format!("look {i}")));
        }
        let all = history.get_all();
        assert_eq!(all.len(), HISTORY_LIMIT);
        assert_eq!(all[0].prompt, "look 54");
        assert_eq!(all[HISTORY_LIMIT - 1].prompt, "look 5");
    }

    #[test]
    fn remove_and_get_by_id() {
        let history = HistoryManager::new(SafeStorage::in_memory());
        let keep = history.add(entry("keep")).expect("add");
        let drop = history.add(entry("drop")).expect("add");

        assert!(history.remove(&drop));
        assert!(history.get_by_id(&drop).is_none());
        assert_eq!(history.get_by_id(&keep).map(|e| e.prompt), Some("keep".to_string()));
    }

    #[test]
    fn trim_to_shortens_list() {
        let history = HistoryManager::new(SafeStorage::in_memory());
        for i in 0..30 {
            history.add(entry(&format!("look {i}")));
        }
        assert!(history.trim_to(25));
        assert_eq!(history.get_all().len(), 25);
    }

    #[test]
    fn clear_empties_history() {
        let history = HistoryManager::new(SafeStorage::in_memory());
        history.add(entry("look"));
        assert!(history.clear());
        assert!(history.get_all().is_empty());
    }
}
