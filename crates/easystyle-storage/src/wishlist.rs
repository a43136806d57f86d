use serde::{Deserialize, Serialize};

use crate::error::WishlistError;
use crate::safe::SafeStorage;
use crate::{new_entry_id, now_millis, WISHLIST_KEY};

/// A saved product. `product_url` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    pub product_url: String,
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub image_url: String,
    pub category: String,
    /// Milliseconds since the Unix epoch.
    pub added_at: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NewWishlistItem {
    pub product_url: String,
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub image_url: String,
    pub category: String,
}

/// Outcome of [`WishlistManager::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistToggle {
    Added,
    Removed,
}

/// Locally persisted wishlist, newest first, unique by product URL.
#[derive(Debug, Clone)]
pub struct WishlistManager {
    storage: SafeStorage,
}

impl WishlistManager {
    #[must_use]
    pub fn new(storage: SafeStorage) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn get_all(&self) -> Vec<WishlistItem> {
        self.storage.get(WISHLIST_KEY, Vec::new())
    }

    /// Inserts the item at the head and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::DuplicateItem`] if an item with the same
    /// product URL is already saved, or [`WishlistError::WriteFailed`] if the
    /// list could not be stored.
    pub fn add(&self, item: NewWishlistItem) -> Result<String, WishlistError> {
        let mut wishlist = self.get_all();
        if wishlist.iter().any(|w| w.product_url == item.product_url) {
            return Err(WishlistError::DuplicateItem {
                product_url: item.product_url,
            });
        }
        self.insert_head(&mut wishlist, item)
    }

    fn insert_head(
        &self,
        wishlist: &mut Vec<WishlistItem>,
        item: NewWishlistItem,
    ) -> Result<String, WishlistError> {
        let id = new_entry_id();
        wishlist.insert(
            0,
            WishlistItem {
                id: id.clone(),
                product_url: item.product_url,
                name: item.name,
                brand: item.brand,
                price: item.price,
                image_url: item.image_url,
                category: item.category,
                added_at: now_millis(),
            },
        );
        self.save(wishlist)?;
        Ok(id)
    }

    fn save(&self, wishlist: &[WishlistItem]) -> Result<(), WishlistError> {
        if self.storage.set(WISHLIST_KEY, wishlist) {
            Ok(())
        } else {
            tracing::warn!(len = wishlist.len(), "wishlist write failed");
            Err(WishlistError::WriteFailed)
        }
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut wishlist = self.get_all();
        wishlist.retain(|w| w.id != id);
        self.storage.set(WISHLIST_KEY, &wishlist)
    }

    /// Removes the item if its product URL is saved, otherwise adds it.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::WriteFailed`] if the change could not be
    /// stored; membership is then unchanged.
    pub fn toggle(&self, item: NewWishlistItem) -> Result<WishlistToggle, WishlistError> {
        let mut wishlist = self.get_all();
        if let Some(pos) = wishlist.iter().position(|w| w.product_url == item.product_url) {
            wishlist.remove(pos);
            self.save(&wishlist)?;
            return Ok(WishlistToggle::Removed);
        }
        self.insert_head(&mut wishlist, item)?;
        Ok(WishlistToggle::Added)
    }

    pub fn clear(&self) -> bool {
        self.storage.remove(WISHLIST_KEY)
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_url: &str) -> bool {
        self.get_all().iter().any(|w| w.product_url == product_url)
    }
}
