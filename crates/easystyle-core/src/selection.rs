use crate::products::Product;
use crate::CoreError;

/// The subset of a product list the user has toggled on.
///
/// Membership is decided by `product_url` equality; insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    items: Vec<Product>,
}

/// Count and total price of a purchase request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseSummary {
    pub count: usize,
    pub total: i64,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects every product in `products`, dropping duplicate URLs.
    #[must_use]
    pub fn all_of(products: &[Product]) -> Self {
        let mut set = Self::new();
        for product in products {
            if !set.contains(&product.product_url) {
                set.items.push(product.clone());
            }
        }
        set
    }

    /// Adds `product` if absent, removes it otherwise. Returns `true` when the
    /// product is selected after the call.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if let Some(pos) = self
            .items
            .iter()
            .position(|p| p.product_url == product.product_url)
        {
            self.items.remove(pos);
            false
        } else {
            self.items.push(product.clone());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, product_url: &str) -> bool {
        self.items.iter().any(|p| p.product_url == product_url)
    }

    #[must_use]
    pub fn total_price(&self) -> i64 {
        self.items.iter().map(|p| p.price).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Summarises the selection for a purchase request.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptySelection`] when nothing is selected.
    pub fn purchase_summary(&self) -> Result<PurchaseSummary, CoreError> {
        if self.items.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        Ok(PurchaseSummary {
            count: self.items.len(),
            total: self.total_price(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::ProductCategory;

    fn product(url: &str, price: i64) -> Product {
        Product {
            id: url.to_string(),
            brand: "Brand".to_string(),
            name: "Item".to_string(),
            price,
            image_url: String::new(),
            recommended_size: "M".to_string(),
            product_url: url.to_string(),
            store_name: "Store".to_string(),
            category: ProductCategory::Top,
            cropped_image: None,
        }
    }

    #[test]
    fn all_of_selects_every_product() {
        let products = vec![product("a", 10_000), product("b", 25_000)];
        let set = SelectionSet::all_of(&products);
        assert_eq!(set.len(), 2);
        assert_eq!(set.items(), products.as_slice());
        assert_eq!(set.total_price(), 35_000);
    }

    #[test]
    fn all_of_drops_duplicate_urls() {
        let products = vec![product("a", 10_000), product("a", 10_000)];
        assert_eq!(SelectionSet::all_of(&products).len(), 1);
    }

    #[test]
    fn toggle_removes_then_re_adds() {
        let a = product("a", 10_000);
        let mut set = SelectionSet::all_of(&[a.clone(), product("b", 5_000)]);

        assert!(!set.toggle(&a));
        assert!(!set.contains("a"));
        assert_eq!(set.total_price(), 5_000);

        assert!(set.toggle(&a));
        assert!(set.contains("a"));
        assert_eq!(set.total_price(), 15_000);
    }

    #[test]
    fn membership_is_by_url_not_id() {
        let mut set = SelectionSet::new();
        let mut first = product("https://shop/x", 1_000);
        first.id = "id-1".to_string();
        set.toggle(&first);

        let mut same_url = product("https://shop/x", 1_000);
        same_url.id = "id-2".to_string();
        assert!(!set.toggle(&same_url), "same URL must count as the same item");
        assert!(set.is_empty());
    }

    #[test]
    fn purchase_summary_of_empty_selection_fails() {
        assert_eq!(
            SelectionSet::new().purchase_summary(),
            Err(CoreError::EmptySelection)
        );
    }

    #[test]
    fn purchase_summary_counts_and_totals() {
        let set = SelectionSet::all_of(&[product("a", 10_000), product("b", 2_500)]);
        assert_eq!(
            set.purchase_summary(),
            Ok(PurchaseSummary {
                count: 2,
                total: 12_500
            })
        );
    }
}
