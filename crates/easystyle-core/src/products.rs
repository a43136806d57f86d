use serde::{Deserialize, Serialize};

/// Clothing category of a catalog product.
///
/// The backend reports categories as free-form English names; [`Self::from_backend_name`]
/// is the single place that maps them onto this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Top,
    Bottom,
    Shoes,
    Accessory,
    Outerwear,
    Underwear,
}

impl ProductCategory {
    /// Display order used when grouping products.
    pub const ALL: [ProductCategory; 6] = [
        ProductCategory::Top,
        ProductCategory::Bottom,
        ProductCategory::Shoes,
        ProductCategory::Accessory,
        ProductCategory::Outerwear,
        ProductCategory::Underwear,
    ];

    /// Maps a backend category name to a variant. Unknown names fall back to
    /// [`ProductCategory::Top`].
    #[must_use]
    pub fn from_backend_name(name: &str) -> Self {
        match name {
            "Bottoms" => ProductCategory::Bottom,
            "Shoes" => ProductCategory::Shoes,
            "Accessories" => ProductCategory::Accessory,
            "Outerwear" => ProductCategory::Outerwear,
            "Underwear" => ProductCategory::Underwear,
            _ => ProductCategory::Top,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProductCategory::Top => "top",
            ProductCategory::Bottom => "bottom",
            ProductCategory::Shoes => "shoes",
            ProductCategory::Accessory => "accessory",
            ProductCategory::Outerwear => "outerwear",
            ProductCategory::Underwear => "underwear",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog product matched to a styling result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend product UUID.
    pub id: String,
    pub brand: String,
    pub name: String,
    /// Whole-unit price in the store currency (KRW has no minor unit).
    pub price: i64,
    pub image_url: String,
    pub recommended_size: String,
    /// Canonical product page; the natural key for de-duplication.
    pub product_url: String,
    pub store_name: String,
    pub category: ProductCategory,
    /// Base64 close-up of this item cut from the styled image, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cropped_image: Option<String>,
}

/// Groups products by category in [`ProductCategory::ALL`] order, omitting
/// empty groups. Order within a group follows the input.
#[must_use]
pub fn group_by_category(products: &[Product]) -> Vec<(ProductCategory, Vec<Product>)> {
    ProductCategory::ALL
        .iter()
        .filter_map(|&category| {
            let members: Vec<Product> = products
                .iter()
                .filter(|p| p.category == category)
                .cloned()
                .collect();
            (!members.is_empty()).then_some((category, members))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(url: &str, category: ProductCategory) -> Product {
        Product {
            id: "0b7c6a9e-0000-0000-0000-000000000001".to_string(),
            brand: "Musinsa Standard".to_string(),
            name: "Relaxed Oxford Shirt".to_string(),
            price: 39_000,
            image_url: "https://cdn.example.com/shirt.jpg".to_string(),
            recommended_size: "M".to_string(),
            product_url: url.to_string(),
            store_name: "Musinsa".to_string(),
            category,
            cropped_image: None,
        }
    }

    #[test]
    fn backend_names_map_to_variants() {
        assert_eq!(ProductCategory::from_backend_name("Tops"), ProductCategory::Top);
        assert_eq!(
            ProductCategory::from_backend_name("Bottoms"),
            ProductCategory::Bottom
        );
        assert_eq!(
            ProductCategory::from_backend_name("Shoes"),
            ProductCategory::Shoes
        );
        assert_eq!(
            ProductCategory::from_backend_name("Accessories"),
            ProductCategory::Accessory
        );
        assert_eq!(
            ProductCategory::from_backend_name("Outerwear"),
            ProductCategory::Outerwear
        );
        assert_eq!(
            ProductCategory::from_backend_name("Underwear"),
            ProductCategory::Underwear
        );
    }

    #[test]
    fn unknown_backend_name_falls_back_to_top() {
        assert_eq!(ProductCategory::from_backend_name("Hats"), ProductCategory::Top);
        assert_eq!(ProductCategory::from_backend_name(""), ProductCategory::Top);
    }

    #[test]
    fn group_by_category_follows_fixed_order_and_skips_empty() {
        let products = vec![
            make_product("https://shop/a", ProductCategory::Shoes),
            make_product("https://shop/b", ProductCategory::Top),
            make_product("https://shop/c", ProductCategory::Shoes),
        ];
        let groups = group_by_category(&products);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, ProductCategory::Top);
        assert_eq!(groups[1].0, ProductCategory::Shoes);
        assert_eq!(groups[1].1.len(), 2);
        assert_eq!(groups[1].1[0].product_url, "https://shop/a");
    }

    #[test]
    fn cropped_image_is_omitted_when_absent() {
        let json = serde_json::to_value(make_product("https://shop/a", ProductCategory::Top))
            .expect("serialize");
        assert!(json.get("cropped_image").is_none());
    }
}
