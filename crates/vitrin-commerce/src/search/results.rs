//! Search result records.

use serde::{Deserialize, Serialize};

use crate::catalog::{ImageRef, Product, Slug};
use crate::ids::ProductId;
use crate::money::{self, Money};

/// Projection of a [`Product`] returned by the search endpoint.
///
/// Serialized field names are part of the public JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub slug: Slug,
    #[serde(with = "money::decimal")]
    pub price: Money,
    /// First product image, if any.
    #[serde(default)]
    pub image: Option<ImageRef>,
    /// Title of the product's category.
    #[serde(rename = "categoryName", default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&Product> for SearchResult {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            price: product.price,
            image: product.first_image().cloned(),
            category_name: product.category_title().map(str::to_string),
            description: product.description.clone(),
        }
    }
}

impl From<Product> for SearchResult {
    fn from(product: Product) -> Self {
        SearchResult::from(&product)
    }
}

impl SearchResult {
    /// Storefront path for the product detail page.
    pub fn path(&self) -> String {
        format!("/urunler/{}", self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_projection_from_product() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Bez Çanta Modeli",
            "slug": { "current": "bez-canta-modeli" },
            "price": 249.9,
            "images": [{ "asset": { "_ref": "image-abc-800x600-jpg" } }],
            "category": { "_id": "c1", "title": "Çantalar", "slug": { "current": "cantalar" } },
            "description": "Doğal pamuk",
            "stock": 3
        }))
        .unwrap();

        let result = SearchResult::from(&product);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["_id"], "p1");
        assert_eq!(json["categoryName"], "Çantalar");
        assert_eq!(json["price"], json!(249.9));
        assert_eq!(json["image"]["asset"]["_ref"], "image-abc-800x600-jpg");
        assert_eq!(json["slug"]["current"], "bez-canta-modeli");
        assert!(json.get("stock").is_none());
        assert_eq!(result.path(), "/urunler/bez-canta-modeli");
    }

    #[test]
    fn test_missing_image_and_category_are_null() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p2",
            "name": "Deri Cüzdan",
            "slug": { "current": "deri-cuzdan" },
            "price": 99
        }))
        .unwrap();

        let json = serde_json::to_value(SearchResult::from(product)).unwrap();
        assert!(json["image"].is_null());
        assert!(json["categoryName"].is_null());
    }
}
