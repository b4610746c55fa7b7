//! Product catalog module.
//!
//! The catalog is a fixed, read-only product list. It is either the built-in
//! collection or loaded once from a JSON file.

mod category;
mod product;

pub use category::Category;
pub use product::Product;

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// An immutable list of products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from a product list.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse a catalog from a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    /// All products in listing order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Look up a product by id, failing if it does not exist.
    pub fn get(&self, id: &ProductId) -> Result<&Product, CommerceError> {
        self.find(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// Products in a category; `None` lists everything.
    pub fn by_category(&self, category: Option<Category>) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .collect()
    }

    /// Products matching a free-text query within an optional category.
    pub fn search(&self, query: &str, category: Option<Category>) -> Vec<&Product> {
        self.by_category(category)
            .into_iter()
            .filter(|p| p.matches(query))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The built-in Abyssinia Direct collection.
    pub fn standard() -> Self {
        let eur = |cents| Money::new(cents, Currency::EUR);
        Self::new(vec![
            Product::new("kemis-01", "Habesha Kemis", eur(18900), Category::Clothes)
                .with_description("Handwoven cotton dress with tibeb border embroidery.")
                .with_history("Spun and woven by the Shiro Meda weavers' cooperative in Addis Ababa.")
                .with_image("/images/habesha-kemis.jpg"),
            Product::new("gabi-02", "Gabi Shawl", eur(7500), Category::Clothes)
                .with_description("Four-layer cotton gabi for highland evenings.")
                .with_history("Traditional thick shawl worn across the Amhara highlands.")
                .with_image("/images/gabi.jpg"),
            Product::new("icon-03", "Gondarine Icon Diptych", eur(32000), Category::Art)
                .with_description("Hand-painted diptych on wood in the Second Gondarine style.")
                .with_history("Painted in the workshop tradition of 17th-century Gondar.")
                .with_image("/images/icon-diptych.jpg"),
            Product::new("basket-04", "Mesob Basket", eur(9800), Category::Art)
                .with_description("Coiled grass serving basket with a domed lid.")
                .with_history("Woven in Harar from dyed sefed grass.")
                .with_image("/images/mesob.jpg")
                .sold_out(),
            Product::new("jebena-05", "Jebena Coffee Pot", eur(4000), Category::Miscellaneous)
                .with_description("Black clay jebena for the coffee ceremony.")
                .with_history("Fired in Kaffa, the birthplace of coffee.")
                .with_image("/images/jebena.jpg"),
            Product::new("coffee-06", "Yirgacheffe Beans 500g", eur(2200), Category::Miscellaneous)
                .with_description("Washed single-origin coffee beans, roasted weekly.")
                .with_history("Grown by smallholders in the Gedeo zone.")
                .with_image("/images/yirgacheffe.jpg"),
            Product::new("cross-07", "Lalibela Silver Cross", eur(12500), Category::Accessories)
                .with_description("Filigree pendant cross on a leather cord.")
                .with_history("Cast after the processional crosses of Lalibela.")
                .with_image("/images/lalibela-cross.jpg"),
            Product::new("bag-08", "Leather Shoulder Bag", eur(8900), Category::Accessories)
                .with_description("Vegetable-tanned Ethiopian highland sheep leather.")
                .with_history("Stitched by a family workshop in Mojo.")
                .with_image("/images/leather-bag.jpg"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_has_unique_ids() {
        let catalog = Catalog::standard();
        let mut ids: Vec<_> = catalog.products().iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_by_category() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.by_category(None).len(), catalog.len());
        assert!(catalog
            .by_category(Some(Category::Art))
            .iter()
            .all(|p| p.category == Category::Art));
    }

    #[test]
    fn test_search_within_category() {
        let catalog = Catalog::standard();
        let hits = catalog.search("coffee", Some(Category::Miscellaneous));
        assert_eq!(hits.len(), 2);
        assert!(catalog.search("coffee", Some(Category::Clothes)).is_empty());
    }

    #[test]
    fn test_get_missing_product() {
        let catalog = Catalog::standard();
        let err = catalog.get(&ProductId::new("nope")).unwrap_err();
        assert!(matches!(err, CommerceError::ProductNotFound(_)));
    }

    #[test]
    fn test_from_json_round_trips_standard() {
        let catalog = Catalog::standard();
        let json = serde_json::to_string(catalog.products()).unwrap();
        assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
    }
}
