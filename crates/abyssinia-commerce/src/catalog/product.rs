//! Product types.

use crate::catalog::Category;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// Products are reference data: the cart and orders copy the fields they need
/// and never write back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Category the product is listed under.
    pub category: Category,
    /// Short description for listings.
    pub description: String,
    /// Long-form provenance text for the detail page.
    pub detailed_history: String,
    /// Image reference.
    pub image_url: String,
    /// Whether the product can be added to the cart.
    pub in_stock: bool,
}

impl Product {
    /// Create a new in-stock product.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category,
            description: String::new(),
            detailed_history: String::new(),
            image_url: String::new(),
            in_stock: true,
        }
    }

    /// Set the listing description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the provenance text.
    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.detailed_history = history.into();
        self
    }

    /// Set the image reference.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Mark the product as sold out.
    pub fn sold_out(mut self) -> Self {
        self.in_stock = false;
        self
    }

    /// Currency symbol shown next to the price.
    pub fn currency_symbol(&self) -> &'static str {
        self.price.currency.symbol()
    }

    /// Case-insensitive match against name and description.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

/// Catalog file shape: decimal prices and a currency symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: ProductId,
    name: String,
    price: f64,
    currency: String,
    category: Category,
    #[serde(default)]
    description: String,
    #[serde(default)]
    detailed_history: String,
    #[serde(default)]
    image_url: String,
    #[serde(default = "default_in_stock")]
    in_stock: bool,
}

/// Largest unit price accepted from a catalog file, in currency units.
pub const MAX_UNIT_PRICE: f64 = 1_000_000_000.0;

fn default_in_stock() -> bool {
    true
}

impl TryFrom<ProductRecord> for Product {
    type Error = String;

    fn try_from(r: ProductRecord) -> Result<Self, Self::Error> {
        let currency = Currency::from_symbol(&r.currency)
            .ok_or_else(|| format!("unknown currency {:?} for product {}", r.currency, r.id))?;
        if !r.price.is_finite() || !(0.0..=MAX_UNIT_PRICE).contains(&r.price) {
            return Err(format!("invalid price {} for product {}", r.price, r.id));
        }
        Ok(Self {
            id: r.id,
            name: r.name,
            price: Money::from_decimal(r.price, currency),
            category: r.category,
            description: r.description,
            detailed_history: r.detailed_history,
            image_url: r.image_url,
            in_stock: r.in_stock,
        })
    }
}

impl From<Product> for ProductRecord {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: p.price.to_decimal(),
            currency: p.price.currency.symbol().to_string(),
            category: p.category,
            description: p.description,
            detailed_history: p.detailed_history,
            image_url: p.image_url,
            in_stock: p.in_stock,
        }
    }
}
