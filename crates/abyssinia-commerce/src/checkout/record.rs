//! Persisted order shape.
//!
//! Amounts are decimal numbers and currencies are symbols, so stored records
//! stay readable by other storefront tooling.

use super::{Order, OrderItem, OrderStatus, PaymentMethod, ShippingDetails};
use crate::ids::{OrderId, ProductId};
use crate::money::{Currency, Money};
use crate::pricing::PriceQuote;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderRecord {
    id: OrderId,
    date: DateTime<Utc>,
    items: Vec<OrderItemRecord>,
    subtotal: f64,
    shipping_cost: f64,
    duties: f64,
    total: f64,
    shipping_details: ShippingDetails,
    payment_method: PaymentMethod,
    #[serde(default)]
    status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemRecord {
    product_id: ProductId,
    name: String,
    unit_price: f64,
    currency: String,
    quantity: u32,
}

impl From<Order> for OrderRecord {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            date: order.created_at,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemRecord {
                    product_id: item.product_id,
                    name: item.name,
                    unit_price: item.unit_price.to_decimal(),
                    currency: item.unit_price.currency.symbol().to_string(),
                    quantity: item.quantity,
                })
                .collect(),
            subtotal: order.pricing.subtotal.to_decimal(),
            shipping_cost: order.pricing.shipping_cost.to_decimal(),
            duties: order.pricing.duties.to_decimal(),
            total: order.pricing.total.to_decimal(),
            shipping_details: order.shipping_details,
            payment_method: order.payment_method,
            status: order.status,
        }
    }
}

impl TryFrom<OrderRecord> for Order {
    type Error = String;

    fn try_from(r: OrderRecord) -> Result<Self, Self::Error> {
        if r.items.is_empty() {
            return Err(format!("order {} has no items", r.id));
        }

        let mut items = Vec::with_capacity(r.items.len());
        for item in r.items {
            let currency = Currency::from_symbol(&item.currency).ok_or_else(|| {
                format!("order {}: unknown currency {:?}", r.id, item.currency)
            })?;
            if item.quantity == 0 {
                return Err(format!("order {}: zero quantity for {}", r.id, item.product_id));
            }
            if !item.unit_price.is_finite() {
                return Err(format!("order {}: invalid unit price", r.id));
            }
            items.push(OrderItem {
                product_id: item.product_id,
                name: item.name,
                unit_price: Money::from_decimal(item.unit_price, currency),
                quantity: item.quantity,
            });
        }

        let currency = items
            .first()
            .map(|i| i.unit_price.currency)
            .unwrap_or_default();
        let amounts = [r.subtotal, r.shipping_cost, r.duties, r.total];
        if amounts.iter().any(|a| !a.is_finite()) {
            return Err(format!("order {}: invalid amount", r.id));
        }
        let pricing = PriceQuote {
            subtotal: Money::from_decimal(r.subtotal, currency),
            shipping_cost: Money::from_decimal(r.shipping_cost, currency),
            duties: Money::from_decimal(r.duties, currency),
            total: Money::from_decimal(r.total, currency),
        };
        if !pricing.is_consistent() {
            return Err(format!("order {}: total does not match its breakdown", r.id));
        }

        Ok(Order {
            id: r.id,
            created_at: r.date,
            items,
            pricing,
            shipping_details: r.shipping_details,
            payment_method: r.payment_method,
            status: r.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::checkout::fixtures::sample_order;
    use crate::checkout::Order;

    #[test]
    fn test_record_field_names() {
        let json = serde_json::to_value(sample_order("ETH-1042")).unwrap();

        assert_eq!(json["id"], "ETH-1042");
        assert!(json["date"].as_str().unwrap().contains('T'));
        assert_eq!(json["items"][0]["productId"], "jebena-05");
        assert_eq!(json["items"][0]["unitPrice"], 40.0);
        assert_eq!(json["items"][0]["currency"], "€");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["subtotal"], 80.0);
        assert_eq!(json["shippingCost"], 25.0);
        assert_eq!(json["duties"], 12.5);
        assert_eq!(json["total"], 117.5);
        assert_eq!(json["shippingDetails"]["postalCode"], "1000");
        assert_eq!(json["paymentMethod"], "card");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_record_parses_browser_timestamp() {
        let json = r#"{
            "id": "ETH-7",
            "date": "2024-03-01T09:30:00.000Z",
            "items": [{"productId": "gabi-02", "name": "Gabi Shawl", "unitPrice": 75,
                       "currency": "€", "quantity": 1}],
            "subtotal": 75, "shippingCost": 25, "duties": 12.5, "total": 112.5,
            "shippingDetails": {"firstName": "A", "lastName": "B", "email": "a@b.c",
                "phone": "1", "address": "x", "city": "y", "postalCode": "z", "country": "w"},
            "paymentMethod": "bank_transfer",
            "status": "pending"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.total().amount_cents, 11250);
        assert_eq!(order.items()[0].unit_price.amount_cents, 7500);
    }

    #[test]
    fn test_record_with_wrong_total_is_rejected() {
        let mut json = serde_json::to_value(sample_order("ETH-1")).unwrap();
        json["total"] = serde_json::json!(100.0);
        assert!(serde_json::from_value::<Order>(json).is_err());
    }

    #[test]
    fn test_record_without_items_is_rejected() {
        let mut json = serde_json::to_value(sample_order("ETH-1")).unwrap();
        json["items"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Order>(json).is_err());
    }
}
