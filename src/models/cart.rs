use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::catalog::ItemId;
use crate::models::child::ChildSelection;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub product_key: String,
    pub product_name: String,
    pub child_name: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub customization: Option<String>,
    pub total: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub package_id: ItemId,
    pub package_name: String,
    pub instructor_id: ItemId,
    pub instructor_name: String,
    pub child: ChildSelection,
    pub date: NaiveDate,
    #[serde(with = "crate::models::time_format::hh_mm")]
    pub time: NaiveTime,
    pub total: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    pub plan_id: ItemId,
    pub plan_name: String,
    pub child_name: String,
    pub duration_months: u32,
    pub total: f64,
}

/// What a cart line holds, discriminated by `type` on the wire.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum CartEntry {
    Order(OrderPayload),
    Booking(BookingPayload),
    Subscription(SubscriptionPayload),
}

impl CartEntry {
    pub fn total(&self) -> f64 {
        match self {
            CartEntry::Order(order) => order.total,
            CartEntry::Booking(booking) => booking.total,
            CartEntry::Subscription(subscription) => subscription.total,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CartEntry::Order(_) => "order",
            CartEntry::Booking(_) => "booking",
            CartEntry::Subscription(_) => "subscription",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CartItem {
    pub id: Uuid,
    #[serde(flatten)]
    pub entry: CartEntry,
    pub timestamp: DateTime<Utc>,
}

impl CartItem {
    pub fn new(entry: CartEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            entry,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape_is_tagged() {
        let item = CartItem::new(CartEntry::Subscription(SubscriptionPayload {
            plan_id: 2,
            plan_name: "Quarterly".to_string(),
            child_name: "Salma".to_string(),
            duration_months: 3,
            total: 450.0,
        }));

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "subscription");
        assert_eq!(value["payload"]["planName"], "Quarterly");
        assert!(value["timestamp"].is_string());
        assert_eq!(value["id"], json!(item.id.to_string()));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<CartItem, _> = serde_json::from_value(json!({
            "id": "0b0c4b8e-3a5c-4d67-a0a8-2a4dfb1de7f1",
            "type": "voucher",
            "payload": {},
            "timestamp": "2026-01-01T10:00:00Z"
        }));
        assert!(result.is_err());
    }
}
