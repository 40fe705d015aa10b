use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::cart::{CartEntry, CartItem};
use crate::store::session_storage::SessionStorage;

/// Session-storage key the cart is kept under.
pub const CART_STORAGE_KEY: &str = "alrehlaCart";

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Cart item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Cart is empty")]
    Empty,

    #[error("Failed to persist cart: {0}")]
    Storage(String),
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub items: Vec<CartItem>,
    pub total: f64,
    pub completed_at: DateTime<Utc>,
}

/// The session's cart. Every mutation is written through to storage before
/// it becomes visible; a failed write leaves the cart as it was.
pub struct CartStore<S: SessionStorage> {
    storage: S,
    items: Vec<CartItem>,
}

impl<S: SessionStorage> CartStore<S> {
    /// Restore from storage. A missing or unreadable value gives an empty cart.
    pub fn restore(storage: S) -> Self {
        let items = match storage.get_item(CART_STORAGE_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => items,
                Err(err) => {
                    log::warn!("Discarding unreadable cart from session storage: {}", err);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self { storage, items }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.entry.total()).sum()
    }

    pub fn add(&mut self, entry: CartEntry) -> Result<CartItem, CartError> {
        self.add_item(CartItem::new(entry))
    }

    pub fn add_item(&mut self, item: CartItem) -> Result<CartItem, CartError> {
        let mut next = self.items.clone();
        next.push(item.clone());
        self.commit(next)?;
        log::debug!("Added {} item {} to cart", item.entry.kind(), item.id);
        Ok(item)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<CartItem, CartError> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CartError::ItemNotFound(id))?;

        let mut next = self.items.clone();
        let removed = next.remove(position);
        self.commit(next)?;
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.storage.remove_item(CART_STORAGE_KEY);
        self.items.clear();
    }

    /// Hand the cart contents over for payment and empty the cart.
    pub fn checkout(&mut self) -> Result<CheckoutSummary, CartError> {
        if self.items.is_empty() {
            return Err(CartError::Empty);
        }

        let summary = CheckoutSummary {
            items: self.items.clone(),
            total: self.total(),
            completed_at: Utc::now(),
        };
        self.clear();
        log::info!(
            "Checkout completed: {} items, total {}",
            summary.items.len(),
            summary.total
        );
        Ok(summary)
    }

    fn commit(&mut self, next: Vec<CartItem>) -> Result<(), CartError> {
        let serialized =
            serde_json::to_string(&next).map_err(|e| CartError::Storage(e.to_string()))?;
        self.storage
            .set_item(CART_STORAGE_KEY, serialized)
            .map_err(CartError::Storage)?;
        self.items = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cart::{OrderPayload, SubscriptionPayload};
    use crate::store::session_storage::MemorySessionStorage;

    fn order(total: f64) -> CartEntry {
        CartEntry::Order(OrderPayload {
            product_key: "custom_story".to_string(),
            product_name: "قصة مخصصة".to_string(),
            child_name: "سلمى".to_string(),
            format: Some("printed".to_string()),
            customization: None,
            total,
        })
    }

    fn subscription(total: f64) -> CartEntry {
        CartEntry::Subscription(SubscriptionPayload {
            plan_id: 1,
            plan_name: "اشتراك شهري".to_string(),
            child_name: "يوسف".to_string(),
            duration_months: 1,
            total,
        })
    }

    struct FailingStorage;

    impl SessionStorage for FailingStorage {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }

        fn set_item(&self, _key: &str, _value: String) -> Result<(), String> {
            Err("quota exceeded".to_string())
        }

        fn remove_item(&self, _key: &str) {}
    }

    #[test]
    fn test_round_trip_through_storage() {
        let storage = MemorySessionStorage::new();
        let mut cart = CartStore::restore(storage.clone());
        let first = cart.add(order(120.0)).unwrap();
        let second = cart.add(subscription(150.0)).unwrap();

        let reloaded = CartStore::restore(storage);
        assert_eq!(reloaded.items(), &[first, second][..]);
        assert_eq!(reloaded.total(), 270.0);
    }

    #[test]
    fn test_corrupt_value_gives_empty_cart() {
        let storage = MemorySessionStorage::new();
        storage
            .set_item(CART_STORAGE_KEY, "{not json".to_string())
            .unwrap();

        let cart = CartStore::restore(storage.clone());
        assert!(cart.is_empty());

        storage
            .set_item(CART_STORAGE_KEY, r#"[{"id": 5}]"#.to_string())
            .unwrap();
        assert!(CartStore::restore(storage).is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let storage = MemorySessionStorage::new();
        let mut cart = CartStore::restore(storage.clone());
        let kept = cart.add(order(100.0)).unwrap();
        let dropped = cart.add(order(50.0)).unwrap();

        cart.remove(dropped.id).unwrap();
        assert_eq!(CartStore::restore(storage.clone()).items(), &[kept][..]);

        assert!(matches!(
            cart.remove(dropped.id),
            Err(CartError::ItemNotFound(id)) if id == dropped.id
        ));

        cart.clear();
        assert!(cart.is_empty());
        assert!(storage.get_item(CART_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let mut cart = CartStore::restore(FailingStorage);
        let result = cart.add(order(100.0));

        assert!(matches!(result, Err(CartError::Storage(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_checkout_empties_cart() {
        let storage = MemorySessionStorage::new();
        let mut cart = CartStore::restore(storage.clone());
        assert!(matches!(cart.checkout(), Err(CartError::Empty)));

        cart.add(order(100.0)).unwrap();
        cart.add(subscription(400.0)).unwrap();
        let summary = cart.checkout().unwrap();

        assert_eq!(summary.items.len(), 2);
        assert_eq!(summary.total, 500.0);
        assert!(CartStore::restore(storage).is_empty());
    }
}
