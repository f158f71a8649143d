//! Single store cart

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Product line of a cart
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl CartItem {
    pub fn new(product_id: String, quantity: u32, unit_price: f64) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.product_id.trim().is_empty() {
            return Err(Error::InvalidItem("Product id is empty".to_string()));
        }
        if self.quantity == 0 {
            return Err(Error::InvalidItem(format!(
                "Quantity of {} must be at least 1",
                self.product_id
            )));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(Error::InvalidItem(format!(
                "Invalid unit price of {}: {}",
                self.product_id, self.unit_price
            )));
        }

        Ok(())
    }
}

/// Cart holding items of at most one store
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    store_id: Option<String>,
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_id(&self) -> Option<&str> {
        self.store_id.as_deref()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Units over all the lines
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.unit_price * i.quantity as f64)
            .sum()
    }

    /// Add an item of the store.
    ///
    /// Fails with [`Error::StoreConflict`] while the cart holds another
    /// store's items, the caller should confirm and use [`Cart::replace_with`].
    pub fn add(&mut self, store_id: &str, item: CartItem) -> Result<()> {
        item.validate()?;

        match self.store_id.as_deref() {
            Some(current) if current != store_id && !self.items.is_empty() => {
                return Err(Error::StoreConflict {
                    current: current.to_string(),
                    requested: store_id.to_string(),
                });
            }
            _ => {}
        }

        match self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            Some(line) => {
                line.quantity = line.quantity.checked_add(item.quantity).ok_or_else(|| {
                    Error::InvalidItem(format!("Quantity overflow on {}", item.product_id))
                })?;
                line.unit_price = item.unit_price;
            }
            None => self.items.push(item),
        }
        self.store_id = Some(store_id.to_string());

        Ok(())
    }

    /// Replace the whole content by the item of another store, in one step.
    ///
    /// On error the current content is kept.
    pub fn replace_with(&mut self, store_id: &str, item: CartItem) -> Result<()> {
        let mut replacement = Cart::new();
        replacement.add(store_id, item)?;

        debug!(
            previous = ?self.store_id,
            store = store_id,
            dropped_items = self.items.len(),
            "Replacing cart content"
        );
        *self = replacement;

        Ok(())
    }

    /// Drop a product line, the store is released with the last one
    pub fn remove(&mut self, product_id: &str) -> Option<CartItem> {
        let idx = self.items.iter().position(|i| i.product_id == product_id)?;
        let item = self.items.remove(idx);

        if self.items.is_empty() {
            self.store_id = None;
        }

        Some(item)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.store_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, qty: u32, price: f64) -> CartItem {
        CartItem::new(id.to_string(), qty, price)
    }

    #[test]
    fn same_store() -> Result<()> {
        let mut cart = Cart::new();
        cart.add("bakery", item("bread", 2, 1.5))?;
        cart.add("bakery", item("cake", 1, 12.0))?;
        cart.add("bakery", item("bread", 1, 1.5))?;

        assert_eq!(Some("bakery"), cart.store_id());
        assert_eq!(2, cart.items().len());
        assert_eq!(4, cart.item_count());
        assert_eq!(16.5, cart.total());

        Ok(())
    }

    #[test]
    fn other_store_conflicts() -> Result<()> {
        let mut cart = Cart::new();
        cart.add("bakery", item("bread", 2, 1.5))?;

        let err = cart.add("grill", item("kebab", 1, 25.0)).unwrap_err();
        match err {
            Error::StoreConflict { current, requested } => {
                assert_eq!("bakery", current);
                assert_eq!("grill", requested);
            }
            other => panic!("unexpected error {:?}", other),
        }

        // untouched
        assert_eq!(Some("bakery"), cart.store_id());
        assert_eq!(1, cart.items().len());

        Ok(())
    }

    #[test]
    fn replace_in_one_step() -> Result<()> {
        let mut cart = Cart::new();
        cart.add("bakery", item("bread", 2, 1.5))?;

        cart.replace_with("grill", item("kebab", 1, 25.0))?;
        assert_eq!(Some("grill"), cart.store_id());
        assert_eq!(vec![item("kebab", 1, 25.0)], cart.items().to_vec());

        Ok(())
    }

    #[test]
    fn failed_replace_keeps_content() -> Result<()> {
        let mut cart = Cart::new();
        cart.add("bakery", item("bread", 2, 1.5))?;
        let before = cart.clone();

        assert!(cart.replace_with("grill", item("kebab", 0, 25.0)).is_err());
        assert_eq!(before, cart);

        Ok(())
    }

    #[test]
    fn emptied_cart_accepts_any_store() -> Result<()> {
        let mut cart = Cart::new();
        cart.add("bakery", item("bread", 1, 1.5))?;

        assert_eq!(Some(item("bread", 1, 1.5)), cart.remove("bread"));
        assert_eq!(None, cart.store_id());
        cart.add("grill", item("kebab", 1, 25.0))?;

        cart.clear();
        assert!(cart.is_empty());
        cart.add("pharmacy", item("mask", 3, 0.5))?;
        assert_eq!(Some("pharmacy"), cart.store_id());

        Ok(())
    }

    #[test]
    fn item_count_over_u32() -> Result<()> {
        let mut cart = Cart::new();
        cart.add("depot", item("pallet", u32::MAX, 0.0))?;
        cart.add("depot", item("crate", 1, 0.0))?;

        assert_eq!(u64::from(u32::MAX) + 1, cart.item_count());
        assert!(cart.add("depot", item("pallet", 1, 0.0)).is_err());

        Ok(())
    }

    #[test]
    fn invalid_items() {
        let mut cart = Cart::new();
        assert!(cart.add("bakery", item("bread", 0, 1.5)).is_err());
        assert!(cart.add("bakery", item("", 1, 1.5)).is_err());
        assert!(cart.add("bakery", item("bread", 1, -2.0)).is_err());
        assert!(cart.is_empty());
        assert_eq!(None, cart.store_id());
    }
}
