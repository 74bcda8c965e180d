//! The visitor's cart.
//!
//! An ordered list of line items, unique by product, persisted on every
//! mutation so a restart reconstructs identical state. The cart is not tied
//! to authentication: it survives logout and session expiry.
//!
//! Totals are derived reads, recomputed on every call; nothing here caches
//! an aggregate that could go stale.

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use easybuy_core::{Price, ProductId};

use crate::api::types::Product;
use crate::storage::Storage;

/// Storage key for the serialized item list.
const CART_KEY: &str = "cart";

/// One product/quantity pair in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price at the time it was added.
    pub price: Price,
    /// Units of this product. Never below 1.
    pub quantity: u32,
    /// Product image for the cart row, if any.
    pub image_url: Option<String>,
}

impl CartItem {
    /// Build a line item from a catalog product.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: quantity.max(1),
            image_url: product.image_url.clone(),
        }
    }

    /// The line total (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// The cart store.
///
/// All mutation flows through the methods here; the item list is never
/// handed out by reference. Persistence failures are logged and swallowed -
/// the in-memory cart keeps working for the rest of the session.
pub struct CartStore {
    storage: Arc<dyn Storage>,
    items: Mutex<Vec<CartItem>>,
}

impl CartStore {
    /// Load the cart persisted in `storage`, or start empty.
    ///
    /// A corrupt persisted list is logged and replaced with an empty cart
    /// rather than failing application startup.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let items = match storage.get(CART_KEY) {
            Some(json) => match serde_json::from_str(&json) {
                Ok(items) => items,
                Err(err) => {
                    warn!(error = %err, "persisted cart is corrupt, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self {
            storage,
            items: Mutex::new(items),
        }
    }

    /// Add an item to the cart.
    ///
    /// If the product is already present its quantity is incremented by the
    /// new item's quantity; the cart never holds two lines for one product.
    /// No stock ceiling is enforced here - that is a presentation concern
    /// with externally supplied stock data.
    pub fn add_item(&self, item: CartItem) {
        let mut item = item;
        item.quantity = item.quantity.max(1);

        let mut items = self.lock();
        if let Some(existing) = items.iter_mut().find(|i| i.product_id == item.product_id) {
            existing.quantity += item.quantity;
        } else {
            items.push(item);
        }
        self.persist(&items);
    }

    /// Set the quantity of a line item directly.
    ///
    /// Quantities below 1 are a clamped no-op: decrementing never removes a
    /// line. Removal is the explicit [`Self::remove_item`]. Unknown product
    /// ids are ignored.
    pub fn update_quantity(&self, product_id: ProductId, quantity: u32) {
        if quantity < 1 {
            debug!(%product_id, "ignoring quantity below 1");
            return;
        }

        let mut items = self.lock();
        if let Some(item) = items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
            self.persist(&items);
        }
    }

    /// Remove a line item. No-op when the product is not in the cart.
    pub fn remove_item(&self, product_id: ProductId) {
        let mut items = self.lock();
        let before = items.len();
        items.retain(|i| i.product_id != product_id);
        if items.len() != before {
            self.persist(&items);
        }
    }

    /// Empty the cart. Only ever triggered by an explicit user action.
    pub fn clear(&self) {
        let mut items = self.lock();
        items.clear();
        self.persist(&items);
    }

    /// A copy of the current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock().clone()
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lock().iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines (the navbar badge).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock().iter().map(|i| i.quantity).sum()
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn persist(&self, items: &[CartItem]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "failed to serialize cart");
                return;
            }
        };
        // Swallowed by design note: the in-memory cart already mutated and
        // stays usable; only durability is lost
        if let Err(err) = self.storage.set(CART_KEY, json, None) {
            warn!(error = %err, "failed to persist cart");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CartItem>> {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
