//! Cart Store: the single owner of client-side shopping state
//!
//! Holds the ordered, line-id-unique cart plus the order notes, the
//! fulfillment preference and the last-placed-order snapshot. Every
//! mutation persists the full cart and reports the new item count to the
//! badge callback.

use crate::error::StorageResult;
use crate::storage::{
    CART_KEY, FULFILLMENT_KEY, LAST_ORDER_KEY, NOTES_KEY, Storage, read_json, write_json,
};
use shared::cart::{LineItem, MAX_QUANTITY, compute_line_id, normalize_cart};
use shared::money::{PricingConfig, Totals, compute_totals, item_count};
use shared::order::{FulfillmentType, OrderSnapshot};

/// Receives the cart's item count after every mutation
pub type BadgeCallback = Box<dyn Fn(u32) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartState {
    Empty,
    NonEmpty,
}

pub struct CartStore<S: Storage> {
    storage: S,
    lines: Vec<LineItem>,
    on_badge: Option<BadgeCallback>,
}

impl<S: Storage> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .field("has_badge", &self.on_badge.is_some())
            .finish()
    }
}

impl<S: Storage> CartStore<S> {
    /// Load the persisted cart, migrating legacy entries.
    ///
    /// Absent or malformed data yields an empty cart. A cart that changed
    /// during normalization is written back in canonical form.
    pub fn load(storage: S) -> Self {
        let mut store = Self {
            storage,
            lines: Vec::new(),
            on_badge: None,
        };
        store.reload();
        store
    }

    /// Register the badge refresh callback
    pub fn with_badge(mut self, callback: impl Fn(u32) + Send + Sync + 'static) -> Self {
        self.on_badge = Some(Box::new(callback));
        self
    }

    /// Re-read the cart from storage
    pub fn reload(&mut self) {
        let raw: serde_json::Value = read_json(&self.storage, CART_KEY).unwrap_or_default();
        self.lines = normalize_cart(&raw);

        if !raw.is_null()
            && serde_json::to_value(&self.lines).ok().as_ref() != Some(&raw)
            && let Err(e) = write_json(&self.storage, CART_KEY, &self.lines)
        {
            tracing::warn!(error = %e, "Failed to write back normalized cart");
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line(&self, line_id: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn state(&self) -> CartState {
        if self.lines.is_empty() {
            CartState::Empty
        } else {
            CartState::NonEmpty
        }
    }

    pub fn item_count(&self) -> u32 {
        item_count(&self.lines)
    }

    pub fn totals(&self, fulfillment: FulfillmentType, pricing: &PricingConfig) -> Totals {
        compute_totals(&self.lines, fulfillment, pricing)
    }

    // ========== Mutations ==========

    /// Merge into the line with the same identity or append a new line.
    /// Identity is re-derived from the item's current options. A zero
    /// quantity counts as 1.
    pub fn add(&mut self, mut item: LineItem) -> StorageResult<()> {
        item.line_id = compute_line_id(&item.product_id, &item.options, item.options_text.as_deref());
        let quantity = item.quantity.max(1);

        match self.lines.iter_mut().find(|l| l.line_id == item.line_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity).min(MAX_QUANTITY);
            }
            None => {
                item.quantity = quantity.min(MAX_QUANTITY);
                self.lines.push(item);
            }
        }
        self.commit()
    }

    /// Adjust a line's quantity by `delta`. Reaching zero removes the line.
    /// Unknown line ids are ignored.
    pub fn change_quantity(&mut self, line_id: &str, delta: i64) -> StorageResult<()> {
        let Some(index) = self.lines.iter().position(|l| l.line_id == line_id) else {
            return Ok(());
        };
        if delta == 0 {
            return Ok(());
        }

        let next = i64::from(self.lines[index].quantity) + delta;
        if next <= 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = u32::try_from(next).unwrap_or(MAX_QUANTITY).min(MAX_QUANTITY);
        }
        self.commit()
    }

    /// Remove a line. Unknown line ids are ignored.
    pub fn remove(&mut self, line_id: &str) -> StorageResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.line_id != line_id);
        if self.lines.len() == before {
            return Ok(());
        }
        self.commit()
    }

    pub fn clear(&mut self) -> StorageResult<()> {
        self.lines.clear();
        self.commit()
    }

    /// Persist the cart, then refresh the badge either way
    fn commit(&mut self) -> StorageResult<()> {
        let persisted = write_json(&self.storage, CART_KEY, &self.lines);
        if let Some(callback) = &self.on_badge {
            callback(self.item_count());
        }
        persisted
    }

    // ========== Checkout preferences ==========

    pub fn notes(&self) -> String {
        read_json(&self.storage, NOTES_KEY).unwrap_or_default()
    }

    pub fn set_notes(&self, notes: &str) -> StorageResult<()> {
        write_json(&self.storage, NOTES_KEY, notes)
    }

    /// Stored preference, Pickup when absent or unrecognised
    pub fn fulfillment(&self) -> FulfillmentType {
        read_json::<String>(&self.storage, FULFILLMENT_KEY)
            .and_then(|raw| FulfillmentType::parse(&raw))
            .unwrap_or_default()
    }

    pub fn set_fulfillment(&self, fulfillment: FulfillmentType) -> StorageResult<()> {
        write_json(
            &self.storage,
            FULFILLMENT_KEY,
            fulfillment.as_str().to_ascii_lowercase().as_str(),
        )
    }

    // ========== Last order ==========

    pub fn last_order(&self) -> Option<OrderSnapshot> {
        read_json(&self.storage, LAST_ORDER_KEY)
    }

    pub fn save_last_order(&self, snapshot: &OrderSnapshot) -> StorageResult<()> {
        write_json(&self.storage, LAST_ORDER_KEY, snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use shared::cart::LineOptions;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    fn latte(size: &str, extras: &[&str]) -> LineItem {
        LineItem::new("latte", "Velvet Latte", 5.0, LineOptions::new(size, "", extras.iter().copied()))
    }

    fn store() -> CartStore<Arc<MemoryStorage>> {
        CartStore::load(Arc::new(MemoryStorage::new()))
    }

    fn stored_cart(store: &CartStore<Arc<MemoryStorage>>) -> serde_json::Value {
        let raw = store.storage().get(CART_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_add_merges_identical_options() {
        let mut cart = store();
        cart.add(latte("Large", &["Vanilla", "Caramel"])).unwrap();
        cart.add(latte("Large", &["Caramel", "Vanilla"]).with_quantity(2)).unwrap();
        cart.add(latte("Small", &[])).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.lines()[1].options.size, "Small");
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_add_zero_quantity_counts_as_one() {
        let mut cart = store();
        cart.add(latte("", &[]).with_quantity(0)).unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_add_recomputes_non_composite_id() {
        let mut cart = store();
        let mut item = latte("Large", &[]);
        item.line_id = "latte".into();
        cart.add(item).unwrap();
        assert_eq!(cart.lines()[0].line_id, "latte|Large");
    }

    #[test]
    fn test_add_rederives_stale_composite_id() {
        let mut cart = store();
        cart.add(latte("Large", &[])).unwrap();

        let mut edited = latte("Large", &[]);
        edited.options.size = "Small".into();
        assert_eq!(edited.line_id, "latte|Large");
        cart.add(edited).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.lines()[1].line_id, "latte|Small");
    }

    #[test]
    fn test_change_quantity() {
        let mut cart = store();
        cart.add(latte("Large", &[])).unwrap();
        cart.change_quantity("latte|Large", 2).unwrap();
        assert_eq!(cart.lines()[0].quantity, 3);
        cart.change_quantity("latte|Large", -1).unwrap();
        assert_eq!(cart.lines()[0].quantity, 2);
        cart.change_quantity("latte|Large", -5).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.state(), CartState::Empty);
    }

    #[test]
    fn test_unknown_line_is_noop_without_persist() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut cart = store().with_badge(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cart.change_quantity("ghost|default", 1).unwrap();
        cart.remove("ghost|default").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(cart.storage().get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_every_mutation_persists_and_notifies() {
        let last = Arc::new(AtomicU32::new(u32::MAX));
        let seen = Arc::clone(&last);
        let mut cart = store().with_badge(move |count| seen.store(count, Ordering::SeqCst));

        cart.add(latte("Large", &[]).with_quantity(2)).unwrap();
        assert_eq!(last.load(Ordering::SeqCst), 2);
        assert_eq!(stored_cart(&cart)[0]["qty"], 2);

        cart.add(latte("Small", &[])).unwrap();
        assert_eq!(last.load(Ordering::SeqCst), 3);

        cart.remove("latte|Small").unwrap();
        assert_eq!(last.load(Ordering::SeqCst), 2);
        assert_eq!(stored_cart(&cart).as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_last_unit_removed_empties_cart_and_badge_zero() {
        let last = Arc::new(AtomicU32::new(u32::MAX));
        let seen = Arc::clone(&last);
        let mut cart = store().with_badge(move |count| seen.store(count, Ordering::SeqCst));

        cart.add(latte("Large", &[])).unwrap();
        assert_eq!(cart.state(), CartState::NonEmpty);

        cart.change_quantity("latte|Large", -1).unwrap();
        assert_eq!(cart.state(), CartState::Empty);
        assert_eq!(last.load(Ordering::SeqCst), 0);
        assert_eq!(stored_cart(&cart), serde_json::json!([]));
    }

    #[test]
    fn test_quantity_never_non_positive() {
        let mut cart = store();
        let ops: [(&str, i64); 8] = [
            ("Large", 1),
            ("Small", -3),
            ("Large", -1),
            ("Large", 4),
            ("Small", 2),
            ("Large", -10),
            ("Small", -1),
            ("Small", 0),
        ];
        for (size, delta) in ops {
            cart.add(latte(size, &[])).unwrap();
            cart.change_quantity(&format!("latte|{size}"), delta).unwrap();
            assert!(cart.lines().iter().all(|l| l.quantity >= 1));
        }
    }

    #[test]
    fn test_load_migrates_legacy_cart() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(CART_KEY, r#"[{"id":"croissant","name":"Butter Croissant","price":"3.8","qty":2}]"#)
            .unwrap();

        let cart = CartStore::load(Arc::clone(&storage));
        assert_eq!(cart.lines()[0].line_id, "croissant|default");
        assert_eq!(cart.lines()[0].unit_price, 3.8);

        let rewritten: serde_json::Value =
            serde_json::from_str(&storage.get(CART_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(rewritten[0]["id"], "croissant|default");
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(CART_KEY, "{{{").unwrap();
        let cart = CartStore::load(storage);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_preferences() {
        let cart = store();
        assert_eq!(cart.fulfillment(), FulfillmentType::Pickup);
        assert_eq!(cart.notes(), "");

        cart.set_fulfillment(FulfillmentType::Delivery).unwrap();
        cart.set_notes("no sugar").unwrap();
        assert_eq!(cart.fulfillment(), FulfillmentType::Delivery);
        assert_eq!(cart.notes(), "no sugar");
        assert_eq!(
            cart.storage().get(FULFILLMENT_KEY).unwrap().as_deref(),
            Some("\"delivery\"")
        );

        cart.storage().set(FULFILLMENT_KEY, "42").unwrap();
        assert_eq!(cart.fulfillment(), FulfillmentType::Pickup);
    }

    #[test]
    fn test_last_order_round_trip() {
        let cart = store();
        assert!(cart.last_order().is_none());

        let snapshot = OrderSnapshot {
            order_id: "VB-12345".into(),
            ..Default::default()
        };
        cart.save_last_order(&snapshot).unwrap();
        assert_eq!(cart.last_order().unwrap().order_id, "VB-12345");

        cart.storage().set(LAST_ORDER_KEY, "[1,2]").unwrap();
        assert!(cart.last_order().is_none());
    }
}
