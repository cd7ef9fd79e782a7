//! Curated add-ons offered on the cart page

use crate::cart::CartStore;
use crate::error::StorageResult;
use crate::storage::Storage;
use shared::cart::{LineItem, LineOptions};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Upsell {
    pub id: &'static str,
    pub product_id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub image: &'static str,
    pub hint: &'static str,
}

pub const UPSELLS: [Upsell; 3] = [
    Upsell {
        id: "upsell-croissant",
        product_id: "butter-croissant",
        name: "Butter Croissant",
        price: 3.80,
        image: "assets/images/items/croissant.png",
        hint: "Flaky + warm",
    },
    Upsell {
        id: "upsell-vanilla",
        product_id: "vanilla-cream-blend",
        name: "Vanilla Cream Blend",
        price: 6.10,
        image: "assets/images/items/vanilla.png",
        hint: "Sweet + cold",
    },
    Upsell {
        id: "upsell-beans",
        product_id: "velvet-house-blend-250g",
        name: "Velvet House Blend (250g)",
        price: 12.50,
        image: "assets/images/items/beans.png",
        hint: "Take it home",
    },
];

pub fn find_upsell(id: &str) -> Option<&'static Upsell> {
    UPSELLS.iter().find(|u| u.id == id)
}

impl Upsell {
    /// Single unit with default options
    pub fn to_line_item(&self) -> LineItem {
        LineItem::new(self.product_id, self.name, self.price, LineOptions::default()).with_image(self.image)
    }
}

/// Add one unit of the upsell to the cart. Returns `false` for unknown ids.
pub fn add_upsell<S: Storage>(cart: &mut CartStore<S>, id: &str) -> StorageResult<bool> {
    let Some(upsell) = find_upsell(id) else {
        tracing::debug!(upsell_id = %id, "Ignoring unknown upsell");
        return Ok(false);
    };
    cart.add(upsell.to_line_item())?;
    Ok(true)
}
