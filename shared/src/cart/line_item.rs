//! Cart line item and its identity key

use super::options::LineOptions;
use serde::{Deserialize, Serialize};

/// Separator between product id and options in a line id
pub const LINE_ID_SEPARATOR: char = '|';

/// Product id used in line ids when the product reference is missing
const UNKNOWN_PRODUCT: &str = "unknown";

/// Image shown for lines without one
pub const DEFAULT_ITEM_IMAGE: &str = "assets/images/items/beans.png";

/// One distinct product + options entry in a cart.
///
/// Serialized in the storefront's persisted cart format
/// (`id`, `productId`, `name`, `price`, `qty`, `image`, `options`, `optionsText`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(rename = "id")]
    pub line_id: String,
    pub product_id: String,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: f64,
    #[serde(rename = "qty")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub options: LineOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_text: Option<String>,
}

impl LineItem {
    /// Build a line with quantity 1 and its identity computed from the options
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: f64,
        options: LineOptions,
    ) -> Self {
        let product_id = product_id.into();
        let options = options.normalized();
        Self {
            line_id: compute_line_id(&product_id, &options, None),
            product_id,
            name: name.into(),
            unit_price,
            quantity: 1,
            image: None,
            options,
            options_text: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Attach a precomputed display text, which then names the line.
    pub fn with_options_text(mut self, text: impl Into<String>) -> Self {
        self.options_text = Some(text.into());
        self.line_id = compute_line_id(&self.product_id, &self.options, self.options_text.as_deref());
        self
    }

    pub fn image_or_default(&self) -> &str {
        self.image.as_deref().unwrap_or(DEFAULT_ITEM_IMAGE)
    }

    pub fn describe_options(&self, empty: EmptyLabel) -> String {
        describe_options(&self.options, self.options_text.as_deref(), empty)
    }
}

/// Whether a line id already has the composite `product|options` shape
pub fn is_composite_id(id: &str) -> bool {
    id.contains(LINE_ID_SEPARATOR)
}

/// Compute the identity of a line.
///
/// Non-blank `options_text` wins, which is how carts persisted before
/// structured options were stored carry their customization. Otherwise
/// the sorted options key is used.
pub fn compute_line_id(product_id: &str, options: &LineOptions, options_text: Option<&str>) -> String {
    let product_id = match product_id.trim() {
        "" => UNKNOWN_PRODUCT,
        pid => pid,
    };

    let key = match options_text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => text.to_string(),
        None => options.identity_key(),
    };

    format!("{product_id}{LINE_ID_SEPARATOR}{key}")
}

/// What to render when a line has no customization.
///
/// The cart drawer shows nothing, the checkout summary and the order
/// payload say "Standard".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyLabel {
    #[default]
    Blank,
    Standard,
}

impl EmptyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blank => "",
            Self::Standard => "Standard",
        }
    }
}

/// Display text of a line's options: non-blank `options_text` verbatim,
/// else size, milk and extras joined with `", "`.
pub fn describe_options(options: &LineOptions, options_text: Option<&str>, empty: EmptyLabel) -> String {
    if let Some(text) = options_text.filter(|t| !t.trim().is_empty()) {
        return text.to_string();
    }
    let text = options.display_text();
    if text.is_empty() {
        empty.as_str().to_string()
    } else {
        text
    }
}
