//! Line-item model shared by the cart, checkout and receipt views

mod line_item;
mod normalize;
mod options;

pub use line_item::{
    DEFAULT_ITEM_IMAGE, EmptyLabel, LINE_ID_SEPARATOR, LineItem, compute_line_id, describe_options,
    is_composite_id,
};
pub use normalize::{MAX_QUANTITY, normalize_cart};
pub use options::{DEFAULT_OPTIONS_KEY, LineOptions};
