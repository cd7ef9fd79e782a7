//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Copy shown for items without a description
pub const DEFAULT_DESCRIPTION: &str = "Freshly crafted, Velvet Brew style.";

/// Menu item entity as served by `GET /api/menu`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Path under `/uploads` or an absolute URL
    #[serde(default)]
    pub image: String,
}

impl MenuItem {
    pub fn description_or_default(&self) -> &str {
        match self.description.trim() {
            "" => DEFAULT_DESCRIPTION,
            d => d,
        }
    }

    pub fn section(&self) -> MenuSection {
        MenuSection::from_category(&self.category)
    }
}

/// Storefront menu sections. Free-text categories are mapped by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuSection {
    Espresso,
    #[serde(rename = "iceblended")]
    IceBlended,
    Teas,
    Pastries,
    Beans,
}

impl MenuSection {
    pub const ALL: [MenuSection; 5] = [
        Self::Espresso,
        Self::IceBlended,
        Self::Teas,
        Self::Pastries,
        Self::Beans,
    ];

    /// Keyword match in priority order; anything unrecognised is espresso
    pub fn from_category(category: &str) -> Self {
        let c = category.to_lowercase();
        if ["espresso", "latte", "coffee"].iter().any(|k| c.contains(k)) {
            Self::Espresso
        } else if c.contains("ice") || c.contains("blend") {
            Self::IceBlended
        } else if c.contains("tea") {
            Self::Teas
        } else if c.contains("pastry") || c.contains("bakery") {
            Self::Pastries
        } else if c.contains("bean") {
            Self::Beans
        } else {
            Self::Espresso
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Espresso => "espresso",
            Self::IceBlended => "iceblended",
            Self::Teas => "teas",
            Self::Pastries => "pastries",
            Self::Beans => "beans",
        }
    }
}
