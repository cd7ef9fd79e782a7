//! Menu browsing: sections, name search and quick-add

use crate::ClientResult;
use crate::cart::CartStore;
use crate::error::StorageResult;
use crate::http::HttpClient;
use crate::storage::Storage;
use shared::cart::{LineItem, LineOptions};
use shared::models::{MenuItem, MenuSection};

/// Absolute image URL; paths are joined to the API base
pub fn resolve_image_url(base_url: &str, image: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        image.to_string()
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), image.trim_start_matches('/'))
    }
}

/// Product id derived from a display name: lowercase, whitespace runs to `-`
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Menu as loaded from the backend, with the API base for image links
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    base_url: String,
    items: Vec<MenuItem>,
}

impl MenuCatalog {
    pub fn new(base_url: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            base_url: base_url.into(),
            items,
        }
    }

    /// GET /api/menu
    pub async fn fetch(client: &HttpClient) -> ClientResult<Self> {
        let items = client.menu().await?;
        tracing::debug!(count = items.len(), "Menu loaded");
        Ok(Self::new(client.base_url(), items))
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items grouped by section in storefront order; empty sections omitted
    pub fn sections(&self) -> Vec<(MenuSection, Vec<&MenuItem>)> {
        MenuSection::ALL
            .iter()
            .map(|&section| {
                let items = self.items.iter().filter(|i| i.section() == section).collect::<Vec<_>>();
                (section, items)
            })
            .filter(|(_, items)| !items.is_empty())
            .collect()
    }

    /// Case-insensitive substring match on the name; an empty query matches all
    pub fn search(&self, query: &str) -> Vec<&MenuItem> {
        let query = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|i| i.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn image_url(&self, item: &MenuItem) -> Option<String> {
        match item.image.trim() {
            "" => None,
            image => Some(resolve_image_url(&self.base_url, image)),
        }
    }

    /// One unit of the item with default options
    pub fn to_line_item(&self, item: &MenuItem) -> LineItem {
        let line = LineItem::new(slugify(&item.name), item.name.clone(), item.price, LineOptions::default());
        match self.image_url(item) {
            Some(url) => line.with_image(url),
            None => line,
        }
    }

    pub fn quick_add<S: Storage>(&self, cart: &mut CartStore<S>, item: &MenuItem) -> StorageResult<()> {
        cart.add(self.to_line_item(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn item(id: &str, name: &str, category: &str, image: &str) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: name.into(),
            price: 4.5,
            category: category.into(),
            description: String::new(),
            image: image.into(),
        }
    }

    fn catalog() -> MenuCatalog {
        MenuCatalog::new(
            "http://localhost:5000/",
            vec![
                item("1", "Velvet  Latte", "Coffee", "/uploads/latte.png"),
                item("2", "Matcha Cloud", "Tea", "https://cdn.example.com/matcha.png"),
                item("3", "Mocha Frappe", "Ice Blended", ""),
                item("4", "Cortado", "Espresso", "uploads/cortado.png"),
            ],
        )
    }

    #[test]
    fn test_sections_in_order() {
        let catalog = catalog();
        let sections = catalog.sections();
        let keys: Vec<_> = sections.iter().map(|(s, _)| *s).collect();
        assert_eq!(keys, vec![MenuSection::Espresso, MenuSection::IceBlended, MenuSection::Teas]);
        assert_eq!(sections[0].1.len(), 2);
    }

    #[test]
    fn test_search_case_insensitive() {
        let catalog = catalog();
        let names: Vec<_> = catalog.search("MOCHA").iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Mocha Frappe"]);
        assert_eq!(catalog.search("").len(), 4);
        assert!(catalog.search("croissant").is_empty());
    }

    #[test]
    fn test_image_urls() {
        let catalog = catalog();
        let items = catalog.items();
        assert_eq!(catalog.image_url(&items[0]).as_deref(), Some("http://localhost:5000/uploads/latte.png"));
        assert_eq!(catalog.image_url(&items[1]).as_deref(), Some("https://cdn.example.com/matcha.png"));
        assert_eq!(catalog.image_url(&items[2]), None);
        assert_eq!(catalog.image_url(&items[3]).as_deref(), Some("http://localhost:5000/uploads/cortado.png"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Velvet  Latte"), "velvet-latte");
        assert_eq!(slugify(" Iced\tMocha "), "iced-mocha");
    }

    #[test]
    fn test_quick_add_merges_by_slug() {
        let catalog = catalog();
        let mut cart = CartStore::load(MemoryStorage::new());
        catalog.quick_add(&mut cart, &catalog.items()[0]).unwrap();
        catalog.quick_add(&mut cart, &catalog.items()[0]).unwrap();
        catalog.quick_add(&mut cart, &catalog.items()[2]).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].line_id, "velvet-latte|default");
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[1].image, None);
        assert_eq!(cart.lines()[1].image_or_default(), shared::cart::DEFAULT_ITEM_IMAGE);
    }
}
