//! Menu Item Repository

use super::{RepoError, RepoResult};
use shared::models::MenuItem;
use shared::util::now_millis;
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    price: f64,
    category: String,
    description: String,
    image: String,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            category: row.category,
            description: row.description,
            image: row.image,
        }
    }
}

/// New menu item, image already stored
#[derive(Debug, Clone)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub image: String,
}

/// Full replacement of the editable fields; `image: None` keeps the current one
#[derive(Debug, Clone)]
pub struct MenuItemUpdate {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub image: Option<String>,
}

const COLUMNS: &str = "id, name, price, category, description, image";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let rows = sqlx::query_as::<_, MenuItemRow>(&format!(
        "SELECT {COLUMNS} FROM menu_item ORDER BY created_at, rowid"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<MenuItem>> {
    let row = sqlx::query_as::<_, MenuItemRow>(&format!("SELECT {COLUMNS} FROM menu_item WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(MenuItem::from))
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    let id = uuid::Uuid::new_v4().simple().to_string();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO menu_item (id, name, price, category, description, image, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.category)
    .bind(&data.description)
    .bind(&data.image)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to read back created menu item".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    let result = sqlx::query(
        "UPDATE menu_item SET name = ?, price = ?, category = ?, description = ?, \
         image = COALESCE(?, image), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.category)
    .bind(&data.description)
    .bind(&data.image)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound("Menu item".into()));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound("Menu item".into()))
}

/// Returns false when no row matched
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM menu_item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
