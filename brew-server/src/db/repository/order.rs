//! Order Repository
//!
//! Line items are kept as a JSON array in `orders.items`.

use super::{RepoError, RepoResult};
use shared::order::{FulfillmentType, Order, OrderItem, OrderPayload};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_id: String,
    customer_name: String,
    phone: String,
    #[sqlx(rename = "type")]
    fulfillment_type: String,
    address: String,
    branch: String,
    notes: String,
    status: String,
    subtotal: f64,
    tax: f64,
    delivery_fee: f64,
    total: f64,
    items: String,
    created_at: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepoError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let fulfillment_type = FulfillmentType::parse(&row.fulfillment_type)
            .ok_or_else(|| RepoError::Database(format!("Unknown order type: {}", row.fulfillment_type)))?;
        let items: Vec<OrderItem> = serde_json::from_str(&row.items)?;
        Ok(Self {
            id: row.id,
            payload: OrderPayload {
                order_id: row.order_id,
                customer_name: row.customer_name,
                phone: row.phone,
                fulfillment_type,
                address: row.address,
                branch: row.branch,
                notes: row.notes,
                status: row.status,
                subtotal: row.subtotal,
                tax: row.tax,
                delivery_fee: row.delivery_fee,
                total: row.total,
                items,
            },
            created_at: row.created_at,
        })
    }
}

const COLUMNS: &str = "id, order_id, customer_name, phone, type, address, branch, notes, status, \
                       subtotal, tax, delivery_fee, total, items, created_at";

/// Insert an order as sent by the client.
///
/// A second order with the same `orderId` (case-insensitive) fails with
/// [`RepoError::Duplicate`].
pub async fn create(pool: &SqlitePool, payload: &OrderPayload) -> RepoResult<Order> {
    let order = Order {
        id: uuid::Uuid::new_v4().simple().to_string(),
        payload: payload.clone(),
        created_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    };
    let items = serde_json::to_string(&order.payload.items)?;
    let p = &order.payload;

    sqlx::query(&format!(
        "INSERT INTO orders ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(&order.id)
    .bind(&p.order_id)
    .bind(&p.customer_name)
    .bind(&p.phone)
    .bind(p.fulfillment_type.as_str())
    .bind(&p.address)
    .bind(&p.branch)
    .bind(&p.notes)
    .bind(&p.status)
    .bind(p.subtotal)
    .bind(p.tax)
    .bind(p.delivery_fee)
    .bind(p.total)
    .bind(items)
    .bind(&order.created_at)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("Order {} already exists", p.order_id)),
        other => other,
    })?;

    Ok(order)
}

/// All orders, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {COLUMNS} FROM orders ORDER BY created_at DESC, rowid DESC"
    ))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Order::try_from).collect()
}

/// Lookup by client order id; the column collation makes this case-insensitive
pub async fn find_by_order_id(pool: &SqlitePool, order_id: &str) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!("SELECT {COLUMNS} FROM orders WHERE order_id = ?"))
        .bind(order_id.trim())
        .fetch_optional(pool)
        .await?;
    row.map(Order::try_from).transpose()
}
