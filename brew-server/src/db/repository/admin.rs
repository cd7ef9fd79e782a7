//! Admin Repository

use super::{RepoError, RepoResult};
use shared::util::now_millis;
use sqlx::SqlitePool;

/// Admin account row. `password_hash` never leaves the server.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: i64,
}

/// Case-insensitive lookup
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>(
        "SELECT id, email, password_hash, created_at FROM admin WHERE email = ? LIMIT 1",
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;
    Ok(admin)
}

/// Create an admin from an already hashed password
pub async fn create(pool: &SqlitePool, email: &str, password_hash: &str) -> RepoResult<Admin> {
    let email = email.trim();
    if find_by_email(pool, email).await?.is_some() {
        return Err(RepoError::Duplicate(format!("Admin '{email}' already exists")));
    }

    let admin = Admin {
        id: uuid::Uuid::new_v4().simple().to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        created_at: now_millis(),
    };
    sqlx::query("INSERT INTO admin (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
        .bind(&admin.id)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(admin.created_at)
        .execute(pool)
        .await?;
    Ok(admin)
}
