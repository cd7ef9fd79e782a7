//! Seed an admin account
//!
//! ```text
//! ADMIN_EMAIL=owner@velvetbrew.com ADMIN_PASSWORD=secret cargo run --bin create-admin
//! ```
//!
//! Does nothing when the account already exists.

use anyhow::{Context, Result};
use brew_server::auth::password::hash_password;
use brew_server::db::DbService;
use brew_server::db::repository::admin;
use brew_server::init_logger;

const DEFAULT_EMAIL: &str = "admin@velvetbrew.com";
const DEFAULT_PASSWORD: &str = "Admin123";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logger();

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:velvet_brew.db".into());
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_EMAIL.into());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_PASSWORD.into());

    let db = DbService::new(&database_url).await.context("Failed to open database")?;

    if admin::find_by_email(&db.pool, &email).await?.is_some() {
        println!("Admin {email} already exists, nothing to do");
        return Ok(());
    }

    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;
    let created = admin::create(&db.pool, &email, &hash).await?;
    println!("Admin {} created ({})", created.email, created.id);
    Ok(())
}
