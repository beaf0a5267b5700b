// src/db/mod.rs

use std::env;
use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

/// Upper bound on any single report query. None of the reports should take
/// seconds, so anything past this is treated as the database being away.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("{name} must be set"))
}

pub async fn connect() -> anyhow::Result<Pool<Postgres>> {
    let server = required("DB_SERVER")?;
    let db_name = required("DB_NAME")?;
    let user = required("DB_USER")?;
    let password = required("DB_PASSWORD")?;

    let database_url = format!("postgres://{user}:{password}@{server}/{db_name}");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
        .context("failed to connect to the access-control database")?;

    println!("✅ Connected to PostgreSQL");
    Ok(pool)
}
