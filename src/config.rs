// src/config.rs

use anyhow::{Context, Result};
use std::env;

/// Connection settings for the hosted database. Both values are required;
/// the binaries refuse to start without them.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub db_key: String,
}

impl Config {
    /// Read `SUPABASE_URL` and `SUPABASE_KEY` from the environment, loading
    /// a local `.env` file first when one exists.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let db_url = env::var("SUPABASE_URL").context("SUPABASE_URL must be set")?;
        let db_key = env::var("SUPABASE_KEY").context("SUPABASE_KEY must be set")?;

        Ok(Config { db_url, db_key })
    }
}
