//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod seller;

use secrecy::SecretString;

/// Load the database URL from `BAZAAR_DATABASE_URL`, falling back to the
/// generic `DATABASE_URL`.
pub(crate) fn database_url() -> Result<SecretString, &'static str> {
    dotenvy::dotenv().ok();

    std::env::var("BAZAAR_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "BAZAAR_DATABASE_URL not set")
}
