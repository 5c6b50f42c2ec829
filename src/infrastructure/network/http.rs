// HTTP client utilities
use crate::domain::error::KrishiError;
use reqwest::Client;
use std::time::Duration;

/// Create the shared HTTP client.
///
/// No overall timeout is set here: AI calls are bounded by the resolver and
/// weather calls set their own per-request timeout.
pub fn create_client() -> Result<Client, KrishiError> {
    Ok(Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("krishi/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
