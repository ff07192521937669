//! Process-wide HTTP client.

use once_cell::sync::Lazy;
use reqwest::Client;

static SHARED_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("notebook/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("[HTTP] Falling back to default client: {}", e);
            Client::new()
        })
});

/// Shared connection pool for the GraphQL and identity clients
pub fn shared_client() -> &'static Client {
    &SHARED_CLIENT
}
