//! Integration tests for the Level-Up Gaming API.
//!
//! Every test file boots the whole API in-process: a freshly seeded store,
//! the real router, and a TCP listener on an ephemeral port. Tests then talk
//! to it over HTTP with `reqwest`, exactly like the storefront and the admin
//! panel do. No external services are required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p levelup-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `users` - Login, registration, admin account management
//! - `loyalty` - Point bonuses, adjustments, ledger history
//! - `orders` - Checkout, quotes, the fulfillment state machine
//! - `rewards` - Catalog management and redemption
//! - `content` - Products, events, blog posts, videos

use std::net::Ipv4Addr;

use secrecy::SecretString;

use levelup_api::config::ApiConfig;
use levelup_api::db::{Db, seed};
use levelup_api::routes;
use levelup_api::state::AppState;

/// Email of the primary admin seeded into every test server.
pub const ADMIN_EMAIL: &str = "admin@levelup.com";

/// Password of the seeded primary admin.
pub const ADMIN_PASSWORD: &str = "admin123";

/// A running API instance bound to an ephemeral port.
///
/// Each instance owns a fresh store, so tests never observe each other's
/// data. The server task is detached and dies with the test runtime.
pub struct TestServer {
    base_url: String,
    client: reqwest::Client,
}

impl TestServer {
    /// Boot a seeded API server and return a handle to it.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind or the store cannot be seeded.
    pub async fn spawn() -> Self {
        let config = ApiConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            admin_email: ADMIN_EMAIL.to_owned(),
            admin_password: SecretString::from(ADMIN_PASSWORD),
            cors_allow_origin: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let db = Db::new();
        seed::install(&db, &config.admin_email, &config.admin_password)
            .expect("Failed to seed the store");

        let app = routes::routes().with_state(AppState::new(config, db));
        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind test listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read listener address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
        }
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The HTTP client for this server.
    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }
}
