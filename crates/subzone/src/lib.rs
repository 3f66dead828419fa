//! Self-service NS delegation for subdomains of a Cloudflare-managed zone.
//!
//! Users claim one label below the service domain and point it at their own
//! nameservers. The registry keeps the zone's NS records in step with what
//! each owner asked for, touching as few records as possible.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use subzone::{CloudflareClient, JsonClaimStore, Registry, RegistryConfig};
//!
//! #[tokio::main]
//! async fn main() -> subzone::Result<()> {
//!     let client = CloudflareClient::new("api-token", "zone-id")?;
//!     let store = JsonClaimStore::open("claims.json").await?;
//!     let config = RegistryConfig {
//!         prefix: Some("dev".into()),
//!         ..Default::default()
//!     };
//!
//!     let registry = Registry::connect(Arc::new(client), Arc::new(store), &config).await?;
//!     let _refresher = registry.spawn_refresher();
//!
//!     if registry.check_availability("alice").await {
//!         registry.register("alice@example.com", "alice").await?;
//!     }
//!
//!     let outcome = registry
//!         .update_nameservers(
//!             "alice@example.com",
//!             &["ns1.example.net".into(), "ns2.example.net".into()],
//!         )
//!         .await?;
//!     println!("delegated to {:?}", outcome.set.values());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/subzone/0.3.0")]

// Re-export core types
pub use subzone_core::*;

// Re-export the Cloudflare client
pub use subzone_cloudflare::{CloudflareClient, CloudflareClientBuilder, RateLimitConfig};

// Re-export the registry
pub use subzone_registry::{
    Availability, AvailabilityChecker, ClaimStore, JsonClaimStore, MemoryClaimStore, Operation,
    ReconcileFailure, ReconcileOutcome, ReconcileReport, Reconciler, RecordCache, RecordSnapshot,
    Registry, RegistryConfig, ReleaseReport, ServiceDomain,
};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
