//! Subdomain claims and NS delegation on top of a [`DnsProvider`].
//!
//! The [`Registry`] ties together:
//!
//! - a [`RecordCache`] holding the last good snapshot of the provider's records
//! - an [`AvailabilityChecker`] deciding whether a label may be claimed
//! - a [`Reconciler`] turning a desired nameserver list into provider calls
//! - a [`ClaimStore`] persisting who owns which label
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use subzone_registry::{MemoryClaimStore, Registry, RegistryConfig};
//! # async fn run(provider: Arc<dyn subzone_core::DnsProvider>) -> subzone_core::Result<()> {
//! let registry = Registry::connect(
//!     provider,
//!     Arc::new(MemoryClaimStore::new()),
//!     &RegistryConfig::default(),
//! )
//! .await?;
//! let _refresher = registry.spawn_refresher();
//!
//! registry.register("alice@example.com", "alice").await?;
//! registry
//!     .update_nameservers("alice@example.com", &["ns1.example.net".to_string()])
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`DnsProvider`]: subzone_core::DnsProvider

#![doc(html_root_url = "https://docs.rs/subzone-registry/0.3.0")]

pub mod availability;
pub mod cache;
pub mod config;
pub mod domain;
pub mod reconcile;
pub mod service;
pub mod store;

#[cfg(test)]
mod testing;

pub use availability::{Availability, AvailabilityChecker};
pub use cache::{RecordCache, RecordSnapshot};
pub use config::RegistryConfig;
pub use domain::ServiceDomain;
pub use reconcile::{Operation, ReconcileFailure, ReconcileOutcome, ReconcileReport, Reconciler};
pub use service::{Registry, ReleaseReport};
pub use store::{ClaimStore, JsonClaimStore, MemoryClaimStore};
