//! Cloudflare DNS API client for subzone.
//!
//! This crate provides [`CloudflareClient`], a zone-scoped client for the
//! Cloudflare API v4, and implements [`subzone_core::DnsProvider`] for it.

#![doc(html_root_url = "https://docs.rs/subzone-cloudflare/0.3.0")]

mod client;
mod config;
mod provider;
pub mod api;

pub use client::{CloudflareClient, CloudflareClientBuilder};
pub use config::RateLimitConfig;
pub use subzone_core::{Result, SubzoneError};
