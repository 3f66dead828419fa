//! Core types, validation rules and traits for subzone.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - **Types**: nameserver entries and sets, owner records, provider DNS records
//! - **Validation**: label and nameserver host name rules
//! - **Provider**: the [`DnsProvider`] trait the registry talks to
//! - **Errors**: error handling with [`SubzoneError`]
//!
//! # Example
//!
//! ```rust
//! use subzone_core::validate::{is_acceptable_label, is_acceptable_nameserver};
//!
//! assert!(is_acceptable_label("valid-label"));
//! assert!(!is_acceptable_label("sub.example"));
//! assert!(is_acceptable_nameserver("ns1.example.com"));
//! ```

#![doc(html_root_url = "https://docs.rs/subzone-core/0.3.0")]

mod error;
pub mod provider;
pub mod types;
pub mod validate;

pub use error::{ErrorKind, Result, SubzoneError};
pub use provider::DnsProvider;
pub use types::*;
