//! # maas-core
//!
//! Core types and utilities for talking to a MAAS (Metal-as-a-Service) region
//! controller API.
//!
//! This crate provides the shared error type, client configuration, HTTP
//! transport settings and the request parameter map used by `maas-client`.
//!
//! ## Modules
//!
//! - [`error`] - Error kinds and conversions from transport/parse failures
//! - [`config`] - Serializable, validated client configuration
//! - [`http`] - HTTP transport settings (timeouts, user agent, compression)
//! - [`params`] - Multi-valued query/form parameter map

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod http;
pub mod params;

// Re-export commonly used types
pub use error::{Error, Result};
pub use params::Params;
