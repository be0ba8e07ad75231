//! Signed HTTP client for the MAAS API.
//!
//! [`MaasClient`] issues GET/POST/PUT/DELETE requests against a MAAS region
//! controller, signing each request with a [`Signer`] and returning the raw
//! response body. [`MaasObject`] is the entry point for walking the resource
//! tree from the API root.

#![deny(missing_docs)]

pub mod client;
pub mod object;
pub mod signer;

pub use client::{MaasClient, MaasClientBuilder, OPERATION_PARAM};
pub use maas_core::{Error, Params};
pub use object::{new_maas, MaasObject, RESOURCE_URI};
pub use signer::{AnonymousSigner, OAuthToken, PlainTextSigner, Signer, MAAS_REALM};

/// Convenient result alias that reuses the shared MAAS error type.
pub type Result<T> = maas_core::Result<T>;
