//! Zerod API client library.
//!
//! Every request to the zerod API carries its parameters encrypted with
//! AES-256-CBC, a `Signature` header fingerprinting the calling environment,
//! the persisted device identifier and, outside of the login event, a bearer
//! credential binding the session to that device.
//!
//! # Features
//!
//! - **Request client**: [`ApiClient`] encrypts, signs, sends and decrypts
//! - **Injected state**: storage, transport and environment are traits
//! - **Key schedule**: the encryption key is separated from the signature
//!   by default; [`signature::KeySchedule::Legacy`] keeps the deployed wire
//!   behavior
//! - **Events**: optional wildcard [`events::EventBus`] for request lifecycle hooks
//!
//! # Environment contract
//!
//! The signature is derived from browser-style environment properties (see
//! [`signature::BrowserEnvironment`]). It is stable only for one
//! environment, so the server has to accept or recompute the same
//! properties. Clients that need a stable signature should configure a
//! [`signature::StaticEnvironment`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use zerod_client::prelude::*;
//!
//! let storage = Arc::new(FileStorage::in_dir("/var/lib/zerod"));
//! let client = ApiClient::builder()
//!     .config(ClientConfig::from_env()?)
//!     .storage(storage)
//!     .build()?;
//!
//! let mut params = Params::new();
//! params.insert("page".into(), 1.into());
//! let response = client.send("quests", params, HttpMethod::Get).await?;
//! if response.is_error() {
//!     eprintln!("{}", response.message().unwrap_or_default());
//! }
//! ```

pub mod cipher;
mod client;
pub mod config;
pub mod device;
pub mod errors;
pub mod events;
pub mod prelude;
pub mod session;
pub mod signature;
pub mod storage;
pub mod transport;

/// Test utilities for exercising the client without a network.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::{
    build_query, ApiClient, ApiClientBuilder, ApiResponse, Params, ENCRYPTED_PARAMS_FIELD,
    GENERIC_ERROR_MESSAGE,
};
pub use errors::{ZerodError, ZerodErrorCode};
pub use transport::HttpMethod;

/// Common result alias for zerod client operations.
pub type Result<T> = std::result::Result<T, ZerodError>;
