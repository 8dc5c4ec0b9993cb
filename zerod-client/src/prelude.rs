//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use zerod_client::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Client: `ApiClient`, `ApiClientBuilder`, `ApiResponse`, `Params`
//! - Error types: `ZerodError`, `ZerodErrorCode`, `Result`
//! - Configuration and signing: `ClientConfig`, `KeySchedule`, environment providers
//! - Storage and transport traits with their default implementations

// Client
pub use crate::client::{ApiClient, ApiClientBuilder, ApiResponse, Params};

// Error handling
pub use crate::errors::{ZerodError, ZerodErrorCode};
pub use crate::Result;

// Configuration
pub use crate::config::ClientConfig;

// Signing
pub use crate::signature::{
    BrowserEnvironment, EnvironmentProvider, HostEnvironment, KeySchedule, StaticEnvironment,
};

// Session
pub use crate::session::SessionCredential;

// Storage
pub use crate::storage::{FileStorage, InMemoryStorage, KeyValueStorage};

// Transport
pub use crate::transport::{HttpMethod, HttpTransport, ReqwestTransport};

// Events
pub use crate::events::EventBus;
