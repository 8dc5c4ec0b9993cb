//! Client-side persistent storage.
//!
//! The request client never touches a global store. It receives a
//! [`KeyValueStorage`] implementation and reads or writes the well-known
//! keys below through it.
//!
//! ## Usage
//!
//! ```rust
//! use zerod_client::storage::{InMemoryStorage, KeyValueStorage};
//!
//! let storage = InMemoryStorage::new();
//! storage.set("deviceId", "k3j2h4g5f6d7s8").unwrap();
//! assert_eq!(storage.get("deviceId").unwrap().as_deref(), Some("k3j2h4g5f6d7s8"));
//! ```

mod file;
mod memory;
mod traits;

pub use file::{FileStorage, DEFAULT_FILE_NAME};
pub use memory::InMemoryStorage;
pub use traits::{
    KeyValueStorage, KeyValueStorageExt, StorageError, StorageErrorCode, StorageResult,
};

/// Storage key holding the persisted device identifier.
pub const DEVICE_ID_KEY: &str = "deviceId";

/// Storage key holding the session access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key holding the session account id.
pub const ACCOUNT_ID_KEY: &str = "id";
