//! Device identifier provider.
//!
//! A device identifier is an opaque random string created the first time it
//! is requested and persisted under [`DEVICE_ID_KEY`]. Every later request
//! from the same profile reuses it. It is a fingerprint, not a credential:
//! uniqueness is only probabilistic.

use std::sync::Arc;

use rand::Rng;

use crate::storage::{KeyValueStorage, StorageResult, DEVICE_ID_KEY};

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of each of the two random halves of a device identifier.
pub const DEVICE_ID_HALF_LEN: usize = 13;

/// Resolves the persisted device identifier, creating it on first use.
#[derive(Clone)]
pub struct DeviceIdProvider {
    storage: Arc<dyn KeyValueStorage>,
}

impl DeviceIdProvider {
    /// Create a provider over `storage`.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Return the persisted device identifier, generating and storing a new
    /// one if none exists (an empty stored value counts as missing).
    ///
    /// Concurrent first calls agree on one identifier when the storage
    /// overrides [`KeyValueStorage::get_or_insert_with`].
    pub fn device_id(&self) -> StorageResult<String> {
        self.storage.get_or_insert_with(DEVICE_ID_KEY, &mut || {
            let device_id = generate_device_id();
            tracing::debug!(device_id = %device_id, "generated new device identifier");
            device_id
        })
    }

    /// Forget the persisted identifier so the next call generates a new one.
    pub fn reset(&self) -> StorageResult<()> {
        self.storage.remove(DEVICE_ID_KEY)
    }
}

impl std::fmt::Debug for DeviceIdProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceIdProvider").finish_non_exhaustive()
    }
}

/// Generate a fresh identifier from two independent random base-36 strings.
pub fn generate_device_id() -> String {
    let mut id = random_base36(DEVICE_ID_HALF_LEN);
    id.push_str(&random_base36(DEVICE_ID_HALF_LEN));
    id
}

fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36_ALPHABET[rng.gen_range(0..BASE36_ALPHABET.len())] as char)
        .collect()
}
