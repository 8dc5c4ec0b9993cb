//! Session credential persisted after authentication.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::storage::{
    KeyValueStorage, KeyValueStorageExt, StorageResult, ACCESS_TOKEN_KEY, ACCOUNT_ID_KEY,
};

/// Access token and account id pair stored client-side.
///
/// Both fields are zeroized when the value is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionCredential {
    /// Opaque access token issued by the login event.
    pub access_token: String,
    /// Account identifier the token belongs to.
    pub id: String,
}

impl SessionCredential {
    /// Create a credential.
    pub fn new(access_token: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            id: id.into(),
        }
    }

    /// `Authorization` header value binding the credential to a device.
    pub fn bearer(&self, device_id: &str) -> String {
        format!("Bearer {}:{}:{}", self.access_token, self.id, device_id)
    }

    /// Read the credential; both halves must be present and non-empty.
    pub fn load(storage: &dyn KeyValueStorage) -> StorageResult<Option<Self>> {
        let token = storage.get_non_empty(ACCESS_TOKEN_KEY)?;
        let id = storage.get_non_empty(ACCOUNT_ID_KEY)?;
        Ok(match (token, id) {
            (Some(access_token), Some(id)) => Some(Self { access_token, id }),
            _ => None,
        })
    }

    /// Persist the credential.
    pub fn store(&self, storage: &dyn KeyValueStorage) -> StorageResult<()> {
        storage.set(ACCESS_TOKEN_KEY, &self.access_token)?;
        storage.set(ACCOUNT_ID_KEY, &self.id)
    }

    /// Remove any persisted credential.
    pub fn clear(storage: &dyn KeyValueStorage) -> StorageResult<()> {
        storage.remove(ACCESS_TOKEN_KEY)?;
        storage.remove(ACCOUNT_ID_KEY)
    }
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredential")
            .field("access_token", &"<redacted>")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;

    #[test]
    fn test_bearer_format() {
        let credential = SessionCredential::new("tok", "42");
        assert_eq!(credential.bearer("dev"), "Bearer tok:42:dev");
    }

    #[test]
    fn test_store_load_clear() {
        let storage = InMemoryStorage::new();
        assert_eq!(SessionCredential::load(&storage).unwrap(), None);

        let credential = SessionCredential::new("tok", "42");
        credential.store(&storage).unwrap();
        assert_eq!(SessionCredential::load(&storage).unwrap(), Some(credential));

        SessionCredential::clear(&storage).unwrap();
        assert_eq!(SessionCredential::load(&storage).unwrap(), None);
    }

    #[test]
    fn test_partial_credential_is_absent() {
        let storage = InMemoryStorage::with_entries([(ACCESS_TOKEN_KEY, "tok")]);
        assert_eq!(SessionCredential::load(&storage).unwrap(), None);

        let storage = InMemoryStorage::with_entries([(ACCESS_TOKEN_KEY, "tok"), (ACCOUNT_ID_KEY, "")]);
        assert_eq!(SessionCredential::load(&storage).unwrap(), None);
    }

    #[test]
    fn test_zeroize_wipes_both_fields() {
        fn assert_zeroize_on_drop<T: ZeroizeOnDrop>() {}
        assert_zeroize_on_drop::<SessionCredential>();

        let mut credential = SessionCredential::new("secret-token", "42");
        credential.zeroize();
        assert!(credential.access_token.is_empty());
        assert!(credential.id.is_empty());
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = SessionCredential::new("secret-token", "42");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("42"));
    }
}
