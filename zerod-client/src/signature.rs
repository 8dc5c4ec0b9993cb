//! Environment fingerprint signature and per-request key schedule.
//!
//! The `Signature` header is an HMAC-SHA256 digest keyed by a concatenation of
//! browser environment strings. The value is deterministic only for a given
//! environment: the server has to see (or recompute from) the same
//! properties, which makes the exact field list and order below part of the
//! protocol.
//!
//! Field order: `userAgent`, `language`, `platform`, `product`, `productSub`,
//! `vendor`, `vendorSub`, concatenated without separators.

use std::str::FromStr;
use std::sync::Arc;

use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::cipher::{CipherError, CipherResult, PayloadCipher, KEY_SIZE};

type HmacSha256 = Hmac<Sha256>;

/// Message authenticated by the fingerprint HMAC.
///
/// The deployed front end finalizes the HMAC without feeding any data, so
/// the constant message is empty.
pub const SIGNATURE_MESSAGE: &[u8] = b"";

/// HKDF context for the request encryption key under [`KeySchedule::Separated`].
pub const ENCRYPTION_KEY_CONTEXT: &[u8] = b"zerod-request-encryption-v1";

/// Snapshot of the browser properties that make up the signing key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowserEnvironment {
    /// `navigator.userAgent`
    pub user_agent: String,
    /// `navigator.language`
    pub language: String,
    /// `navigator.platform`
    pub platform: String,
    /// `navigator.product`
    pub product: String,
    /// `navigator.productSub`
    pub product_sub: String,
    /// `navigator.vendor`
    pub vendor: String,
    /// `navigator.vendorSub`
    pub vendor_sub: String,
}

impl BrowserEnvironment {
    /// Concatenate the fields in protocol order.
    pub fn key_material(&self) -> String {
        [
            self.user_agent.as_str(),
            self.language.as_str(),
            self.platform.as_str(),
            self.product.as_str(),
            self.product_sub.as_str(),
            self.vendor.as_str(),
            self.vendor_sub.as_str(),
        ]
        .concat()
    }
}

/// Source of live environment snapshots.
///
/// Called once per request; implementations must not cache on behalf of the
/// client.
pub trait EnvironmentProvider: Send + Sync {
    /// Capture the current environment.
    fn snapshot(&self) -> BrowserEnvironment;
}

/// Environment with fixed values, typically loaded from configuration.
#[derive(Clone, Debug, Default)]
pub struct StaticEnvironment(pub BrowserEnvironment);

impl EnvironmentProvider for StaticEnvironment {
    fn snapshot(&self) -> BrowserEnvironment {
        self.0.clone()
    }
}

/// Environment derived from the running process.
///
/// Mirrors what a browser would report: the crate acts as the user agent,
/// the language comes from `LANG`, the platform from the OS and
/// architecture.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostEnvironment;

impl EnvironmentProvider for HostEnvironment {
    fn snapshot(&self) -> BrowserEnvironment {
        BrowserEnvironment {
            user_agent: format!(
                "zerod-client/{} ({}; {})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
            language: language_tag(std::env::var("LANG").ok().as_deref()),
            platform: platform_name(std::env::consts::OS, std::env::consts::ARCH),
            product: "Gecko".to_string(),
            product_sub: "20030107".to_string(),
            vendor: String::new(),
            vendor_sub: String::new(),
        }
    }
}

/// Convert a POSIX locale (`fr_FR.UTF-8`) into a BCP 47 tag (`fr-FR`).
fn language_tag(lang: Option<&str>) -> String {
    let locale = lang
        .and_then(|l| l.split(['.', '@']).next())
        .filter(|l| !l.is_empty() && *l != "C" && *l != "POSIX");
    match locale {
        Some(l) => l.replace('_', "-"),
        None => "en-US".to_string(),
    }
}

fn platform_name(os: &str, arch: &str) -> String {
    match os {
        "macos" => "MacIntel".to_string(),
        "windows" => "Win32".to_string(),
        "linux" => format!("Linux {}", arch),
        other => format!("{} {}", other, arch),
    }
}

/// Compute the hex HMAC fingerprint for `env`.
pub fn create_signature(env: &BrowserEnvironment) -> String {
    let mut mac = HmacSha256::new_from_slice(env.key_material().as_bytes())
        .expect("HMAC accepts any key size");
    mac.update(SIGNATURE_MESSAGE);
    hex::encode(mac.finalize().into_bytes())
}

/// How the request encryption key is derived from the environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySchedule {
    /// AES key = HKDF-SHA256(environment key material, [`ENCRYPTION_KEY_CONTEXT`]).
    ///
    /// The `Signature` header no longer reveals the encryption key. The
    /// server must recompute the key material from the same environment
    /// properties.
    #[default]
    Separated,
    /// AES key = SHA-256(signature hex), as the deployed front end does.
    ///
    /// Anyone who reads the `Signature` header can decrypt the payload.
    Legacy,
}

impl KeySchedule {
    /// Name used in configuration and environment variables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Separated => "separated",
            Self::Legacy => "legacy",
        }
    }
}

impl FromStr for KeySchedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "separated" => Ok(Self::Separated),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!(
                "unknown key schedule '{}' (expected 'separated' or 'legacy')",
                other
            )),
        }
    }
}

impl std::fmt::Display for KeySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature header value and payload cipher for a single request.
#[derive(Debug)]
pub struct SigningMaterial {
    signature: String,
    cipher: PayloadCipher,
}

impl SigningMaterial {
    /// Derive the material for one request from an environment snapshot.
    pub fn derive(env: &BrowserEnvironment, schedule: KeySchedule) -> CipherResult<Self> {
        let signature = create_signature(env);
        let cipher = match schedule {
            KeySchedule::Legacy => PayloadCipher::from_secret(&signature),
            KeySchedule::Separated => {
                let hk = Hkdf::<Sha256>::new(None, env.key_material().as_bytes());
                let mut key = [0u8; KEY_SIZE];
                hk.expand(ENCRYPTION_KEY_CONTEXT, &mut key)
                    .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
                PayloadCipher::new(key)
            }
        };
        Ok(Self { signature, cipher })
    }

    /// Value for the `Signature` header.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Cipher for the request parameters and the response body.
    pub fn cipher(&self) -> &PayloadCipher {
        &self.cipher
    }
}

/// Produces signatures from a live environment source.
#[derive(Clone)]
pub struct SignatureGenerator {
    environment: Arc<dyn EnvironmentProvider>,
}

impl SignatureGenerator {
    /// Create a generator reading from `environment`.
    pub fn new(environment: Arc<dyn EnvironmentProvider>) -> Self {
        Self { environment }
    }

    /// Fingerprint of the current environment.
    pub fn create_signature(&self) -> String {
        create_signature(&self.environment.snapshot())
    }

    /// Fresh signing material for one request.
    pub fn signing_material(&self, schedule: KeySchedule) -> CipherResult<SigningMaterial> {
        SigningMaterial::derive(&self.environment.snapshot(), schedule)
    }
}

impl std::fmt::Debug for SignatureGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureGenerator").finish_non_exhaustive()
    }
}
