//! Signed and encrypted request client.
//!
//! Each call to [`ApiClient::send`] is independent: it resolves the device
//! identifier, derives fresh signing material from a live environment
//! snapshot, encrypts the parameters and performs exactly one round trip.
//! There is no retry, deduplication or caching.
//!
//! Failure handling follows two rules:
//!
//! - Transport failures, non-2xx statuses and storage failures resolve with
//!   [`ApiResponse::generic_error`]; they never surface as `Err`.
//! - A 2xx response that cannot be decrypted or parsed is a protocol
//!   mismatch or tampering, and is returned as `Err`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::config::ClientConfig;
use crate::device::DeviceIdProvider;
use crate::events::EventBus;
use crate::session::SessionCredential;
use crate::signature::{EnvironmentProvider, HostEnvironment, SignatureGenerator, SigningMaterial};
use crate::storage::{InMemoryStorage, KeyValueStorage, DEVICE_ID_KEY};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport};
use crate::{Result, ZerodError};

/// Ordered request parameters.
pub type Params = Map<String, Value>;

/// Message of the payload returned for any recovered failure.
pub const GENERIC_ERROR_MESSAGE: &str = "request failed";

/// Body field carrying the encrypted parameters.
pub const ENCRYPTED_PARAMS_FIELD: &str = "encryptedParams";

/// Decrypted response body.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse(Value);

impl ApiResponse {
    /// Wrap a decrypted body, copying a truthy `error` into a falsy `message`.
    pub fn from_value(mut value: Value) -> Self {
        normalize_message(&mut value);
        Self(value)
    }

    /// `{"status":"error","message":"request failed"}`.
    pub fn generic_error() -> Self {
        Self(json!({
            "status": "error",
            "message": GENERIC_ERROR_MESSAGE,
        }))
    }

    /// The `status` field, if it is a string.
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    /// The `message` field, if it is a string.
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    /// Whether `status` is `"error"`.
    pub fn is_error(&self) -> bool {
        self.status() == Some("error")
    }

    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow the whole body.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the whole body.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Deserialize the body into a typed response.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.0)?)
    }
}

/// JavaScript truthiness for JSON values.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn normalize_message(value: &mut Value) {
    let Some(object) = value.as_object_mut() else {
        return;
    };
    let message_missing = !object.get("message").is_some_and(is_truthy);
    if message_missing {
        if let Some(error) = object.get("error").filter(|e| is_truthy(e)).cloned() {
            object.insert("message".to_string(), error);
        }
    }
}

/// Query string for body-less verbs: caller parameters in insertion order,
/// then `encryptedParams` and `deviceId`. A caller key with one of those
/// names keeps its position but takes the client's value. Values are not
/// URL-encoded.
pub fn build_query(params: &Params, encrypted: &str, device_id: &str) -> String {
    let mut fields = params.clone();
    fields.insert(ENCRYPTED_PARAMS_FIELD.to_string(), Value::from(encrypted));
    fields.insert(DEVICE_ID_KEY.to_string(), Value::from(device_id));

    fields
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{}={}", key, s),
            other => format!("{}={}", key, other),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Client for the zerod API.
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    storage: Arc<dyn KeyValueStorage>,
    devices: DeviceIdProvider,
    signer: SignatureGenerator,
    events: Option<Arc<EventBus>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Start building a client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Event bus the client publishes to, if any.
    pub fn events(&self) -> Option<&Arc<EventBus>> {
        self.events.as_ref()
    }

    /// Persisted device identifier, created on first use.
    pub fn device_id(&self) -> Result<String> {
        Ok(self.devices.device_id()?)
    }

    /// Forget the device identifier.
    pub fn reset_device_id(&self) -> Result<()> {
        Ok(self.devices.reset()?)
    }

    /// Current `Signature` header value.
    pub fn signature(&self) -> String {
        self.signer.create_signature()
    }

    /// Stored session credential, if complete.
    pub fn credential(&self) -> Result<Option<SessionCredential>> {
        Ok(SessionCredential::load(self.storage.as_ref())?)
    }

    /// Persist a session credential for later requests.
    pub fn store_credential(&self, credential: &SessionCredential) -> Result<()> {
        Ok(credential.store(self.storage.as_ref())?)
    }

    /// Remove the stored session credential.
    pub fn clear_credential(&self) -> Result<()> {
        Ok(SessionCredential::clear(self.storage.as_ref())?)
    }

    /// Send `params` to `event` with `POST`.
    pub async fn post(&self, event: &str, params: Params) -> Result<ApiResponse> {
        self.send(event, params, HttpMethod::Post).await
    }

    /// Encrypt `params`, send them to `event` and decrypt the answer.
    ///
    /// Only a 2xx response that fails to decrypt or parse produces `Err`.
    pub async fn send(&self, event: &str, params: Params, method: HttpMethod) -> Result<ApiResponse> {
        let (request, material) = match self.prepare(event, params, method) {
            Ok(prepared) => prepared,
            Err(err) if err.is_recoverable() => return Ok(self.recover(event, &err)),
            Err(err) => return Err(err),
        };

        tracing::debug!(event, method = %method, url = %request.url, "sending request");
        self.emit(
            "request",
            event,
            &json!({ "method": method.as_str(), "url": request.url }),
        );

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => return Ok(self.recover(event, &err)),
        };

        if !response.is_success() {
            let err = ZerodError::HttpStatus {
                status: response.status,
                body: response.body,
            };
            return Ok(self.recover(event, &err));
        }

        let decoded = material
            .cipher()
            .decrypt_to_string(response.body.trim())
            .map_err(ZerodError::from)
            .and_then(|plain| Ok(serde_json::from_str::<Value>(&plain)?));
        let value = match decoded {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(event, error = %err, "failed to decode response");
                return Err(err);
            }
        };

        let response = ApiResponse::from_value(value);
        if self.config.dev_mode {
            tracing::debug!(event, body = %response.as_value(), "decrypted response");
        }
        self.emit("response", event, response.as_value());
        Ok(response)
    }

    fn prepare(
        &self,
        event: &str,
        params: Params,
        method: HttpMethod,
    ) -> Result<(HttpRequest, SigningMaterial)> {
        let device_id = self.devices.device_id()?;
        let material = self.signer.signing_material(self.config.key_schedule)?;

        let mut envelope = params.clone();
        envelope.insert(DEVICE_ID_KEY.to_string(), Value::from(device_id.as_str()));
        let plaintext = serde_json::to_string(&envelope)?;
        let encrypted = material.cipher().encrypt(plaintext.as_bytes());

        let url = self.config.endpoint_url(event);
        let mut request = if method.has_body() {
            let body = json!({
                ENCRYPTED_PARAMS_FIELD: encrypted,
                DEVICE_ID_KEY: device_id,
            });
            HttpRequest::new(method, url).with_body(body.to_string())
        } else {
            let query = build_query(&params, &encrypted, &device_id);
            HttpRequest::new(method, format!("{}?{}", url, query))
        };

        request = request
            .with_header("Content-Type", "application/json")
            .with_header("Signature", material.signature());

        if !self.config.is_login_event(event) {
            if let Some(credential) = SessionCredential::load(self.storage.as_ref())? {
                request = request.with_header("Authorization", credential.bearer(&device_id));
            }
        }

        Ok((request, material))
    }

    fn recover(&self, event: &str, err: &ZerodError) -> ApiResponse {
        tracing::warn!(event, code = ?err.code(), error = %err, "request failed");
        if self.config.dev_mode {
            if let ZerodError::HttpStatus { body, .. } = err {
                tracing::debug!(event, body = %body, "failure response body");
            }
        }

        let response = ApiResponse::generic_error();
        self.emit("error", event, response.as_value());
        response
    }

    fn emit(&self, kind: &str, event: &str, payload: &Value) {
        if let Some(bus) = &self.events {
            bus.emit(&format!("{}.{}", kind, event), payload);
        }
    }
}

/// Builder for [`ApiClient`].
///
/// Unset parts default to [`ClientConfig::default`], a [`ReqwestTransport`]
/// honoring the configured timeout, an [`InMemoryStorage`] and the
/// [`HostEnvironment`].
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ClientConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    storage: Option<Arc<dyn KeyValueStorage>>,
    environment: Option<Arc<dyn EnvironmentProvider>>,
    events: Option<Arc<EventBus>>,
}

impl ApiClientBuilder {
    /// Use `config`.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Persist device id and credentials in `storage`.
    pub fn storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Read the signing environment from `environment`.
    pub fn environment(mut self, environment: Arc<dyn EnvironmentProvider>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Publish request lifecycle events to `events`.
    pub fn events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Validate the configuration and assemble the client.
    pub fn build(self) -> Result<ApiClient> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.timeout_secs)?),
        };
        let storage: Arc<dyn KeyValueStorage> = self
            .storage
            .unwrap_or_else(|| Arc::new(InMemoryStorage::new()));
        let environment: Arc<dyn EnvironmentProvider> = self
            .environment
            .unwrap_or_else(|| Arc::new(HostEnvironment));

        Ok(ApiClient {
            devices: DeviceIdProvider::new(storage.clone()),
            signer: SignatureGenerator::new(environment),
            config,
            transport,
            storage,
            events: self.events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::PayloadCipher;
    use crate::signature::{BrowserEnvironment, KeySchedule, StaticEnvironment};
    use crate::storage::{StorageError, StorageErrorCode, StorageResult};
    use crate::test_utils::MockTransport;
    use crate::transport::HttpResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn environment() -> BrowserEnvironment {
        BrowserEnvironment {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0".into(),
            language: "fr-FR".into(),
            platform: "Linux x86_64".into(),
            product: "Gecko".into(),
            product_sub: "20100101".into(),
            vendor: String::new(),
            vendor_sub: String::new(),
        }
    }

    fn material(schedule: KeySchedule) -> SigningMaterial {
        SigningMaterial::derive(&environment(), schedule).unwrap()
    }

    fn encrypted_reply(body: Value) -> HttpResponse {
        let ciphertext = material(KeySchedule::Separated)
            .cipher()
            .encrypt(body.to_string().as_bytes());
        HttpResponse::new(200, ciphertext)
    }

    struct Harness {
        client: ApiClient,
        transport: Arc<MockTransport>,
        storage: Arc<InMemoryStorage>,
    }

    fn harness_with(config: ClientConfig) -> Harness {
        let transport = Arc::new(MockTransport::new());
        let storage = Arc::new(InMemoryStorage::new());
        let client = ApiClient::builder()
            .config(config)
            .transport(transport.clone())
            .storage(storage.clone())
            .environment(Arc::new(StaticEnvironment(environment())))
            .build()
            .unwrap();
        Harness {
            client,
            transport,
            storage,
        }
    }

    fn harness() -> Harness {
        harness_with(ClientConfig::new("https://api.test/api/"))
    }

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    fn decrypt_body(request: &HttpRequest, schedule: KeySchedule) -> Value {
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        let plain = material(schedule)
            .cipher()
            .decrypt_to_string(body["encryptedParams"].as_str().unwrap())
            .unwrap();
        serde_json::from_str(&plain).unwrap()
    }

    #[tokio::test]
    async fn test_post_encrypts_params_into_body() {
        let h = harness();
        h.transport.push_response(encrypted_reply(json!({"status": "ok"})));

        let response = h
            .client
            .post("profile", params(json!({"a": 1, "b": "two"})))
            .await
            .unwrap();
        assert_eq!(response.status(), Some("ok"));

        let requests = h.transport.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://api.test/api/profile");
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.header("Signature"),
            Some(material(KeySchedule::Separated).signature())
        );

        let device_id = h.client.device_id().unwrap();
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["deviceId"], device_id.as_str());
        assert!(body.get("a").is_none());

        let params = decrypt_body(request, KeySchedule::Separated);
        assert_eq!(params, json!({"a": 1, "b": "two", "deviceId": device_id}));
    }

    #[tokio::test]
    async fn test_get_puts_params_in_query_in_insertion_order() {
        let h = harness();
        h.transport.push_response(encrypted_reply(json!({})));

        h.client
            .send("quests", params(json!({"a": 1, "b": 2})), HttpMethod::Get)
            .await
            .unwrap();

        let request = &h.transport.requests()[0];
        assert!(request.body.is_none());
        let (path, query) = request.url.split_once('?').unwrap();
        assert_eq!(path, "https://api.test/api/quests");
        assert!(query.starts_with("a=1&b=2&encryptedParams="));
        let device_id = h.client.device_id().unwrap();
        assert!(query.ends_with(&format!("&deviceId={}", device_id)));
    }

    #[tokio::test]
    async fn test_put_uses_body_and_delete_uses_query() {
        let h = harness();
        h.transport.push_response(encrypted_reply(json!({})));
        h.transport.push_response(encrypted_reply(json!({})));

        h.client
            .send("item", params(json!({"x": true})), HttpMethod::Put)
            .await
            .unwrap();
        h.client
            .send("item", params(json!({"x": true})), HttpMethod::Delete)
            .await
            .unwrap();

        let requests = h.transport.requests();
        assert!(requests[0].body.is_some());
        assert!(!requests[0].url.contains('?'));
        assert!(requests[1].body.is_none());
        assert!(requests[1].url.contains("?x=true&encryptedParams="));
    }

    #[tokio::test]
    async fn test_login_never_sends_authorization() {
        let h = harness();
        h.client
            .store_credential(&SessionCredential::new("tok", "42"))
            .unwrap();
        h.transport.push_response(encrypted_reply(json!({})));
        h.transport.push_response(encrypted_reply(json!({})));

        h.client.post("login", Params::new()).await.unwrap();
        h.client.post("profile", Params::new()).await.unwrap();

        let requests = h.transport.requests();
        assert_eq!(requests[0].header("Authorization"), None);

        let device_id = h.client.device_id().unwrap();
        assert_eq!(
            requests[1].header("Authorization"),
            Some(format!("Bearer tok:42:{}", device_id).as_str())
        );
    }

    #[tokio::test]
    async fn test_no_authorization_without_credential() {
        let h = harness();
        h.transport.push_response(encrypted_reply(json!({})));

        h.client.post("profile", Params::new()).await.unwrap();

        assert_eq!(h.transport.requests()[0].header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_custom_login_event() {
        let h = harness_with(ClientConfig::new("https://api.test/api/").with_login_event("auth"));
        h.client
            .store_credential(&SessionCredential::new("tok", "42"))
            .unwrap();
        h.transport.push_response(encrypted_reply(json!({})));
        h.transport.push_response(encrypted_reply(json!({})));

        h.client.post("auth", Params::new()).await.unwrap();
        h.client.post("login", Params::new()).await.unwrap();

        let requests = h.transport.requests();
        assert_eq!(requests[0].header("Authorization"), None);
        assert!(requests[1].header("Authorization").is_some());
    }

    #[tokio::test]
    async fn test_server_error_resolves_with_generic_error() {
        let h = harness();
        h.transport
            .push_response(HttpResponse::new(500, "Internal Server Error"));

        let response = h.client.post("profile", Params::new()).await.unwrap();

        assert_eq!(response, ApiResponse::generic_error());
        assert!(response.is_error());
        assert_eq!(response.message(), Some(GENERIC_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_transport_failure_resolves_with_generic_error() {
        let h = harness();
        h.transport.push_error("connection refused");

        let response = h.client.post("profile", Params::new()).await.unwrap();
        assert_eq!(response, ApiResponse::generic_error());
    }

    #[tokio::test]
    async fn test_undecryptable_success_propagates() {
        let h = harness();
        h.transport.push_response(HttpResponse::new(200, "not-encrypted"));

        let err = h.client.post("profile", Params::new()).await.unwrap_err();
        assert!(matches!(err, ZerodError::Cipher(_)));
    }

    #[tokio::test]
    async fn test_non_json_success_propagates() {
        let h = harness();
        let ciphertext = material(KeySchedule::Separated).cipher().encrypt(b"<html>");
        h.transport.push_response(HttpResponse::new(200, ciphertext));

        let err = h.client.post("profile", Params::new()).await.unwrap_err();
        assert!(matches!(err, ZerodError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_response_body_whitespace_is_ignored() {
        let h = harness();
        let reply = encrypted_reply(json!({"status": "ok"}));
        h.transport
            .push_response(HttpResponse::new(200, format!("  {}\n", reply.body)));

        let response = h.client.post("profile", Params::new()).await.unwrap();
        assert_eq!(response.status(), Some("ok"));
    }

    #[tokio::test]
    async fn test_legacy_schedule_is_readable_with_signature_hash() {
        let h = harness_with(
            ClientConfig::new("https://api.test/api/").with_key_schedule(KeySchedule::Legacy),
        );
        let reply = material(KeySchedule::Legacy).cipher().encrypt(br#"{"ok":1}"#);
        h.transport.push_response(HttpResponse::new(200, reply));

        let response = h
            .client
            .post("profile", params(json!({"k": "v"})))
            .await
            .unwrap();
        assert_eq!(response.get("ok"), Some(&json!(1)));

        let request = &h.transport.requests()[0];
        let signature = request.header("Signature").unwrap();
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        let plain = PayloadCipher::from_secret(signature)
            .decrypt_to_string(body["encryptedParams"].as_str().unwrap())
            .unwrap();
        assert!(plain.starts_with(r#"{"k":"v","deviceId":"#));
    }

    #[tokio::test]
    async fn test_device_id_is_reused_across_requests() {
        let h = harness();
        h.transport.push_response(encrypted_reply(json!({})));
        h.transport.push_response(encrypted_reply(json!({})));

        h.client.post("a", Params::new()).await.unwrap();
        h.client.post("b", Params::new()).await.unwrap();

        let stored = h.storage.get(DEVICE_ID_KEY).unwrap().unwrap();
        for request in h.transport.requests() {
            let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
            assert_eq!(body["deviceId"], stored.as_str());
        }
    }

    #[tokio::test]
    async fn test_events_are_published() {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.on("**", move |name, _| sink.lock().unwrap().push(name.to_string()));

        let transport = Arc::new(MockTransport::new());
        transport.push_response(encrypted_reply(json!({"status": "ok"})));
        transport.push_response(HttpResponse::new(503, ""));
        let client = ApiClient::builder()
            .config(ClientConfig::new("https://api.test/api/"))
            .transport(transport)
            .environment(Arc::new(StaticEnvironment(environment())))
            .events(bus)
            .build()
            .unwrap();

        client.post("profile", Params::new()).await.unwrap();
        client.post("quests", Params::new()).await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "request.profile",
                "response.profile",
                "request.quests",
                "error.quests"
            ]
        );
    }

    struct BrokenStorage(AtomicUsize);

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::with_key(
                StorageErrorCode::ReadFailed,
                "disk unplugged",
                key,
            ))
        }
        fn set(&self, key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::with_key(
                StorageErrorCode::WriteFailed,
                "disk unplugged",
                key,
            ))
        }
        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
        fn clear(&self) -> StorageResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_storage_failure_resolves_without_sending() {
        let transport = Arc::new(MockTransport::new());
        let storage = Arc::new(BrokenStorage(AtomicUsize::new(0)));
        let client = ApiClient::builder()
            .config(ClientConfig::new("https://api.test/api/"))
            .transport(transport.clone())
            .storage(storage.clone())
            .environment(Arc::new(StaticEnvironment(environment())))
            .build()
            .unwrap();

        let response = client.post("profile", Params::new()).await.unwrap();

        assert_eq!(response, ApiResponse::generic_error());
        assert!(transport.requests().is_empty());
        assert_eq!(storage.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let err = ApiClient::builder()
            .config(ClientConfig::new("not a url"))
            .transport(Arc::new(MockTransport::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ZerodError::InvalidConfig { .. }));
    }

    #[test]
    fn test_message_normalization() {
        let response = ApiResponse::from_value(json!({"error": "bad token"}));
        assert_eq!(response.message(), Some("bad token"));

        let response = ApiResponse::from_value(json!({"message": "", "error": "bad token"}));
        assert_eq!(response.message(), Some("bad token"));

        let response = ApiResponse::from_value(json!({"message": "ok", "error": "ignored"}));
        assert_eq!(response.message(), Some("ok"));

        let response = ApiResponse::from_value(json!({"message": null, "error": ""}));
        assert_eq!(response.get("message"), Some(&Value::Null));

        let response = ApiResponse::from_value(json!({"status": "ok"}));
        assert_eq!(response.get("message"), None);

        let response = ApiResponse::from_value(json!([1, 2]));
        assert_eq!(response.as_value(), &json!([1, 2]));
    }

    #[test]
    fn test_build_query_values_are_raw() {
        let query = build_query(
            &params(json!({"q": "a b&c", "n": 1.5, "f": false, "o": {"k": 1}})),
            "iv:ct",
            "dev",
        );
        assert_eq!(
            query,
            r#"q=a b&c&n=1.5&f=false&o={"k":1}&encryptedParams=iv:ct&deviceId=dev"#
        );
    }

    #[test]
    fn test_build_query_client_fields_win() {
        let query = build_query(&params(json!({"deviceId": "spoofed", "a": 1})), "iv:ct", "dev");
        assert_eq!(query, "deviceId=dev&a=1&encryptedParams=iv:ct");
    }

    #[test]
    fn test_typed_deserialize() {
        #[derive(serde::Deserialize)]
        struct Profile {
            name: String,
        }
        let response = ApiResponse::from_value(json!({"name": "Ada", "status": "ok"}));
        let profile: Profile = response.deserialize().unwrap();
        assert_eq!(profile.name, "Ada");
    }
}
