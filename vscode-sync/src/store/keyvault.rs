//! Azure Key Vault backend.
//!
//! Talks to the Key Vault REST API directly:
//!
//! - `PUT  https://{vault}.vault.azure.net/secrets/{name}?api-version=7.4`
//! - `GET  https://{vault}.vault.azure.net/secrets/{name}?api-version=7.4`
//!
//! Authentication uses a bearer token that the caller has already acquired
//! (for example with `az account get-access-token --resource
//! https://vault.azure.net`) and exported as `AZURE_KEYVAULT_TOKEN`.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use super::error::{StoreError, StoreResult};
use super::{validate_secret_name, SecretStore, SecretTags};

/// Key Vault REST API version used for all requests.
pub const KEYVAULT_API_VERSION: &str = "7.4";

/// Environment variable holding the Key Vault access token.
pub const TOKEN_ENV_VAR: &str = "AZURE_KEYVAULT_TOKEN";

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Trait for the HTTP calls the Key Vault backend makes.
///
/// This abstraction allows mock transports in tests.
pub trait HttpTransport: Send + Sync {
    /// GET `url` with a bearer token.
    fn get(&self, url: &str, bearer: &str) -> StoreResult<HttpResponse>;

    /// PUT a JSON `body` to `url` with a bearer token.
    fn put_json(&self, url: &str, bearer: &str, body: &str) -> StoreResult<HttpResponse>;
}

/// Real transport using a blocking reqwest client.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> StoreResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::ClientSetup(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    fn send(
        &self,
        url: &str,
        request: reqwest::blocking::RequestBuilder,
    ) -> StoreResult<HttpResponse> {
        let response = request.send().map_err(|e| self.request_error(url, e))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| self.request_error(url, e))?;
        Ok(HttpResponse { status, body })
    }

    fn request_error(&self, url: &str, e: reqwest::Error) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            StoreError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, bearer: &str) -> StoreResult<HttpResponse> {
        self.send(url, self.client.get(url).bearer_auth(bearer))
    }

    fn put_json(&self, url: &str, bearer: &str, body: &str) -> StoreResult<HttpResponse> {
        let request = self
            .client
            .put(url)
            .bearer_auth(bearer)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string());
        self.send(url, request)
    }
}

/// Secret returned by `GET /secrets/{name}`.
#[derive(Debug, Deserialize)]
struct SecretBundle {
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Secret store backed by an Azure Key Vault.
pub struct KeyVaultStore {
    vault_url: String,
    token: String,
    transport: Box<dyn HttpTransport>,
}

impl fmt::Debug for KeyVaultStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyVaultStore")
            .field("vault_url", &self.vault_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl KeyVaultStore {
    /// Base URL of the vault named `vault`.
    pub fn vault_url(vault: &str) -> String {
        format!("https://{}.vault.azure.net", vault)
    }

    /// Create a store for `vault` using `token` and a custom transport.
    pub fn new(
        vault: &str,
        token: impl Into<String>,
        transport: Box<dyn HttpTransport>,
    ) -> StoreResult<Self> {
        validate_secret_name(vault).map_err(|_| StoreError::InvalidName {
            name: vault.to_string(),
            reason: "vault names use letters, digits and dashes".to_string(),
        })?;
        Ok(Self {
            vault_url: Self::vault_url(vault),
            token: token.into(),
            transport,
        })
    }

    /// Create a store for `vault` with the token from [`TOKEN_ENV_VAR`].
    pub fn from_env(vault: &str, timeout: Duration) -> StoreResult<Self> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| StoreError::MissingCredential(TOKEN_ENV_VAR.to_string()))?;
        let transport = ReqwestTransport::with_timeout(timeout)?;
        Self::new(vault, token.trim(), Box::new(transport))
    }

    fn secret_url(&self, name: &str) -> String {
        format!(
            "{}/secrets/{}?api-version={}",
            self.vault_url, name, KEYVAULT_API_VERSION
        )
    }

    /// Map non-success statuses to errors.
    fn check(&self, name: &str, url: &str, response: HttpResponse) -> StoreResult<HttpResponse> {
        match response.status {
            200..=299 => Ok(response),
            401 | 403 => Err(StoreError::Auth {
                status: response.status,
                message: error_message(&response.body),
            }),
            404 => Err(StoreError::NotFound(name.to_string())),
            status => Err(StoreError::Http {
                url: url.to_string(),
                status,
                message: error_message(&response.body),
            }),
        }
    }
}

/// Extract the service's error message from a response body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.code.is_empty() => {
            format!("{}: {}", envelope.error.code, envelope.error.message)
        }
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "no details".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

impl SecretStore for KeyVaultStore {
    fn backend(&self) -> &'static str {
        "keyvault"
    }

    fn put(&self, name: &str, value: &str, tags: &SecretTags) -> StoreResult<()> {
        validate_secret_name(name)?;
        let url = self.secret_url(name);
        let body = json!({
            "value": value,
            "contentType": "application/json",
            "tags": tags,
        })
        .to_string();

        tracing::debug!(url = %url, bytes = value.len(), "Setting Key Vault secret");
        let response = self.transport.put_json(&url, &self.token, &body)?;
        self.check(name, &url, response)?;
        Ok(())
    }

    fn get(&self, name: &str) -> StoreResult<String> {
        validate_secret_name(name)?;
        let url = self.secret_url(name);

        tracing::debug!(url = %url, "Fetching Key Vault secret");
        let response = self.transport.get(&url, &self.token)?;
        let response = self.check(name, &url, response)?;

        let bundle: SecretBundle =
            serde_json::from_str(&response.body).map_err(|e| StoreError::Parse(e.to_string()))?;
        bundle
            .value
            .ok_or_else(|| StoreError::Parse(format!("secret '{}' has no value", name)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::store::group_tags;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// A recorded request: method, url, bearer token and body.
    pub type Recorded = (String, String, String, Option<String>);

    /// Mock transport returning a fixed response and recording requests.
    pub struct MockTransport {
        pub response: HttpResponse,
        pub requests: Arc<Mutex<Vec<Recorded>>>,
    }

    impl MockTransport {
        fn new(status: u16, body: &str) -> (Self, Arc<Mutex<Vec<Recorded>>>) {
            let requests = Arc::new(Mutex::new(Vec::new()));
            let transport = Self {
                response: HttpResponse {
                    status,
                    body: body.to_string(),
                },
                requests: Arc::clone(&requests),
            };
            (transport, requests)
        }
    }

    impl HttpTransport for MockTransport {
        fn get(&self, url: &str, bearer: &str) -> StoreResult<HttpResponse> {
            self.requests
                .lock()
                .push(("GET".into(), url.into(), bearer.into(), None));
            Ok(self.response.clone())
        }

        fn put_json(&self, url: &str, bearer: &str, body: &str) -> StoreResult<HttpResponse> {
            self.requests.lock().push((
                "PUT".into(),
                url.into(),
                bearer.into(),
                Some(body.into()),
            ));
            Ok(self.response.clone())
        }
    }

    fn store(status: u16, body: &str) -> (KeyVaultStore, Arc<Mutex<Vec<Recorded>>>) {
        let (transport, requests) = MockTransport::new(status, body);
        let store = KeyVaultStore::new("team-vault", "tok", Box::new(transport)).unwrap();
        (store, requests)
    }

    #[test]
    fn test_get_reads_secret_value() {
        let (store, requests) = store(200, r#"{"value":"{\"files\":[]}","id":"x"}"#);

        assert_eq!(store.get("proj-vscode-settings").unwrap(), "{\"files\":[]}");

        let requests = requests.lock();
        assert_eq!(requests.len(), 1);
        let (method, url, bearer, body) = &requests[0];
        assert_eq!(method, "GET");
        assert_eq!(
            url,
            "https://team-vault.vault.azure.net/secrets/proj-vscode-settings?api-version=7.4"
        );
        assert_eq!(bearer, "tok");
        assert!(body.is_none());
    }

    #[test]
    fn test_put_sends_value_and_tags() {
        let (store, requests) = store(200, "{}");

        store.put("s", "payload", &group_tags("laptops")).unwrap();

        let requests = requests.lock();
        let (method, _, _, body) = &requests[0];
        assert_eq!(method, "PUT");
        let body: serde_json::Value = serde_json::from_str(body.as_deref().unwrap()).unwrap();
        assert_eq!(body["value"], "payload");
        assert_eq!(body["tags"]["group"], "laptops");
    }

    #[test]
    fn test_not_found_status() {
        let (store, _) = store(
            404,
            r#"{"error":{"code":"SecretNotFound","message":"A secret with (name/id) s was not found"}}"#,
        );
        assert!(matches!(store.get("s"), Err(StoreError::NotFound(n)) if n == "s"));
    }

    #[test]
    fn test_auth_status_carries_service_message() {
        let (store, _) = store(
            401,
            r#"{"error":{"code":"Unauthorized","message":"AKV10022: Invalid audience"}}"#,
        );
        match store.get("s") {
            Err(StoreError::Auth { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthorized: AKV10022: Invalid audience");
            }
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[test]
    fn test_server_error_status() {
        let (store, _) = store(503, "");
        match store.put("s", "v", &SecretTags::new()) {
            Err(StoreError::Http {
                status, message, ..
            }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "no details");
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_value_is_parse_error() {
        let (store, _) = store(200, r#"{"id":"x"}"#);
        assert!(matches!(store.get("s"), Err(StoreError::Parse(_))));
    }

    #[test]
    fn test_invalid_names_make_no_request() {
        let (store, requests) = store(200, "{}");
        assert!(store.get("bad_name").is_err());
        assert!(requests.lock().is_empty());
    }

    #[test]
    fn test_debug_redacts_token() {
        let (store, _) = store(200, "{}");
        let debug = format!("{:?}", store);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("tok\""));
    }
}
