//! Identity providers.
//!
//! [`LocalIdentityProvider`] keeps accounts in the local key-value store.
//! [`HostedIdentityProvider`] talks to a hosted email/password sign-in
//! service over HTTPS. Both report failures as [`IdentityError`] whose
//! message is shown to the user as is.

use super::storage::{load_json_or_default, read_json, save_json, KeyValueStore, SESSION_KEY, USERS_KEY};
use crate::domain::IdentityError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::rc::Rc;
use std::time::Duration;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

pub trait IdentityProvider {
    fn register(&mut self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    fn login(&mut self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    fn logout(&mut self);

    /// Returns the identity of a session persisted by an earlier run.
    fn restore(&mut self) -> Option<Identity>;
}

pub const MIN_PASSWORD_LEN: usize = 6;

fn normalize_email(email: &str) -> Result<String, IdentityError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(IdentityError::Rejected("Please enter a valid email address".to_string()));
    }
    Ok(email)
}

fn hex_digest(input: &[u8]) -> String {
    Sha256::digest(input)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    email: String,
    password_hash: String,
}

/// Accounts stored locally, keyed by normalized email.
pub struct LocalIdentityProvider {
    store: Rc<dyn KeyValueStore>,
}

impl LocalIdentityProvider {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn users(&self) -> Vec<StoredUser> {
        load_json_or_default(self.store.as_ref(), USERS_KEY)
    }

    fn uid_for(email: &str) -> String {
        hex_digest(email.as_bytes())[..16].to_string()
    }

    fn password_hash(email: &str, password: &str) -> String {
        hex_digest(format!("{email}:{password}").as_bytes())
    }

    fn start_session(&self, email: String) -> Result<Identity, IdentityError> {
        let identity = Identity {
            uid: Self::uid_for(&email),
            email,
        };
        save_json(self.store.as_ref(), SESSION_KEY, &identity)?;
        Ok(identity)
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn register(&mut self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::Rejected(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let mut users = self.users();
        if users.iter().any(|u| u.email == email) {
            return Err(IdentityError::Rejected("User already exists".to_string()));
        }
        users.push(StoredUser {
            password_hash: Self::password_hash(&email, password),
            email: email.clone(),
        });
        save_json(self.store.as_ref(), USERS_KEY, &users)?;

        tracing::info!(%email, "registered local account");
        self.start_session(email)
    }

    fn login(&mut self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let email = normalize_email(email)?;
        let hash = Self::password_hash(&email, password);

        let known = self
            .users()
            .iter()
            .any(|u| u.email == email && u.password_hash == hash);
        if !known {
            return Err(IdentityError::Rejected("Invalid email or password".to_string()));
        }
        self.start_session(email)
    }

    fn logout(&mut self) {
        if let Err(e) = self.store.remove(SESSION_KEY) {
            tracing::error!(error = %e, "failed to clear session");
        }
    }

    fn restore(&mut self) -> Option<Identity> {
        read_json(self.store.as_ref(), SESSION_KEY).ok().flatten()
    }
}

pub const DEFAULT_AUTH_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    email: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extracts the provider's error message from a failed response body.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Transport error stripped of the request URL, which carries the API key.
fn transport(e: reqwest::Error) -> IdentityError {
    IdentityError::Transport(e.without_url().to_string())
}

/// Email/password accounts held by a hosted identity service.
pub struct HostedIdentityProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    store: Rc<dyn KeyValueStore>,
}

impl HostedIdentityProvider {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, store: Rc<dyn KeyValueStore>) -> Result<Self, IdentityError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            store,
        })
    }

    fn call(&self, action: &str, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let url = format!("{}/accounts:{}?key={}", self.endpoint, action, self.api_key);
        let response = self
            .client
            .post(url)
            .json(&CredentialsRequest {
                email: email.trim(),
                password,
                return_secure_token: true,
            })
            .send()
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().map_err(transport)?;
        if !status.is_success() {
            return Err(IdentityError::Rejected(provider_message(&body)));
        }

        let parsed: AuthResponse = serde_json::from_str(&body)
            .map_err(|e| IdentityError::Transport(format!("unexpected response: {e}")))?;
        let identity = Identity {
            uid: parsed.local_id,
            email: parsed.email,
        };
        save_json(self.store.as_ref(), SESSION_KEY, &identity)?;
        Ok(identity)
    }
}

impl IdentityProvider for HostedIdentityProvider {
    fn register(&mut self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.call("signUp", email, password)
    }

    fn login(&mut self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.call("signInWithPassword", email, password)
    }

    fn logout(&mut self) {
        if let Err(e) = self.store.remove(SESSION_KEY) {
            tracing::error!(error = %e, "failed to clear session");
        }
    }

    fn restore(&mut self) -> Option<Identity> {
        read_json(self.store.as_ref(), SESSION_KEY).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryKeyValueStore;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn provider() -> LocalIdentityProvider {
        LocalIdentityProvider::new(Rc::new(MemoryKeyValueStore::new()))
    }

    #[test]
    fn test_register_then_login() {
        let mut auth = provider();
        let registered = auth.register(" Ada@Example.com ", "secret1").unwrap();
        assert_eq!(registered.email, "ada@example.com");

        let logged_in = auth.login("ada@example.com", "secret1").unwrap();
        assert_eq!(logged_in, registered);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut auth = provider();
        auth.register("ada@example.com", "secret1").unwrap();

        let err = auth.register("ADA@example.com", "another1").unwrap_err();
        assert_eq!(err.to_string(), "User already exists");
    }

    #[test]
    fn test_bad_credentials() {
        let mut auth = provider();
        auth.register("ada@example.com", "secret1").unwrap();

        let err = auth.login("ada@example.com", "wrong-pass").unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(auth.login("bob@example.com", "secret1").is_err());
    }

    #[test]
    fn test_short_password_and_bad_email() {
        let mut auth = provider();
        assert!(auth.register("ada@example.com", "123").is_err());
        assert!(auth.register("not-an-email", "secret1").is_err());
    }

    #[test]
    fn test_session_restore_and_logout() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryKeyValueStore::new());
        let mut auth = LocalIdentityProvider::new(store.clone());
        let identity = auth.register("ada@example.com", "secret1").unwrap();

        let mut restarted = LocalIdentityProvider::new(store);
        assert_eq!(restarted.restore(), Some(identity));

        restarted.logout();
        assert_eq!(restarted.restore(), None);
    }

    #[test]
    fn test_passwords_are_not_stored_in_clear() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryKeyValueStore::new());
        let mut auth = LocalIdentityProvider::new(store.clone());
        auth.register("ada@example.com", "secret1").unwrap();

        let raw = store.get(USERS_KEY).unwrap().unwrap();
        assert!(!raw.contains("secret1"));
    }

    #[test]
    fn test_provider_message_extraction() {
        assert_eq!(
            provider_message(r#"{"error":{"code":400,"message":"EMAIL_EXISTS"}}"#),
            "EMAIL_EXISTS"
        );
        assert_eq!(provider_message("  gateway down "), "gateway down");
    }

    /// Answers a single HTTP request with a canned response and hands back
    /// the raw request text.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            let header_end = loop {
                let n = stream.read(&mut buf).unwrap();
                assert!(n > 0, "connection closed before headers");
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while request.len() < header_end + length {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (endpoint, handle)
    }

    #[test]
    fn test_hosted_sign_up_persists_session() {
        let (endpoint, server) = serve_once("200 OK", r#"{"localId":"abc123","email":"ada@example.com","idToken":"t"}"#);
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryKeyValueStore::new());
        let mut auth = HostedIdentityProvider::new(endpoint, "test-key", store.clone()).unwrap();

        let identity = auth.register("ada@example.com", "secret1").unwrap();
        assert_eq!(
            identity,
            Identity {
                uid: "abc123".to_string(),
                email: "ada@example.com".to_string(),
            }
        );
        assert_eq!(read_json::<Identity>(store.as_ref(), SESSION_KEY).unwrap(), Some(identity));

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /v1/accounts:signUp?key=test-key"));
        assert!(request.contains(r#""returnSecureToken":true"#));
    }

    #[test]
    fn test_hosted_rejection_message_is_verbatim() {
        let (endpoint, server) = serve_once("400 Bad Request", r#"{"error":{"code":400,"message":"EMAIL_EXISTS"}}"#);
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryKeyValueStore::new());
        let mut auth = HostedIdentityProvider::new(endpoint, "test-key", store.clone()).unwrap();

        let err = auth.register("ada@example.com", "secret1").unwrap_err();
        assert!(matches!(&err, IdentityError::Rejected(m) if m == "EMAIL_EXISTS"));
        assert_eq!(err.to_string(), "EMAIL_EXISTS");
        assert!(store.get(SESSION_KEY).unwrap().is_none());
        server.join().unwrap();
    }

    #[test]
    fn test_transport_error_hides_api_key() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryKeyValueStore::new());
        let mut auth = HostedIdentityProvider::new("http://127.0.0.1:1/v1", "SECRET-API-KEY-123", store).unwrap();

        let err = auth.login("ada@example.com", "secret1").unwrap_err();
        assert!(matches!(err, IdentityError::Transport(_)));
        assert!(!err.to_string().contains("SECRET-API-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-API-KEY-123"));
    }
}
