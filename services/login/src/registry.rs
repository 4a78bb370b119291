//! Lookup tables the engine consumes: registered clients and user credentials.
//!
//! Both are reference data owned outside the core. The static implementations
//! here back the demo deployment and the tests.

use secrecy::SecretString;
use std::collections::HashMap;

/// A registered OAuth client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRegistration {
    /// Unique client id.
    pub client_id: String,
    /// Human-readable name.
    pub display_name: String,
}

/// Client lookup.
pub trait ClientRegistry: Send + Sync {
    /// Registration for `client_id`, if any.
    fn lookup(&self, client_id: &str) -> Option<ClientRegistration>;
}

/// Credential lookup.
pub trait CredentialStore: Send + Sync {
    /// Stored secret for `username`, if registered.
    fn secret(&self, username: &str) -> Option<SecretString>;
}

/// Fixed set of clients.
#[derive(Debug, Default, Clone)]
pub struct StaticClientRegistry {
    clients: HashMap<String, ClientRegistration>,
}

impl StaticClientRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client.
    #[must_use]
    pub fn with_client(mut self, client_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let client_id = client_id.into();
        self.clients.insert(
            client_id.clone(),
            ClientRegistration {
                client_id,
                display_name: display_name.into(),
            },
        );
        self
    }

    /// The single public demo client.
    #[must_use]
    pub fn demo() -> Self {
        Self::new().with_client("demo-client", "Demo Public Client")
    }
}

impl ClientRegistry for StaticClientRegistry {
    fn lookup(&self, client_id: &str) -> Option<ClientRegistration> {
        self.clients.get(client_id).cloned()
    }
}

/// Fixed set of username/secret pairs.
#[derive(Debug, Default, Clone)]
pub struct StaticCredentialStore {
    users: HashMap<String, SecretString>,
}

impl StaticCredentialStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user.
    #[must_use]
    pub fn with_user(mut self, username: impl Into<String>, secret: impl Into<String>) -> Self {
        self.users
            .insert(username.into(), SecretString::from(secret.into()));
        self
    }

    /// Demo users `alice` and `bob`.
    #[must_use]
    pub fn demo() -> Self {
        Self::new()
            .with_user("alice", "password123")
            .with_user("bob", "password123")
    }

    /// Registered usernames.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }
}

impl CredentialStore for StaticCredentialStore {
    fn secret(&self, username: &str) -> Option<SecretString> {
        self.users.get(username).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_demo_client_registered() {
        let registry = StaticClientRegistry::demo();
        let client = registry.lookup("demo-client").unwrap();
        assert_eq!(client.display_name, "Demo Public Client");
        assert!(registry.lookup("other-client").is_none());
    }

    #[test]
    fn test_demo_users_registered() {
        let store = StaticCredentialStore::demo();
        assert_eq!(store.secret("alice").unwrap().expose_secret(), "password123");
        assert!(store.secret("bob").is_some());
        assert!(store.secret("mallory").is_none());
    }
}
