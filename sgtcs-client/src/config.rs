//! Client configuration

use std::fmt;

/// Base of the certificate-management REST API.
pub const DEFAULT_BASE_URL: &str = "https://cert-manager.com/api/";

/// Customer URI sent with every request unless overridden.
pub const DEFAULT_CUSTOMER: &str = "surfnet";

/// Organization the certificates are requested for unless overridden.
pub const DEFAULT_ORGANIZATION_ID: u64 = 11358;

/// Client configuration for talking to the certificate service
#[derive(Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "https://cert-manager.com/api/")
    pub base_url: String,

    /// Value of the `customerUri` header
    pub customer: String,

    /// Value of the `login` header
    pub username: String,

    /// Value of the `password` header
    pub password: String,

    /// Organization id used for the profile catalog and enrollment
    pub organization_id: u64,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration with default customer and organization
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            customer: DEFAULT_CUSTOMER.to_string(),
            username: String::new(),
            password: String::new(),
            organization_id: DEFAULT_ORGANIZATION_ID,
            timeout: 30,
        }
    }

    /// Set the customer URI
    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = customer.into();
        self
    }

    /// Set the login credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the organization id
    pub fn with_organization_id(mut self, organization_id: u64) -> Self {
        self.organization_id = organization_id;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<super::HttpClient> {
        super::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("customer", &self.customer)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("organization_id", &self.organization_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = ClientConfig::default()
            .with_customer("example")
            .with_credentials("alice", "s3cret")
            .with_organization_id(42)
            .with_timeout(5);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.customer, "example");
        assert_eq!(config.username, "alice");
        assert_eq!(config.organization_id, 42);
        assert_eq!(config.timeout, 5);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ClientConfig::default().with_credentials("alice", "s3cret");
        let debug = format!("{:?}", config);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("s3cret"));
    }
}
