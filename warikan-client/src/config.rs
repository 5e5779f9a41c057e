//! Client configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Client configuration for connecting to the settle-up backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `WARIKAN_API_URL` (required): backend base URL
    /// - `WARIKAN_API_TOKEN` (optional): bearer token
    /// - `WARIKAN_HTTP_TIMEOUT_SECS` (optional, default 30)
    pub fn from_env() -> Result<Self, BoxError> {
        let base_url =
            std::env::var("WARIKAN_API_URL").map_err(|_| "WARIKAN_API_URL must be set")?;

        Ok(Self {
            base_url,
            token: std::env::var("WARIKAN_API_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            timeout: std::env::var("WARIKAN_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> super::HttpClient {
        super::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}
