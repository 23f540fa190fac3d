//! Server configuration.

use clap::Parser;

/// Command-line and environment configuration for the merge server.
#[derive(Debug, Clone, Parser)]
#[command(name = "mediacat-server", version, about)]
pub struct ServerConfig {
    /// Bind address.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Maximum total upload size in megabytes.
    #[arg(long, env = "MAX_UPLOAD_MB", default_value_t = 100)]
    pub max_upload_mb: usize,

    /// HTTP request timeout in seconds. Media merges re-encode every
    /// input, so this is generous by default.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 300)]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Upload limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_mb: 100,
            request_timeout_secs: 300,
        }
    }
}
