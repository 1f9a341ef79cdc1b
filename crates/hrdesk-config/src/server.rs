use std::env;

/// Listener and request-handling settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Port of the WebSocket chat listener.
    pub chat_port: u16,
    /// Prefix stripped from every request path before matching, e.g. `/hr`.
    pub base_path: Option<String>,
    pub max_body_bytes: usize,
    pub run_migrations: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let base_path = env::var("BASE_PATH")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: crate::env_or("PORT", 3000),
            chat_port: crate::env_or("CHAT_PORT", 8080),
            base_path,
            max_body_bytes: crate::env_or("MAX_BODY_BYTES", 1024 * 1024),
            run_migrations: crate::env_or("RUN_MIGRATIONS", true),
        }
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn chat_addr(&self) -> String {
        format!("{}:{}", self.host, self.chat_port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            chat_port: 8080,
            base_path: None,
            max_body_bytes: 1024 * 1024,
            run_migrations: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_addresses() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr(), "0.0.0.0:3000");
        assert_eq!(config.chat_addr(), "0.0.0.0:8080");
        assert!(config.base_path.is_none());
    }
}
