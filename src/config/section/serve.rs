//! `serve` section configuration.
//!
//! ```yaml
//! serve:
//!   interface: 127.0.0.1   # 0.0.0.0 makes the server reachable from the LAN
//!   port: 5277             # HTTP port
//!   wsPort: 35729          # live-reload WebSocket port (retried upward if busy)
//!   watch: true            # rebuild on source changes
//! ```

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

/// Development server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// First port tried for the live-reload WebSocket listener.
    pub ws_port: u16,

    /// Enable file watcher for live reload.
    pub watch: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5277,
            ws_port: 35729,
            watch: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use crate::config::test_parse_config;

    #[test]
    fn test_serve_config() {
        let config = test_parse_config(
            "serve:\n  interface: 0.0.0.0\n  port: 8080\n  wsPort: 9000\n  watch: false",
        );

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
        );
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.serve.ws_port, 9000);
        assert!(!config.serve.watch);
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.serve.port, 5277);
        assert_eq!(config.serve.ws_port, 35729);
        assert!(config.serve.watch);
    }
}
