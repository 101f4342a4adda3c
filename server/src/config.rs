use arena_shared::config::ArenaConfig;
use arena_shared::protocol::DEFAULT_ROOM;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub room: String,
    /// Period of the `gravityTick` broadcast
    pub gravity_tick_ms: u64,
    pub command_capacity: usize,
    pub broadcast_capacity: usize,
    /// Text frames larger than this close the connection
    pub max_message_bytes: usize,
    /// Unparseable frames tolerated before the connection is closed
    pub max_parse_errors: u32,
    pub arena: ArenaConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            room: DEFAULT_ROOM.to_string(),
            gravity_tick_ms: 100,
            command_capacity: 256,
            broadcast_capacity: 256,
            max_message_bytes: 4096,
            max_parse_errors: 5,
            arena: ArenaConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `ARENA_LISTEN_ADDR` wins over `PORT`, then `NODE_PORT`.
    /// Unparseable numeric values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("ARENA_LISTEN_ADDR") {
            config.listen_addr = addr;
        } else if let Some(port) = lookup("PORT").or_else(|| lookup("NODE_PORT")) {
            config.listen_addr = format!("0.0.0.0:{}", port);
        }

        if let Some(ms) = lookup("ARENA_TICK_MS").and_then(|v| v.parse().ok()) {
            config.gravity_tick_ms = ms;
        }

        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.listen_addr.is_empty() {
            return Err("listen_addr must not be empty".to_string());
        }
        if self.room.is_empty() {
            return Err("room must not be empty".to_string());
        }
        if self.gravity_tick_ms == 0 {
            return Err("gravity_tick_ms must be > 0".to_string());
        }
        if self.command_capacity == 0 || self.broadcast_capacity == 0 {
            return Err("channel capacities must be > 0".to_string());
        }
        if self.max_message_bytes < 256 {
            return Err("max_message_bytes must be >= 256".to_string());
        }
        self.arena.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn default_tick_is_100ms() {
        assert_eq!(ServerConfig::default().gravity_tick_ms, 100);
        assert_eq!(ServerConfig::default().room, "room1");
    }

    #[test]
    fn port_env_sets_listen_addr() {
        let config = ServerConfig::from_lookup(lookup_from(&[("PORT", "8080")]));
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
    }

    #[test]
    fn node_port_is_fallback() {
        let config = ServerConfig::from_lookup(lookup_from(&[("NODE_PORT", "4000")]));
        assert_eq!(config.listen_addr, "0.0.0.0:4000");
    }

    #[test]
    fn explicit_listen_addr_wins() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("ARENA_LISTEN_ADDR", "127.0.0.1:9000"),
        ]));
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
    }

    #[test]
    fn bad_tick_value_keeps_default() {
        let config = ServerConfig::from_lookup(lookup_from(&[("ARENA_TICK_MS", "soon")]));
        assert_eq!(config.gravity_tick_ms, 100);
        let config = ServerConfig::from_lookup(lookup_from(&[("ARENA_TICK_MS", "50")]));
        assert_eq!(config.gravity_tick_ms, 50);
    }

    #[test]
    fn zero_tick_invalid() {
        let config = ServerConfig {
            gravity_tick_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
