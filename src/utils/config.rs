use once_cell::sync::Lazy;
use std::env;
use std::net::SocketAddr;

pub static CONFIG: Lazy<Config> = Lazy::new(Config::new);

const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:8080";

/// Process-level settings. Game rules live in `models::config::GameConfig`.
pub struct Config {
    pub server_addr: SocketAddr,
    pub client_origin: String,
}

impl Config {
    fn new() -> Self {
        let server_addr = env::var("SERVER_ADDR")
            .ok()
            .and_then(|v| v.parse::<SocketAddr>().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
        let client_origin =
            env::var("CLIENT_ORIGIN").unwrap_or_else(|_| DEFAULT_CLIENT_ORIGIN.to_string());

        Self {
            server_addr,
            client_origin,
        }
    }
}
