use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Delay between round start and the secret reveal.
pub const DEFAULT_REVEAL_DELAY_SECONDS: u64 = 6;

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub reveal_delay: Duration,
    // word list file; the built-in list is used when unset
    pub secret_words_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_secs(DEFAULT_REVEAL_DELAY_SECONDS),
            secret_words_path: None,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        let reveal_delay = env::var("REVEAL_DELAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REVEAL_DELAY_SECONDS));
        let secret_words_path = env::var("SECRET_WORDS_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            reveal_delay,
            secret_words_path,
        }
    }

    pub fn with_reveal_delay(mut self, reveal_delay: Duration) -> Self {
        self.reveal_delay = reveal_delay;
        self
    }
}
