use std::sync::Arc;

use crate::models::config::GameConfig;
use crate::services::game_service::GameController;
use crate::services::session_service::{spawn_game, GameHandle};
use crate::services::word_service::{SecretWords, WordListError};

#[derive(Clone)]
pub struct AppState {
    pub game: GameHandle,
    pub config: Arc<GameConfig>,
}

impl AppState {
    /// Spawns the game session; must be called inside a tokio runtime.
    pub fn new(config: GameConfig, words: SecretWords) -> Self {
        Self::with_controller(config, GameController::new(words))
    }

    pub fn with_controller(config: GameConfig, controller: GameController) -> Self {
        let game = spawn_game(controller, config.reveal_delay);
        AppState {
            game,
            config: Arc::new(config),
        }
    }

    pub fn from_env() -> Result<Self, WordListError> {
        let config = GameConfig::from_env();
        let words = SecretWords::load_or_builtin(config.secret_words_path.as_deref())?;
        Ok(Self::new(config, words))
    }
}
