pub mod catalog;
pub mod game_service;
pub mod registry;
pub mod round;
pub mod session_service;
pub mod word_service;
