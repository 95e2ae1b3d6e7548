use dotenvy::dotenv;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn setup_test_env() {
    INIT.call_once(|| {
        dotenv().ok();
        // fallbacks when no .env is present
        if std::env::var("REVEAL_DELAY_SECONDS").is_err() {
            std::env::set_var("REVEAL_DELAY_SECONDS", "0");
        }
        if std::env::var("CLIENT_ORIGIN").is_err() {
            std::env::set_var("CLIENT_ORIGIN", "http://localhost:8080");
        }
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
