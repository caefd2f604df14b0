use tracing_subscriber::{fmt, EnvFilter};

use crate::env::ENV_CONFIG;

// RUST_LOG wins when set, otherwise everything at info and above.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if ENV_CONFIG.log_json {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}
