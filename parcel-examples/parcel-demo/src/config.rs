use std::env;

use parcel_core::config::{CLIENT_BASE_URL, CLIENT_LABEL, HTTP_HOST, HTTP_PORT};
use parcel_core::ParcelConfig;

pub const ENV_PREFIX: &str = "PARCEL__";

/// Defaults, then `HTTP_HOST`/`HTTP_PORT`, then any `PARCEL__*` variable.
pub fn config() -> ParcelConfig {
    let mut config = ParcelConfig::with_defaults();
    configure_http(&mut config);
    config.load_env(ENV_PREFIX);
    configure_client(&mut config);
    config
}

fn configure_http(config: &mut ParcelConfig) {
    if let Ok(host) = env::var("HTTP_HOST") {
        config.set(HTTP_HOST, host);
    }
    if let Ok(port) = env::var("HTTP_PORT") {
        config.set(HTTP_PORT, port);
    }
}

/// The client talks to the configured server unless told otherwise.
fn configure_client(config: &mut ParcelConfig) {
    if env::var(format!("{ENV_PREFIX}CLIENT__BASE_URL")).is_err() {
        let host = config.get(HTTP_HOST).unwrap_or("127.0.0.1").to_string();
        let port = config.get(HTTP_PORT).unwrap_or("3030").to_string();
        config.set(CLIENT_BASE_URL, format!("http://{host}:{port}"));
    }
    if !config.has(CLIENT_LABEL) {
        config.set(CLIENT_LABEL, "reqwest");
    }
}
