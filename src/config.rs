use crate::error::{config_error, RelayResult};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Port the relay listens on when PORT is unset
pub const DEFAULT_PORT: u16 = 3000;

/// IANA zone label stamped on event start/end times when TIMEZONE is unset
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

/// Where the service-account JSON comes from.
///
/// Two interchangeable strategies: the JSON text handed over directly in an
/// environment variable, or a path to a JSON file on disk. The choice is
/// made once at startup; the JSON itself is re-read per request.
#[derive(Debug, Clone)]
pub enum CredentialsSource {
    /// Raw JSON text from GOOGLE_CREDENTIALS or GOOGLE_SERVICE_ACCOUNT_KEY
    Inline(String),
    /// Path from GOOGLE_CREDENTIALS_FILE
    File(PathBuf),
}

/// Main configuration structure for the relay
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,
    /// IANA zone label applied to event start/end times
    pub timezone: String,
    /// Service-account credential source, if any was configured.
    ///
    /// An absent source is not a startup failure: the liveness endpoints
    /// must keep working, so the gap is surfaced per request instead.
    pub credentials: Option<CredentialsSource>,
}

impl Config {
    /// Load configuration from the environment, once at startup
    pub fn load() -> RelayResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| config_error("Invalid PORT value"))?,
            Err(_) => DEFAULT_PORT,
        };

        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE));

        // Inline JSON wins over a file path; both env var names are accepted
        let credentials = env::var("GOOGLE_CREDENTIALS")
            .or_else(|_| env::var("GOOGLE_SERVICE_ACCOUNT_KEY"))
            .ok()
            .map(CredentialsSource::Inline)
            .or_else(|| {
                env::var("GOOGLE_CREDENTIALS_FILE")
                    .ok()
                    .map(|path| CredentialsSource::File(PathBuf::from(path)))
            });

        Ok(Config {
            port,
            timezone,
            credentials,
        })
    }
}
