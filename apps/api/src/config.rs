use anyhow::{bail, Context, Result};

/// Default upstream endpoint for the Astronomy Picture of the Day API.
pub const DEFAULT_APOD_API_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Application configuration loaded from environment variables.
/// Startup aborts if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub aws_bucket: String,
    pub aws_region: String,
    pub aws_access_key: String,
    pub aws_access_key_id: String,
    /// Custom S3 endpoint (MinIO, localstack). Uses AWS when unset.
    pub s3_endpoint: Option<String>,
    pub apod_api_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| require_var(&lookup, key);

        Ok(Config {
            db_host: require("DB_HOST")?,
            db_port: parse_port(&require("DB_PORT")?, "DB_PORT")?,
            db_user: require("DB_USER")?,
            db_password: require("DB_PASSWORD")?,
            db_name: require("DB_NAME")?,
            aws_bucket: require("AWS_BUCKET")?,
            aws_region: require("AWS_REGION")?,
            aws_access_key: require("AWS_ACCESS_KEY")?,
            aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
            s3_endpoint: lookup("S3_ENDPOINT").filter(|v| !v.is_empty()),
            apod_api_url: lookup("APOD_API_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_APOD_API_URL.to_string()),
            port: parse_port(&require("APP_PORT")?, "APP_PORT")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_var<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => bail!("Required environment variable '{key}' is empty"),
        None => bail!("Required environment variable '{key}' is not set"),
    }
}

fn parse_port(raw: &str, key: &str) -> Result<u16> {
    raw.parse::<u16>()
        .with_context(|| format!("{key} must be a valid port number, got '{raw}'"))
}
