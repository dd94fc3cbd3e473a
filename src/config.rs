use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub rowstore_base_url: String,
    pub rowstore_api_token: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    pub behavioral_webhook_url: String,
    pub integration_rps: u32,
    pub public_rps: u32,
    pub auto_match_url: Option<String>,
    pub webhook_secret: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            rowstore_base_url: get_env("ROWSTORE_BASE_URL")?,
            rowstore_api_token: get_env("ROWSTORE_API_TOKEN")?,
            google_client_id: get_env("GOOGLE_CLIENT_ID")?,
            google_client_secret: get_env("GOOGLE_CLIENT_SECRET")?,
            google_redirect_uri: get_env("GOOGLE_REDIRECT_URI")?,
            behavioral_webhook_url: get_env("BEHAVIORAL_WEBHOOK_URL")?,
            integration_rps: get_env_parse("INTEGRATION_RPS")?,
            public_rps: get_env_parse("PUBLIC_RPS")?,
            auto_match_url: env::var("AUTO_MATCH_URL").ok(),
            webhook_secret: env::var("WEBHOOK_SECRET").ok(),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
