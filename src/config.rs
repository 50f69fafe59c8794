use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    /// Maximum number of applications a vacancy will admit.
    pub vacancy_capacity: i64,
    /// Rejections against a parent request before it is closed as not_done.
    pub rejection_limit: i32,
    pub public_rps: u32,
    pub admin_rps: u32,
    pub initial_admin_email: Option<String>,
    pub initial_admin_password: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            vacancy_capacity: get_env_parse_or("VACANCY_MAX_APPLICATIONS", 2)?,
            rejection_limit: get_env_parse_or("PARENT_REJECTION_LIMIT", 5)?,
            public_rps: get_env_parse_or("PUBLIC_RPS", 100)?,
            admin_rps: get_env_parse_or("ADMIN_RPS", 100)?,
            initial_admin_email: env::var("INITIAL_ADMIN_EMAIL").ok(),
            initial_admin_password: env::var("INITIAL_ADMIN_PASSWORD").ok(),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
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
