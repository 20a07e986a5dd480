use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub database_name: String,
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        // The connection string selects the storage backend (memory:// or
        // mongodb://). There is no default: a missing URL aborts startup.
        let database_url = settings
            .get_string("database.url")
            .or_else(|_| env::var("DATABASE_URL"))
            .map_err(|_| {
                config::ConfigError::NotFound(
                    "database.url (set DATABASE_URL or APP_DATABASE__URL)".to_string(),
                )
            })?;

        let database_name = settings
            .get_string("database.name")
            .or_else(|_| env::var("DATABASE_NAME"))
            .unwrap_or_else(|_| "studyhub".to_string());

        let port = settings
            .get_string("server.port")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(5000);

        Ok(Config {
            database_url,
            database_name,
            port,
        })
    }
}
