/// Service configuration, read from environment variables.
pub struct Config {
    /// PostgreSQL connection string
    pub database_url: String,
    /// Listen port
    pub port: u16,
    /// Session lifetime in minutes
    pub session_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            session_ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(1440),
        }
    }
}
