/// Service configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Worker ID folded into generated snowflake IDs. Only matters when
    /// several instances mint ids against the same client population.
    pub worker_id: u16,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults suitable for local development.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            worker_id: std::env::var("WORKER_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }
}
