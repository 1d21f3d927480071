use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub session_ttl_hours: i64,
    /// STORE=memory runs with the in-memory store (demo / local dev without Postgres).
    pub use_memory_store: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let use_memory_store = env::var("STORE")
            .map(|s| s.eq_ignore_ascii_case("memory"))
            .unwrap_or(false);
        let database_url = env::var("DATABASE_URL").ok();
        if !use_memory_store && database_url.is_none() {
            anyhow::bail!("DATABASE_URL is required unless STORE=memory");
        }
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(24);

        Ok(Self {
            database_url,
            bind_addr,
            session_ttl_hours,
            use_memory_store,
        })
    }
}
