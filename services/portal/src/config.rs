/// Portal service configuration loaded from environment variables.
#[derive(Debug)]
pub struct PortalConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 4000). Env var: `PORTAL_PORT`.
    pub portal_port: u16,
}

impl PortalConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            portal_port: parse_port(std::env::var("PORTAL_PORT").ok().as_deref()),
        }
    }
}

fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|v| v.parse().ok()).unwrap_or(4000)
}
