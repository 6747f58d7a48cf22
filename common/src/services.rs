use std::env::var;

use lazy_static::lazy_static;

fn var_or(name: &str, default: &str) -> String {
    var(name).unwrap_or_else(|_| default.to_string())
}

fn port(name: &str, default: u16) -> u16 {
    var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

lazy_static! {
    pub static ref DATABASE: String = var_or("DATABASE", "tracker");
    pub static ref USERS_PORT: u16 = port("USERS_PORT", 3001);
    pub static ref ISSUES_PORT: u16 = port("ISSUES_PORT", 3002);
    pub static ref SWAGGER_PORT: u16 = port("SWAGGER_PORT", 3000);
    pub static ref MONGO_TRANSACTIONS: bool = var_or("MONGO_TRANSACTIONS", "true")
        .parse()
        .unwrap_or(true);
}

pub fn mongo_uri() -> anyhow::Result<String> {
    var("MONGOURI").map_err(|_| anyhow::anyhow!("MONGOURI must be set"))
}
