use crate::Identity;
use crate::service::hash_service::parse_hash32;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rust_env: String,
    pub api_host: String,
    pub api_port: u16,
    pub executor: Identity,
    pub oracle_recorder: Identity,
    pub program_id: Identity,
    pub max_ir_bytes: usize,
    pub default_staleness_limit_slots: u64,
    pub slot_duration_ms: u64,
    pub genesis_unix_ms: i64,
    pub liq_ticket_deadline_slots: u64,
    pub liq_ticket_discount_bp: u16,
    pub internal_auth_enabled: bool,
    pub internal_auth_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        load_dotenv_layers();
        let executor = read_identity("EXECUTOR_ID")?;
        Ok(Self {
            rust_env: read_var("RUST_ENV")?,
            api_host: read_var("API_HOST")?,
            api_port: read_var("API_PORT")?
                .parse::<u16>()
                .map_err(|e| format!("invalid API_PORT: {e}"))?,
            executor,
            oracle_recorder: read_optional_identity("ORACLE_RECORDER_ID", executor)?,
            program_id: read_optional_identity("PROGRAM_ID", [0u8; 32])?,
            max_ir_bytes: read_optional_u64("MAX_IR_BYTES", 2048)? as usize,
            default_staleness_limit_slots: read_optional_u64("DEFAULT_STALENESS_LIMIT_SLOTS", 300)?,
            slot_duration_ms: read_optional_u64("SLOT_DURATION_MS", 400)?,
            genesis_unix_ms: read_optional_i64("GENESIS_UNIX_MS", 0)?,
            liq_ticket_deadline_slots: read_optional_u64("LIQ_TICKET_DEADLINE_SLOTS", 150)?,
            liq_ticket_discount_bp: read_optional_u64("LIQ_TICKET_DISCOUNT_BP", 500)?
                .try_into()
                .map_err(|_| "invalid LIQ_TICKET_DISCOUNT_BP: out of range".to_string())?,
            internal_auth_enabled: read_optional_bool("INTERNAL_AUTH_ENABLED", false),
            internal_auth_secret: env::var("INTERNAL_AUTH_SECRET").ok(),
        })
    }
}

fn read_var(key: &str) -> Result<String, String> {
    env::var(key).map_err(|_| format!("missing required env var: {key}"))
}

fn read_identity(key: &str) -> Result<Identity, String> {
    parse_hash32(&read_var(key)?).map_err(|e| format!("invalid {key}: {e}"))
}

fn read_optional_identity(key: &str, default: Identity) -> Result<Identity, String> {
    match env::var(key) {
        Ok(v) => parse_hash32(&v).map_err(|e| format!("invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}

fn read_optional_i64(key: &str, default: i64) -> Result<i64, String> {
    match env::var(key) {
        Ok(v) => v.parse::<i64>().map_err(|e| format!("invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}

fn read_optional_u64(key: &str, default: u64) -> Result<u64, String> {
    match env::var(key) {
        Ok(v) => v.parse::<u64>().map_err(|e| format!("invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}

fn read_optional_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"),
        Err(_) => default,
    }
}

fn load_dotenv_layers() {
    for path in [".env", "../.env"] {
        let _ = dotenvy::from_path_override(path);
    }
}
