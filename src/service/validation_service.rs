use crate::app::AppState;
use crate::module::error::AppError;
use crate::service::hash_service::parse_hash32;
use crate::service::internal_auth_service::verify_internal_signature;
use crate::{Hash32, Identity};
use axum::http::HeaderMap;

pub const CALLER_ID_HEADER: &str = "x-caller-id";

pub fn parse_hex_field(field: &'static str, value: &str) -> Result<Hash32, AppError> {
    parse_hash32(value).map_err(|e| AppError::bad_request("INVALID_HEX_FIELD", format!("{field}: {e}")))
}

pub fn parse_optional_hex_field(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<Hash32>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_hex_field(field, v).map(Some),
        None => Ok(None),
    }
}

pub fn parse_ir_bytes(value: &str) -> Result<Vec<u8>, AppError> {
    let trimmed = value.trim();
    let raw = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(raw).map_err(|e| AppError::bad_request("INVALID_IR_HEX", format!("ir: {e}")))
}

pub fn caller_identity(headers: &HeaderMap) -> Result<Identity, AppError> {
    let raw = headers
        .get(CALLER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::bad_request("MISSING_CALLER_ID", "missing x-caller-id"))?;
    parse_hash32(raw).map_err(|e| AppError::bad_request("INVALID_CALLER_ID", e))
}

pub fn verify_write_auth<T: serde::Serialize>(
    state: &AppState,
    headers: &HeaderMap,
    payload: &T,
) -> Result<(), AppError> {
    if !state.config.internal_auth_enabled {
        return Ok(());
    }
    let secret = state
        .config
        .internal_auth_secret
        .as_deref()
        .ok_or_else(|| AppError::internal("AUTH_CONFIG_ERROR", "internal auth secret missing"))?;
    let sig = headers
        .get("x-internal-signature")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            AppError::unauthorized("AUTH_MISSING_SIGNATURE", "missing x-internal-signature")
        })?;
    let canonical = serde_json::to_string(payload).map_err(|e| {
        AppError::internal(
            "AUTH_SERIALIZE_ERROR",
            format!("auth payload serialization failed: {e}"),
        )
    })?;
    verify_internal_signature(&canonical, sig, secret)
        .map_err(|e| AppError::unauthorized("AUTH_INVALID_SIGNATURE", e))
}
