// src/utils/serialization.rs
//! Serialization utilities for the claim service.
//!
//! Provides serialization and deserialization functions for:
//! - JSON data structures
//! - QR-ready base64 payloads handed to the verifier widget

use serde::{Deserialize, Serialize};
use serde_json;

/// Serializes a value to a JSON string.
///
/// # Arguments
/// * `data` - The value to serialize (must implement `Serialize`)
///
/// # Returns
/// - `Ok(String)` with JSON representation on success
/// - `Err(serde_json::Error)` if serialization fails
pub fn serialize<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(data)
}

/// Deserializes a value from a JSON string.
///
/// # Arguments
/// * `data` - JSON string to deserialize
///
/// # Returns
/// - `Ok(T)` with deserialized value on success
/// - `Err(serde_json::Error)` if deserialization fails
#[allow(dead_code)]
pub fn deserialize<'a, T: Deserialize<'a>>(data: &'a str) -> Result<T, serde_json::Error> {
    serde_json::from_str(data)
}

/// Serializes a value to JSON and encodes the bytes as base64.
///
/// This is the form a QR renderer embeds, since it survives URL and
/// QR alphanumeric transport unchanged.
pub fn serialize_base64<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    let json = serialize(data)?;
    Ok(base64::encode(json))
}

/// Reverses [`serialize_base64`].
///
/// # Returns
/// Reconstructed value, or a message describing which stage failed
#[allow(dead_code)]
pub fn deserialize_base64<T: for<'de> Deserialize<'de>>(data: &str) -> Result<T, String> {
    let bytes = base64::decode(data)
        .map_err(|e| format!("Base64 decoding failed: {}", e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| format!("Deserialization failed: {}", e))
}
