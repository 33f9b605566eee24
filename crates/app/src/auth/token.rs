//! API token formatting, parsing, and hashing.
//!
//! Tokens look like `dp_<token uuid>.<secret hex>`. Only a SHA-256 digest of
//! the uuid and secret is stored.

use std::fmt;

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

/// API token identifier prefix.
pub const API_TOKEN_PREFIX: &str = "dp";

/// Number of secret bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

const API_TOKEN_SECRET_HEX_CHARS: usize = API_TOKEN_SECRET_BYTES * 2;

/// Random secret half of an API token; zeroed on drop.
#[derive(Clone)]
pub struct ApiTokenSecret {
    bytes: [u8; API_TOKEN_SECRET_BYTES],
}

impl ApiTokenSecret {
    /// Wrap raw secret bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; API_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    /// Raw secret bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; API_TOKEN_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for ApiTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiTokenSecret(**redacted**)")
    }
}

impl Drop for ApiTokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// A bearer token split into its uuid and secret.
#[derive(Debug, Clone)]
pub struct ParsedApiToken {
    /// Identifier of the stored token row.
    pub token_uuid: Uuid,
    /// Secret checked against the stored hash.
    pub secret: ApiTokenSecret,
}

impl ParsedApiToken {
    /// Hex SHA-256 digest stored for this token.
    #[must_use]
    pub fn hash(&self) -> String {
        hash_token(&self.token_uuid, &self.secret)
    }
}

/// Reasons a bearer token cannot be parsed.
#[derive(Debug, Error)]
pub enum ApiTokenError {
    /// Missing prefix, separator or uuid.
    #[error("api token format is invalid")]
    InvalidFormat,

    /// Secret is not the expected hex.
    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

/// Draw a new secret from the OS RNG.
#[must_use]
pub fn generate_api_token_secret() -> ApiTokenSecret {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    ApiTokenSecret::from_bytes(secret)
}

/// Render the bearer value for a token uuid and secret.
#[must_use]
pub fn format_api_token(token_uuid: Uuid, secret: &ApiTokenSecret) -> String {
    format!(
        "{API_TOKEN_PREFIX}_{}.{}",
        token_uuid.simple(),
        encode_secret_hex(secret.as_bytes())
    )
}

/// Split a bearer token into its uuid and secret.
///
/// # Errors
///
/// Returns an error if the prefix, uuid or secret segment is malformed.
pub fn parse_api_token(token: &str) -> Result<ParsedApiToken, ApiTokenError> {
    let (prefix_and_id, secret_hex) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

    let (prefix, token_uuid_segment) = prefix_and_id
        .split_once('_')
        .ok_or(ApiTokenError::InvalidFormat)?;

    if prefix != API_TOKEN_PREFIX {
        return Err(ApiTokenError::InvalidFormat);
    }

    let token_uuid =
        Uuid::try_parse(token_uuid_segment).map_err(|_ignored| ApiTokenError::InvalidFormat)?;

    let secret = decode_secret_hex(secret_hex).ok_or(ApiTokenError::InvalidSecretEncoding)?;

    Ok(ParsedApiToken {
        token_uuid,
        secret: ApiTokenSecret::from_bytes(secret),
    })
}

/// Digest of `{token_uuid_hex}:{secret_hex}`, hex encoded.
#[must_use]
pub fn hash_token(token_uuid: &Uuid, secret: &ApiTokenSecret) -> String {
    let mut input = format!(
        "{}:{}",
        token_uuid.simple(),
        encode_secret_hex(secret.as_bytes())
    );

    let digest = Sha256::digest(input.as_bytes());

    input.zeroize();

    format!("{digest:x}")
}

fn encode_secret_hex(secret: &[u8; API_TOKEN_SECRET_BYTES]) -> String {
    let mut encoded = String::with_capacity(API_TOKEN_SECRET_HEX_CHARS);

    for byte in secret {
        encoded.push_str(&format!("{byte:02x}"));
    }

    encoded
}

fn decode_secret_hex(secret_hex: &str) -> Option<[u8; API_TOKEN_SECRET_BYTES]> {
    if secret_hex.len() != API_TOKEN_SECRET_HEX_CHARS
        || !secret_hex.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return None;
    }

    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    for (byte, pair) in secret.iter_mut().zip(secret_hex.as_bytes().chunks_exact(2)) {
        let pair = std::str::from_utf8(pair).ok()?;

        *byte = u8::from_str_radix(pair, 16).ok()?;
    }

    Some(secret)
}
