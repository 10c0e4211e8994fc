//! API token formatting, parsing, and verifier hashing.
//!
//! Tokens look like `tr_v1_<token uuid>.<64 hex chars>`. Only a SHA-256 verifier
//! of the secret is stored.

use std::{fmt, fmt::Write as _, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::UserUuid;

/// API token identifier prefix.
pub const API_TOKEN_PREFIX: &str = "tr";

/// Number of secret bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl TryFrom<i16> for ApiTokenVersion {
    type Error = ApiTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

impl FromStr for ApiTokenVersion {
    type Err = ApiTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

/// Raw token secret, wiped from memory on drop.
#[derive(Clone)]
pub struct ApiTokenSecret {
    bytes: [u8; API_TOKEN_SECRET_BYTES],
}

impl ApiTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; API_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; API_TOKEN_SECRET_BYTES] {
        &self.bytes
    }

    fn to_hex(&self) -> String {
        to_hex(&self.bytes)
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

#[derive(Debug, Clone)]
pub struct ParsedApiToken {
    pub token_uuid: Uuid,
    pub version: ApiTokenVersion,
    pub secret: ApiTokenSecret,
}

#[derive(Debug, Error)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token uses an unsupported version")]
    UnsupportedVersion,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_api_token_secret() -> ApiTokenSecret {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    ApiTokenSecret::from_bytes(secret)
}

#[must_use]
pub fn format_api_token(
    token_uuid: Uuid,
    version: ApiTokenVersion,
    secret: &ApiTokenSecret,
) -> String {
    let mut encoded = secret.to_hex();

    let token = format!(
        "{API_TOKEN_PREFIX}_{}_{}.{encoded}",
        version.segment(),
        token_uuid.simple(),
    );

    encoded.zeroize();

    token
}

/// Parse a bearer token into its identifier, version and secret.
///
/// # Errors
///
/// Returns an error when the prefix, version, identifier or secret encoding is malformed.
pub fn parse_api_token(token: &str) -> Result<ParsedApiToken, ApiTokenError> {
    let (identifier, secret_hex) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

    let [prefix, version, token_uuid] = identifier
        .splitn(3, '_')
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|_parts: Vec<&str>| ApiTokenError::InvalidFormat)?;

    if prefix != API_TOKEN_PREFIX {
        return Err(ApiTokenError::InvalidFormat);
    }

    let version = ApiTokenVersion::from_str(version)?;

    let token_uuid = Uuid::try_parse(token_uuid).map_err(|_error| ApiTokenError::InvalidFormat)?;

    let secret = from_hex(secret_hex).ok_or(ApiTokenError::InvalidSecretEncoding)?;

    Ok(ParsedApiToken {
        token_uuid,
        version,
        secret: ApiTokenSecret::from_bytes(secret),
    })
}

/// SHA-256 verifier stored for a token, bound to its identifier, version and owner.
#[must_use]
pub fn hash_api_token(
    token_uuid: &Uuid,
    version: ApiTokenVersion,
    user_uuid: &UserUuid,
    secret: &ApiTokenSecret,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(token_uuid.as_bytes());
    hasher.update(version.as_i16().to_be_bytes());
    hasher.update(user_uuid.into_uuid().as_bytes());
    hasher.update(secret.as_bytes());

    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}

fn from_hex(encoded: &str) -> Option<[u8; API_TOKEN_SECRET_BYTES]> {
    if encoded.len() != API_TOKEN_SECRET_BYTES * 2 || !encoded.is_ascii() {
        return None;
    }

    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    for (byte, pair) in secret.iter_mut().zip(encoded.as_bytes().chunks_exact(2)) {
        let pair = std::str::from_utf8(pair).ok()?;

        *byte = u8::from_str_radix(pair, 16).ok()?;
    }

    Some(secret)
}
