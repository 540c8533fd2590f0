//! Chained-HMAC cookie signing
//!
//! A signed value is `hex(checksum) ++ value` where
//! `checksum = MAC(key, MAC(key, value) ++ name)`. Binding the name into the
//! outer MAC keeps a valid value from being replayed under another cookie name.

use super::record::CookieRecord;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Hash function backing the HMAC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Raw MAC output length in bytes
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Length of the hex-encoded checksum prefix of a signed value
    pub const fn checksum_len(self) -> usize {
        self.output_len() * 2
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CookieError {
    #[error("invalid signing key")]
    InvalidKey,
}

/// Sign `value` for the cookie called `name`
pub fn sign(
    name: &str,
    value: &str,
    algorithm: HashAlgorithm,
    key: &[u8],
) -> Result<String, CookieError> {
    let checksum = checksum(name, value, algorithm, key)?;
    Ok(format!("{checksum}{value}"))
}

/// Verify a signed value for the cookie called `name`
///
/// Returns the inner value only when the checksum matches. Values shorter than
/// the checksum, non-hex prefixes and unusable keys all fail closed.
pub fn verify(name: &str, signed: &str, algorithm: HashAlgorithm, key: &[u8]) -> Option<String> {
    let len = algorithm.checksum_len();
    if signed.len() < len || !signed.is_char_boundary(len) {
        return None;
    }

    let (claimed, value) = signed.split_at(len);
    let expected = checksum(name, value, algorithm, key).ok()?;

    if bool::from(expected.as_bytes().ct_eq(claimed.as_bytes())) {
        Some(value.to_string())
    } else {
        None
    }
}

/// Sign a cookie record, producing a new record with the signed value
pub fn sign_cookie(
    cookie: &CookieRecord,
    algorithm: HashAlgorithm,
    key: &[u8],
) -> Result<CookieRecord, CookieError> {
    let signed = sign(&cookie.name, &cookie.value, algorithm, key)?;
    Ok(cookie.with_value(signed))
}

/// Verify a cookie record, returning its inner value
pub fn verify_cookie(
    cookie: &CookieRecord,
    algorithm: HashAlgorithm,
    key: &[u8],
) -> Option<String> {
    verify(&cookie.name, &cookie.value, algorithm, key)
}

fn checksum(
    name: &str,
    value: &str,
    algorithm: HashAlgorithm,
    key: &[u8],
) -> Result<String, CookieError> {
    let inner = mac(algorithm, key, &[value.as_bytes()])?;
    let outer = mac(algorithm, key, &[&inner, name.as_bytes()])?;
    assert_eq!(
        outer.len(),
        algorithm.output_len(),
        "HMAC output length does not match {algorithm:?}"
    );
    Ok(hex::encode(outer))
}

fn mac(algorithm: HashAlgorithm, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, CookieError> {
    match algorithm {
        HashAlgorithm::Sha256 => mac_with::<Hmac<Sha256>>(key, parts),
        HashAlgorithm::Sha384 => mac_with::<Hmac<Sha384>>(key, parts),
        HashAlgorithm::Sha512 => mac_with::<Hmac<Sha512>>(key, parts),
    }
}

fn mac_with<M: Mac + KeyInit>(key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, CookieError> {
    let mut mac = <M as KeyInit>::new_from_slice(key).map_err(|_| CookieError::InvalidKey)?;
    for part in parts {
        Mac::update(&mut mac, *part);
    }
    Ok(mac.finalize().into_bytes().to_vec())
}
