//! YT Tracker webhook signature verification.
//!
//! Deliveries carry an `X-Signature: sha256=<hex>` header, where `<hex>` is the
//! lowercase HMAC-SHA256 digest of the exact request body under the endpoint's
//! shared secret. Verification must run on the raw body bytes; re-serializing
//! the JSON changes the digest.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Algorithm tag that prefixes the hex digest in the signature header.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Header carrying the signature on webhook deliveries.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Errors that can occur while verifying a signature.
///
/// A well-formed signature that simply does not match is not an error:
/// it is reported as `Ok(false)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Caller supplied an empty secret, an empty header, or a header the
    /// prefix policy refuses.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The HMAC primitive itself failed.
    #[error("crypto failure: {0}")]
    Crypto(String),
}

/// How to treat a signature header without the `sha256=` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrefixPolicy {
    /// Strip `sha256=` when present, otherwise use the whole header as the digest.
    #[default]
    Permissive,
    /// Reject any header that does not start with `sha256=`.
    Strict,
}

impl PrefixPolicy {
    /// Parse a policy name, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "permissive" => Some(PrefixPolicy::Permissive),
            "strict" => Some(PrefixPolicy::Strict),
            _ => None,
        }
    }
}

/// Compute the lowercase hex HMAC-SHA256 of `payload` under `secret`.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Result<String, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::InvalidInput("empty secret"));
    }

    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|e| SignatureError::Crypto(e.to_string()))?;
    mac.update(payload);

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Produce the canonical header value (`sha256=<hex>`) for `payload`.
pub fn sign_payload(payload: &[u8], secret: &[u8]) -> Result<String, SignatureError> {
    Ok(format!("{}{}", SIGNATURE_PREFIX, compute_signature(payload, secret)?))
}

/// Extract the hex token from a signature header according to `policy`.
pub fn extract_token(header: &str, policy: PrefixPolicy) -> Result<&str, SignatureError> {
    if header.is_empty() {
        return Err(SignatureError::InvalidInput("empty signature header"));
    }

    let token = match (header.strip_prefix(SIGNATURE_PREFIX), policy) {
        (Some(token), _) => token,
        (None, PrefixPolicy::Permissive) => header,
        (None, PrefixPolicy::Strict) => {
            return Err(SignatureError::InvalidInput("unrecognized signature prefix"))
        }
    };

    if token.is_empty() {
        return Err(SignatureError::InvalidInput("empty signature token"));
    }

    Ok(token)
}

/// Verify `signature_header` against `payload`, keeping misuse distinct from mismatch.
///
/// Returns `Ok(true)` only when the computed digest and the supplied token have
/// the same length and are byte-for-byte equal (hex case matters). The byte
/// comparison runs in constant time.
pub fn try_verify(
    payload: &[u8],
    signature_header: &str,
    secret: &[u8],
    policy: PrefixPolicy,
) -> Result<bool, SignatureError> {
    let token = extract_token(signature_header, policy)?;
    let expected = compute_signature(payload, secret)?;

    if expected.len() != token.len() {
        return Ok(false);
    }

    Ok(expected.as_bytes().ct_eq(token.as_bytes()).into())
}

/// Verify a webhook signature, treating every failure as a rejection.
///
/// Unprefixed headers are accepted as bare hex digests.
pub fn verify(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    try_verify(payload, signature_header, secret, PrefixPolicy::Permissive).unwrap_or(false)
}

/// Check if webhook signature verification is enabled.
pub fn is_signature_verification_enabled(secret: &Option<String>) -> bool {
    secret
        .as_ref()
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false)
}

/// A verifier bound to one shared secret.
///
/// Holds the secret for the lifetime of the receiver so it is loaded once,
/// and keeps it out of `Debug` output.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Vec<u8>,
    policy: PrefixPolicy,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            policy: PrefixPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PrefixPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PrefixPolicy {
        self.policy
    }

    pub fn sign(&self, payload: &[u8]) -> Result<String, SignatureError> {
        sign_payload(payload, &self.secret)
    }

    pub fn try_verify(&self, payload: &[u8], signature_header: &str) -> Result<bool, SignatureError> {
        try_verify(payload, signature_header, &self.secret, self.policy)
    }

    pub fn verify(&self, payload: &[u8], signature_header: &str) -> bool {
        self.try_verify(payload, signature_header).unwrap_or(false)
    }
}

impl fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"<redacted>")
            .field("policy", &self.policy)
            .finish()
    }
}
