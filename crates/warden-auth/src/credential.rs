//! Derives storage identifiers from opaque bearer credentials.
//!
//! Credentials arrive as JWS compact serializations. The store never
//! validates them; it only lifts out the `jti` claim and uses it as the
//! record key. A compromised backend therefore leaks identifiers and
//! metadata, never a usable credential.

use serde::Deserialize;

use crate::error::AuthError;
use crate::AuthResult;

/// Extracts the unique identifier from an unverified bearer credential.
///
/// Splits the compact serialization, base64url-decodes the payload, and
/// returns its non-empty `jti` claim.
///
/// # Warning
///
/// This does NOT verify the signature. Callers own cryptographic
/// validation; this function only derives the storage key.
///
/// # Errors
///
/// Returns [`AuthError::MalformedCredential`] if the credential is not a
/// three-segment compact serialization, the payload is not valid
/// base64url/JSON, or the `jti` claim is absent or empty.
pub fn extract_credential_id(credential: &str) -> AuthResult<String> {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    // Split the compact serialization
    let parts: Vec<&str> = credential.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::malformed_credential(
            "expected a three-segment compact serialization",
        ));
    }

    // Decode the payload (middle part) without verification
    let payload_bytes = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|_| AuthError::malformed_credential("payload is not valid base64url"))?;

    // Parse as JSON to extract the id claim
    #[derive(Deserialize)]
    struct MinimalClaims {
        #[serde(default)]
        jti: Option<String>,
    }

    let claims: MinimalClaims = serde_json::from_slice(&payload_bytes)
        .map_err(|_| AuthError::malformed_credential("payload is not valid JSON"))?;

    claims
        .jti
        .filter(|jti| !jti.is_empty())
        .ok_or_else(|| AuthError::malformed_credential("jti claim is absent or empty"))
}
