//! Bearer token verification.
//!
//! Tokens are signed with an asymmetric RSA key. The verifier accepts exactly
//! one configured algorithm; a token whose header names any other algorithm
//! is rejected before the signature is checked.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use crate::auth::Claims;

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// The configured algorithm is not an RSA signature scheme.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The key material could not be parsed.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding or signature verification failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

/// Parses an algorithm name and checks it is an RSA scheme.
///
/// # Errors
///
/// Returns `JwtError::UnsupportedAlgorithm` for unknown names and for
/// symmetric or elliptic-curve algorithms.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, JwtError> {
    let algorithm: Algorithm = name
        .parse()
        .map_err(|_| JwtError::UnsupportedAlgorithm(name.to_string()))?;

    match algorithm {
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => Ok(algorithm),
        _ => Err(JwtError::UnsupportedAlgorithm(name.to_string())),
    }
}

/// Verifies bearer tokens against a public key.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtVerifier {
    /// Creates a verifier from a PEM encoded RSA public key.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm is not an RSA scheme or the key
    /// cannot be parsed.
    pub fn from_rsa_pem(pem: &[u8], algorithm: &str, leeway_secs: u64) -> Result<Self, JwtError> {
        let algorithm = parse_algorithm(algorithm)?;
        let decoding_key =
            DecodingKey::from_rsa_pem(pem).map_err(|e| JwtError::InvalidKey(e.to_string()))?;

        let mut validation = Validation::new(algorithm);
        validation.leeway = leeway_secs;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the signature is good but the token has
    /// expired, `JwtError::DecodingError` for everything else.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}

/// Signs tokens with an RSA private key.
///
/// The ledger server never issues tokens; this is used by tooling and tests.
#[derive(Clone)]
pub struct JwtSigner {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("algorithm", &self.algorithm)
            .field("encoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtSigner {
    /// Creates a signer from a PEM encoded RSA private key.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm is not an RSA scheme or the key
    /// cannot be parsed.
    pub fn from_rsa_pem(pem: &[u8], algorithm: &str) -> Result<Self, JwtError> {
        let algorithm = parse_algorithm(algorithm)?;
        let encoding_key =
            EncodingKey::from_rsa_pem(pem).map_err(|e| JwtError::InvalidKey(e.to_string()))?;
        Ok(Self {
            algorithm,
            encoding_key,
        })
    }

    /// Signs the claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if signing fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PS256")]
    #[case("RS256")]
    #[case("PS512")]
    fn test_rsa_algorithms_accepted(#[case] name: &str) {
        assert!(parse_algorithm(name).is_ok());
    }

    #[rstest]
    #[case("HS256")]
    #[case("ES256")]
    #[case("none")]
    #[case("ps256")]
    fn test_other_algorithms_rejected(#[case] name: &str) {
        assert!(matches!(
            parse_algorithm(name),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_garbage_key_rejected() {
        let result = JwtVerifier::from_rsa_pem(b"not a pem", "PS256", 0);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }
}
