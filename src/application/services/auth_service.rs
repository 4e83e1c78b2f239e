//! Authentication service for the static API token.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Service for authenticating API requests against the configured token.
///
/// The raw token is never kept. At startup it is MACed with HMAC-SHA256 under a random
/// per-process key, and presented tokens are MACed the same way and compared in constant
/// time.
pub struct AuthService {
    key: [u8; 32],
    expected_mac: Vec<u8>,
}

impl AuthService {
    /// Creates a new authentication service for `token`.
    ///
    /// # Errors
    ///
    /// Fails if the operating system cannot provide random bytes for the MAC key.
    pub fn new(token: &str) -> Result<Self, getrandom::Error> {
        let mut key = [0u8; 32];
        getrandom::fill(&mut key)?;

        let expected_mac = mac(&key, token).finalize().into_bytes().to_vec();

        Ok(Self { key, expected_mac })
    }

    /// Checks a bearer token presented by a client.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not match.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        mac(&self.key, token)
            .verify_slice(&self.expected_mac)
            .map_err(|_| {
                AppError::unauthorized("Unauthorized", json!({"reason": "Invalid token"}))
            })
    }
}

fn mac(key: &[u8], token: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    mac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate_success() {
        let service = AuthService::new("secret").unwrap();

        assert!(service.authenticate("secret").is_ok());
    }

    #[test]
    fn test_authenticate_invalid_token() {
        let service = AuthService::new("secret").unwrap();

        let result = service.authenticate("secret2");

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[test]
    fn test_authenticate_empty_token() {
        let service = AuthService::new("secret").unwrap();

        assert!(service.authenticate("").is_err());
    }

    #[test]
    fn test_keys_differ_between_instances() {
        let first = AuthService::new("secret").unwrap();
        let second = AuthService::new("secret").unwrap();

        assert_ne!(first.expected_mac, second.expected_mac);
        assert_eq!(first.expected_mac.len(), 32);
    }
}
