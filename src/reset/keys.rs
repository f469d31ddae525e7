//! Process-lifetime signing key material for password reset tokens.

use crate::error::IdentityError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use std::fmt;
use tracing::{error, info};

/// Smallest RSA modulus accepted for reset token signing.
pub const MIN_KEY_BITS: usize = 2048;

/// RSA keypair generated once at startup and read-only afterwards.
///
/// Share it through `Arc`; issuer and verifier borrow from it without locking.
pub struct KeyMaterial {
    kid: String,
    bits: usize,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    modulus: String,
    exponent: String,
}

impl KeyMaterial {
    /// Generate a fresh RSA keypair.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyGeneration`] if `bits` is below
    /// [`MIN_KEY_BITS`] or the key cannot be generated or loaded. Callers must
    /// treat this as fatal and stop startup.
    pub fn initialize(bits: usize) -> Result<Self, IdentityError> {
        if bits < MIN_KEY_BITS {
            return Err(IdentityError::KeyGeneration(format!(
                "RSA key size {} below minimum {}",
                bits, MIN_KEY_BITS
            )));
        }

        let private_key = RsaPrivateKey::new(&mut OsRng, bits).map_err(|e| {
            error!(error = %e, "Failed to generate RSA key pair");
            IdentityError::KeyGeneration(e.to_string())
        })?;

        let der = private_key
            .to_pkcs1_der()
            .map_err(|e| IdentityError::KeyGeneration(e.to_string()))?;
        let encoding_key = EncodingKey::from_rsa_der(der.as_bytes());

        let public_key = private_key.to_public_key();
        let modulus = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
        let exponent = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());
        let decoding_key = DecodingKey::from_rsa_components(&modulus, &exponent)
            .map_err(|e| IdentityError::KeyGeneration(e.to_string()))?;

        let kid = uuid::Uuid::new_v4().to_string();
        info!(kid = %kid, bits, "RSA key pair generated for password reset tokens");

        Ok(Self {
            kid,
            bits,
            encoding_key,
            decoding_key,
            modulus,
            exponent,
        })
    }

    /// Key ID placed in token headers.
    pub fn key_id(&self) -> &str {
        &self.kid
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Base64url RSA public components `(n, e)`.
    pub fn public_components(&self) -> (&str, &str) {
        (&self.modulus, &self.exponent)
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("kid", &self.kid)
            .field("bits", &self.bits)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) fn test_keys() -> std::sync::Arc<KeyMaterial> {
    use once_cell::sync::Lazy;
    use std::sync::Arc;

    static KEYS: Lazy<Arc<KeyMaterial>> =
        Lazy::new(|| Arc::new(KeyMaterial::initialize(MIN_KEY_BITS).unwrap()));
    Arc::clone(&KEYS)
}
