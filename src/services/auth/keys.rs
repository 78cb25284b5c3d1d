/*
 * Responsibility
 * - 呼び出し側から渡される公開鍵 (PublicKey) の型
 * - 鍵の family (RSA / EC / Ed25519) と、その family で許可する alg の一覧
 *
 * Notes
 * - 鍵の読み込み元 (ファイル / secret store) やローテーションはここでは扱わない
 */
use std::{fmt, str::FromStr};

use jsonwebtoken::{Algorithm, DecodingKey};

use super::error::AuthError;

/// Asymmetric key family. Decides which `alg` header values a key may verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    Rsa,
    Ec,
    Ed,
}

// PKCS#1 v1.5 only. PSS-signed tokens are not accepted for RSA keys.
const RSA_ALGORITHMS: &[Algorithm] = &[Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

const EC_ALGORITHMS: &[Algorithm] = &[Algorithm::ES256, Algorithm::ES384];

const ED_ALGORITHMS: &[Algorithm] = &[Algorithm::EdDSA];

impl KeyFamily {
    /// Allow-list for this family.
    pub fn algorithms(&self) -> &'static [Algorithm] {
        match self {
            Self::Rsa => RSA_ALGORITHMS,
            Self::Ec => EC_ALGORITHMS,
            Self::Ed => ED_ALGORITHMS,
        }
    }

    pub fn allows(&self, algorithm: Algorithm) -> bool {
        self.algorithms().contains(&algorithm)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::Ec => "ec",
            Self::Ed => "ed",
        }
    }
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyFamily {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsa" | "rs" => Ok(Self::Rsa),
            "ec" | "ecdsa" | "es" => Ok(Self::Ec),
            "ed" | "ed25519" | "eddsa" => Ok(Self::Ed),
            other => Err(AuthError::InvalidKey(format!(
                "unknown key family '{other}'"
            ))),
        }
    }
}

/// Public key used to verify token signatures.
///
/// Read-only after construction; clone it or put it behind an `Arc` to share across
/// requests.
#[derive(Clone)]
pub struct PublicKey {
    family: KeyFamily,
    key: DecodingKey,
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("PublicKey")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl PublicKey {
    /// RSA public key, PEM (`PUBLIC KEY` / `RSA PUBLIC KEY`).
    pub fn from_rsa_pem(pem: &[u8]) -> Result<Self, AuthError> {
        let key = DecodingKey::from_rsa_pem(pem)
            .map_err(|e| AuthError::InvalidKey(format!("invalid rsa public key pem: {e}")))?;
        Ok(Self::new(KeyFamily::Rsa, key))
    }

    /// RSA public key, PKCS#1 DER.
    pub fn from_rsa_der(der: &[u8]) -> Self {
        Self::new(KeyFamily::Rsa, DecodingKey::from_rsa_der(der))
    }

    /// RSA public key from base64url modulus / exponent (as found in a JWK).
    pub fn from_rsa_components(modulus: &str, exponent: &str) -> Result<Self, AuthError> {
        let key = DecodingKey::from_rsa_components(modulus, exponent)
            .map_err(|e| AuthError::InvalidKey(format!("invalid rsa components: {e}")))?;
        Ok(Self::new(KeyFamily::Rsa, key))
    }

    /// ECDSA (P-256 / P-384) public key, PEM.
    pub fn from_ec_pem(pem: &[u8]) -> Result<Self, AuthError> {
        let key = DecodingKey::from_ec_pem(pem)
            .map_err(|e| AuthError::InvalidKey(format!("invalid ec public key pem: {e}")))?;
        Ok(Self::new(KeyFamily::Ec, key))
    }

    /// Ed25519 public key, PEM.
    pub fn from_ed_pem(pem: &[u8]) -> Result<Self, AuthError> {
        let key = DecodingKey::from_ed_pem(pem)
            .map_err(|e| AuthError::InvalidKey(format!("invalid ed25519 public key pem: {e}")))?;
        Ok(Self::new(KeyFamily::Ed, key))
    }

    pub fn from_pem(family: KeyFamily, pem: &[u8]) -> Result<Self, AuthError> {
        match family {
            KeyFamily::Rsa => Self::from_rsa_pem(pem),
            KeyFamily::Ec => Self::from_ec_pem(pem),
            KeyFamily::Ed => Self::from_ed_pem(pem),
        }
    }

    fn new(family: KeyFamily, key: DecodingKey) -> Self {
        Self { family, key }
    }

    pub fn family(&self) -> KeyFamily {
        self.family
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }
}
