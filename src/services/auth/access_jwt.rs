//! Bearer access-token (JWT) verification.
//!
//! Flow per call: strip framing → header (`jsonwebtoken::decode_header`) → payload →
//! alg allow-list → signature → `exp` / `nbf` / `iat` → claims shape. Nothing is cached,
//! logged, or retained between calls.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, TokenData, dangerous::insecure_decode, decode_header};
use serde::Deserialize;
use serde_json::Value;

use super::bearer::strip_bearer;
use super::claims::{Claims, kind_of, numeric_date};
use super::error::AuthError;
use super::keys::PublicKey;

/// Source of "now" (unix seconds) for time-based claims.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock frozen at a given unix timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

/// Knobs for [`TokenVerifier`].
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    // Allowed clock skew for exp / nbf / iat, seconds.
    pub leeway_seconds: u64,
    pub validate_exp: bool,
    pub validate_nbf: bool,
    pub validate_iat: bool,
    // Optional narrowing of the key family's allow-list. Never widens it.
    pub algorithms: Option<Vec<Algorithm>>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            leeway_seconds: 0,
            validate_exp: true,
            validate_nbf: true,
            validate_iat: true,
            algorithms: None,
        }
    }
}

/// Declared `alg` of a token whose header `jsonwebtoken` refused to parse.
#[derive(Debug, Deserialize)]
struct DeclaredAlg {
    alg: String,
}

fn header_algorithm(token: &str) -> Result<Algorithm, AuthError> {
    match decode_header(token) {
        Ok(header) => Ok(header.alg),
        Err(e) => match e.kind() {
            ErrorKind::Json(_) => Err(rejected_header(token)),
            _ => Err(AuthError::malformed(format!("invalid token header: {e}"))),
        },
    }
}

// `Header` only deserializes algorithms the crate implements, so "none" (or "nOnE",
// "rs256", ...) fails there as JSON. Report those by name; anything else is malformed.
fn rejected_header(token: &str) -> AuthError {
    let declared = token
        .split('.')
        .next()
        .and_then(|segment| URL_SAFE_NO_PAD.decode(segment).ok())
        .and_then(|bytes| serde_json::from_slice::<DeclaredAlg>(&bytes).ok());

    match declared {
        Some(DeclaredAlg { alg }) if alg.parse::<Algorithm>().is_err() => {
            AuthError::UnexpectedAlgorithm(alg)
        }
        _ => AuthError::malformed("invalid token header"),
    }
}

fn algorithm_name(algorithm: Algorithm) -> String {
    format!("{algorithm:?}")
}

/// Verifies bearer tokens against one caller-supplied public key.
///
/// `Send + Sync`; build it once and share it (e.g. `Arc<TokenVerifier>`).
pub struct TokenVerifier {
    key: PublicKey,
    options: VerifyOptions,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("key", &self.key)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(key: PublicKey) -> Self {
        Self::with_options(key, VerifyOptions::default())
    }

    pub fn with_options(key: PublicKey, options: VerifyOptions) -> Self {
        Self {
            key,
            options,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn key(&self) -> &PublicKey {
        &self.key
    }

    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Verify a (possibly `Bearer `-framed) token and return its claims.
    pub fn verify(&self, raw: &str) -> Result<Claims, AuthError> {
        let stripped = strip_bearer(raw);
        let token: &str = &stripped;

        let declared = header_algorithm(token)?;

        // Held back until the signature checks out.
        let TokenData { claims: payload, .. } = insecure_decode::<Value>(token)
            .map_err(|e| AuthError::malformed(format!("invalid token payload: {e}")))?;

        let algorithm = self.allowed_algorithm(declared)?;

        let (signing_input, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| AuthError::malformed("missing signature segment"))?;

        let valid = jsonwebtoken::crypto::verify(
            signature,
            signing_input.as_bytes(),
            self.key.decoding_key(),
            algorithm,
        )
        .map_err(|_| AuthError::SignatureVerification)?;
        if !valid {
            return Err(AuthError::SignatureVerification);
        }

        self.validate_time(&payload)?;

        Claims::from_payload(payload)
    }

    fn allowed_algorithm(&self, algorithm: Algorithm) -> Result<Algorithm, AuthError> {
        let narrowed_out = self
            .options
            .algorithms
            .as_ref()
            .is_some_and(|allowed| !allowed.contains(&algorithm));

        if !self.key.family().allows(algorithm) || narrowed_out {
            return Err(AuthError::UnexpectedAlgorithm(algorithm_name(algorithm)));
        }
        Ok(algorithm)
    }

    fn validate_time(&self, payload: &Value) -> Result<(), AuthError> {
        // A non-object payload has no time claims; the shape check reports it later.
        let Value::Object(map) = payload else {
            return Ok(());
        };

        let now = self.clock.now();
        let leeway = i64::try_from(self.options.leeway_seconds).unwrap_or(i64::MAX);

        if self.options.validate_exp {
            if let Some(exp) = time_claim(map.get("exp"), "exp")? {
                if exp.saturating_add(leeway) < now {
                    return Err(AuthError::Expired { exp, now });
                }
            }
        }

        if self.options.validate_nbf {
            if let Some(nbf) = time_claim(map.get("nbf"), "nbf")? {
                if nbf.saturating_sub(leeway) > now {
                    return Err(AuthError::NotYetValid { nbf, now });
                }
            }
        }

        if self.options.validate_iat {
            if let Some(iat) = time_claim(map.get("iat"), "iat")? {
                if iat.saturating_sub(leeway) > now {
                    return Err(AuthError::IssuedInFuture { iat, now });
                }
            }
        }

        Ok(())
    }
}

fn time_claim(value: Option<&Value>, name: &str) -> Result<Option<i64>, AuthError> {
    match value {
        None => Ok(None),
        Some(v) => numeric_date(v).map(Some).ok_or_else(|| {
            AuthError::invalid_claims(format!(
                "'{name}' must be a numeric date, got {}",
                kind_of(v)
            ))
        }),
    }
}

/// Verify `raw` with `key` using default options and the system clock.
pub fn verify(raw: &str, key: &PublicKey) -> Result<Claims, AuthError> {
    TokenVerifier::new(key.clone()).verify(raw)
}
