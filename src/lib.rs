//! Bearer token authentication.
//!
//! The core lives in [`services::auth`]: detect and strip `Bearer` framing, verify a
//! JWT signature against a caller-supplied asymmetric public key (RSA, ECDSA or
//! Ed25519), and pull an identity claim out of the verified claim set.
//!
//! ```ignore
//! use bearer_auth::{PublicKey, get_identity, is_bearer, verify};
//!
//! let key = PublicKey::from_rsa_pem(pem)?;
//! if is_bearer(header_value) {
//!     let claims = verify(header_value, &key)?;
//!     let client_id = get_identity(&claims, "sub")?;
//! }
//! ```
//!
//! The remaining modules are a small axum service that wires the core into an
//! `Authorization: Bearer <token>` pipeline.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use services::auth::{
    AuthError, AuthErrorKind, Claims, Clock, DEFAULT_IDENTITY_CLAIM, FixedClock, KeyFamily,
    PublicKey, SystemClock, TokenVerifier, VerifyOptions, get_identity, is_bearer, strip_bearer,
    verify,
};
