/*
 * Responsibility
 * - bearer token 検証で発生するエラーの定義
 * - 呼び出し側 (middleware) が種類ごとに判別できる粒度を保つ (bool にしない)
 */
use thiserror::Error;

/// Errors returned by framing, verification and claim extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("unexpected signing algorithm: {0}")]
    UnexpectedAlgorithm(String),

    #[error("signature verification failed")]
    SignatureVerification,

    #[error("token expired at {exp} (now {now})")]
    Expired { exp: i64, now: i64 },

    #[error("token not valid before {nbf} (now {now})")]
    NotYetValid { nbf: i64, now: i64 },

    #[error("token issued in the future at {iat} (now {now})")]
    IssuedInFuture { iat: i64, now: i64 },

    #[error("invalid claims: {0}")]
    InvalidClaims(String),

    #[error("missing claim '{0}'")]
    MissingClaim(String),

    #[error("claim '{claim}' has type {found}, expected {expected}")]
    ClaimType {
        claim: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid public key: {0}")]
    InvalidKey(String),
}

/// Field-less discriminant of [`AuthError`], handy for log fields and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    MalformedToken,
    UnexpectedAlgorithm,
    SignatureVerification,
    Expired,
    NotYetValid,
    InvalidClaims,
    MissingClaim,
    ClaimType,
    InvalidKey,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::MalformedToken(_) => AuthErrorKind::MalformedToken,
            Self::UnexpectedAlgorithm(_) => AuthErrorKind::UnexpectedAlgorithm,
            Self::SignatureVerification => AuthErrorKind::SignatureVerification,
            Self::Expired { .. } => AuthErrorKind::Expired,
            Self::NotYetValid { .. } | Self::IssuedInFuture { .. } => AuthErrorKind::NotYetValid,
            Self::InvalidClaims(_) => AuthErrorKind::InvalidClaims,
            Self::MissingClaim(_) => AuthErrorKind::MissingClaim,
            Self::ClaimType { .. } => AuthErrorKind::ClaimType,
            Self::InvalidKey(_) => AuthErrorKind::InvalidKey,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedToken(message.into())
    }

    pub(crate) fn invalid_claims(message: impl Into<String>) -> Self {
        Self::InvalidClaims(message.into())
    }
}
