pub mod access_jwt;
pub mod bearer;
pub mod claims;
pub mod error;
pub mod factory;
pub mod keys;

pub use access_jwt::{Clock, FixedClock, SystemClock, TokenVerifier, VerifyOptions, verify};
pub use bearer::{is_bearer, strip_bearer};
pub use claims::{Claims, DEFAULT_IDENTITY_CLAIM, get_identity};
pub use error::{AuthError, AuthErrorKind};
pub use factory::build_token_verifier;
pub use keys::{KeyFamily, PublicKey};
