/// Factory: build the shared `TokenVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{PublicKey, TokenVerifier, VerifyOptions};

pub fn build_token_verifier(config: &Config) -> Result<Arc<TokenVerifier>, AppError> {
    let key = PublicKey::from_pem(config.key_family, config.public_key_pem.as_bytes())
        .map_err(|e| {
            tracing::error!(
                error = %e,
                family = %config.key_family,
                "failed to load bearer public key"
            );
            AppError::Internal
        })?;

    let options = VerifyOptions {
        leeway_seconds: config.leeway_seconds,
        ..VerifyOptions::default()
    };

    Ok(Arc::new(TokenVerifier::with_options(key, options)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::KeyFamily;

    fn config(family: &str, pem: &str) -> Config {
        Config::from_lookup(|key| match key {
            "BEARER_PUBLIC_KEY_PEM" => Some(pem.to_string()),
            "BEARER_KEY_FAMILY" => Some(family.to_string()),
            "BEARER_LEEWAY_SECONDS" => Some("15".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn builds_verifier_from_config() {
        let pem = include_str!("../../../tests/fixtures/ed_public.pem");
        let verifier = build_token_verifier(&config("ed", pem)).unwrap();

        assert_eq!(verifier.key().family(), KeyFamily::Ed);
        assert_eq!(verifier.options().leeway_seconds, 15);
    }

    #[test]
    fn family_mismatch_fails_to_build() {
        let pem = include_str!("../../../tests/fixtures/ed_public.pem");
        assert!(matches!(
            build_token_verifier(&config("rsa", pem)),
            Err(AppError::Internal)
        ));
    }
}
