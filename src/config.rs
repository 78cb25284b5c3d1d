/*
 * Responsibility
 * - 環境変数 (.env) からの設定読み込み (PORT, 公開鍵, leeway, identity claim)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::auth::{DEFAULT_IDENTITY_CLAIM, KeyFamily};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Public half of the token issuer's key pair, PEM.
    pub public_key_pem: String,
    pub key_family: KeyFamily,
    pub leeway_seconds: u64,
    pub identity_claim: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (env, map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let public_key_pem = lookup("BEARER_PUBLIC_KEY_PEM")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("BEARER_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let key_family = match lookup("BEARER_KEY_FAMILY") {
            Some(v) => v
                .parse::<KeyFamily>()
                .map_err(|_| ConfigError::Invalid("BEARER_KEY_FAMILY"))?,
            None => KeyFamily::Rsa,
        };

        let leeway_seconds = match lookup("BEARER_LEEWAY_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("BEARER_LEEWAY_SECONDS"))?,
            None => 0,
        };

        let identity_claim = lookup("BEARER_IDENTITY_CLAIM")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_IDENTITY_CLAIM.to_string());

        Ok(Config {
            addr,
            app_env,
            public_key_pem,
            key_family,
            leeway_seconds,
            identity_claim,
        })
    }
}
