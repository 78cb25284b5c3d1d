/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: 全リクエストで共有する TokenVerifier (読み取り専用)
 *   - identity_claim: AuthCtx.identity に使う claim 名
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::TokenVerifier;

#[derive(Clone, Debug)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub identity_claim: Arc<str>,
}

impl AppState {
    pub fn new(verifier: Arc<TokenVerifier>, identity_claim: impl Into<Arc<str>>) -> Self {
        Self {
            verifier,
            identity_claim: identity_claim.into(),
        }
    }
}
