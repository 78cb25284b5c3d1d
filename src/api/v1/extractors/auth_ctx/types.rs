/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - 署名検証や claim の取り出しは services::auth 側の責務
 * - 認可 (権限判定) はここでは扱わない
 */

use crate::services::auth::Claims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `identity` は identity claim (既定: sub) の値
/// - `claims` は検証済みの claim 全体 (監査/相関用)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: String,
    pub claims: Claims,
}

impl AuthCtx {
    pub fn new(identity: String, claims: Claims) -> Self {
        Self { identity, claims }
    }
}
