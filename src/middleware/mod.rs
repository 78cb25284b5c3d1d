/*
 * Responsibility
 * - middleware の公開インターフェース
 * - http: request-id / trace / body limit / timeout
 * - auth: Bearer トークン検証 → AuthCtx
 */
pub mod auth;
pub mod http;
