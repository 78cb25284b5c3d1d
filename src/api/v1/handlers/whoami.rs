/*
 * Responsibility
 * - GET /api/v1/whoami
 * - access middleware が検証した identity と claims をそのまま返す
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::services::auth::Claims;

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub identity: String,
    pub claims: Claims,
}

pub async fn whoami(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<WhoamiResponse> {
    Json(WhoamiResponse {
        identity: ctx.identity,
        claims: ctx.claims,
    })
}
