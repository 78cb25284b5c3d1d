/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - Bearer が必要な範囲 (access middleware) はここで掛ける
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::whoami::whoami;
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/whoami", get(whoami));

    access::apply(protected, state)
}
