//! Bearer access token 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を受け取り、TokenVerifier で署名 / exp / nbf を検証する
//! - identity claim (既定: sub) を取り出し、claims と一緒に `AuthCtx` として格納する
//! - 失敗理由 (AuthErrorKind) はログにだけ出し、クライアントには 401 のみ返す

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{get_identity, is_bearer};
use crate::state::AppState;

/// Put bearer authentication in front of every route of `router`.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    if !is_bearer(auth) {
        tracing::debug!("authorization header is not bearer-framed");
        return Err(AppError::Unauthorized);
    }

    let claims = state.verifier.verify(auth).map_err(|err| {
        tracing::warn!(kind = ?err.kind(), error = %err, "access token verification failed");
        AppError::from(err)
    })?;

    let identity = get_identity(&claims, &state.identity_claim).map_err(|err| {
        tracing::warn!(
            kind = ?err.kind(),
            claim = %state.identity_claim,
            "access token has no usable identity claim"
        );
        AppError::from(err)
    })?;

    tracing::debug!(identity = %identity, "bearer token accepted");

    req.extensions_mut().insert(AuthCtx::new(identity, claims));

    Ok(next.run(req).await)
}
