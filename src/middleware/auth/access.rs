//! session token 検証 (identity authority へ委譲) → AuthCtx を extensions に入れる
//!
//! - `Authorization` が無い / 空 → 401 (body なし、authority は呼ばない)
//! - 先頭の `"Bearer "` を一度だけ剥がす (大文字小文字は区別、無ければ値そのものを token とする)
//! - authority が拒否 → 401 `{"error":"Invalid session token"}` (理由は返さずログのみ)
//! - 成功 → claims.sub を `AuthCtx.user_id` として extensions に格納
//! - authority が `identity_timeout` 内に応答しない場合も同じ 401 (到達不能と区別しない)
//!
//! キャッシュもリトライもしない。リクエストごとに毎回検証する。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::identity::with_deadline;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// 認証が必要なルートに gate を掛ける。
///
/// `route_layer` なので、存在しないパスは 401 ではなく 404 のまま。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/protected", get(protected));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

/// Pull the session token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .filter(|v| !v.is_empty())
        .ok_or(AppError::MissingCredential)?;

    // Present but not representable as a string: nothing sensible to delegate.
    let raw = value.to_str().map_err(|_| AppError::InvalidCredential)?;

    Ok(raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = match bearer_token(req.headers()) {
        Ok(token) => token,
        Err(err) => {
            tracing::debug!(error = %err, "request rejected before verification");
            return Err(err);
        }
    };

    let verification = with_deadline(
        "tokens/verify",
        state.identity_timeout,
        state.identity.verify_token(token),
    );

    let claims = match verification.await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                backend = state.identity.backend_name(),
                error = ?err,
                "session token verification failed"
            );
            return Err(AppError::InvalidCredential);
        }
    };

    tracing::debug!(?claims, "session token verified");

    let auth_ctx = AuthCtx::new(claims.sub).with_session_id(claims.sid);

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
