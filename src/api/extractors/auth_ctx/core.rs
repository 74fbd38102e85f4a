use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::AuthCtx;

/// Handler で、 AuthCtx を受け取るための extractor
/// middleware が AuthCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は配線ミス (gate 未適用)。既定値で続行しない:
/// - debug build (test / 開発): panic (開発時は panic hook がプロセスを落とす)
/// - release build: error ログを出して 500
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthCtx>() {
            Some(ctx) => Ok(AuthCtxExtractor(ctx.clone())),
            None => {
                tracing::error!(
                    path = %parts.uri.path(),
                    "AuthCtx missing from request extensions; auth gate is not applied to this route"
                );
                if cfg!(debug_assertions) {
                    panic!("AuthCtx missing for {}: auth gate not applied", parts.uri.path());
                }
                Err(AppError::Internal)
            }
        }
    }
}
