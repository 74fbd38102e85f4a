/*
 * Responsibility
 * - GET /protected
 * - gate が格納した AuthCtx を受け取り、authority から profile を取り直して挨拶を返す
 * - claims の中身は使わない (profile は毎回取得、キャッシュなし)
 */
use axum::{Json, extract::State};

use crate::{
    api::{dto::protected::WelcomeResponse, extractors::AuthCtxExtractor},
    error::AppError,
    services::identity::with_deadline,
    state::AppState,
};

pub async fn protected(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<WelcomeResponse>, AppError> {
    let lookup = with_deadline(
        "users",
        state.identity_timeout,
        state.identity.get_user(&ctx.user_id),
    );

    let user = lookup.await.map_err(|err| {
        tracing::warn!(
            backend = state.identity.backend_name(),
            user_id = %ctx.user_id,
            session_id = ?ctx.session_id,
            error = ?err,
            "user profile retrieval failed"
        );
        AppError::ProfileRetrieval
    })?;

    let first_name = match user.first_name {
        Some(name) => name,
        None => {
            tracing::warn!(user_id = %ctx.user_id, "user profile has no first name");
            String::new()
        }
    };

    Ok(Json(WelcomeResponse::for_first_name(&first_name)))
}
