/*
 * Responsibility
 * - URL 構造を定義
 * - /health は公開、/protected は session gate の内側
 */
use axum::{Router, routing::get};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::handlers::{health::health, protected::protected};

pub fn routes(state: AppState) -> Router<AppState> {
    let gated = Router::new().route("/protected", get(protected));
    let gated = access::apply(gated, state);

    Router::new().route("/health", get(health)).merge(gated)
}
