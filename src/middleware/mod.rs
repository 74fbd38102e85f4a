/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (session gate) は route 単位、その他は Router 全体に適用する
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
