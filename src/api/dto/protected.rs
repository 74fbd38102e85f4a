/*
 * Responsibility
 * - GET /protected の response DTO
 */
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

impl WelcomeResponse {
    pub fn for_first_name(first_name: &str) -> Self {
        Self {
            message: format!("Welcome, {first_name}!"),
        }
    }
}
