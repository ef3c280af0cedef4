use axum::Json;

use super::StatusResponse;

/// GET /
pub async fn get_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Online".to_string(),
        message: "Noted Backend is running!".to_string(),
    })
}
