use actix_web::web::{Data, Json};
use actix_web::{get, post, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::app::state::AppState;
use crate::domain::error::DashboardResult;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn session_body(state: &AppState) -> serde_json::Value {
    let session = state.admin.backend.session();
    json!({
        "success": true,
        "authenticated": session.is_authenticated(),
        "expiresAt": session.expires_at(),
    })
}

#[get("/session")]
pub async fn get_session(state: Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(session_body(&state))
}

/// Logs in against the backend; the token stays server-side.
#[post("/session/login")]
pub async fn login(state: Data<AppState>, req: Json<LoginRequest>) -> DashboardResult<HttpResponse> {
    state.admin.backend.login(&req.email, &req.password).await?;
    log::info!("Admin logged in as {}", req.email.trim());
    Ok(HttpResponse::Ok().json(session_body(&state)))
}

#[post("/session/logout")]
pub async fn logout(state: Data<AppState>) -> HttpResponse {
    state.admin.backend.logout();
    HttpResponse::Ok().json(session_body(&state))
}
