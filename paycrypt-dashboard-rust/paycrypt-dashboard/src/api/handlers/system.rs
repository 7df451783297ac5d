use actix_web::web::Data;
use actix_web::{get, HttpResponse};

use crate::app::state::AppState;

#[get("/health")]
pub async fn health(state: Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": state.uptime_secs(),
        "selection": state.selection(),
        "message": "Paycrypt admin dashboard is running"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::tests::test_state;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_reports_selection() {
        let app = test::init_service(App::new().app_data(test_state()).service(health)).await;

        let resp: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;

        assert_eq!(resp["status"], "healthy");
        assert_eq!(resp["selection"]["currentKey"], "base");
        assert_eq!(resp["selection"]["isInitializing"], false);
    }
}
