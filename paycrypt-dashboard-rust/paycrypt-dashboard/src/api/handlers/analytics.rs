use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web::{Data, Query};
use actix_web::{get, HttpResponse};
use paycrypt_admin_core::core::reports::REPORT_CONTENT_TYPE;
use paycrypt_admin_core::{ReportBuilder, TimeRange};
use serde::Deserialize;
use serde_json::json;

use crate::app::state::AppState;
use crate::domain::error::DashboardResult;

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    pub range: TimeRange,
}

/// Cross-chain summary; chains that fail are listed under `errors`.
#[get("/analytics")]
pub async fn get_analytics(state: Data<AppState>, query: Query<RangeQuery>) -> DashboardResult<HttpResponse> {
    let summary = state.admin.analytics.summary(query.range).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "summary": summary,
    })))
}

#[get("/reports/orders")]
pub async fn download_orders_report(
    state: Data<AppState>,
    query: Query<RangeQuery>,
) -> DashboardResult<HttpResponse> {
    let analytics = &state.admin.analytics;
    let snapshot = analytics.snapshot(query.range).await?;
    let summary = analytics.summarize(&snapshot);

    let report = ReportBuilder::new(&state.admin.registry, &summary, &snapshot);
    let file_name = report.file_name();
    let bytes = report.to_buffer()?;
    log::info!("Serving {} ({} bytes)", file_name, bytes.len());

    Ok(HttpResponse::Ok()
        .content_type(REPORT_CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api;
    use crate::app::state::tests::test_state;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[::core::prelude::v1::test]
    fn test_range_defaults_to_week() {
        let query: RangeQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.range, TimeRange::Week);

        let query: RangeQuery = serde_json::from_str(r#"{"range": "30d"}"#).unwrap();
        assert_eq!(query.range, TimeRange::Month);
    }

    #[actix_web::test]
    async fn test_unknown_range_is_rejected() {
        let app = test::init_service(App::new().app_data(test_state()).configure(api::configure)).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/analytics?range=fortnight").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_analytics_fails_when_every_chain_is_unreachable() {
        let app = test::init_service(App::new().app_data(test_state()).configure(api::configure)).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/analytics?range=24h").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "NETWORK_ERROR");
    }
}
