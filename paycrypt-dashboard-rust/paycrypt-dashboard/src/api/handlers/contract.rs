use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, HttpResponse};
use ethers::types::Address;
use futures_util::future::try_join;
use paycrypt_admin_core::shared::utils::parse_address;
use paycrypt_admin_core::{AdminCall, AdminCallParams, Notice, Notifier};
use serde_json::json;

use crate::app::state::AppState;
use crate::domain::error::DashboardResult;

/// Pause flag of the selected chain's contract and whether the connected
/// wallet account is one of its admins.
#[get("/contract/status")]
pub async fn contract_status(state: Data<AppState>) -> DashboardResult<HttpResponse> {
    let clients = state.current_clients()?;
    let (paused, wallet) = try_join(clients.contract.is_paused(), state.admin.wallet.status()).await?;

    let is_admin = match wallet.account {
        Some(account) => Some(clients.contract.is_admin(account).await?),
        None => None,
    };
    let address = format!("{:?}", clients.contract.address());
    let on_selected_chain = wallet.chain_id == Some(clients.chain_id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "chain": clients.key,
        "contractAddress": address,
        "explorerUrl": clients.address_url(&address),
        "paused": paused,
        "wallet": wallet,
        "isAdmin": is_admin,
        "walletOnSelectedChain": on_selected_chain,
    })))
}

#[get("/tokens")]
pub async fn get_tokens(state: Data<AppState>) -> DashboardResult<HttpResponse> {
    let clients = state.current_clients()?;
    let tokens = clients.contract.supported_token_infos(&clients.descriptor).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "chain": clients.key,
        "tokens": tokens,
    })))
}

#[get("/blacklist/{address}")]
pub async fn check_blacklist(state: Data<AppState>, address: Path<String>) -> DashboardResult<HttpResponse> {
    let account: Address = parse_address(&address)?;
    let clients = state.current_clients()?;
    let blacklisted = clients.contract.is_blacklisted(account).await?;
    let address = format!("{account:?}");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "chain": clients.key,
        "address": address,
        "explorerUrl": clients.address_url(&address),
        "blacklisted": blacklisted,
    })))
}

/// Validate an admin write and hand it to the wallet for signing.
#[post("/admin/{action}")]
pub async fn submit_admin_call(
    state: Data<AppState>,
    action: Path<String>,
    params: Json<AdminCallParams>,
) -> DashboardResult<HttpResponse> {
    let call = AdminCall::build(&action, &params)?;
    let clients = state.current_clients()?;
    let notices = &state.admin.notices;

    match clients.contract.submit(&call, state.admin.wallet.as_ref()).await {
        Ok(hash) => {
            let hash = format!("{hash:?}");
            notices.notify(Notice::success(format!("{} submitted", call.description())));
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "chain": clients.key,
                "call": call,
                "txHash": hash,
                "explorerUrl": clients.tx_url(&hash),
            })))
        }
        Err(e) if e.is_user_rejection() => {
            notices.notify(Notice::info(format!("{} was cancelled in the wallet", call.description())));
            Err(e.into())
        }
        Err(e) => {
            notices.notify(Notice::error(format!("{} failed: {}", call.description(), e)));
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api;
    use crate::app::state::tests::test_state;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use paycrypt_admin_core::NoticeLevel;

    #[actix_web::test]
    async fn test_admin_call_validation_happens_before_wallet() {
        let state = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/admin/markOrderFailed")
            .set_json(json!({ "orderId": format!("0x{}", "11".repeat(32)) }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.admin.notices.is_empty());

        let req = test::TestRequest::post()
            .uri("/api/admin/selfDestruct")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_admin_call_without_wallet_is_reported() {
        let state = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/admin/pause")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "WALLET_ERROR");
        assert_eq!(state.admin.notices.latest().unwrap().level, NoticeLevel::Error);
    }

    #[actix_web::test]
    async fn test_blacklist_rejects_malformed_address() {
        let app = test::init_service(App::new().app_data(test_state()).configure(api::configure)).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/blacklist/not-an-address").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
